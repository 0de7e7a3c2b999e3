//! Code pertaining to the `sync` subcommand: it adds missing type
//! definition packages to the package file

use crate::config::Config;
use crate::data::package_file::FilesystemPackageService;
use crate::registry::RegistrySource;
use crate::sync::{SyncOptions, TypeSyncer};
use std::path::PathBuf;
use std::sync::Arc;
use structopt::StructOpt;
use thiserror::Error;

/// Options for the `sync` subcommand
#[derive(StructOpt, Debug)]
pub struct SyncOpt {
    /// Path to the package file to synchronize
    #[structopt(parse(from_os_str), default_value = "package.json")]
    manifest: PathBuf,

    /// Compute the missing type packages without writing the package file
    #[structopt(long = "dry")]
    dry: bool,

    /// Add missing type packages to optionalDependencies instead of devDependencies
    #[structopt(long = "optional")]
    optional: bool,
}

#[derive(Debug, Error)]
enum SyncCommandError {
    #[error(
        "Could not find a package file at \"{0}\", try running typesync in the project directory"
    )]
    NoPackageFile(String),
}

/// Run the sync command
pub fn sync(options: SyncOpt) -> anyhow::Result<()> {
    if !options.manifest.is_file() {
        return Err(SyncCommandError::NoPackageFile(options.manifest.display().to_string()).into());
    }
    let config = Config::from_file()?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = rt.block_on(async {
        let package_service = Arc::new(FilesystemPackageService);
        let source = Arc::new(RegistrySource::new(&config)?);
        let syncer = TypeSyncer::new(package_service, source);
        syncer
            .sync(
                &options.manifest,
                SyncOptions {
                    dry: options.dry,
                    optional: options.optional,
                },
            )
            .await
            .map_err(anyhow::Error::from)
    })?;

    if result.new_typings.is_empty() {
        info!("No new type definitions to add");
        return Ok(());
    }
    for type_def in &result.new_typings {
        info!("Adding {}", type_def.typed_package_name());
    }
    if options.dry {
        info!(
            "Dry run, {} package(s) not written to {}",
            result.new_typings.len(),
            options.manifest.display()
        );
    } else {
        info!(
            "Added {} package(s) to {}",
            result.new_typings.len(),
            options.manifest.display()
        );
    }
    Ok(())
}
