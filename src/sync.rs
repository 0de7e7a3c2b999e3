//! The synchronizer: compares the dependencies a project declares against
//! the catalog of available type definitions and fills in whatever is
//! missing.
use crate::data::package_file::{PackageFileError, PackageFileService};
use crate::registry::{typed, RegistryError, TypeDefinition, TypeDefinitionSource};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;

#[derive(Clone, Copy, Debug, Default)]
pub struct SyncOptions {
    /// Compute the additions without writing the package file back.
    pub dry: bool,
    /// Route additions to the optional section instead of the development one.
    pub optional: bool,
}

/// The type definitions newly added during a sync pass, sorted by name.
#[derive(Clone, Debug, Default)]
pub struct SyncResult {
    pub new_typings: Vec<TypeDefinition>,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Could not open package file. {0}")]
    PackageFile(#[from] PackageFileError),
    #[error("Could not reach the type definition source. {0}")]
    Registry(#[from] RegistryError),
    #[error("A version lookup did not complete. {0}")]
    VersionLookup(String),
}

pub struct TypeSyncer<P, S> {
    package_service: Arc<P>,
    source: Arc<S>,
}

impl<P, S> TypeSyncer<P, S>
where
    P: PackageFileService + 'static,
    S: TypeDefinitionSource + 'static,
{
    pub fn new(package_service: Arc<P>, source: Arc<S>) -> Self {
        TypeSyncer {
            package_service,
            source,
        }
    }

    /// Syncs typings in the specified package file.
    pub async fn sync(&self, path: &Path, options: SyncOptions) -> Result<SyncResult, SyncError> {
        let (file, all_typings) = tokio::try_join!(
            async {
                self.package_service
                    .read_package_file(path)
                    .await
                    .map_err(SyncError::from)
            },
            async {
                self.source
                    .fetch_type_definitions()
                    .await
                    .map_err(SyncError::from)
            },
        )?;

        let package_names = file.declared_package_names();
        let new_typings = filter_new_typings(&package_names, &all_typings);
        debug!(
            "{} of {} declared package(s) lack type definitions",
            new_typings.len(),
            package_names.len()
        );

        let mut lookups = JoinSet::new();
        for type_def in &new_typings {
            let source = Arc::clone(&self.source);
            let typings_name = type_def.typings_name.clone();
            lookups.spawn(async move {
                let latest = source.latest_typings_version(&typings_name).await?;
                Ok::<_, RegistryError>((typings_name, latest))
            });
        }
        let mut resolved: BTreeMap<String, String> = BTreeMap::new();
        while let Some(joined) = lookups.join_next().await {
            let (typings_name, latest) =
                joined.map_err(|e| SyncError::VersionLookup(e.to_string()))??;
            resolved.insert(typed(&typings_name), format!("^{}", latest));
        }

        let mut updated = file;
        for (typed_name, version_range) in resolved {
            if options.optional {
                updated.add_optional_dependency(typed_name, version_range);
            } else {
                updated.add_dev_dependency(typed_name, version_range);
            }
        }

        if !options.dry {
            self.package_service
                .write_package_file(path, &updated)
                .await?;
        }

        Ok(SyncResult { new_typings })
    }
}

/// Catalog entries worth adding: declared packages that have a type
/// definition available and no typed counterpart declared yet. Entries that
/// are themselves `@types` packages are never candidates.
fn filter_new_typings(
    package_names: &BTreeSet<String>,
    all_typings: &[TypeDefinition],
) -> Vec<TypeDefinition> {
    package_names
        .iter()
        .filter(|name| !name.starts_with(crate::constants::TYPES_SCOPE_PREFIX))
        .filter_map(|name| all_typings.iter().find(|t| &t.typings_name == name))
        .filter(|type_def| !package_names.contains(&type_def.typed_package_name()))
        .cloned()
        .collect()
}
