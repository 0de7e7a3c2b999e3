//! The package file is where a project declares its dependencies. This tool
//! only ever adds entries to the development or optional sections.
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

/// The name of the manifest file. This is hard-coded for now.
pub static MANIFEST_FILE_NAME: &str = "package.json";

/// A project manifest with its three dependency sections. Sections are kept
/// in sorted maps so a rewrite always emits keys in order. Any field this
/// tool does not know about is carried through a read-modify-write cycle
/// untouched.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PackageFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, String>>,
    #[serde(rename = "devDependencies", skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<BTreeMap<String, String>>,
    #[serde(
        rename = "optionalDependencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub optional_dependencies: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl PackageFile {
    /// Names declared in the regular and development sections, deduplicated.
    pub fn declared_package_names(&self) -> BTreeSet<String> {
        self.dependencies
            .iter()
            .chain(self.dev_dependencies.iter())
            .flat_map(|section| section.keys().cloned())
            .collect()
    }

    /// Adds a development dependency. An existing entry for the same name wins.
    pub fn add_dev_dependency(&mut self, package_name: String, version_range: String) {
        self.dev_dependencies
            .get_or_insert_with(Default::default)
            .entry(package_name)
            .or_insert(version_range);
    }

    /// Adds an optional dependency. An existing entry for the same name wins.
    pub fn add_optional_dependency(&mut self, package_name: String, version_range: String) {
        self.optional_dependencies
            .get_or_insert_with(Default::default)
            .entry(package_name)
            .or_insert(version_range);
    }
}

#[derive(Debug, Error)]
pub enum PackageFileError {
    #[error("Could not read package file at \"{0}\". {1}")]
    FileRead(String, String),
    #[error("Could not write package file at \"{0}\". {1}")]
    FileWrite(String, String),
    #[error("Could not parse package file because {0}.")]
    JsonParse(String),
    #[error("Could not serialize package file because {0}.")]
    JsonSerialize(String),
}

/// Read/write seam for the package file, kept as a trait to enable testing
/// and dependency injection.
#[async_trait]
pub trait PackageFileService: Send + Sync {
    async fn read_package_file(&self, path: &Path) -> Result<PackageFile, PackageFileError>;
    async fn write_package_file(
        &self,
        path: &Path,
        file: &PackageFile,
    ) -> Result<(), PackageFileError>;
}

/// The production service: plain JSON on the local filesystem.
pub struct FilesystemPackageService;

#[async_trait]
impl PackageFileService for FilesystemPackageService {
    async fn read_package_file(&self, path: &Path) -> Result<PackageFile, PackageFileError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PackageFileError::FileRead(path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| PackageFileError::JsonParse(e.to_string()))
    }

    async fn write_package_file(
        &self,
        path: &Path,
        file: &PackageFile,
    ) -> Result<(), PackageFileError> {
        let mut contents = serde_json::to_string_pretty(file)
            .map_err(|e| PackageFileError::JsonSerialize(e.to_string()))?;
        contents.push('\n');
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| PackageFileError::FileWrite(path.display().to_string(), e.to_string()))
    }
}

#[cfg(test)]
mod package_file_tests {
    use super::*;

    #[test]
    fn declared_names_cover_regular_and_dev_sections() {
        let file: PackageFile = serde_json::from_str(
            r#"{
                "name": "consumer",
                "dependencies": { "package1": "^1.0.0" },
                "devDependencies": { "package2": "^1.0.0", "package1": "^1.0.0" }
            }"#,
        )
        .unwrap();
        let names: Vec<_> = file.declared_package_names().into_iter().collect();
        assert_eq!(vec!["package1".to_string(), "package2".to_string()], names);
    }

    #[test]
    fn adding_an_existing_dev_dependency_does_not_clobber_it() {
        let mut file = PackageFile::default();
        file.add_dev_dependency("@types/package1".to_string(), "^1.0.0".to_string());
        file.add_dev_dependency("@types/package1".to_string(), "^2.0.0".to_string());
        assert_eq!(
            Some(&"^1.0.0".to_string()),
            file.dev_dependencies.as_ref().unwrap().get("@types/package1")
        );
    }
}

#[cfg(test)]
mod filesystem_service_tests {
    use super::*;

    #[tokio::test]
    async fn unknown_fields_survive_a_round_trip() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let manifest_path = tmp_dir.path().join(MANIFEST_FILE_NAME);
        std::fs::write(
            &manifest_path,
            r#"{
                "name": "consumer",
                "version": "0.1.0",
                "scripts": { "test": "jest" },
                "dependencies": { "package1": "^1.0.0" }
            }"#,
        )
        .unwrap();

        let service = FilesystemPackageService;
        let mut file = service.read_package_file(&manifest_path).await.unwrap();
        file.add_dev_dependency("@types/package1".to_string(), "^1.0.0".to_string());
        service
            .write_package_file(&manifest_path, &file)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&manifest_path).unwrap();
        let reread: PackageFile = serde_json::from_str(&written).unwrap();
        assert_eq!(
            Some(&Value::String("0.1.0".to_string())),
            reread.rest.get("version")
        );
        assert!(reread.rest.get("scripts").is_some());
        assert_eq!(
            Some(&"^1.0.0".to_string()),
            reread.dev_dependencies.as_ref().unwrap().get("@types/package1")
        );
        assert!(written.ends_with('\n'));
    }

    #[tokio::test]
    async fn sections_are_written_in_sorted_order() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let manifest_path = tmp_dir.path().join(MANIFEST_FILE_NAME);
        let mut file = PackageFile::default();
        file.add_dev_dependency("zebra".to_string(), "^1.0.0".to_string());
        file.add_dev_dependency("aardvark".to_string(), "^1.0.0".to_string());

        let service = FilesystemPackageService;
        service
            .write_package_file(&manifest_path, &file)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&manifest_path).unwrap();
        let aardvark = written.find("aardvark").unwrap();
        let zebra = written.find("zebra").unwrap();
        assert!(aardvark < zebra);
    }

    #[tokio::test]
    async fn missing_package_file_is_a_read_error() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let manifest_path = tmp_dir.path().join(MANIFEST_FILE_NAME);
        let service = FilesystemPackageService;
        let result = service.read_package_file(&manifest_path).await;
        assert!(matches!(result, Err(PackageFileError::FileRead(_, _))));
    }
}
