//! The lookup side of the sync: which packages have type definitions
//! available, and what the latest published version of each one is.
use crate::config::{Config, Registry};
use crate::constants::{TYPES_SCOPE_PREFIX, TYPE_DEFINITION_INDEX_URL};
use crate::util;
use async_trait::async_trait;
use semver::Version;
use std::env;
use thiserror::Error;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A package name that has a corresponding type definition package
/// published under the `@types` scope.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TypeDefinition {
    #[serde(rename = "t")]
    pub typings_name: String,
}

impl TypeDefinition {
    pub fn typed_package_name(&self) -> String {
        typed(&self.typings_name)
    }
}

/// The type definition package name convention.
pub fn typed(package_name: &str) -> String {
    format!("{}{}", TYPES_SCOPE_PREFIX, package_name)
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Could not construct the registry client. {0}")]
    ClientBuild(String),
    #[error("Could not fetch the type definition index. {0}")]
    IndexFetch(String),
    #[error("Could not fetch the latest version of \"{0}\". {1}")]
    VersionFetch(String, String),
    #[error("The registry returned no latest version for \"{0}\".")]
    MissingLatestVersion(String),
    #[error("The registry returned an invalid version for \"{0}\": {1}")]
    InvalidVersion(String, String),
    #[error(transparent)]
    InvalidPackageName(#[from] util::PackageNameError),
}

/// Lookup seam, kept as a trait to enable testing and dependency injection.
#[async_trait]
pub trait TypeDefinitionSource: Send + Sync {
    /// The full catalog of packages with type definitions available.
    async fn fetch_type_definitions(&self) -> Result<Vec<TypeDefinition>, RegistryError>;
    /// Latest published version of the `@types` package for `typings_name`.
    async fn latest_typings_version(&self, typings_name: &str) -> Result<String, RegistryError>;
}

/// The production source: the published type definition index for the
/// catalog, the npm registry for version lookups.
pub struct RegistrySource {
    client: reqwest::Client,
    registry: Registry,
    index_url: String,
}

impl RegistrySource {
    pub fn new(config: &Config) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("typesync/{}", VERSION))
            .build()
            .map_err(|e| RegistryError::ClientBuild(e.to_string()))?;
        let index_url = env::var("TYPESYNC_INDEX_URL")
            .unwrap_or_else(|_| TYPE_DEFINITION_INDEX_URL.to_string());
        // the environment wins over the config file
        let token = env::var("TYPESYNC_REGISTRY_TOKEN")
            .ok()
            .or_else(|| config.registry.token.clone());
        Ok(RegistrySource {
            client,
            registry: Registry {
                url: config.registry.url.clone(),
                token,
            },
            index_url,
        })
    }
}

#[async_trait]
impl TypeDefinitionSource for RegistrySource {
    async fn fetch_type_definitions(&self) -> Result<Vec<TypeDefinition>, RegistryError> {
        let res = self
            .client
            .get(&self.index_url)
            .send()
            .await
            .map_err(|e| RegistryError::IndexFetch(e.to_string()))?;
        res.error_for_status()
            .map_err(|e| RegistryError::IndexFetch(e.to_string()))?
            .json::<Vec<TypeDefinition>>()
            .await
            .map_err(|e| RegistryError::IndexFetch(e.to_string()))
    }

    async fn latest_typings_version(&self, typings_name: &str) -> Result<String, RegistryError> {
        util::validate_package_name(typings_name)?;
        // the scope separator must be escaped in registry package URLs
        let url = self
            .registry
            .get_package_url(&format!("@types%2F{}", typings_name));
        let mut request = self.client.get(&url);
        if let Some(token) = &self.registry.token {
            request = request.bearer_auth(token);
        }
        let res = request
            .send()
            .await
            .map_err(|e| RegistryError::VersionFetch(typed(typings_name), e.to_string()))?;
        let body: serde_json::Value = res
            .error_for_status()
            .map_err(|e| RegistryError::VersionFetch(typed(typings_name), e.to_string()))?
            .json()
            .await
            .map_err(|e| RegistryError::VersionFetch(typed(typings_name), e.to_string()))?;

        let latest = body
            .get("dist-tags")
            .and_then(|tags| tags.get("latest"))
            .and_then(|version| version.as_str())
            .ok_or_else(|| RegistryError::MissingLatestVersion(typed(typings_name)))?;
        Version::parse(latest)
            .map_err(|e| RegistryError::InvalidVersion(typed(typings_name), e.to_string()))?;
        Ok(latest.to_string())
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;

    #[test]
    fn typed_prepends_the_types_scope() {
        assert_eq!("@types/lodash", typed("lodash"));
    }

    #[test]
    fn index_entries_deserialize_from_the_published_format() {
        // the index carries more fields than we care about
        let raw = r#"[
            { "t": "lodash", "g": [], "m": 98 },
            { "t": "node", "g": [], "m": 99 }
        ]"#;
        let defs: Vec<TypeDefinition> = serde_json::from_str(raw).unwrap();
        let names: Vec<_> = defs.iter().map(|d| d.typings_name.as_str()).collect();
        assert_eq!(vec!["lodash", "node"], names);
    }
}
