use crate::constants::DEFAULT_REGISTRY_URL;
use std::env;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

pub static CONFIG_FILE_NAME: &str = "typesync.toml";

#[derive(Deserialize, Serialize, Debug)]
pub struct Config {
    pub registry: Registry,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct Registry {
    pub url: String,
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            registry: Registry {
                url: DEFAULT_REGISTRY_URL.to_string(),
                token: None,
            },
        }
    }
}

impl Config {
    /// The folder where the config file and the verbose log live.
    /// `TYPESYNC_DIR` overrides the default location under the home directory.
    pub fn get_folder() -> Result<PathBuf, GlobalConfigError> {
        let folder = match env::var("TYPESYNC_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::home_dir()
                .map(|home| home.join(".typesync"))
                .ok_or(GlobalConfigError::MissingHomeDir)?,
        };
        std::fs::create_dir_all(&folder).map_err(GlobalConfigError::Io)?;
        Ok(folder)
    }

    fn get_file_location() -> Result<PathBuf, GlobalConfigError> {
        Ok(Self::get_folder()?.join(CONFIG_FILE_NAME))
    }

    /// Reads the config file, falling back to defaults when none exists yet.
    pub fn from_file() -> Result<Self, GlobalConfigError> {
        let path = Self::get_file_location()?;
        if !path.is_file() {
            return Ok(Config::default());
        }
        let mut config_toml = String::new();
        let mut file = File::open(&path).map_err(GlobalConfigError::Io)?;
        file.read_to_string(&mut config_toml)
            .map_err(GlobalConfigError::Io)?;
        toml::from_str(&config_toml).map_err(GlobalConfigError::Toml)
    }

    pub fn save(&self) -> Result<(), GlobalConfigError> {
        let path = Self::get_file_location()?;
        let config_serialized = toml::to_string(self).map_err(GlobalConfigError::TomlSer)?;
        let mut file = File::create(path).map_err(GlobalConfigError::Io)?;
        file.write_all(config_serialized.as_bytes())
            .map_err(GlobalConfigError::Io)?;
        Ok(())
    }
}

impl Registry {
    /// Builds the metadata URL for a package. The caller is responsible for
    /// escaping the scope separator in scoped package names.
    pub fn get_package_url(&self, escaped_package_name: &str) -> String {
        let url = self.url.trim_end_matches('/');
        format!("{}/{}", url, escaped_package_name)
    }
}

pub fn set(config: &mut Config, key: String, value: String) -> anyhow::Result<()> {
    match key.as_str() {
        "registry.url" => {
            url::Url::parse(&value)?;
            config.registry.url = value;
        }
        "registry.token" => {
            config.registry.token = Some(value);
        }
        _ => return Err(GlobalConfigError::UnknownKey(key).into()),
    }
    config.save()?;
    Ok(())
}

pub fn get(config: &Config, key: String) -> anyhow::Result<String> {
    let value = match key.as_str() {
        "registry.url" => config.registry.url.clone(),
        "registry.token" => config.registry.token.clone().unwrap_or_default(),
        _ => return Err(GlobalConfigError::UnknownKey(key).into()),
    };
    Ok(value)
}

#[derive(Debug, Error)]
pub enum GlobalConfigError {
    #[error("Could not determine the home directory. Set TYPESYNC_DIR to choose a config folder.")]
    MissingHomeDir,
    #[error("Error while reading config: [{0}]")]
    Io(std::io::Error),
    #[error("Error while reading config: [{0}]")]
    Toml(toml::de::Error),
    #[error("Error while writing config: [{0}]")]
    TomlSer(toml::ser::Error),
    #[error("Unknown config key: \"{0}\"")]
    UnknownKey(String),
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn default_config_points_at_the_public_registry() {
        let config = Config::default();
        assert_eq!(DEFAULT_REGISTRY_URL, config.registry.url);
        assert!(config.registry.token.is_none());
    }

    #[test]
    fn package_url_handles_trailing_slash() {
        let registry = Registry {
            url: "https://registry.example.com/".to_string(),
            token: None,
        };
        assert_eq!(
            "https://registry.example.com/left-pad",
            registry.get_package_url("left-pad")
        );
    }

    #[test]
    fn get_rejects_unknown_keys() {
        let config = Config::default();
        assert!(get(&config, "registry.does_not_exist".to_string()).is_err());
    }
}
