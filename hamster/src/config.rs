use crate::error::HamsterError;
use anyhow::Result;
use directories::ProjectDirs;
use redmine::config::RedmineClientConfiguration;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Application configuration struct
/// Holds the data we need to connect to Redmine and where to keep the local facts
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct AppConfiguration {
    #[serde(default)]
    pub redmine: RedmineSettings,

    /// Ensures the database file name is available, even if the Toml file
    /// does not have an `application_data` section
    #[serde(default)]
    pub application_data: ApplicationData,
}

/// The `[redmine]` section of the Toml file
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct RedmineSettings {
    #[serde(default)]
    pub integration_enabled: bool,
    pub url: String,
    pub api_key: String,
}

impl Default for RedmineSettings {
    fn default() -> Self {
        let client = RedmineClientConfiguration::default();
        RedmineSettings {
            integration_enabled: false,
            url: client.url,
            api_key: client.api_key,
        }
    }
}

impl RedmineSettings {
    #[must_use]
    pub fn client_configuration(&self) -> RedmineClientConfiguration {
        RedmineClientConfiguration {
            url: self.url.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

/// Holds the configuration for the `application_data` section of the Toml file
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ApplicationData {
    /// The path to the local Sqlite database holding the facts
    pub database: String,
}

impl Default for ApplicationData {
    fn default() -> Self {
        ApplicationData {
            database: database_file().to_string_lossy().to_string(),
        }
    }
}

/// Supplies the Redmine settings. Implementations are queried for every operation, which
/// makes a configuration change effective from the next call onwards.
pub trait ConfigurationProvider: Send + Sync {
    #[allow(clippy::missing_errors_doc)]
    fn redmine_settings(&self) -> Result<RedmineSettings, HamsterError>;
}

/// Reads the configuration file every time the settings are requested
pub struct FileConfiguration {
    path: PathBuf,
}

impl FileConfiguration {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Default for FileConfiguration {
    fn default() -> Self {
        Self::new(configuration_file())
    }
}

impl ConfigurationProvider for FileConfiguration {
    fn redmine_settings(&self) -> Result<RedmineSettings, HamsterError> {
        match read(&self.path) {
            Ok(cfg) => Ok(cfg.redmine),
            // No configuration file means no Redmine integration
            Err(HamsterError::ApplicationConfig { source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                Ok(RedmineSettings::default())
            }
            Err(e) => Err(e),
        }
    }
}

/// Settings held in memory, replaceable at runtime
pub struct StaticConfiguration {
    settings: RwLock<RedmineSettings>,
}

impl StaticConfiguration {
    #[must_use]
    pub fn new(settings: RedmineSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn update(&self, settings: RedmineSettings) -> Result<(), HamsterError> {
        let mut current = self
            .settings
            .write()
            .map_err(|_| HamsterError::LockPoisoned)?;
        *current = settings;
        Ok(())
    }
}

impl ConfigurationProvider for StaticConfiguration {
    fn redmine_settings(&self) -> Result<RedmineSettings, HamsterError> {
        self.settings
            .read()
            .map(|settings| settings.clone())
            .map_err(|_| HamsterError::LockPoisoned)
    }
}

/// Filename holding the application configuration parameters
#[must_use]
pub fn configuration_file() -> PathBuf {
    project_dirs().preference_dir().join("config.toml")
}

/// Filename of the Sqlite DBMS holding the local facts
#[must_use]
pub fn database_file() -> PathBuf {
    project_dirs().data_dir().join("hamster.db")
}

#[allow(clippy::missing_errors_doc)]
pub fn load() -> Result<AppConfiguration, HamsterError> {
    read(&configuration_file())
}

/// Loads the configuration file, falling back to the defaults if there is none
#[allow(clippy::missing_errors_doc)]
pub fn load_or_default() -> Result<AppConfiguration, HamsterError> {
    match load() {
        Ok(cfg) => Ok(cfg),
        Err(HamsterError::ApplicationConfig { source, .. })
            if source.kind() == io::ErrorKind::NotFound =>
        {
            Ok(AppConfiguration::default())
        }
        Err(e) => Err(e),
    }
}

#[allow(clippy::missing_errors_doc)]
pub fn save(cfg: &AppConfiguration) -> Result<()> {
    create_configuration_file(cfg, &configuration_file())
}

#[allow(clippy::missing_errors_doc)]
pub fn remove() -> io::Result<()> {
    fs::remove_file(configuration_file().as_path())
}

#[allow(clippy::missing_errors_doc)]
pub fn application_config_to_string(cfg: &AppConfiguration) -> Result<String> {
    Ok(toml::to_string::<AppConfiguration>(cfg)?)
}

fn project_dirs() -> ProjectDirs {
    ProjectDirs::from("org", "hamster", "hamster")
        .expect("Unable to determine the name of the 'project_dirs' directory name")
}

/// Reads the `Application` configuration struct from the supplied TOML file
pub(crate) fn read(path: &Path) -> Result<AppConfiguration, HamsterError> {
    let mut file = File::open(path).map_err(|source| HamsterError::ApplicationConfig {
        path: path.into(),
        source,
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| HamsterError::ApplicationConfig {
            path: path.into(),
            source,
        })?;
    toml::from_str::<AppConfiguration>(&contents).map_err(|source| HamsterError::TomlParse {
        path: path.into(),
        source,
    })
}

pub(crate) fn create_configuration_file(cfg: &AppConfiguration, path: &Path) -> Result<()> {
    if let Some(directory) = path.parent() {
        if !directory.try_exists()? {
            fs::create_dir_all(directory)?;
        }
    }

    let mut file = File::create(path)?;
    let toml = application_config_to_string(cfg)?;
    file.write_all(toml.as_bytes())?;

    Ok(())
}
