//! Configuration file handling for spendbook.
//!
//! The configuration file is stored at `$SPENDBOOK_HOME/config.json` and contains the backup
//! settings, the currency display format, and the payees offered when recording transactions.

use crate::aggregate::CurrencyFormat;
use crate::backup::Backup;
use crate::storage::{FileStorage, Storage};
use crate::store::Store;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_NAME: &str = "spendbook";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const DATA: &str = "data";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SPENDBOOK_HOME` and from there it loads `$SPENDBOOK_HOME/config.json`. It
/// provides the storage directory and the settings that the store and the commands need.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    data: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its data subdirectory and an initial `config.json` with default
    /// settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the home directory, e.g.
    ///   `$HOME/spendbook`
    ///
    /// # Errors
    /// - Returns an error if `config.json` already exists.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the spendbook home directory")?;

        // Canonicalize the directory path
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let data = root.join(DATA);
        utils::make_dir(&data).await?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            data,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the `home` exists and that the config file exists
    /// - load and validate the config file
    /// - validate that the data directory exists
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The spendbook home directory is missing, run 'spendbook init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            data: root.join(DATA),
            root,
            config_path,
            config_file,
        };
        if !config.data.is_dir() {
            bail!("The data directory is missing '{}'", config.data.display())
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The directory holding the persisted transactions.
    pub fn data(&self) -> &Path {
        &self.data
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.config_file.currency
    }

    /// The payees offered when recording a transaction. Empty means any payee is accepted.
    pub fn payees(&self) -> &[String] {
        &self.config_file.payees
    }

    /// The storage medium under the data directory.
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::new(FileStorage::new(&self.data))
    }

    /// Opens the transaction store persisted under the data directory.
    pub async fn store(&self) -> Store {
        let storage = self.storage();
        let backup = Backup::new(storage.clone(), self.backup_copies());
        Store::initialize(storage, backup).await
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "spendbook",
///   "config_version": 1,
///   "backup_copies": 5,
///   "currency": { "symbol": "₹", "locale": "en-IN" },
///   "payees": ["Mom", "Jay"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "spendbook"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies of unreadable data to keep
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// How amounts are displayed
    #[serde(default)]
    currency: CurrencyFormat,

    /// The payees offered when recording a transaction
    #[serde(default)]
    payees: Vec<String>,
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            currency: CurrencyFormat::default(),
            payees: Vec::new(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Arguments
    /// * `path` - Path to the config.json file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if a setting is invalid
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );
        anyhow::ensure!(
            config.backup_copies > 0,
            "Invalid backup_copies in config file: at least one backup must be kept"
        );
        config
            .currency
            .validate()
            .with_context(|| format!("Invalid currency in config file {}", path.display()))?;

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    ///
    /// # Arguments
    /// * `path` - Path where the config.json file should be saved
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
