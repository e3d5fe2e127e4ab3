/*
 * Remembers the page address the checklist was last opened for, so later runs
 * can omit it. Stored as plain text in the app's local config directory.
 *
 * `ConfigManagerOperations` keeps the storage behind a trait so the
 * application logic and tests can substitute their own implementation.
 */
use crate::core::path_utils;
use std::fs;
use std::io;
use std::path::PathBuf;

const LAST_PAGE_ADDRESS_FILENAME: &str = "last_page_address.txt";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    NoProjectDirectory,
    Utf8Error(std::string::FromUtf8Error),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<std::string::FromUtf8Error> for ConfigError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ConfigError::Utf8Error(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine configuration directory")
            }
            ConfigError::Utf8Error(e) => write!(f, "Configuration file UTF-8 error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Utf8Error(e) => Some(e),
            ConfigError::NoProjectDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_last_page_address(&self) -> Result<Option<String>>;
    fn save_last_page_address(&self, address: &str) -> Result<()>;
}

/*
 * File-backed configuration. `config_dir` is resolved lazily through
 * `path_utils` unless an explicit directory was given.
 */
pub struct CoreConfigManager {
    app_name: String,
    config_dir: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new(app_name: &str) -> Self {
        CoreConfigManager {
            app_name: app_name.to_string(),
            config_dir: None,
        }
    }

    #[cfg(test)]
    pub fn with_config_dir(app_name: &str, config_dir: PathBuf) -> Self {
        CoreConfigManager {
            app_name: app_name.to_string(),
            config_dir: Some(config_dir),
        }
    }

    fn address_file_path(&self) -> Result<PathBuf> {
        let dir = match &self.config_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                dir.clone()
            }
            None => path_utils::get_base_app_config_local_dir(&self.app_name)
                .ok_or(ConfigError::NoProjectDirectory)?,
        };
        Ok(dir.join(LAST_PAGE_ADDRESS_FILENAME))
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    fn load_last_page_address(&self) -> Result<Option<String>> {
        let file_path = self.address_file_path()?;
        if !file_path.exists() {
            log::debug!("CoreConfigManager: No remembered page address at {file_path:?}.");
            return Ok(None);
        }

        let contents = String::from_utf8(fs::read(&file_path)?)?;
        let address = contents.trim();
        if address.is_empty() {
            log::debug!("CoreConfigManager: Remembered page address file {file_path:?} is empty.");
            Ok(None)
        } else {
            log::debug!("CoreConfigManager: Loaded page address '{address}' from {file_path:?}.");
            Ok(Some(address.to_string()))
        }
    }

    fn save_last_page_address(&self, address: &str) -> Result<()> {
        let file_path = self.address_file_path()?;
        fs::write(&file_path, address.trim())?;
        log::debug!("CoreConfigManager: Saved page address '{address}' to {file_path:?}.");
        Ok(())
    }
}
