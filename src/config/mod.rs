use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_DIR_NAME: &str = ".tessera";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config directory not found: could not determine home directory")]
    HomeDirNotFound,
    #[error("failed to read config file: {0}")]
    ReadFailed(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    ParseFailed(#[from] serde_json::Error),
}

/// A sidebar entry pointing at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub label: String,
    pub href: String,
}

impl Destination {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Location that shows the home pane instead of a tab.
    #[serde(default = "default_home_location")]
    pub home_location: String,

    /// Reopen the tabs from the previous run.
    #[serde(default = "default_true")]
    pub restore_tabs: bool,

    /// Show the navigation sidebar at startup.
    #[serde(default = "default_true")]
    pub show_sidebar: bool,

    /// Entries listed in the sidebar.
    #[serde(default = "default_destinations")]
    pub destinations: Vec<Destination>,
}

fn default_home_location() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_destinations() -> Vec<Destination> {
    vec![
        Destination::new("Employees", "/personnel/employees"),
        Destination::new("Departments", "/personnel/departments"),
        Destination::new("Pay runs", "/payroll/pay-runs"),
        Destination::new("Ledger", "/finance/ledger"),
        Destination::new("Invoices", "/finance/invoices"),
        Destination::new("Projects", "/projects/overview"),
        Destination::new("Tasks", "/projects/tasks"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home_location: default_home_location(),
            restore_tabs: true,
            show_sidebar: true,
            destinations: default_destinations(),
        }
    }
}

/// Return the config directory path: `~/.tessera/`
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
    Ok(home.join(CONFIG_DIR_NAME))
}

impl Config {
    /// Load configuration from the given config directory.
    /// Returns defaults if the file does not exist.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but writes the defaults out on first run
    /// so there is a file to edit.
    pub fn load_or_init(config_dir: &Path) -> Result<Self, ConfigError> {
        if config_dir.join(CONFIG_FILE_NAME).exists() {
            return Self::load(config_dir);
        }
        let config = Self::default();
        config.save(config_dir)?;
        Ok(config)
    }

    /// Save configuration to the given config directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir)?;
        let path = config_dir.join(CONFIG_FILE_NAME);
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }
}
