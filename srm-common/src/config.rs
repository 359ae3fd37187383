//! Configuration loading and root folder resolution

use crate::{Error, Result};
use chrono::Datelike;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable consulted for the root folder
pub const ROOT_FOLDER_ENV: &str = "SRM_ROOT_FOLDER";

/// Database file created inside the root folder
pub const DATABASE_FILE_NAME: &str = "school.db";

/// Settings read from `config.toml`
///
/// Every key is optional; missing keys fall through to CLI/env/defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Academic year applied when a create request omits one
    pub default_academic_year: Option<String>,
    /// Deadline for a single composition write, in milliseconds
    pub operation_timeout_ms: Option<u64>,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load the platform config file if one exists
    ///
    /// A missing file yields defaults. An unreadable or malformed file is
    /// logged and also yields defaults so startup is never blocked by it.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => path,
            None => return Self::default(),
        };

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    get_default_root_folder()
}

/// Path of the database file inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}

/// Academic year label used when neither request nor config supplies one
pub fn current_academic_year() -> String {
    chrono::Local::now().year().to_string()
}

/// Default configuration file path for the platform
fn default_config_path() -> Option<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/srm/config.toml first, then /etc/srm/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("srm").join("config.toml"));
        if let Some(path) = user_config {
            if path.exists() {
                return Some(path);
            }
        }
        let system_config = PathBuf::from("/etc/srm/config.toml");
        system_config.exists().then_some(system_config)
    } else {
        dirs::config_dir()
            .map(|d| d.join("srm").join("config.toml"))
            .filter(|p| p.exists())
    }
}

/// OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/srm (or /var/lib/srm for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("srm"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/srm"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("srm"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/srm"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("srm"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\srm"))
    } else {
        PathBuf::from("./srm_data")
    }
}
