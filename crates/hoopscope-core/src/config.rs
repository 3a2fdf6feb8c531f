// Configuration loading and the persisted API key (settings.toml, credentials.toml).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::season::{current_season, FIRST_SEASON, FULL_SEASON_GAMES};

/// Every key issued by the provider starts with this prefix.
pub const API_KEY_PREFIX: &str = "xai-";

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "HOOPSCOPE_CONFIG_DIR";

const SETTINGS_FILE: &str = "settings.toml";
const CREDENTIALS_FILE: &str = "credentials.toml";

const DEFAULT_SETTINGS: &str = include_str!("../../../defaults/settings.toml");

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },

    #[error("failed to write {path}: {message}")]
    WriteError { path: PathBuf, message: String },

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Rejections from the settings-layer key check. These never reach the
/// analysis client: a key is only stored once it passes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("please enter your API key")]
    Empty,

    #[error("API key should start with '{prefix}'")]
    InvalidCredentialFormat { prefix: &'static str },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub selection: SelectionConfig,
    pub credentials: CredentialsConfig,
    /// Directory the files were loaded from; the key is saved back here.
    pub config_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
struct SettingsFile {
    llm: LlmConfig,
    selection: SelectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    pub default_season: u16,
    pub default_games: u16,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CredentialsConfig {
    pub xai_api_key: Option<String>,
}

impl CredentialsConfig {
    /// The stored key, if one is present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.xai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Locating and initializing the config directory
// ---------------------------------------------------------------------------

/// Resolve the config directory: `$HOOPSCOPE_CONFIG_DIR`, then the platform
/// config dir, then `./config`.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    directories::ProjectDirs::from("", "", "hoopscope")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("config"))
}

/// Write the bundled `settings.toml` into `dir` if it is missing. Existing
/// files are never overwritten. Returns the files that were created.
pub fn ensure_config_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory {}: {e}", dir.display()),
    })?;

    let target = dir.join(SETTINGS_FILE);
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, DEFAULT_SETTINGS.as_bytes()).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            info!("Initialized {} from defaults", target.display());
            Ok(vec![target])
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(vec![]),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `settings.toml` and (optionally) `credentials.toml`
/// from `dir`. Does not create anything.
pub fn load_config_from(dir: &Path) -> Result<Config, ConfigError> {
    let settings_path = dir.join(SETTINGS_FILE);
    let settings_text = read_file(&settings_path)?;
    let settings: SettingsFile =
        toml::from_str(&settings_text).map_err(|e| ConfigError::ParseError {
            path: settings_path.clone(),
            source: e,
        })?;

    let credentials_path = dir.join(CREDENTIALS_FILE);
    let credentials = if credentials_path.exists() {
        let text = read_file(&credentials_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        llm: settings.llm,
        selection: settings.selection,
        credentials,
        config_dir: dir.to_path_buf(),
    };

    validate(&config)?;

    Ok(config)
}

/// Resolve the config directory, initialize missing defaults and load.
pub fn load_config() -> Result<Config, ConfigError> {
    let dir = config_dir();
    ensure_config_files(&dir)?;
    load_config_from(&dir)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Check a user-entered key. Returns the trimmed key on success.
pub fn validate_api_key(key: &str) -> Result<&str, CredentialError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(CredentialError::Empty);
    }
    if !key.starts_with(API_KEY_PREFIX) {
        return Err(CredentialError::InvalidCredentialFormat {
            prefix: API_KEY_PREFIX,
        });
    }
    Ok(key)
}

/// Validate and persist the key to `credentials.toml` in `dir`. A rejected
/// key leaves the existing file untouched.
pub fn save_api_key(dir: &Path, key: &str) -> Result<CredentialsConfig, ConfigError> {
    let key = validate_api_key(key)?;
    let credentials = CredentialsConfig {
        xai_api_key: Some(key.to_string()),
    };

    let path = dir.join(CREDENTIALS_FILE);
    let text = toml::to_string(&credentials).map_err(|e| ConfigError::WriteError {
        path: path.clone(),
        message: e.to_string(),
    })?;
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::WriteError {
        path: path.clone(),
        message: e.to_string(),
    })?;
    std::fs::write(&path, text).map_err(|e| ConfigError::WriteError {
        path: path.clone(),
        message: e.to_string(),
    })?;
    restrict_permissions(&path);

    info!("API key saved to {}", path.display());
    Ok(credentials)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        tracing::warn!("could not restrict permissions on {}: {e}", path.display());
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.llm.endpoint.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "llm.endpoint".into(),
            message: "must not be empty".into(),
        });
    }

    if config.llm.model.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "llm.model".into(),
            message: "must not be empty".into(),
        });
    }

    if config.llm.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    let games = config.selection.default_games;
    if !(1..=FULL_SEASON_GAMES).contains(&games) {
        return Err(ConfigError::ValidationError {
            field: "selection.default_games".into(),
            message: format!("must be between 1 and {FULL_SEASON_GAMES}, got {games}"),
        });
    }

    let latest = current_season(&chrono::Local::now().date_naive());
    let season = config.selection.default_season;
    if !(FIRST_SEASON..=latest).contains(&season) {
        return Err(ConfigError::ValidationError {
            field: "selection.default_season".into(),
            message: format!("must be between {FIRST_SEASON} and {latest}, got {season}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
