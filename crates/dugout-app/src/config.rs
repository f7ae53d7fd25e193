// Configuration loading and parsing (dugout.toml).

use dugout_core::franchise::{Franchise, FranchiseResolver};
use dugout_core::leaderboard::DEFAULT_PAGE_SIZE;
use dugout_core::qualification::QualificationRules;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const CONFIG_FILE: &str = "dugout.toml";

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
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub leaderboard: LeaderboardConfig,
    pub qualification: QualificationRules,
    pub franchises: FranchiseResolver,
    /// Directory the config was loaded from; relative data paths resolve
    /// against it.
    pub base_dir: PathBuf,
}

impl Config {
    /// Where the datasets live.
    pub fn data_location(&self) -> DataLocation {
        let source = self.data.source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            DataLocation::Url(source.trim_end_matches('/').to_string())
        } else {
            DataLocation::Directory(self.base_dir.join(source))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Directory(PathBuf),
    Url(String),
}

// ---------------------------------------------------------------------------
// dugout.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataConfig,
    #[serde(default)]
    leaderboard: LeaderboardConfig,
    #[serde(default)]
    qualification: QualificationRules,
    #[serde(default)]
    franchises: Vec<Franchise>,
}

/// Dataset location and file names.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub source: String,
    #[serde(default = "default_hitting")]
    pub hitting: String,
    #[serde(default = "default_pitching")]
    pub pitching: String,
    #[serde(default = "default_players")]
    pub players: String,
    #[serde(default = "default_seasons")]
    pub seasons: String,
    #[serde(default = "default_scouting")]
    pub scouting: String,
    #[serde(default)]
    pub glossary: Option<String>,
}

fn default_hitting() -> String {
    "hitting_stats.json".into()
}

fn default_pitching() -> String {
    "pitching_stats.json".into()
}

fn default_players() -> String {
    "player_id_map.json".into()
}

fn default_seasons() -> String {
    "season_games_map.json".into()
}

fn default_scouting() -> String {
    "scouting_reports.json".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dugout.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&file)?;

    let franchises =
        FranchiseResolver::new(file.franchises).map_err(|e| ConfigError::ValidationError {
            field: "franchises".into(),
            message: e.to_string(),
        })?;

    Ok(Config {
        data: file.data,
        leaderboard: file.leaderboard,
        qualification: file.qualification,
        franchises,
        base_dir: base_dir.to_path_buf(),
    })
}

/// Create `config/dugout.toml` from `defaults/dugout.toml` if it is missing.
/// An existing config is never touched. Returns the path written, if any.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let default = base_dir.join("defaults").join(CONFIG_FILE);
    if !default.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{CONFIG_FILE} or defaults/{CONFIG_FILE} under {}",
                base_dir.display()
            ),
        });
    }

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::copy(&default, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", default.display(), target.display()),
    })?;
    info!("initialized {} from defaults", target.display());
    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Writes the default config first when none exists yet.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &ConfigFile) -> Result<(), ConfigError> {
    if file.data.source.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.source".into(),
            message: "must not be empty".into(),
        });
    }

    if file.leaderboard.page_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "leaderboard.page_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    let q = &file.qualification;
    let thresholds: &[(&str, f64)] = &[
        ("qualification.career_min_pa", q.career_min_pa),
        ("qualification.career_min_ip", q.career_min_ip),
        ("qualification.season_pa_per_game", q.season_pa_per_game),
        ("qualification.season_ip_per_game", q.season_ip_per_game),
        ("qualification.career_min_decisions", q.career_min_decisions),
        ("qualification.season_min_decisions", q.season_min_decisions),
    ];
    for (name, val) in thresholds {
        if !val.is_finite() || *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite number >= 0, got {val}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
