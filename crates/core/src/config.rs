use std::{env, fs, io, path::PathBuf};

use directories::BaseDirs;
use serde::Deserialize;
use thiserror::Error;

/// Default number of prompts kept on disk.
pub const MAX_RECORDS: usize = 10;

const APP_DIR: &str = "kk";
const HISTORY_FILE_ENV: &str = "KK_HISTORY_FILE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileConfig {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub history_file: Option<PathBuf>,
    pub history_limit: Option<usize>,
}

impl FileConfig {
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => return Err(ConfigError::Read { path, source: e }),
        };
        toml::from_str(&text).map_err(|e| ConfigError::Parse { path, source: e })
    }
}

pub fn config_path() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    let p = if cfg!(target_os = "windows") {
        base.home_dir().join(".kk").join("config.toml")
    } else {
        base.config_dir().join(APP_DIR).join("config.toml")
    };
    Some(p)
}

/// Per-user data directory (`<data_dir>/kk`), used for history and logs.
pub fn data_dir() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    Some(base.data_dir().join(APP_DIR))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryConfig {
    pub path: PathBuf,
    pub max_records: usize,
}

impl HistoryConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_records: MAX_RECORDS,
        }
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = if max_records == 0 { MAX_RECORDS } else { max_records };
        self
    }

    /// Env var first, then the config file, then the platform data dir.
    pub fn resolve(file: &FileConfig) -> Self {
        let path = env::var_os(HISTORY_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| file.history_file.clone())
            .unwrap_or_else(default_history_path);
        Self::new(path).with_max_records(file.history_limit.unwrap_or(MAX_RECORDS))
    }
}

fn default_history_path() -> PathBuf {
    match data_dir() {
        Some(dir) => dir.join("history.jsonl"),
        None => env::temp_dir().join("kk-history.jsonl"),
    }
}
