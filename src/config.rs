use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cross_xdg::BaseDirs;

use crate::tape::Cell;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "BFVM_CONFIG";
pub const MAX_MEMORY_SIZE_ENV: &str = "BF_MAX_MEMORY_SIZE";
pub const MAX_MEMORY_VALUE_ENV: &str = "BF_MAX_MEMORY_VALUE";

/// Optional tape bounds, fixed when a machine is built.
///
/// `None` means unbounded. The default is fully unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MachineConfig {
    /// Maximum number of tape cells; moving right past the last one wraps to cell 0.
    pub max_memory_size: Option<usize>,
    /// Largest cell value; incrementing a cell holding it wraps to 0.
    pub max_memory_value: Option<Cell>,
}

impl MachineConfig {
    pub fn with_max_memory_size(mut self, size: usize) -> Self {
        self.max_memory_size = Some(size);
        self
    }

    pub fn with_max_memory_value(mut self, value: Cell) -> Self {
        self.max_memory_value = Some(value);
        self
    }

    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: MachineConfig) -> Self {
        Self {
            max_memory_size: self.max_memory_size.or(fallback.max_memory_size),
            max_memory_value: self.max_memory_value.or(fallback.max_memory_value),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' is not a valid integer")]
    InvalidValue { key: String, value: String },

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve the machine config: flags -> env -> config file -> unbounded.
pub fn resolve(flags: MachineConfig) -> Result<MachineConfig, ConfigError> {
    let env_layer = from_env(|key| env::var(key).ok())?;
    let file_layer = match config_path() {
        Some(path) => load_file(&path)?.unwrap_or_default(),
        None => MachineConfig::default(),
    };
    Ok(flags.or(env_layer).or(file_layer))
}

/// Read the two bound variables through `lookup`.
pub fn from_env<F>(lookup: F) -> Result<MachineConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let max_memory_size = lookup(MAX_MEMORY_SIZE_ENV)
        .map(|v| parse_value(MAX_MEMORY_SIZE_ENV, &v))
        .transpose()?;
    let max_memory_value = lookup(MAX_MEMORY_VALUE_ENV)
        .map(|v| parse_value(MAX_MEMORY_VALUE_ENV, &v))
        .transpose()?;
    Ok(MachineConfig {
        max_memory_size,
        max_memory_value,
    })
}

/// `$BFVM_CONFIG` if set, otherwise `bfvm.toml` in the XDG config home.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    // Linux: /home/<user>/.config, Windows: C:\Users\<user>\.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bfvm.toml");
    Some(path)
}

/// Load a config file. A missing file is not an error.
pub fn load_file(path: &Path) -> Result<Option<MachineConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    parse(&content).map(Some)
}

/// Parse the `[machine]` section of a small TOML-style file.
///
/// Only `key = value` lines are understood; unknown keys and other sections are ignored.
pub fn parse(content: &str) -> Result<MachineConfig, ConfigError> {
    let mut in_machine = false;
    let mut cfg = MachineConfig::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_machine = line[1..line.len() - 1].trim() == "machine";
            continue;
        }
        if !in_machine {
            continue;
        }
        let Some((key, raw)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        // Accept quoted or unquoted, drop trailing comments
        let raw = raw.split('#').next().unwrap_or_default().trim();
        let value = raw.trim_matches('"');

        match key {
            "max_memory_size" => cfg.max_memory_size = Some(parse_value(key, value)?),
            "max_memory_value" => cfg.max_memory_value = Some(parse_value(key, value)?),
            _ => {}
        }
    }

    Ok(cfg)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
