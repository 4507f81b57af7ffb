use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Resolve the data directory: explicit flag, then DAYBOOK_DATA_DIR,
/// then ~/.daybook.
pub fn resolve_data_dir(override_dir: Option<&str>) -> PathBuf {
    if let Some(dir) = override_dir {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = env::var("DAYBOOK_DATA_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    let home = env::var("HOME").unwrap_or_else(|_| String::from("."));
    Path::new(&home).join(".daybook")
}

/// Load config.toml from the data directory. A missing file means all
/// defaults; a malformed one is reported rather than silently ignored.
pub fn load_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = data_dir.join("config.toml");
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(ConfigError::Read { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.editor.debounce_ms, 500);
    }

    #[test]
    fn malformed_file_errors() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[gesture\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn flag_wins_over_default() {
        let dir = resolve_data_dir(Some("/tmp/elsewhere"));
        assert_eq!(dir, PathBuf::from("/tmp/elsewhere"));
    }
}
