//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive; values come back trimmed.

use crate::domain::error::StockSageError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StockSageError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| {
            if path.exists() {
                StockSageError::ConfigParse {
                    file: path.display().to_string(),
                    reason,
                }
            } else {
                StockSageError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file {} not found", path.display()),
                ))
            }
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[watchlist]
tickers = TSLA, NVDA
pause_seconds = 60

[alerts]
confidence_markers = CONFIDENCE: HIGH
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("watchlist", "tickers"),
            Some("TSLA, NVDA".to_string())
        );
        assert_eq!(
            adapter.get_string("alerts", "confidence_markers"),
            Some("CONFIDENCE: HIGH".to_string())
        );
    }

    #[test]
    fn section_and_key_lookup_ignores_case() {
        let adapter = FileConfigAdapter::from_string("[Backend]\nTimeout_Seconds = 12\n").unwrap();
        assert_eq!(adapter.get_int("backend", "timeout_seconds", 30), 12);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[market]\nlookback_days = 30\n").unwrap();
        assert_eq!(adapter.get_string("market", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[news]\nlimit = 7\n").unwrap();
        assert_eq!(adapter.get_int("news", "limit", 5), 7);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[news]\n").unwrap();
        assert_eq!(adapter.get_int("news", "limit", 5), 5);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[news]\nlimit = five\n").unwrap();
        assert_eq!(adapter.get_int("news", "limit", 5), 5);
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[email]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("email", "a", false));
        assert!(adapter.get_bool("email", "b", false));
        assert!(adapter.get_bool("email", "c", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[email]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("email", "a", true));
        assert!(!adapter.get_bool("email", "b", true));
        assert!(!adapter.get_bool("email", "c", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[news]\n").unwrap();
        assert!(adapter.get_bool("news", "enabled", true));
        assert!(!adapter.get_bool("news", "enabled", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[backend]\nbase_url = http://localhost:8080/v1beta\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("backend", "base_url"),
            Some("http://localhost:8080/v1beta".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/stocksage.ini").unwrap_err();
        assert!(matches!(err, StockSageError::Io(_)));
        assert_eq!(err.exit_status(), 1);
    }
}
