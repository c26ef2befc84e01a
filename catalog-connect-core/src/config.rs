//! Configuration management for connections.

use crate::filter::FilterConfiguration;
use crate::{ConnectorError, ConnectorResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Configuration used to open a connection.
///
/// Usually loaded from a TOML file with one `[[filters]]` table per filter and
/// connector-specific keys under `[settings]`:
///
/// ```toml
/// connector_id = "movies"
/// connection_name = "Movie catalog"
/// connection_code = "movies-prod"
///
/// [[filters]]
/// id = "drop-drafts"
/// action = "REJECT"
/// [filters.rules]
/// title = "glob:draft-*"
///
/// [settings]
/// page_size = 100
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConnectionConfig {
    /// Identifier of the connector implementation
    pub connector_id: String,

    /// Human readable connection name
    pub connection_name: String,

    /// Unique connection code
    pub connection_code: String,

    /// Base directory for relative paths
    #[serde(default = "default_scanner_home")]
    pub scanner_home_folder: PathBuf,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Item filters, evaluated in order
    #[serde(default)]
    pub filters: FilterConfiguration,

    /// Connector-specific settings
    #[serde(default)]
    pub settings: Table,
}

fn default_scanner_home() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConnectionConfig {
    pub fn new(
        connector_id: impl Into<String>,
        connection_name: impl Into<String>,
        connection_code: impl Into<String>,
    ) -> Self {
        Self {
            connector_id: connector_id.into(),
            connection_name: connection_name.into(),
            connection_code: connection_code.into(),
            scanner_home_folder: default_scanner_home(),
            log_level: default_log_level(),
            filters: FilterConfiguration::default(),
            settings: Table::new(),
        }
    }

    pub fn with_filters(mut self, filters: FilterConfiguration) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn with_scanner_home_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.scanner_home_folder = path.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `CONNECTOR_ID`: Required, connector identifier
    /// - `CONNECTION_CODE`: Required, unique connection code
    /// - `CONNECTION_NAME`: Connection name (default: the connection code)
    /// - `SCANNER_HOME`: Base directory for relative paths (default: `.`)
    /// - `LOG_LEVEL`: Log level (default: info)
    ///
    /// Filters and settings are only available from files.
    pub fn from_env() -> ConnectorResult<Self> {
        let connector_id = env::var("CONNECTOR_ID")
            .map_err(|_| ConnectorError::config("CONNECTOR_ID is required"))?;

        let connection_code = env::var("CONNECTION_CODE")
            .map_err(|_| ConnectorError::config("CONNECTION_CODE is required"))?;

        let connection_name =
            env::var("CONNECTION_NAME").unwrap_or_else(|_| connection_code.clone());

        let mut config = Self::new(connector_id, connection_name, connection_code);
        if let Ok(home) = env::var("SCANNER_HOME") {
            config.scanner_home_folder = PathBuf::from(home);
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.log_level = level;
        }
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> ConnectorResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConnectorError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            ConnectorError::config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn from_toml_str(content: &str) -> ConnectorResult<Self> {
        toml::from_str(content).map_err(|e| ConnectorError::config(e.to_string()))
    }

    /// Apply environment variable overrides to the identity fields
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("CONNECTOR_ID") {
            self.connector_id = val;
        }
        if let Ok(val) = env::var("CONNECTION_NAME") {
            self.connection_name = val;
        }
        if let Ok(val) = env::var("CONNECTION_CODE") {
            self.connection_code = val;
        }
        if let Ok(val) = env::var("SCANNER_HOME") {
            self.scanner_home_folder = PathBuf::from(val);
        }
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.log_level = val;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.connector_id.is_empty() {
            return Err(ConnectorError::config("connector_id cannot be empty"));
        }

        if self.connection_name.is_empty() {
            return Err(ConnectorError::config("connection_name cannot be empty"));
        }

        if self.connection_code.is_empty() {
            return Err(ConnectorError::config("connection_code cannot be empty"));
        }

        Ok(())
    }

    /// Look up a setting; dots in `key` descend into nested tables.
    fn setting(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let mut value = self.settings.get(parts.next()?)?;
        for part in parts {
            value = value.as_table()?.get(part)?;
        }
        Some(value)
    }

    pub fn get_string(&self, key: &str) -> ConnectorResult<Option<String>> {
        match self.setting(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(wrong_type(key, "a string", other)),
        }
    }

    /// Integer setting; numeric strings are accepted.
    pub fn get_long(&self, key: &str) -> ConnectorResult<Option<i64>> {
        match self.setting(key) {
            None => Ok(None),
            Some(Value::Integer(n)) => Ok(Some(*n)),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| wrong_type(key, "an integer", &Value::String(s.clone()))),
            Some(other) => Err(wrong_type(key, "an integer", other)),
        }
    }

    /// Boolean setting; `"true"` and `"false"` strings are accepted.
    pub fn get_bool(&self, key: &str) -> ConnectorResult<Option<bool>> {
        match self.setting(key) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(*b)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(wrong_type(key, "a boolean", other)),
        }
    }

    /// Path setting; relative paths are resolved against `scanner_home_folder`.
    pub fn get_path(&self, key: &str) -> ConnectorResult<Option<PathBuf>> {
        Ok(self
            .get_string(key)?
            .map(|raw| self.scanner_home_folder.join(raw)))
    }

    /// String table setting; empty when absent.
    pub fn get_map(&self, key: &str) -> ConnectorResult<BTreeMap<String, String>> {
        let table = match self.setting(key) {
            None => return Ok(BTreeMap::new()),
            Some(Value::Table(table)) => table,
            Some(other) => return Err(wrong_type(key, "a table", other)),
        };

        table
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => Ok((k.clone(), s.clone())),
                other => Err(wrong_type(&format!("{}.{}", key, k), "a string", other)),
            })
            .collect()
    }

    /// String list setting; empty when absent.
    pub fn get_list(&self, key: &str) -> ConnectorResult<Vec<String>> {
        let values = match self.setting(key) {
            None => return Ok(Vec::new()),
            Some(Value::Array(values)) => values,
            Some(other) => return Err(wrong_type(key, "a list", other)),
        };

        values
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(wrong_type(key, "a list of strings", other)),
            })
            .collect()
    }
}

fn wrong_type(key: &str, expected: &str, found: &Value) -> ConnectorError {
    ConnectorError::config(format!(
        "Setting \"{}\" must be {} but found {}",
        key,
        expected,
        found.type_str()
    ))
}
