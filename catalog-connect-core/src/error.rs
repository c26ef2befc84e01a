//! Error types for connector operations.

use thiserror::Error;

/// Result type used throughout the SDK.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Errors surfaced by builders, configuration parsing and connector streams.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A required attribute is missing or a configuration value cannot be parsed.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// An attribute exceeds its declared length bound.
    #[error("Attribute \"{attribute}\" cannot be more than {max_length} characters long")]
    Validation {
        attribute: String,
        max_length: usize,
    },

    /// Data handed to the SDK is structurally invalid (e.g. a malformed sample row).
    #[error("invalid data: {message}")]
    InvalidData { message: String },

    /// Rendering to or from JSON failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Connector-side I/O failure carried through a result stream.
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ConnectorError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Configuration error for a required attribute that was never set
    pub fn missing(attribute: &str) -> Self {
        Self::config(format!("Attribute \"{}\" cannot be null", attribute))
    }

    /// Configuration error for a required attribute that was set but empty
    pub fn empty(attribute: &str) -> Self {
        Self::config(format!("Attribute \"{}\" cannot be empty", attribute))
    }

    /// Create a length validation error
    pub fn too_long(attribute: impl Into<String>, max_length: usize) -> Self {
        Self::Validation {
            attribute: attribute.into(),
            max_length,
        }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create an I/O error with a source
    pub fn io_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Whether this is a length validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
