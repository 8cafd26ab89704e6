//! # Error Handling
//!
//! Error types for the extension engine using `thiserror`. A generation pass
//! is fail-soft: failures scoped to one resource or one filter chain are
//! logged and skipped, and only caller-level conditions surface as errors.

/// Custom result type for wasmplane operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the extension engine
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a serialization error with context describing what was being encoded
    pub fn serialization<S: Into<String>>(source: serde_json::Error, context: S) -> Self {
        Self::Serialization { source, context: context.into() }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_error_carries_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::serialization(source, "extension 'demo' configuration");
        assert_eq!(err.to_string(), "Serialization error: extension 'demo' configuration");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn config_error_display() {
        let err = Error::config("bad runtime id");
        assert_eq!(err.to_string(), "Configuration error: bad runtime id");
    }
}
