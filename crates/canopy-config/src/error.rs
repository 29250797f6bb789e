//! Error types for configuration loading.

use std::fmt;

/// Error type for viewer configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Reading the file failed
    Io(std::io::Error),
    /// YAML parsing error
    Yaml(serde_yaml_ng::Error),
    /// TOML parsing error
    Toml(toml::de::Error),
    /// The file extension names no known format
    UnsupportedFormat(String),
    /// Invalid value
    InvalidValue {
        /// Dotted field path
        field: String,
        /// Error message
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Yaml(e) => write!(f, "YAML error: {e}"),
            Self::Toml(e) => write!(f, "TOML error: {e}"),
            Self::UnsupportedFormat(ext) => {
                write!(f, "Unsupported config format '{ext}' (expected yaml, yml or toml)")
            }
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Yaml(e) => Some(e),
            Self::Toml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        Self::Yaml(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("canvas.width", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'canvas.width': must be positive"
        );

        let err = ConfigError::UnsupportedFormat("json".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported config format 'json' (expected yaml, yml or toml)"
        );
    }

    #[test]
    fn test_source_chains_parser_errors() {
        let yaml = serde_yaml_ng::from_str::<u32>("[").unwrap_err();
        let err = ConfigError::from(yaml);
        assert!(err.to_string().starts_with("YAML error: "));
        assert!(err.source().is_some());
        assert!(ConfigError::invalid("x", "y").source().is_none());
    }
}
