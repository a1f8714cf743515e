use std::fmt;

/// Rejected correlation configuration. Raised at the public boundary,
/// before any pairwise work starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ThresholdOutOfRange(f64),
    NegativeDistance(f64),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ThresholdOutOfRange(t) => {
                write!(f, "match threshold must lie in [0, 1], got {t}")
            }
            ConfigError::NegativeDistance(d) => {
                write!(f, "max distance must be a non-negative number of days, got {d}")
            }
            ConfigError::Parse(msg) => write!(f, "malformed config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Failure decoding a wire document.
#[derive(Debug)]
pub enum WireError {
    Json(serde_json::Error),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WireError::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for WireError {
    fn from(e: serde_json::Error) -> Self {
        WireError::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ConfigError::ThresholdOutOfRange(1.5).to_string(),
            "match threshold must lie in [0, 1], got 1.5"
        );
        assert!(
            ConfigError::NegativeDistance(-3.0)
                .to_string()
                .contains("-3")
        );
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let cfg: ConfigError = err.into();
        assert!(matches!(cfg, ConfigError::Parse(_)));
    }
}
