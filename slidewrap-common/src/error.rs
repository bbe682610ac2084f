//! Common error types for slidewrap

use thiserror::Error;

/// Common result type for slidewrap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the slidewrap crates
#[derive(Error, Debug)]
pub enum Error {
    /// TOML document could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<toml::Value> {
        Ok(toml::from_str(content)?)
    }

    #[test]
    fn test_toml_error_converts() {
        let err = parse("[deck").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[test]
    fn test_config_error_message() {
        let err = Error::Config("deck.slide_count must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: deck.slide_count must be at least 1"
        );
    }
}
