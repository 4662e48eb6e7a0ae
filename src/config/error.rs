//! Errors reported while assembling the application configuration.
//!
//! Everything on the path from the layered TOML files (`default.toml`,
//! `{environment}.toml`, `local.toml`) and `RECRON_*` environment overrides
//! to a validated `Settings` value surfaces as a [`ConfigError`].

use thiserror::Error;

/// Error raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration file is missing. Only `default.toml` and a
    /// file named explicitly via `--config` or `RECRON_CONFIG_FILE` are
    /// required; absent environment and local layers are skipped.
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// The merged configuration could not be deserialized into `Settings`.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A settings value failed validation, such as an empty `database.url`
    /// or a `scheduler.default_timezone` the timezone database does not know.
    #[error("Validation error: {field} - {message}")]
    ValidationError {
        /// Dotted path of the rejected setting, like `server.port`
        field: String,
        /// What was wrong with the value
        message: String,
    },

    /// An environment variable held an unusable value, for example an
    /// unrecognized `RECRON_APP_ENV` name.
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// Two settings that cannot be combined were both given
    /// (`RECRON_CONFIG_DIR` together with `RECRON_CONFIG_FILE`).
    #[error("Mutual exclusivity error: {0}")]
    MutualExclusivityError(String),

    /// Error bubbled up from the `config` crate while reading sources.
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    /// Validation error for one named setting.
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Missing-file error for a path that must exist.
    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    /// Error for settings that exclude each other.
    pub fn mutual_exclusivity<S: Into<String>>(message: S) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_names_the_field() {
        let err = ConfigError::validation(
            "scheduler.default_timezone",
            "Unknown timezone 'Mars/Olympus_Mons'.",
        );
        assert_eq!(
            err.to_string(),
            "Validation error: scheduler.default_timezone - Unknown timezone 'Mars/Olympus_Mons'."
        );
    }

    #[test]
    fn test_file_not_found_display() {
        let err = ConfigError::file_not_found("/etc/recron/default.toml");
        assert!(matches!(err, ConfigError::FileNotFound(_)));
        assert_eq!(
            err.to_string(),
            "Configuration file not found: /etc/recron/default.toml"
        );
    }

    #[test]
    fn test_mutual_exclusivity_display() {
        let err = ConfigError::mutual_exclusivity(
            "RECRON_CONFIG_DIR and RECRON_CONFIG_FILE cannot both be set.",
        );
        assert!(matches!(err, ConfigError::MutualExclusivityError(_)));
        assert!(err.to_string().starts_with("Mutual exclusivity error:"));
    }
}
