//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Secrets may be supplied through the environment instead of the file;
/// environment values win over file values.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay secret-bearing fields from the process environment.
pub fn apply_env_overrides(config: &mut AppConfig) {
    let overrides: [(&str, &mut String); 5] = [
        ("FEEFLOW_SPREADSHEET_ID", &mut config.sheets.spreadsheet_id),
        ("FEEFLOW_SHEETS_API_KEY", &mut config.sheets.api_key),
        ("FEEFLOW_SMS_API_KEY", &mut config.sms.api_key),
        ("FEEFLOW_SMS_USERNAME", &mut config.sms.username),
        ("FEEFLOW_SESSION_SECRET", &mut config.session.secret),
    ];
    for (var, slot) in overrides {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                *slot = value;
            }
        }
    }
}
