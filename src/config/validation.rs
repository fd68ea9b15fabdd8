//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parseable)
//! - Catch placeholder secrets before they reach production
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "sheets.spreadsheet_id").
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(errors: &mut Vec<ValidationError>, field: &str, message: impl Into<String>) {
    errors.push(ValidationError {
        field: field.to_string(),
        message: message.into(),
    });
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        err(
            &mut errors,
            "server.bind_address",
            format!("not a valid socket address: {}", config.server.bind_address),
        );
    }
    if config.server.request_timeout_secs == 0 {
        err(&mut errors, "server.request_timeout_secs", "must be > 0");
    }

    if config.sheets.spreadsheet_id.is_empty() {
        err(&mut errors, "sheets.spreadsheet_id", "must not be empty");
    }
    if url::Url::parse(&config.sheets.api_base).is_err() {
        err(
            &mut errors,
            "sheets.api_base",
            format!("not a valid URL: {}", config.sheets.api_base),
        );
    }
    if config.sheets.timeout_secs == 0 {
        err(&mut errors, "sheets.timeout_secs", "must be > 0");
    }

    // The SMS gateway is optional: a deployment without OTP login leaves it
    // blank, but a partially filled section is a mistake.
    let sms_configured = !config.sms.api_base.is_empty();
    if sms_configured {
        if url::Url::parse(&config.sms.api_base).is_err() {
            err(
                &mut errors,
                "sms.api_base",
                format!("not a valid URL: {}", config.sms.api_base),
            );
        }
        if config.sms.api_key.is_empty() {
            err(&mut errors, "sms.api_key", "must not be empty when sms.api_base is set");
        }
        if config.sms.username.is_empty() {
            err(&mut errors, "sms.username", "must not be empty when sms.api_base is set");
        }
    }

    if config.session.secret.is_empty() {
        err(&mut errors, "session.secret", "must not be empty");
    }
    if config.session.ttl_hours <= 0 {
        err(&mut errors, "session.ttl_hours", "must be > 0");
    }
    if config.session.cookie_name.is_empty() {
        err(&mut errors, "session.cookie_name", "must not be empty");
    }

    if config.rate_limit.enabled && config.rate_limit.otp_per_minute == 0 {
        err(&mut errors, "rate_limit.otp_per_minute", "must be > 0 when enabled");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
