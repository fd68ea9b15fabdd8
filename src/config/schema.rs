//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the FeeFlow service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration (bind address, timeouts).
    pub server: ServerConfig,

    /// Spreadsheet backend settings.
    pub sheets: SheetsConfig,

    /// SMS gateway settings for OTP delivery.
    pub sms: SmsConfig,

    /// Session token settings.
    pub session: SessionConfig,

    /// Throttling for the OTP send endpoint.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Spreadsheet backend configuration.
///
/// The spreadsheet is the only durable store; every entity lives in a named
/// sheet addressed by A1-style ranges.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Base URL of the Sheets REST API.
    pub api_base: String,

    /// Identifier of the backing spreadsheet.
    pub spreadsheet_id: String,

    /// API key passed as the `key` query parameter.
    pub api_key: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://sheets.googleapis.com/v4".to_string(),
            spreadsheet_id: String::new(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// SMS gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmsConfig {
    /// Base URL of the gateway REST API.
    pub api_base: String,

    /// Value of the `API-KEY` header.
    pub api_key: String,

    /// Value of the `USERNAME` header.
    pub username: String,

    /// Sender id shown on delivered messages.
    pub sender_id: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            api_key: String::new(),
            username: String::new(),
            sender_id: "FeeFlow".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Session token configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// HMAC signing secret for session tokens.
    pub secret: String,

    /// Token validity window in hours.
    pub ttl_hours: i64,

    /// Name of the session cookie.
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // WARNING: This is a placeholder! Change this in production.
            secret: "CHANGE_ME_IN_PRODUCTION".to_string(),
            ttl_hours: 24,
            cookie_name: "feeflow_session".to_string(),
        }
    }
}

/// OTP throttling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable throttling of OTP sends.
    pub enabled: bool,

    /// Maximum OTP sends per phone number per minute.
    pub otp_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            otp_per_minute: 3,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
