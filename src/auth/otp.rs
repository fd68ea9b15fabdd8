//! SMS gateway client for OTP delivery and verification.
//!
//! # Responsibilities
//! - Request OTP generation for a phone number
//! - Verify a submitted code against the gateway
//! - Surface gateway failures as typed errors, single round trip, no retry
//!
//! The OTP state machine (`NO_OTP → OTP_SENT → VERIFIED`) lives entirely on
//! the gateway side; this client tracks nothing locally.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::config::SmsConfig;

/// Errors from the SMS gateway.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("sms gateway not configured")]
    NotConfigured,

    #[error("sms transport error: {0}")]
    Http(String),

    #[error("sms request timed out after {0} seconds")]
    Timeout(u64),

    #[error("sms gateway returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("sms response decode error: {0}")]
    Decode(String),

    #[error("sms configuration error: {0}")]
    Config(String),
}

pub type SmsResult<T> = Result<T, SmsError>;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    phone: &'a str,
    sender_id: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    phone: &'a str,
    code: &'a str,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
}

/// Client for the OTP endpoints of the SMS gateway.
#[derive(Clone)]
pub struct SmsClient {
    http: reqwest::Client,
    config: SmsConfig,
}

impl SmsClient {
    pub fn new(config: SmsConfig) -> SmsResult<Self> {
        if !config.api_base.is_empty() {
            Url::parse(&config.api_base).map_err(|e| {
                SmsError::Config(format!("invalid api_base '{}': {}", config.api_base, e))
            })?;
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SmsError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Whether a gateway endpoint was configured at all.
    pub fn is_configured(&self) -> bool {
        !self.config.api_base.is_empty()
    }

    fn endpoint(&self, path: &str) -> SmsResult<Url> {
        if !self.is_configured() {
            return Err(SmsError::NotConfigured);
        }
        let mut url =
            Url::parse(&self.config.api_base).map_err(|e| SmsError::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SmsError::Config("api_base cannot be a base URL".to_string()))?
            .extend(path.split('/'));
        Ok(url)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> SmsResult<GatewayResponse> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .header("API-KEY", &self.config.api_key)
            .header("USERNAME", &self.config.username)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SmsError::Timeout(self.config.timeout_secs)
                } else {
                    SmsError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::Status {
                code: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| SmsError::Decode(e.to_string()))
    }

    /// Ask the gateway to generate and deliver an OTP (`NO_OTP → OTP_SENT`).
    pub async fn send_otp(&self, phone: &str) -> SmsResult<()> {
        let body = GenerateRequest {
            phone,
            sender_id: &self.config.sender_id,
        };
        let response = self.post("otp/generate", &body).await?;
        if response.success {
            tracing::info!(phone = %redact_phone(phone), "OTP dispatched");
            Ok(())
        } else {
            Err(SmsError::Status {
                code: 200,
                body: response.message,
            })
        }
    }

    /// Verify a submitted code (`OTP_SENT → VERIFIED`). Returns `false` for
    /// a wrong or stale code, `Err` for gateway failures.
    pub async fn verify_otp(&self, phone: &str, code: &str) -> SmsResult<bool> {
        let body = VerifyRequest { phone, code };
        let response = self.post("otp/verify", &body).await?;
        Ok(response.success)
    }
}

impl std::fmt::Debug for SmsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsClient")
            .field("api_base", &self.config.api_base)
            .field("sender_id", &self.config.sender_id)
            .finish()
    }
}

/// Keep only the last 3 digits of a phone number for logging.
pub fn redact_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().collect();
    if digits.len() <= 3 {
        return "***".to_string();
    }
    let suffix: String = digits[digits.len() - 3..].iter().collect();
    format!("***{}", suffix)
}
