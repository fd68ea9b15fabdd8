//! Login, OTP, and session handlers.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::AppendHeaders,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::otp::redact_phone;
use crate::auth::SessionClaims;
use crate::http::error::{require, ApiError, ApiResult};
use crate::http::handlers::load_all;
use crate::http::server::AppState;
use crate::models::{AdminUser, MobileUser};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
    pub role: String,
}

type WithCookie<T> = (AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<T>);

fn with_cookie<T>(cookie: String, body: T) -> WithCookie<T> {
    (AppendHeaders([(SET_COOKIE, cookie)]), Json(body))
}

/// `POST /api/auth/login`: password login against the AdminUsers sheet.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<WithCookie<LoginResponse>> {
    require("username", &payload.username)?;
    require("password", &payload.password)?;

    let admins = load_all(
        &state.sheets,
        AdminUser::SHEET,
        AdminUser::COLUMNS,
        AdminUser::from_row,
    )
    .await?;

    let user = admins
        .iter()
        .find(|u| u.username == payload.username && u.password == payload.password)
        .ok_or_else(|| ApiError::Unauthorized("invalid username or password".to_string()))?;

    let token = state.sessions.issue(&user.username, &user.role)?;
    tracing::info!(username = %user.username, role = %user.role, "Admin logged in");

    Ok(with_cookie(
        state.sessions.cookie(&token),
        LoginResponse {
            success: true,
            username: user.username.clone(),
            role: user.role.clone(),
        },
    ))
}

#[derive(Debug, Deserialize)]
pub struct OtpSendRequest {
    #[serde(default)]
    pub phone: String,
}

/// `POST /api/auth/otp/send`: ask the gateway to deliver an OTP.
pub async fn otp_send(
    State(state): State<AppState>,
    Json(payload): Json<OtpSendRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    require("phone", &payload.phone)?;
    let phone = payload.phone.trim();

    if !state.otp_throttle.check(phone) {
        tracing::warn!(phone = %redact_phone(phone), "OTP send throttled");
        return Err(ApiError::Throttled);
    }

    state.sms.send_otp(phone).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "OTP sent",
    })))
}

#[derive(Debug, Deserialize)]
pub struct OtpVerifyRequest {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct OtpVerifyResponse {
    pub success: bool,
    pub name: String,
    pub role: String,
}

/// `POST /api/auth/otp/verify`: verify the code and open a session for the
/// matching mobile user.
pub async fn otp_verify(
    State(state): State<AppState>,
    Json(payload): Json<OtpVerifyRequest>,
) -> ApiResult<WithCookie<OtpVerifyResponse>> {
    require("phone", &payload.phone)?;
    require("code", &payload.code)?;
    let phone = payload.phone.trim();

    let verified = state.sms.verify_otp(phone, payload.code.trim()).await?;
    if !verified {
        return Err(ApiError::Unauthorized("invalid or expired OTP".to_string()));
    }

    let users = load_all(
        &state.sheets,
        MobileUser::SHEET,
        MobileUser::COLUMNS,
        MobileUser::from_row,
    )
    .await?;
    let user = users
        .iter()
        .find(|u| u.phone == phone)
        .ok_or_else(|| ApiError::Unauthorized("phone number not registered".to_string()))?;

    let token = state.sessions.issue(&user.phone, &user.role)?;
    tracing::info!(phone = %redact_phone(phone), role = %user.role, "Mobile user logged in");

    Ok(with_cookie(
        state.sessions.cookie(&token),
        OtpVerifyResponse {
            success: true,
            name: user.name.clone(),
            role: user.role.clone(),
        },
    ))
}

/// `POST /api/auth/logout`: expire the session cookie.
///
/// The token itself stays valid until natural expiry; there is no
/// revocation list.
pub async fn logout(State(state): State<AppState>) -> WithCookie<serde_json::Value> {
    with_cookie(
        state.sessions.clear_cookie(),
        serde_json::json!({ "success": true }),
    )
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub username: String,
    pub role: String,
    pub exp: i64,
}

/// `GET /api/auth/session`: describe the current session.
pub async fn session(Extension(claims): Extension<SessionClaims>) -> Json<SessionResponse> {
    Json(SessionResponse {
        success: true,
        username: claims.sub,
        role: claims.role,
        exp: claims.exp,
    })
}
