//! Invoice creation, listing, and status updates.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::http::error::{require, ApiError, ApiResult};
use crate::http::handlers::load_all;
use crate::http::server::AppState;
use crate::models::{Invoice, InvoiceStatus};
use crate::sheets::range;

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: String,
    pub reference: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub success: bool,
    pub invoice: Invoice,
}

/// `POST /api/invoices`: create a fee invoice.
///
/// Every created invoice gets a fresh UUID and `PENDING` status; the fee is
/// computed from the amount, never taken from the client.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> ApiResult<Json<InvoiceResponse>> {
    let amount = payload
        .amount
        .ok_or_else(|| ApiError::Validation("`amount` is required".to_string()))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::Validation("`amount` must be positive".to_string()));
    }
    require("description", &payload.description)?;

    let invoice = Invoice::new(amount, payload.description.trim().to_string(), payload.reference);
    state
        .sheets
        .append(
            &range::body_range(Invoice::SHEET, Invoice::COLUMNS),
            &[invoice.to_row()],
        )
        .await?;

    tracing::info!(invoice_id = %invoice.id, amount = invoice.amount, fee = invoice.fee, "Invoice created");
    Ok(Json(InvoiceResponse {
        success: true,
        invoice,
    }))
}

#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub success: bool,
    pub invoices: Vec<Invoice>,
}

/// `GET /api/invoices`: list all invoices.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<InvoiceListResponse>> {
    let invoices = load_all(
        &state.sheets,
        Invoice::SHEET,
        Invoice::COLUMNS,
        Invoice::from_row,
    )
    .await?;
    Ok(Json(InvoiceListResponse {
        success: true,
        invoices,
    }))
}

/// `GET /api/invoices/{id}`: fetch one invoice by id.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InvoiceResponse>> {
    let invoices = load_all(
        &state.sheets,
        Invoice::SHEET,
        Invoice::COLUMNS,
        Invoice::from_row,
    )
    .await?;
    let invoice = invoices
        .into_iter()
        .find(|inv| inv.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("invoice `{}` not found", id)))?;
    Ok(Json(InvoiceResponse {
        success: true,
        invoice,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub id: String,
    pub status: InvoiceStatus,
}

/// `PUT /api/invoices/{id}/status`: update the status of an invoice.
///
/// Idempotent: writing the same status twice leaves the stored status (and
/// the reported outcome) unchanged.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<Json<UpdateStatusResponse>> {
    require("status", &payload.status)?;
    let status: InvoiceStatus = payload
        .status
        .parse()
        .map_err(|_| ApiError::Validation(format!("unknown status `{}`", payload.status)))?;

    let patch = [
        (Invoice::STATUS_COLUMN, status.to_string()),
        (Invoice::UPDATED_AT_COLUMN, Utc::now().to_rfc3339()),
    ];
    let found = state
        .sheets
        .update_by_key(
            Invoice::SHEET,
            Invoice::COLUMNS,
            Invoice::KEY_COLUMN,
            &id,
            &patch,
        )
        .await?;

    if !found {
        return Err(ApiError::NotFound(format!("invoice `{}` not found", id)));
    }

    tracing::info!(invoice_id = %id, status = %status, "Invoice status updated");
    Ok(Json(UpdateStatusResponse {
        success: true,
        id,
        status,
    }))
}
