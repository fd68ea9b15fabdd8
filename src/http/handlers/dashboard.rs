//! Dashboard statistics.
//!
//! Everything is computed by re-reading the sheets on each request; there
//! is no cache to keep consistent.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::fees::round2;
use crate::http::handlers::load_all_or_empty;
use crate::http::server::AppState;
use crate::models::{Claim, Invoice, InvoiceStatus, Student, Teacher};

#[derive(Debug, Default, Serialize)]
pub struct InvoiceCounts {
    pub pending: usize,
    pub paid: usize,
    pub failed: usize,
    pub expired: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub students: usize,
    pub teachers: usize,
    pub invoices: InvoiceCounts,
    /// Sum of amounts across PAID invoices.
    pub collected_amount: f64,
    /// Sum of transaction fees across PAID invoices.
    pub collected_fees: f64,
    pub claims: usize,
    pub claims_amount: f64,
}

/// `GET /api/dashboard`
pub async fn stats(State(state): State<AppState>) -> Json<DashboardResponse> {
    let students = load_all_or_empty(
        &state.sheets,
        Student::SHEET,
        Student::COLUMNS,
        Student::from_row,
    )
    .await;
    let teachers = load_all_or_empty(
        &state.sheets,
        Teacher::SHEET,
        Teacher::COLUMNS,
        Teacher::from_row,
    )
    .await;
    let invoices = load_all_or_empty(
        &state.sheets,
        Invoice::SHEET,
        Invoice::COLUMNS,
        Invoice::from_row,
    )
    .await;
    let claims = load_all_or_empty(&state.sheets, Claim::SHEET, Claim::COLUMNS, Claim::from_row).await;

    let mut counts = InvoiceCounts::default();
    let mut collected_amount = 0.0;
    let mut collected_fees = 0.0;
    for invoice in &invoices {
        match invoice.status {
            InvoiceStatus::Pending => counts.pending += 1,
            InvoiceStatus::Paid => {
                counts.paid += 1;
                collected_amount += invoice.amount;
                collected_fees += invoice.fee;
            }
            InvoiceStatus::Failed => counts.failed += 1,
            InvoiceStatus::Expired => counts.expired += 1,
        }
    }

    let claims_amount = claims.iter().map(|c| c.amount).sum::<f64>();

    Json(DashboardResponse {
        success: true,
        students: students.len(),
        teachers: teachers.len(),
        invoices: counts,
        collected_amount: round2(collected_amount),
        collected_fees: round2(collected_fees),
        claims: claims.len(),
        claims_amount: round2(claims_amount),
    })
}
