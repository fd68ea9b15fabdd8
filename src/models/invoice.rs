//! Invoice records.
//!
//! Invoices live in the "Invoices" sheet, one row each. They are created by
//! the invoice endpoint, mutated only through status updates, and never
//! deleted programmatically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::fees;
use crate::sheets::Row;

/// Lifecycle state of an invoice, stored uppercase in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Failed,
    Expired,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Failed => "FAILED",
            InvoiceStatus::Expired => "EXPIRED",
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(InvoiceStatus::Pending),
            "PAID" => Ok(InvoiceStatus::Paid),
            "FAILED" => Ok(InvoiceStatus::Failed),
            "EXPIRED" => Ok(InvoiceStatus::Expired),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fee invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub amount: f64,
    pub fee: f64,
    pub description: String,
    pub reference: String,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Sheet name backing invoices.
    pub const SHEET: &'static str = "Invoices";

    /// Column order: id, amount, fee, description, reference, status,
    /// created_at, updated_at.
    pub const COLUMNS: usize = 8;

    /// Zero-based column of the invoice id (the lookup key).
    pub const KEY_COLUMN: usize = 0;

    /// Zero-based column of the status cell.
    pub const STATUS_COLUMN: usize = 5;

    /// Zero-based column of the updated_at cell.
    pub const UPDATED_AT_COLUMN: usize = 7;

    /// Build a fresh invoice with a unique id and `Pending` status.
    pub fn new(amount: f64, description: String, reference: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            fee: fees::fee(amount),
            description,
            reference: reference.unwrap_or_default(),
            status: InvoiceStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Parse a sheet row. Rows without a parseable id, amount, or status are
    /// rejected.
    pub fn from_row(cells: &[String]) -> Option<Self> {
        let row = Row::new(cells);
        Some(Self {
            id: row.text(0)?.to_string(),
            amount: row.number(1)?,
            fee: row.number(2).unwrap_or(0.0),
            description: row.text_or_empty(3),
            reference: row.text_or_empty(4),
            status: row.text(5)?.parse().ok()?,
            created_at: row.timestamp(6)?,
            updated_at: row.timestamp(7).or_else(|| row.timestamp(6))?,
        })
    }

    /// Serialize to a sheet row in column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            format!("{:.2}", self.amount),
            format!("{:.2}", self.fee),
            self.description.clone(),
            self.reference.clone(),
            self.status.to_string(),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ]
    }
}
