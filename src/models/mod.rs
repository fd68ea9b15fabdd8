//! Typed records backed by spreadsheet rows.
//!
//! Every entity's source of truth is a named sheet; rows are re-read per
//! request and there is no durable local state.

pub mod invoice;
pub mod records;

pub use invoice::{Invoice, InvoiceStatus};
pub use records::{AdminUser, Claim, ClaimWithStudent, MobileUser, Student, Teacher};
