//! Spreadsheet access subsystem.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → client.rs (values GET / append / update over REST)
//!     → range.rs (A1 range construction)
//!     → mapper.rs (cell → typed field coercion)
//!     → models (typed records)
//! ```
//!
//! # Design Decisions
//! - The spreadsheet is the single source of truth; no local cache
//! - One round trip per operation, no retries, no backoff
//! - Malformed rows are skipped with a warning, never fatal

pub mod client;
pub mod mapper;
pub mod range;

pub use client::{SheetsClient, SheetsError, SheetsResult};
pub use mapper::Row;
