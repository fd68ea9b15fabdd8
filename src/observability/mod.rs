//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//! ```
//!
//! # Design Decisions
//! - Structured logging with request IDs flowing through all subsystems
//! - Phone numbers are redacted to their last digits before logging

pub mod logging;
