//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route table)
//!     → auth middleware (session cookie → claims extension)
//!     → handlers/ (validate payload, call adapter, shape JSON)
//!     → error.rs (ApiError → status + JSON error body)
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{AppState, HttpServer};
