//! FeeFlow: school fee management and records over a spreadsheet backend.
//!
//! An HTTP JSON API whose persistence is delegated entirely to a
//! third-party spreadsheet service and whose OTP delivery goes through an
//! SMS gateway. Every request re-reads the sheets it needs; the service
//! holds no durable local state.

// Core subsystems
pub mod config;
pub mod http;
pub mod sheets;

// Domain
pub mod fees;
pub mod models;

// Cross-cutting concerns
pub mod auth;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
