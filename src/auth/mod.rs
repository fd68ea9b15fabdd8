//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Password login:
//!     credentials → AdminUsers sheet lookup → session.rs issues token
//!
//! OTP login:
//!     phone → throttle.rs → otp.rs send (gateway holds OTP state)
//!     phone + code → otp.rs verify → MobileUsers sheet lookup → token
//!
//! Every protected request:
//!     Cookie header → middleware.rs → session.rs verify → claims extension
//! ```
//!
//! # Design Decisions
//! - Stateless sessions: signature + expiry only, no revocation list
//! - OTP state lives on the gateway; nothing is tracked locally
//! - Logout is an expired Set-Cookie; the token itself stays valid

pub mod middleware;
pub mod otp;
pub mod session;
pub mod throttle;

pub use otp::{SmsClient, SmsError};
pub use session::{SessionClaims, SessionError, SessionSigner};
pub use throttle::OtpThrottle;
