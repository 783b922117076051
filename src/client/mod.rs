//! Client side of the token exchange, for frontends and other Rust consumers of the API.

pub mod session_bridge;

pub use session_bridge::{ClientError, SessionBridge, SessionIdentity};
