//! Core Module - infrastructure shared by the whole application
//!
//! - Sessions and JWT
//! - Route guard and navigation
//! - Configuration
//! - Error handling
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod state;

pub use auth::{Claims, Session, decode_jwt, encode_jwt, require_role, session_middleware};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
