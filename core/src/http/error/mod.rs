//! Error types surfaced by authentication.

mod auth_error;

pub use auth_error::AuthError;
