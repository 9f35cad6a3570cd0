//! HTTP-facing security: errors and the authentication machinery.

pub mod error;
pub mod security;
