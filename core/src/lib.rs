//! # Actix Authn Core
//!
//! Runtime half of `actix-authn`: the chained authentication manager, its
//! collaborator contracts, and the Actix Web middleware that drives it.
//!
//! See [`http::security`] for the entry points.

pub mod http;
