//! # Actix Authn
//!
//! Chained request authentication for Actix Web.
//!
//! An [`AuthenticationManager`](http::security::AuthenticationManager) walks
//! ordered lists of collaborators for every request:
//! - storage providers restore an identity from the session or a
//!   remember-me cookie;
//! - authentication schemes challenge the client and extract credentials;
//! - authentication providers verify them;
//! - role providers attach roles.
//!
//! After a login the manager resumes the request that triggered the
//! challenge, by forward or redirect.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! actix-web = "4"
//! actix-session = { version = "0.10", features = ["cookie-session"] }
//! actix-authn = "0.1"
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use actix_authn::prelude::*;
//! use actix_session::{storage::CookieSessionStore, SessionMiddleware};
//! use actix_web::{cookie::Key, web, App, HttpServer, Responder};
//!
//! async fn reports(subject: AuthenticatedSubject) -> impl Responder {
//!     format!("Reports for {}", subject.name())
//! }
//!
//! let manager = AuthenticationManager::builder()
//!     .scheme(FormLoginScheme::default())
//!     .provider(MemoryAuthenticationProvider::new().with_user("alice", "secret"))
//!     .role_provider(MemoryRoleProvider::new().with_roles("alice", &["reader"]))
//!     .storage_provider(SessionStorageProvider::default())
//!     .resource_manager(PatternResourceManager::new().permit("^/login$"))
//!     .build()?;
//! let manager = std::sync::Arc::new(manager);
//! let key = Key::generate();
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .wrap(SecurityTransform::shared(manager.clone()).logout_url("/logout"))
//!         .wrap(SessionMiddleware::new(CookieSessionStore::default(), key.clone()))
//!         .route("/reports", web::get().to(reports))
//! })
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `http-basic` | Yes | HTTP Basic authentication scheme |
//! | `form-login` | Yes | Form login authentication scheme |
//! | `remember-me` | Yes | Signed remember-me cookie storage |
//! | `full` | No | All features enabled |
//!
//! ## Modules
//!
//! - [`http::security`] - Manager, collaborators and middleware
//! - [`http::error`] - Error types

pub use actix_authn_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use actix_authn_core::http::error::AuthError;
    pub use actix_authn_core::http::security::{
        AuthContext, AuthenticatedSubject, AuthenticationManager, AuthenticationProvider,
        AuthenticationResult, AuthenticationScheme, Credential, Identity,
        MemoryAuthenticationProvider, MemoryRoleProvider, OptionalSubject,
        PatternResourceManager, Principal, ResourceManager, Role, RoleProvider, SecurityExt,
        SecurityTransform, SessionConfig, SessionStorageProvider, StorageProvider,
        StoredPrincipal,
    };

    #[cfg(feature = "http-basic")]
    pub use actix_authn_core::http::security::{HttpBasicConfig, HttpBasicScheme};

    #[cfg(feature = "form-login")]
    pub use actix_authn_core::http::security::{FormLoginConfig, FormLoginScheme};

    #[cfg(feature = "remember-me")]
    pub use actix_authn_core::http::security::{RememberMeConfig, RememberMeStorageProvider};
}
