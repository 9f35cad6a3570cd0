//! Request authentication.
//!
//! # Module Structure
//!
//! - `manager` - The [`AuthenticationManager`] and its builder
//! - `config` - Collaborator traits (storage, scheme, provider, role, resource)
//! - `context` - Request context seen by collaborators ([`AuthContext`])
//! - `identity` - Principal, role and identity model
//! - `credential` - Credential material extracted by schemes
//! - `request_cache` - Pending-request cache keyed by session
//! - `navigation` - Post-login redirect or forward
//! - `middleware` - Actix middleware ([`SecurityTransform`])
//! - `extractor` - Handler extractors (`AuthenticatedSubject`, `OptionalSubject`)
//! - `authenticator` - In-memory authentication provider
//! - `role` - In-memory role provider
//! - `resource` - Regex resource manager
//! - `session` - Session storage provider
//! - `http_basic` - HTTP Basic scheme
//! - `form_login` - Form login scheme
//! - `remember_me` - Signed-cookie storage provider
//!
//! # Feature Flags
//! - `http-basic`: Enables `HttpBasicScheme`
//! - `form-login`: Enables `FormLoginScheme`
//! - `remember-me`: Enables `RememberMeStorageProvider`

pub use authenticator::MemoryAuthenticationProvider;
pub use config::{
    AuthenticationProvider, AuthenticationResult, AuthenticationScheme, ResourceManager,
    RoleProvider, StorageProvider, StoredPrincipal,
};
pub use context::{relative_path, AuthContext, Forward, HttpAuthContext, ResponseParts};
pub use credential::Credential;
pub use extractor::{AuthenticatedSubject, OptionalSubject, SecurityExt};
#[cfg(feature = "form-login")]
pub use form_login::{FormLoginConfig, FormLoginScheme};
#[cfg(feature = "http-basic")]
pub use http_basic::{HttpBasicConfig, HttpBasicScheme};
pub use identity::{Identity, Principal, Role, UserPrincipal};
pub use manager::{AuthenticationManager, AuthenticationManagerBuilder};
pub use middleware::SecurityTransform;
pub use navigation::{Navigation, NavigationResolver, GWT_CODE_SERVER_MARKER};
#[cfg(feature = "remember-me")]
pub use remember_me::{RememberMeConfig, RememberMeStorageProvider, RememberMeToken};
pub use request_cache::RequestCache;
pub use resource::PatternResourceManager;
pub use role::MemoryRoleProvider;
pub use session::{SessionConfig, SessionStorageProvider};

pub mod authenticator;
pub mod config;
pub mod context;
pub mod credential;
pub mod extractor;
#[cfg(feature = "form-login")]
pub mod form_login;
#[cfg(feature = "http-basic")]
pub mod http_basic;
pub mod identity;
pub mod manager;
pub mod middleware;
pub mod navigation;
#[cfg(feature = "remember-me")]
pub mod remember_me;
pub mod request_cache;
pub mod resource;
pub mod role;
pub mod session;
