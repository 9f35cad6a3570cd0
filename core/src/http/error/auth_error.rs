use actix_web::{error, http::StatusCode, HttpResponse, HttpResponseBuilder};
use derive_more::{Display, Error};

/// Every failure the authentication core reports.
///
/// Authentication failures deliberately share one message so an
/// unauthenticated client cannot tell an unknown user from a wrong
/// password or an unsupported scheme.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum AuthError {
    #[display("Invalid credentials.")]
    InvalidCredentials,
    /// Post-login redirect or forward failed. `reason` is for logs only.
    #[display("Unable to redirect.")]
    NavigationFailed {
        #[error(not(source))]
        reason: String,
    },
    /// A mandatory collaborator is missing at construction time.
    #[display("invalid configuration: {_0}")]
    Configuration(#[error(not(source))] String),
    #[display("storage error: {reason}")]
    Storage {
        #[error(not(source))]
        reason: String,
    },
    #[display("unauthorized")]
    Unauthorized,
}

impl AuthError {
    pub(crate) fn navigation(reason: impl Into<String>) -> Self {
        AuthError::NavigationFailed {
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(reason: impl Into<String>) -> Self {
        AuthError::Storage {
            reason: reason.into(),
        }
    }
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::NavigationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponseBuilder::new(self.status_code()).body(self.to_string())
    }
}
