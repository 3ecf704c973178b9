use thiserror::Error;

use crate::AppError;

/// Result type returned by identity and authorization use-cases.
pub type AuthResult<T> = Result<T, AuthError>;

/// Failure kinds surfaced by login, signup, token verification and role management.
///
/// Display strings are safe to return to callers. Variants carrying detail
/// (`TransactionFailure`, `Internal`) render a generic message; the detail is
/// only reachable through [`AuthError::detail`] for logging.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed request data.
    #[error("{0}")]
    Validation(String),

    /// Unknown email, disabled account or wrong password. Deliberately uniform.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Email already belongs to another account.
    #[error("email address is already in use")]
    EmailTaken,

    /// Token missing, malformed, badly signed or expired.
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated, but the granted roles do not allow the operation.
    #[error("access denied")]
    Unauthorized,

    /// Role name outside the closed role enumeration.
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    /// Requested principal or resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Write conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// The signup bundle was rolled back.
    #[error("signup failed, please try again")]
    TransactionFailure(String),

    /// Unexpected failure in an adapter.
    #[error("internal server error")]
    Internal(String),
}

impl AuthError {
    /// Returns the internal detail carried by opaque variants, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::TransactionFailure(detail) | Self::Internal(detail) => Some(detail.as_str()),
            _ => None,
        }
    }
}

impl From<AppError> for AuthError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Validation(message) => Self::Validation(message),
            AppError::NotFound(message) => Self::NotFound(message),
            AppError::Conflict(message) => Self::Conflict(message),
            AppError::Unauthorized(_) => Self::Unauthenticated,
            AppError::Forbidden(_) => Self::Unauthorized,
            AppError::Internal(message) => Self::Internal(message),
        }
    }
}
