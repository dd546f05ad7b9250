//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] techstore_core::EmailError),

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The email belongs to an existing account.
    #[error("email already registered")]
    EmailTaken,

    /// The operation needs an active session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The simulated round trip exceeded the configured timeout.
    #[error("authentication timed out")]
    TimedOut,
}
