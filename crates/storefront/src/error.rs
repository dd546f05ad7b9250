//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for callers sitting on top of the
//! stores. Transport and storage failures are captured to Sentry and reduced
//! to a generic message; validation and authentication failures are shown as
//! they are.

use thiserror::Error;

use crate::catalog::{CatalogClientError, CatalogError};
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::storage::StorageError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog store operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Catalog client could not be used directly.
    #[error("Catalog client error: {0}")]
    CatalogClient(#[from] CatalogClientError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout was refused.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Persisted storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The current session may not perform this action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error indicates a fault rather than a user mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::CatalogClient(_)
                | Self::Storage(_)
                | Self::Config(_)
                | Self::Catalog(CatalogError::OperationFailed(_))
        )
    }

    /// Capture internal errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Operation error"
            );
        }
    }

    /// Message suitable for the person at the keyboard.
    ///
    /// Internal details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(CatalogError::Validation(errors)) => errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            Self::Catalog(err @ CatalogError::OperationFailed(_)) => {
                format!("{}, please try again", capitalize(&err.to_string()))
            }
            Self::CatalogClient(_) => "Catalog service error".to_string(),
            Self::Storage(_) => "Local storage error".to_string(),
            Self::Config(err) => err.to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::EmailTaken => "This email is already registered".to_string(),
                AuthError::NotAuthenticated => "You are not logged in".to_string(),
                AuthError::TimedOut => "The request timed out, please try again".to_string(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
            },
            Self::Checkout(err) => capitalize(&err.to_string()),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Forbidden(what) => format!("Not allowed: {what}"),
            Self::BadRequest(what) => what.clone(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the active session.
///
/// Call this after a successful login or registration.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use techstore_core::ValidationError;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 12".to_string());
        assert_eq!(err.to_string(), "Not found: product 12");

        let err = AppError::Auth(AuthError::EmailTaken);
        assert_eq!(err.to_string(), "Auth error: email already registered");
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = AppError::Catalog(CatalogError::OperationFailed("load products"));
        assert_eq!(
            err.user_message(),
            "Could not load products, please try again"
        );
        assert!(err.is_internal());
    }

    #[test]
    fn test_user_message_lists_validation_rules() {
        let err = AppError::Catalog(CatalogError::Validation(vec![
            ValidationError::NameRequired,
            ValidationError::DescriptionTooShort { min: 10 },
        ]));
        assert_eq!(
            err.user_message(),
            "name is required, description must be at least 10 characters"
        );
        assert!(!err.is_internal());
    }

    #[test]
    fn test_user_message_auth() {
        assert_eq!(
            AppError::Auth(AuthError::InvalidCredentials).user_message(),
            "Invalid credentials"
        );
        assert_eq!(
            AppError::Auth(AuthError::EmailTaken).user_message(),
            "This email is already registered"
        );
    }

    #[test]
    fn test_user_message_checkout() {
        let err = AppError::Checkout(CheckoutError::EmptyCart);
        assert_eq!(err.user_message(), "The cart is empty");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ok"), "Ok");
    }
}
