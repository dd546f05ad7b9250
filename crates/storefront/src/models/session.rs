//! Session-related types.
//!
//! The session is persisted under [`keys::SESSION`](crate::storage::keys::SESSION)
//! as camelCase JSON so that it survives restarts.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use techstore_core::{Email, Role, UserId};

/// The logged-in user's identity.
///
/// Never carries a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
    pub name: String,
    pub last_name: String,
    /// When the session was created.
    pub login_time: DateTime<Utc>,
}

impl Session {
    /// "Name LastName", as shown in the header.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Shallow merge: every field present in the patch overwrites the session's.
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
    }
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub email: Option<Email>,
    pub name: Option<String>,
    pub last_name: Option<String>,
}

impl ProfilePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.last_name.is_none()
    }
}

/// Sign-up form data.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: Email,
    pub name: String,
    pub last_name: String,
    /// Accepted for form parity; registration is simulated and never stores it.
    pub password: SecretString,
}
