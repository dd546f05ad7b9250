//! Hardcoded demo accounts.

use secrecy::{ExposeSecret, SecretString};

use techstore_core::{Role, UserId};

/// A credential row.
#[derive(Debug)]
pub struct DemoAccount {
    pub id: UserId,
    pub email: &'static str,
    pub password: SecretString,
    pub role: Role,
    pub name: &'static str,
    pub last_name: &'static str,
}

impl DemoAccount {
    /// Case-insensitive email match.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Exact password match.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        self.password.expose_secret() == password
    }
}

/// The account table. Registration never adds to it.
#[must_use]
pub fn demo_accounts() -> Vec<DemoAccount> {
    vec![
        DemoAccount {
            id: UserId::new(1),
            email: "admin@techstore.com",
            password: SecretString::from("admin123"),
            role: Role::Admin,
            name: "Administrador",
            last_name: "TechStore",
        },
        DemoAccount {
            id: UserId::new(2),
            email: "usuario@techstore.com",
            password: SecretString::from("user123"),
            role: Role::User,
            name: "Usuario",
            last_name: "Demo",
        },
        DemoAccount {
            id: UserId::new(3),
            email: "demo@demo.com",
            password: SecretString::from("demo123"),
            role: Role::User,
            name: "Demo",
            last_name: "User",
        },
    ]
}
