//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! techstore auth login -e admin@techstore.com -p admin123
//! techstore auth register -e ana@example.com -n Ana -l Gomez -p secret1
//! techstore auth update-profile --last-name Perez
//! techstore auth whoami
//! techstore auth logout
//! ```

use clap::Subcommand;
use secrecy::SecretString;

use techstore_core::Email;
use techstore_storefront::AppState;
use techstore_storefront::error::{AppError, Result};
use techstore_storefront::models::{ProfilePatch, Registration, Session};
use techstore_storefront::services::auth::AuthError;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with a demo account
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        last_name: String,

        #[arg(short, long)]
        password: String,
    },
    /// End the session
    Logout,
    /// Show the current session
    Whoami,
    /// Change name, last name or email of the current session
    UpdateProfile {
        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },
}

#[allow(clippy::print_stdout)]
pub async fn run(action: AuthAction, state: &mut AppState) -> Result<()> {
    match action {
        AuthAction::Login { email, password } => {
            let session = state.auth_mut().login(&email, &password).await?;
            println!("Welcome {}!", session.name);
        }
        AuthAction::Register {
            email,
            name,
            last_name,
            password,
        } => {
            let registration = Registration {
                email: Email::parse(&email).map_err(AuthError::from)?,
                name,
                last_name,
                password: SecretString::from(password),
            };
            let session = state.auth_mut().register(registration).await?;
            println!("Registered, welcome {}!", session.name);
        }
        AuthAction::Logout => {
            state.auth_mut().logout();
            println!("Logged out");
        }
        AuthAction::Whoami => match state.auth().session() {
            Some(session) => print_session(session),
            None => println!("Not logged in"),
        },
        AuthAction::UpdateProfile {
            email,
            name,
            last_name,
        } => {
            let patch = ProfilePatch {
                email: email
                    .as_deref()
                    .map(Email::parse)
                    .transpose()
                    .map_err(AuthError::from)?,
                name,
                last_name,
            };
            if patch.is_empty() {
                return Err(AppError::BadRequest("Nothing to update".to_string()));
            }
            let session = state.auth_mut().update_profile(patch)?;
            print_session(session);
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_session(session: &Session) {
    println!("{} <{}>", session.display_name(), session.email);
    println!("  Id:        {}", session.id);
    println!("  Role:      {}", session.role);
    println!(
        "  Logged in: {}",
        session.login_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
}
