//! TechStore CLI - browse the catalog, manage the cart and the session.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! techstore products list --search lap --category laptops --page 2
//! techstore products show 12
//!
//! # Cart
//! techstore cart add 12
//! techstore cart set 12 3
//! techstore cart checkout
//!
//! # Session
//! techstore auth login -e admin@techstore.com -p admin123
//! techstore auth whoami
//!
//! # Catalog administration (admin session required)
//! techstore admin stats
//! techstore admin delete 12
//! ```
//!
//! Configuration is read from the environment (and `.env`); see
//! `techstore_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use techstore_storefront::AppState;
use techstore_storefront::config::StorefrontConfig;
use techstore_storefront::error::{AppError, Result};

mod commands;

use commands::admin::AdminAction;
use commands::auth::AuthAction;
use commands::cart::CartAction;
use commands::products::ProductsAction;

#[derive(Parser)]
#[command(name = "techstore")]
#[command(author, version, about = "TechStore storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage catalog items (admin only)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Log in, register and manage the session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "techstore=info,techstore_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(&AppError::from(e)),
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result = match AppState::from_config(&config) {
        Ok(mut state) => run(cli, &mut state).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        e.report();
        fail(&e);
    }
}

async fn run(cli: Cli, state: &mut AppState) -> Result<()> {
    match cli.command {
        Commands::Products { action } => commands::products::run(action, state).await,
        Commands::Admin { action } => commands::admin::run(action, state).await,
        Commands::Cart { action } => commands::cart::run(action, state).await,
        Commands::Auth { action } => commands::auth::run(action, state).await,
    }
}

#[allow(clippy::print_stderr)]
fn fail(err: &AppError) -> ! {
    eprintln!("Error: {}", err.user_message());
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nested_command() {
        let cli = Cli::try_parse_from(["techstore", "cart", "set", "12", "3"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["techstore", "cart", "fly"]);
        assert!(cli.is_err());
    }
}
