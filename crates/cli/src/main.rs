//! Gadget Grove CLI - Catalog seeding and account management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the catalog with the sample laptop products
//! gg-cli seed products
//!
//! # Seed after clearing whatever is in the catalog
//! gg-cli seed products --clear
//!
//! # Promote a user's profile to admin
//! gg-cli profile promote --user-id 3d5b782a-363c-4437-852a-f2494d46e707
//! ```
//!
//! # Commands
//!
//! - `seed products` - Insert the sample catalog
//! - `profile promote` - Set a profile's role
//!
//! Both need `REMOTE_STORE_URL` and `REMOTE_STORE_SERVICE_KEY` in the
//! environment; the service-role key bypasses row-level security.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gg-cli")]
#[command(author, version, about = "Gadget Grove CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the remote store with sample data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage user profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed the product catalog
    Products {
        /// Delete every existing product first
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Set a profile's role (defaults to admin)
    Promote {
        /// Remote-store user id
        #[arg(short, long)]
        user_id: String,

        /// Role to set (`admin`, `customer`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { target } => match target {
            SeedTarget::Products { clear } => commands::seed::products(clear).await?,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Promote { user_id, role } => {
                commands::profile::promote(&user_id, &role).await?;
            }
        },
    }
    Ok(())
}
