//! SalesDesk - command-line client for the SalesDesk backends.
//!
//! Main entry point for the SalesDesk CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod session;

use commands::{auth, config, products, sales, status, users};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// SalesDesk - sales, products and users from the command line
#[derive(Parser)]
#[command(name = "salesdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Context to use instead of the current one
    #[arg(long, global = true, env = "SALESDESK_CONTEXT")]
    pub context: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(auth::LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami(auth::WhoamiArgs),

    /// Check that the catalog backend is reachable
    Status,

    /// Product catalog
    Products(products::ProductsArgs),

    /// Sales records
    Sales(sales::SalesArgs),

    /// User accounts (administrators only)
    Users(users::UsersArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console logs go to stderr so --json output stays parseable
    let filter = if cli.verbose {
        "salesdesk=debug,salesdesk_client=debug,salesdesk_config=debug,warn"
    } else {
        "salesdesk=warn,salesdesk_client=warn,warn"
    };

    let log_dir = salesdesk_config::logs_dir().unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "salesdesk.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "salesdesk=trace,salesdesk_client=trace,salesdesk_config=trace,info",
                )),
        )
        .init();

    let ctx = commands::Context {
        context_name: cli.context,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Login(args) => auth::login(args, &ctx).await,
        Commands::Logout => auth::logout(&ctx).await,
        Commands::Whoami(args) => auth::whoami(args, &ctx).await,
        Commands::Status => status::run(&ctx).await,
        Commands::Products(args) => products::run(args, &ctx).await,
        Commands::Sales(args) => sales::run(args, &ctx).await,
        Commands::Users(args) => users::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
