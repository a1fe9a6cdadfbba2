//! Config command - context management.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use serde::Serialize;

use salesdesk_config::{ClientConfig, Context as ClientContext};

use super::{Context, print_json};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration for the selected context
    Show,

    /// Show configuration file path
    Path,

    /// List available contexts
    GetContexts,

    /// Switch to a different context
    UseContext {
        /// Context name to switch to
        name: String,
    },

    /// Create or update a context
    SetContext {
        /// Context name
        name: String,

        /// Accounts backend URL (e.g., http://localhost:3001)
        #[arg(long)]
        accounts: Option<String>,

        /// Catalog backend URL (e.g., http://localhost:5000)
        #[arg(long)]
        catalog: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Login entry point
        #[arg(long)]
        login_path: Option<String>,

        /// Session file for this context
        #[arg(long)]
        session_file: Option<PathBuf>,
    },

    /// Delete a context
    DeleteContext {
        /// Context name to delete
        name: String,
    },
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    context: String,
    accounts: String,
    catalog: String,
    timeout_secs: u64,
    login_path: String,
    session_file: Option<PathBuf>,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(),
        ConfigCommand::GetContexts => cmd_get_contexts(ctx),
        ConfigCommand::UseContext { name } => cmd_use_context(&name),
        ConfigCommand::SetContext {
            name,
            accounts,
            catalog,
            timeout,
            login_path,
            session_file,
        } => cmd_set_context(
            &name,
            ContextUpdate {
                accounts,
                catalog,
                timeout,
                login_path,
                session_file,
            },
        ),
        ConfigCommand::DeleteContext { name } => cmd_delete_context(&name),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let config = salesdesk_config::load_client_config()?;
    let resolved = config.resolve(ctx.context_name.as_deref())?;
    let session_file = crate::session::session_file(&resolved).ok();

    if ctx.json_output {
        return print_json(&ShowOutput {
            context: resolved.name,
            accounts: resolved.accounts_url,
            catalog: resolved.catalog_url,
            timeout_secs: resolved.timeout.as_secs(),
            login_path: resolved.login_path,
            session_file,
        });
    }

    let dim = Style::new().dim();
    println!("{} {}", dim.apply_to("Context:"), resolved.name);
    println!("  {} {}", dim.apply_to("accounts:"), resolved.accounts_url);
    println!("  {} {}", dim.apply_to("catalog:"), resolved.catalog_url);
    println!("  {} {}s", dim.apply_to("timeout:"), resolved.timeout.as_secs());
    println!("  {} {}", dim.apply_to("login-path:"), resolved.login_path);
    if let Some(path) = session_file {
        println!("  {} {}", dim.apply_to("session:"), path.display());
    }

    if ctx.verbose {
        println!("---\nRaw config:\n");
        println!("{}", config.to_yaml()?);
    }

    Ok(())
}

fn cmd_path() -> Result<()> {
    match salesdesk_config::client_config_path() {
        Some(path) => {
            let exists = if path.exists() { "" } else { " (not created yet)" };
            println!("{}{}", path.display(), exists);
        }
        None => println!("Could not determine config directory"),
    }
    Ok(())
}

fn cmd_get_contexts(ctx: &Context) -> Result<()> {
    let config = salesdesk_config::load_client_config()?;

    if ctx.json_output {
        return print_json(&config.contexts);
    }

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!();
        println!("Create one with:");
        println!(
            "  salesdesk config set-context local --accounts=http://localhost:3001 --catalog=http://localhost:5000"
        );
        return Ok(());
    }

    let current = config.current_context.as_deref();

    println!("CURRENT   NAME            ACCOUNTS                        CATALOG");
    for context in &config.contexts {
        let marker = if current == Some(context.name.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{}         {:<15} {:<31} {}",
            marker,
            context.name,
            context.accounts,
            context.catalog.as_deref().unwrap_or(&context.accounts)
        );
    }

    Ok(())
}

fn cmd_use_context(name: &str) -> Result<()> {
    let mut config = salesdesk_config::load_client_config()?;

    config.use_context(name)?;
    salesdesk_config::save_client_config(&config)?;

    println!("Switched to context \"{}\".", name);

    Ok(())
}

/// Fields given to `set-context`.
#[derive(Debug, Default)]
struct ContextUpdate {
    accounts: Option<String>,
    catalog: Option<String>,
    timeout: Option<u64>,
    login_path: Option<String>,
    session_file: Option<PathBuf>,
}

/// Apply `update` to `config`. Returns whether the context was created.
fn apply_context_update(config: &mut ClientConfig, name: &str, update: ContextUpdate) -> Result<bool> {
    let created = match config.get_context_mut(name) {
        Some(existing) => {
            if let Some(url) = update.accounts {
                existing.accounts = url;
            }
            if update.catalog.is_some() {
                existing.catalog = update.catalog;
            }
            if update.timeout.is_some() {
                existing.timeout = update.timeout;
            }
            if update.login_path.is_some() {
                existing.login_path = update.login_path;
            }
            if update.session_file.is_some() {
                existing.session_file = update.session_file;
            }
            false
        }
        None => {
            let accounts = update.accounts.ok_or_else(|| {
                anyhow::anyhow!("--accounts is required when creating a new context")
            })?;
            let mut context = ClientContext::new(name, accounts);
            context.catalog = update.catalog;
            context.timeout = update.timeout;
            context.login_path = update.login_path;
            context.session_file = update.session_file;
            config.set_context(context);
            true
        }
    };

    // The first context becomes current
    if config.current_context.is_none() && config.contexts.len() == 1 {
        config.current_context = Some(name.to_string());
    }

    Ok(created)
}

fn cmd_set_context(name: &str, update: ContextUpdate) -> Result<()> {
    let mut config = salesdesk_config::load_client_config()?;
    let had_current = config.current_context.is_some();

    let created = apply_context_update(&mut config, name, update)?;
    salesdesk_config::save_client_config(&config)?;

    if created {
        println!("Context \"{}\" created.", name);
    } else {
        println!("Context \"{}\" modified.", name);
    }
    if !had_current && config.current_context.as_deref() == Some(name) {
        println!("Context \"{}\" set as current context.", name);
    }

    Ok(())
}

fn cmd_delete_context(name: &str) -> Result<()> {
    let mut config = salesdesk_config::load_client_config()?;

    match config.remove_context(name) {
        Some(_) => {
            salesdesk_config::save_client_config(&config)?;
            println!("Context \"{}\" deleted.", name);
            if config.current_context.is_none() {
                println!(
                    "Note: No current context. Use 'salesdesk config use-context <name>' to set one."
                );
            }
        }
        None => {
            println!("Context \"{}\" not found.", name);
        }
    }

    Ok(())
}
