//! Users command - account administration.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;

use salesdesk_client::Role;

use super::{Context, failure, header, print_json};

/// Arguments for the users command.
#[derive(Args, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List user accounts
    List,
}

/// Run the users command.
pub async fn run(args: UsersArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    // Also enforced server-side.
    if let Some(session) = client.tokens().session().await.map_err(failure)?
        && !session.has_any_role(&[Role::Administrador])
    {
        anyhow::bail!(
            "'users' requires the Administrador role (signed in as {})",
            session.user.role
        );
    }

    match args.command {
        UsersCommand::List => {
            let users = client.users().list().await.map_err(failure)?;
            if ctx.json_output {
                return print_json(&users);
            }

            header("Users");
            let dim = Style::new().dim();
            if users.is_empty() {
                println!("{}", dim.apply_to("No users found"));
                return Ok(());
            }
            for user in &users {
                println!(
                    "{:<24} {:<32} {}",
                    user.name,
                    user.email,
                    dim.apply_to(user.role.as_str())
                );
            }
        }
    }

    Ok(())
}
