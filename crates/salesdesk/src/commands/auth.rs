//! Auth commands - sign in, sign out, current user.

use anyhow::Result;
use clap::Args;
use console::Style;
use serde::Serialize;

use salesdesk_client::User;

use super::{Context, failure, print_json};

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    pub email: String,

    /// Password (prompted when omitted)
    #[arg(long, env = "SALESDESK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for the whoami command.
#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Ask the accounts backend instead of reading the stored session
    #[arg(long)]
    pub remote: bool,
}

#[derive(Debug, Serialize)]
struct WhoamiOutput<'a> {
    signed_in: bool,
    user: Option<&'a User>,
}

pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password(format!("Password for {}: ", args.email))?,
    };

    let session = client
        .auth()
        .login(&args.email, &password)
        .await
        .map_err(failure)?;

    if ctx.json_output {
        return print_json(&session.user);
    }

    let green = Style::new().green();
    let dim = Style::new().dim();
    println!(
        "{} Signed in as {} {}",
        green.apply_to("✓"),
        session.user.name,
        dim.apply_to(format!("({})", session.user.role))
    );
    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    client.auth().logout().await.map_err(failure)?;

    if !ctx.json_output {
        println!("Signed out.");
    }
    Ok(())
}

pub async fn whoami(args: WhoamiArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    let user = if args.remote {
        if !client.tokens().has_token().await {
            None
        } else {
            Some(client.auth().me().await.map_err(failure)?)
        }
    } else {
        client.tokens().user().await.map_err(failure)?
    };

    if ctx.json_output {
        return print_json(&WhoamiOutput {
            signed_in: user.is_some(),
            user: user.as_ref(),
        });
    }

    match user {
        Some(user) => {
            let dim = Style::new().dim();
            println!("{} <{}>", user.name, user.email);
            println!("  {} {}", dim.apply_to("Role:"), user.role);
            if ctx.verbose {
                println!("  {} {}", dim.apply_to("ID:"), user.id);
            }
        }
        None => println!("Not signed in. Run 'salesdesk login <email>'."),
    }
    Ok(())
}
