//! Status command - checks the catalog backend.

use anyhow::Result;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Status response for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    running: bool,
    message: Option<String>,
    catalog_url: String,
    signed_in: bool,
}

/// Run the status command.
pub async fn run(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let catalog_url = client
        .base_url(salesdesk_client::Backend::Catalog)
        .to_string();
    let signed_in = client.tokens().has_token().await;
    let health = client.health().check().await;

    if ctx.json_output {
        let output = StatusOutput {
            running: health.is_ok(),
            message: health.as_ref().ok().and_then(|h| h.message.clone()),
            catalog_url,
            signed_in,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("SalesDesk Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();

    match &health {
        Ok(health) => {
            let green = Style::new().green();
            println!(
                "  {} {}",
                dim.apply_to("Catalog:"),
                green.apply_to(format!("● {}", health.status))
            );
            if let Some(message) = &health.message {
                println!("  {} {}", dim.apply_to("Message:"), message);
            }
        }
        Err(e) => {
            let red = Style::new().red();
            println!(
                "  {} {}",
                dim.apply_to("Catalog:"),
                red.apply_to("● unreachable")
            );
            if ctx.verbose {
                println!("  {} {}", dim.apply_to("Error:"), e);
            }
        }
    }
    println!("  {} {}", dim.apply_to("Server:"), catalog_url);
    println!(
        "  {} {}",
        dim.apply_to("Session:"),
        if signed_in { "signed in" } else { "signed out" }
    );
    println!();

    Ok(())
}
