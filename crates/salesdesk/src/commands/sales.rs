//! Sales command - sales history.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;

use super::{Context, failure, header, print_json, truncate};

/// Arguments for the sales command.
#[derive(Args, Debug)]
pub struct SalesArgs {
    #[command(subcommand)]
    pub command: SalesCommand,
}

#[derive(Subcommand, Debug)]
pub enum SalesCommand {
    /// List recorded sales
    List {
        /// Maximum sales to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Run the sales command.
pub async fn run(args: SalesArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    match args.command {
        SalesCommand::List { limit } => {
            let sales = client.sales().list().await.map_err(failure)?;
            if ctx.json_output {
                return print_json(&sales);
            }

            header("Sales");
            let dim = Style::new().dim();
            if sales.is_empty() {
                println!("{}", dim.apply_to("No sales found"));
                return Ok(());
            }

            for sale in sales.iter().take(limit) {
                let when = sale
                    .date
                    .as_deref()
                    .or(sale.created_at.as_deref())
                    .unwrap_or("-");
                println!(
                    "{} {:<24} {:>10.2}  {:<9} {}",
                    dim.apply_to(truncate(when, 10)),
                    truncate(sale.client.as_deref().unwrap_or("-"), 24),
                    sale.total,
                    format!("{:?}", sale.status).to_lowercase(),
                    dim.apply_to(format!("{} items", sale.products.len()))
                );
            }

            let total: f64 = sales.iter().map(|s| s.total).sum();
            println!();
            println!(
                "{} {:.2} across {} sales",
                dim.apply_to("Total:"),
                total,
                sales.len()
            );
        }
    }

    Ok(())
}
