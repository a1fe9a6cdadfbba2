//! Products command - catalog browsing.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;

use salesdesk_client::Product;

use super::{Context, failure, header, print_json, truncate};

/// Arguments for the products command.
#[derive(Args, Debug)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    /// List products
    List {
        /// Only show products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum products to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Show a single product
    Get {
        /// Product ID
        id: i64,
    },
}

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    match args.command {
        ProductsCommand::List { category, limit } => {
            let mut products = client.products().list().await.map_err(failure)?;
            if let Some(category) = &category {
                products.retain(|p| p.category.eq_ignore_ascii_case(category));
            }

            if ctx.json_output {
                return print_json(&products);
            }

            header("Products");
            let dim = Style::new().dim();
            if products.is_empty() {
                println!("{}", dim.apply_to("No products found"));
                return Ok(());
            }
            for product in products.iter().take(limit) {
                print_row(product);
            }
            if products.len() > limit {
                println!();
                println!(
                    "{}",
                    dim.apply_to(format!("... and {} more", products.len() - limit))
                );
            }
        }
        ProductsCommand::Get { id } => {
            let product = client.products().get(id).await.map_err(failure)?;
            if ctx.json_output {
                return print_json(&product);
            }

            header(&product.name);
            let dim = Style::new().dim();
            println!("  {} {}", dim.apply_to("ID:"), product.id);
            println!("  {} {:.2}", dim.apply_to("Price:"), product.price);
            println!("  {} {}", dim.apply_to("Stock:"), product.stock);
            if !product.category.is_empty() {
                println!("  {} {}", dim.apply_to("Category:"), product.category);
            }
            if !product.description.is_empty() {
                println!("  {} {}", dim.apply_to("Description:"), product.description);
            }
        }
    }

    Ok(())
}

fn print_row(product: &Product) {
    let dim = Style::new().dim();
    let stock = if product.stock > 0 {
        Style::new().green().apply_to(format!("{:>5}", product.stock))
    } else {
        Style::new().red().apply_to(format!("{:>5}", product.stock))
    };
    println!(
        "{} {:<32} {:>10.2} {}",
        dim.apply_to(format!("[{:>4}]", product.id)),
        truncate(&product.name, 32),
        product.price,
        stock
    );
}
