mod browser;
mod config;
mod error;
mod extract;
mod http_client;
mod models;
mod output;
mod pagination;
mod pipeline;
mod selectors;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "ecomscrape")]
#[command(about = "Scrape the webscraper.io e-commerce demo pages into CSV files", long_about = None)]
struct Args {
    /// Path to a YAML config file (built-in defaults cover the demo site)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the CSV files are written to, overriding the config
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Fetch one URL, report its pagination mode and print what extracts
    /// from the initial response
    #[arg(long)]
    test_url: Option<String>,

    /// Save the fetched HTML to a file when using --test-url
    #[arg(long)]
    save_html: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(out_dir) = args.out_dir {
        config.out_dir = out_dir;
    }

    // Initialize logging - use RUST_LOG env var if set, otherwise use config
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    } else {
        let level = config.tracing_level.to_lowercase();
        let max_level = match level.as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => {
                eprintln!("Invalid tracing level '{}', using 'info'", level);
                tracing::Level::INFO
            }
        };

        tracing_subscriber::fmt().with_max_level(max_level).init();
    }

    // Handle test-url command
    if let Some(url) = args.test_url {
        return test_url_fetch(&config, &url, args.save_html.as_deref()).await;
    }

    tracing::info!(
        "Scraping {} category pages from {}",
        config.targets.len(),
        config.base_url
    );

    pipeline::run(&config).await?;

    tracing::info!("All targets written to {}", config.out_dir.display());
    Ok(())
}

/// Test URL fetching - downloads one page and reports what the scraper
/// would do with it, without touching the WebDriver.
async fn test_url_fetch(config: &Config, url: &str, save_path: Option<&Path>) -> Result<()> {
    println!("Testing URL fetch: {}", url);
    println!("User-Agent: {}", config.user_agent);
    println!("{}", "=".repeat(80));

    let client = http_client::create_http_client(&config.user_agent)?;
    let response = client.get(url).send().await?;
    println!("Status: {}", response.status());

    let body = response.text().await?;
    println!("Body: {} bytes", body.len());

    if pagination::needs_browser(&body) {
        println!("Pagination: dynamic (load-more control present; a full run would use the browser)");
    } else {
        println!("Pagination: static");
    }

    if let Some(path) = save_path {
        std::fs::write(path, &body)?;
        println!("HTML saved to: {}", path.display());
    }

    println!("{}", "=".repeat(80));

    let products = extract::products_from_page(&body)?;
    println!("{} products in the initial response", products.len());
    for (i, product) in products.iter().enumerate() {
        println!("\nProduct #{}", i + 1);
        println!("Title: {}", product.title);
        println!("Price: ${}", product.price);
        println!("Rating: {} stars, {} reviews", product.rating, product.num_of_reviews);
        println!("Description: {}", product.description);
    }

    if products.is_empty() {
        println!("No products found. This might mean:");
        println!("  - The URL is not a category page of the demo site");
        println!("  - The website structure has changed");
    }

    Ok(())
}
