use anyhow::{Context, Result, bail};
use product_extractor::{ErrorKind, ExtractorConfig, HtmlFetcher, scrape_product};
use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: product-extractor [--json] [--config <path>] [URL]

Extracts brand, price and image URL from a product page.
Prompts for the URL when none is given.";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    url: Option<String>,
    config_path: Option<String>,
    json: bool,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" | "-j" => parsed.json = true,
            "--help" | "-h" => parsed.help = true,
            "--config" | "-c" => {
                let path = args.next().context("--config requires a path")?;
                parsed.config_path = Some(path);
            }
            flag if flag.starts_with('-') => bail!("Unknown option: {}\n\n{}", flag, USAGE),
            _ if parsed.url.is_some() => bail!("Only one URL can be processed per run\n\n{}", USAGE),
            _ => parsed.url = Some(arg),
        }
    }

    Ok(parsed)
}

fn prompt_for_url() -> Result<String> {
    print!("Enter product URL: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read URL from stdin")?;

    let url = line.trim();
    if url.is_empty() {
        bail!("No URL provided");
    }
    Ok(url.to_string())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables before anything reads them
    dotenv::dotenv().ok();

    // Logs go to stderr, stdout carries the result
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = parse_args(env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(ExitCode::SUCCESS);
    }

    let config = match args.config_path.as_deref() {
        Some(path) => ExtractorConfig::from_file(path)?,
        None => ExtractorConfig::load()?,
    };

    let url = match args.url {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    let fetcher = HtmlFetcher::new(config.fetch.clone()).context("Failed to build HTTP client")?;
    info!("Scraping {}", url);

    match scrape_product(&fetcher, &url).await {
        Ok(product) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&product)?);
            } else {
                println!("\n{}", product);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Scrape of {} failed: {}", url, e);
            let reason = match e.kind() {
                ErrorKind::Network => "could not retrieve the page",
                ErrorKind::Parse => "could not parse the page",
            };
            eprintln!("Failed to scrape product information: {} ({})", reason, e);
            Ok(ExitCode::FAILURE)
        }
    }
}
