mod cli;
mod config;
mod cost;
mod error;
mod output;
mod pricing;

use std::fs::File;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::Config;
use cost::{TokenUsage, calculate_cost};
use error::PricingError;
use output::{json, table};
use pricing::{CatalogClient, CatalogOptions, PricingResolver};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = Config::load();
    let cli = cli.with_config(&config);

    match run(cli, &config).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("tokcost: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "tokcost=debug" } else { "tokcost=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// CLI and config merged into accessor options. `--catalog FILE` switches
/// the accessor to an injected offline source reading that file.
fn catalog_options(cli: &Cli, config: &Config) -> CatalogOptions {
    let mut options = CatalogOptions {
        offline: cli.offline,
        ..Default::default()
    };
    if let Some(url) = &config.catalog_url {
        options.url = url.clone();
    }
    if let Some(hours) = config.cache_ttl_hours {
        options.cache_ttl = Duration::from_secs(hours * 60 * 60);
    }
    if let Some(path) = cli.catalog.clone() {
        options.offline = true;
        options.offline_loader = Some(Box::new(move || {
            let file = File::open(&path).map_err(|source| PricingError::Snapshot {
                path: path.clone(),
                source,
            })?;
            Ok(serde_json::from_reader(file)?)
        }));
    }
    options
}

async fn run(cli: Cli, config: &Config) -> Result<ExitCode, PricingError> {
    let resolver = PricingResolver::new(CatalogClient::new(catalog_options(&cli, config)));

    match &cli.command {
        Commands::Lookup { models } => {
            let mut rows = Vec::with_capacity(models.len());
            let mut failed = false;
            for model in models {
                match resolver.resolve(model).await {
                    Ok(pricing) => rows.push((model.clone(), pricing)),
                    Err(err @ PricingError::NotFound { .. }) => {
                        eprintln!("tokcost: {err}");
                        failed = true;
                    }
                    Err(err) => return Err(err),
                }
            }
            if cli.json {
                json::output_pricing_json(&rows);
            } else if !rows.is_empty() {
                table::print_pricing_table(&rows, cli.use_color());
            }
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Cost { model, usage } => {
            let pricing = resolver.resolve(model).await?;
            let usage = TokenUsage {
                input_tokens: usage.input,
                cached_input_tokens: usage.cached,
                output_tokens: usage.output,
            };
            let cost = calculate_cost(&usage, &pricing);
            if cli.json {
                json::output_cost_json(model, &usage, &pricing, cost);
            } else {
                table::print_cost_table(model, &usage, cost, cli.use_color());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Refresh => {
            let count = resolver.catalog().refresh().await?;
            println!("Refreshed pricing catalog ({count} models)");
            Ok(ExitCode::SUCCESS)
        }
    }
}
