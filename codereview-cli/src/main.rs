//! Codereview CLI - Command line interface and HTTP service for codereview
//!
//! Reviews a candidate's repository against an assignment using a language model.

mod commands;
mod server;

use clap::{Parser, Subcommand};
use codereview_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ReviewArgs, ServeArgs};

/// Codereview: language-model review of coding assignments
#[derive(Parser, Debug)]
#[command(name = "codereview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Model to use (overrides config and env)
    #[arg(long, global = true, env = "CODEREVIEW_MODEL")]
    model: Option<String>,

    /// Concurrent file downloads per review (overrides config)
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Run the HTTP review service
    #[command(visible_alias = "s")]
    Serve(ServeArgs),

    /// Review a repository once and print the result
    #[command(visible_alias = "r")]
    Review(ReviewArgs),

    /// Show current configuration
    Config,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.model.clone(), cli.concurrency)?;

    if cli.verbose {
        tracing::info!(
            model = %config.inference.model,
            concurrency = config.fetch.concurrency,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("codereview {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Review(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Config) => {
            println!("Codereview Configuration");
            println!("========================");
            println!();
            println!("Server: {}:{}", config.server.host, config.server.port);
            println!("GitHub API: {}", config.github.api_url);
            println!("Model: {}", config.inference.model);
            println!(
                "Cache store: {}",
                if config.cache.url.is_some() {
                    "redis (url configured)"
                } else {
                    "in-memory"
                }
            );
            println!(
                "Cache TTL: repository {:?}, analysis {:?}",
                config.cache.repository_ttl, config.cache.analysis_ttl
            );
            println!(
                "Analysis cache scoped to repository: {}",
                config.cache.scope_analysis_to_repository
            );
            println!("Download concurrency: {}", config.fetch.concurrency);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Codereview - language-model review of coding assignments");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
