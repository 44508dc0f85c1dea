//! Vitrine CLI - Main Entry Point
//!
//! Command-line interface for the Vitrine demo stack: serve the catalog
//! API, run the QA pipeline, and inspect bundle size or git metadata.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{bundle, git, pipeline, serve};

/// Vitrine CLI - Catalog API and QA pipeline
#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the catalog service
    Serve(serve::ServeArgs),

    /// Run the QA pipeline and generate a regression report
    Pipeline(pipeline::PipelineArgs),

    /// Check a bundle against the size thresholds
    Bundle(bundle::BundleArgs),

    /// Show the git snapshot used in reports
    Git(git::GitArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve(args) => serve::execute(args).await?,
        Commands::Pipeline(args) => {
            let code = pipeline::execute(args).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Bundle(args) => bundle::execute(args, cli.format)?,
        Commands::Git(args) => git::execute(args, cli.format)?,
        Commands::Version => {
            println!("Vitrine CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Demo catalog API, widget hosting, and QA report pipeline");
        }
    }

    Ok(())
}
