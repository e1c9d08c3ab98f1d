use clap::{Parser, Subcommand};

mod books;
mod commands;
mod report;

use commands::{EvaluateArgs, NormalizeArgs, ScanArgs};

#[derive(Parser)]
#[command(name = "prop-arb")]
#[command(about = "Cross-book player-prop arbitrage scanner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan two or more books for arbitrage opportunities
    Scan(ScanArgs),
    /// Evaluate a single under / at-least price pair
    Evaluate(EvaluateArgs),
    /// Print the normalized propositions and rejected rows of one book
    Normalize(NormalizeArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; reports go to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan(args) => commands::run_scan(args)?,
        Commands::Evaluate(args) => commands::run_evaluate(args)?,
        Commands::Normalize(args) => commands::run_normalize(args)?,
    }

    Ok(())
}
