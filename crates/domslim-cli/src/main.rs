//! domslim CLI
//!
//! Command-line interface for simplifying captured page snapshots

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "domslim")]
#[command(about = "domslim - Rule-driven DOM simplification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Simplify a page snapshot with the basic rule set
    Simplify(commands::simplify::SimplifyArgs),
    /// Render a page snapshot as markup without simplifying it
    Render(commands::render::RenderArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simplify(args) => commands::simplify::execute(args),
        Commands::Render(args) => commands::render::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
