use anyhow::Result;
use clap::Parser;
use colored::Colorize;

mod cli;
mod commands;

use prebid_line_items::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    init_tracing();

    let result = run(&args).await;
    if let Err(err) = &result {
        if let Some(hint) = commands::settings_hint(err, &args.config) {
            eprintln!("{}", hint.yellow());
        }
    }
    result
}

async fn run(args: &cli::Cli) -> Result<()> {
    match args.get_command() {
        cli::Commands::Setup { yes } => {
            commands::setup::execute(&args.config, yes).await?;
        }
        cli::Commands::Prices { all } => {
            commands::prices::execute(&args.config, all)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Version => {
            println!("prebid-setup v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
