use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "prebid-setup",
    version,
    about = "Create Prebid header-bidding line items in Google Ad Manager"
)]
pub struct Cli {
    /// Settings file path
    #[arg(short, long, default_value = "settings.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create the order, creatives and line items for a partner (default)
    Setup {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the price points generated from the configured buckets
    Prices {
        /// Print every price instead of a summary
        #[arg(short, long)]
        all: bool,
    },

    /// Settings commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the settings as read (access token masked)
    Show,

    /// Validate the settings file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Setup if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Setup { yes: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_setup() {
        let cli = Cli {
            config: PathBuf::from("settings.toml"),
            command: None,
        };

        match cli.get_command() {
            Commands::Setup { yes } => assert!(!yes),
            _ => panic!("Expected Setup command"),
        }
    }

    #[test]
    fn test_cli_parsing_setup_yes() {
        let args = vec!["prebid-setup", "setup", "--yes"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Setup { yes } => assert!(yes),
            _ => panic!("Expected Setup command"),
        }
    }

    #[test]
    fn test_cli_parsing_global_config() {
        let args = vec!["prebid-setup", "prices", "--all", "-c", "partner.toml"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.config, PathBuf::from("partner.toml"));
        match cli.get_command() {
            Commands::Prices { all } => assert!(all),
            _ => panic!("Expected Prices command"),
        }
    }

    #[test]
    fn test_cli_parsing_config_validate() {
        let args = vec!["prebid-setup", "config", "validate"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Config { action } => {
                assert!(matches!(action, ConfigCommands::Validate));
            }
            _ => panic!("Expected Config command"),
        }
    }
}
