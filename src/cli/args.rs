//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Cryptocurrency price alert watcher
///
/// Polls a price API and emails recipients when a price leaves its band.
#[derive(Parser, Debug)]
#[command(name = "pricealert")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "PRICEALERT_CONFIG")]
    pub config: Option<String>,

    /// SMTP username (also the default sender address)
    #[arg(long, global = true, env = "EMAIL_USERNAME")]
    pub smtp_username: Option<String>,

    /// SMTP password
    #[arg(long, global = true, env = "EMAIL_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for this invocation
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Logger builder that honours `RUST_LOG` over [`Cli::log_filter`]
    pub fn logger(&self) -> env_logger::Builder {
        let mut builder = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_filter()),
        );
        builder.format_timestamp(None);
        builder
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch prices and send alerts until interrupted
    Watch(WatchArgs),

    /// Run a single evaluation pass and print the report
    Check {
        /// Seed rules file
        #[arg(short, long)]
        rules: Option<String>,

        /// Print alerts to the terminal instead of sending email
        #[arg(long)]
        terminal: bool,
    },

    /// Show current prices
    Price {
        /// Symbols to look up (e.g. bitcoin ethereum)
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Manage seed rules
    Rules(RulesArgs),

    /// Send a test email
    TestEmail {
        /// Recipient (defaults to the configured sender)
        #[arg(long)]
        to: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the watch command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Polling interval in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Seed rules file
    #[arg(short, long)]
    pub rules: Option<String>,

    /// Read JSON registration requests from stdin, one per line
    #[arg(long)]
    pub stdin: bool,

    /// Check once at startup instead of waiting one interval
    #[arg(long)]
    pub run_immediately: bool,

    /// Print alerts to the terminal instead of sending email
    #[arg(long)]
    pub terminal: bool,
}

/// Arguments for rules commands
#[derive(Parser, Debug)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommands,
}

/// Rules subcommands
#[derive(Subcommand, Debug)]
pub enum RulesCommands {
    /// List rules in the seed file
    List {
        /// Seed rules file
        #[arg(short, long)]
        rules: Option<String>,
    },

    /// Validate and append a rule to the seed file
    #[command(allow_negative_numbers = true)]
    Add {
        /// Coin identifier (e.g. bitcoin)
        symbol: String,

        /// Alert when the price rises above this
        upper: f64,

        /// Alert when the price falls below this
        lower: f64,

        /// Email address to notify
        recipient: String,

        /// Seed rules file
        #[arg(short, long)]
        rules: Option<String>,
    },
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_watch() {
        let args = Cli::try_parse_from([
            "pricealert",
            "watch",
            "--interval",
            "10",
            "--stdin",
            "--terminal",
        ])
        .unwrap();

        if let Commands::Watch(watch) = args.command {
            assert_eq!(watch.interval, Some(10));
            assert!(watch.stdin);
            assert!(watch.terminal);
            assert!(!watch.run_immediately);
        } else {
            panic!("Expected Watch command");
        }
    }

    #[test]
    fn test_cli_parse_verbose() {
        let args = Cli::try_parse_from(["pricealert", "-v", "check"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_verbose_enables_debug_logging() {
        use log::{Level, LevelFilter, Log, Metadata};

        let debug = Metadata::builder().level(Level::Debug).build();

        let quiet = Cli::try_parse_from(["pricealert", "check"]).unwrap();
        assert_eq!(quiet.log_filter(), "warn");
        let logger = env_logger::Builder::new()
            .parse_filters(quiet.log_filter())
            .build();
        assert_eq!(logger.filter(), LevelFilter::Warn);
        assert!(!logger.enabled(&debug));

        let verbose = Cli::try_parse_from(["pricealert", "--verbose", "check"]).unwrap();
        assert_eq!(verbose.log_filter(), "debug");
        let logger = env_logger::Builder::new()
            .parse_filters(verbose.log_filter())
            .build();
        assert_eq!(logger.filter(), LevelFilter::Debug);
        assert!(logger.enabled(&debug));
    }

    #[test]
    fn test_cli_parse_price_requires_symbol() {
        assert!(Cli::try_parse_from(["pricealert", "price"]).is_err());

        let args = Cli::try_parse_from(["pricealert", "price", "bitcoin", "ethereum"]).unwrap();
        if let Commands::Price { symbols } = args.command {
            assert_eq!(symbols, vec!["bitcoin", "ethereum"]);
        } else {
            panic!("Expected Price command");
        }
    }

    #[test]
    fn test_cli_parse_rules_add() {
        let args = Cli::try_parse_from([
            "pricealert",
            "rules",
            "add",
            "bitcoin",
            "70000",
            "-5",
            "a@x.com",
        ])
        .unwrap();

        if let Commands::Rules(rules) = args.command {
            if let RulesCommands::Add {
                symbol,
                upper,
                lower,
                recipient,
                ..
            } = rules.command
            {
                assert_eq!(symbol, "bitcoin");
                assert_eq!(upper, 70000.0);
                assert_eq!(lower, -5.0);
                assert_eq!(recipient, "a@x.com");
            } else {
                panic!("Expected Add command");
            }
        } else {
            panic!("Expected Rules command");
        }
    }

    #[test]
    fn test_cli_rules_add_rejects_non_numeric_bound() {
        let result = Cli::try_parse_from([
            "pricealert",
            "rules",
            "add",
            "bitcoin",
            "lots",
            "1",
            "a@x.com",
        ]);
        assert!(result.is_err());
    }
}
