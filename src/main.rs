//! pricealert - cryptocurrency price alert watcher
//!
//! Polls a price API on a fixed interval and emails recipients whose price
//! band has been breached.

use clap::Parser;
use pricealert::cli::args::{generate_completions, Cli, Commands, RulesCommands};
use pricealert::commands::{run_check, run_price, run_rules, run_test_email, run_watch};
use pricealert::config::{Config, ConfigBuilder};
use pricealert::error::{AppError, ConfigError, SendError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; --verbose sets the default level, RUST_LOG overrides it
    cli.logger().init();

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Commands::Watch(args) => {
            let config = base_config(cli)
                .with_interval(args.interval)
                .with_run_immediately(args.run_immediately.then_some(true))
                .with_rules_file(args.rules.clone())
                .with_terminal(args.terminal)
                .build();
            run_watch(&config, args.stdin, cli.format)
        }

        Commands::Check { rules, terminal } => {
            let config = base_config(cli)
                .with_rules_file(rules.clone())
                .with_terminal(*terminal)
                .build();
            run_check(&config, cli.format)
        }

        Commands::Price { symbols } => run_price(symbols, &load_config(cli), cli.format),

        Commands::Rules(args) => {
            let rules = match &args.command {
                RulesCommands::List { rules } | RulesCommands::Add { rules, .. } => rules.clone(),
            };
            let config = base_config(cli).with_rules_file(rules).build();
            run_rules(&args.command, &config, cli.format)
        }

        Commands::TestEmail { to } => run_test_email(to.as_deref(), &load_config(cli), cli.format),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn base_config(cli: &Cli) -> ConfigBuilder {
    ConfigBuilder::new()
        .with_file(cli.config.as_deref())
        .with_smtp_credentials(cli.smtp_username.clone(), cli.smtp_password.clone())
}

fn load_config(cli: &Cli) -> Config {
    base_config(cli).build()
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Send(SendError::Auth(_)) => {
            eprintln!();
            eprintln!("Hint: Check EMAIL_USERNAME and EMAIL_PASSWORD.");
            eprintln!("      Gmail accounts with 2FA need an app password.");
        }
        AppError::Config(ConfigError::MissingField(field)) if field.starts_with("smtp.") => {
            eprintln!();
            eprintln!("Hint: Set EMAIL_USERNAME (and EMAIL_PASSWORD), or pass --terminal.");
        }
        AppError::Signal(_) => {
            eprintln!();
            eprintln!("Hint: Only one Ctrl+C handler can be installed per process.");
        }
        _ => {}
    }
}
