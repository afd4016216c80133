//! Newshound CLI - adaptive news-article extraction.

use clap::Parser;
use newshound_cli::{commands, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> newshound_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load or create config
    let mut config = Config::load().unwrap_or_else(|_| {
        let cfg = Config::default();
        cfg.save().ok();
        cfg
    });

    if let Some(database) = cli.database {
        config.database = Some(database);
    }

    let formatter = Formatter::new(!cli.no_color && config.settings.color);
    let api_key = cli.api_key.as_deref();

    match cli.command {
        Command::Extract(args) => {
            commands::execute_extract(args, &config, api_key, &formatter)?;
        }
        Command::ExtractFile(args) => {
            commands::execute_extract_file(args, &config, api_key, &formatter)?;
        }
        Command::Batch(args) => {
            commands::execute_batch(args, &config, api_key, &formatter)?;
        }
        Command::Show { source } => {
            commands::execute_show(&source, &config, &formatter)?;
        }
        Command::Stats => {
            commands::execute_stats(&config, &formatter)?;
        }
    }

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
