mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};
use commands::Interrupted;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "ytpick=warn,ytpick_core=warn",
        1 => "ytpick=info,ytpick_core=info",
        2 => "ytpick=debug,ytpick_core=debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Some(Commands::Formats { url }) => commands::formats::run(&url, config_path).await,
        Some(Commands::Doctor) => commands::doctor::run(config_path).await,
        Some(Commands::Config) => commands::config::run(config_path).await,
        None => commands::download::run(cli.url, &cli.download, config_path).await,
    };

    match result {
        Err(e) if e.is::<Interrupted>() => {
            println!("\n\nInterrupted by user");
            std::process::exit(130);
        }
        other => other,
    }
}
