use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wikwok::app::AppContext;
use wikwok::cli::{commands, Cli, Commands};
use wikwok::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let is_tui = matches!(command, Commands::Tui);

    init_tracing(is_tui)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(cli.db, config)?;

    match command {
        Commands::Tui => {
            wikwok::tui::run(Arc::new(ctx)).await?;
        }
        Commands::Random { count, lang } => {
            commands::random(&ctx, count, lang.as_deref()).await?;
        }
        Commands::Liked => {
            commands::list_liked(&ctx)?;
        }
        Commands::Languages => {
            commands::list_languages(&ctx)?;
        }
        Commands::Lang { code } => {
            commands::set_language(&ctx, &code).await?;
        }
        Commands::Unlike { id } => {
            commands::unlike(&ctx, id).await?;
        }
    }

    Ok(())
}

/// The TUI owns the terminal, so its logs go to `<data_dir>/wikwok/wikwok.log`.
fn init_tracing(to_file: bool) -> anyhow::Result<()> {
    if to_file {
        let path = AppContext::data_dir()?.join("wikwok.log");
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wikwok=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }

    Ok(())
}
