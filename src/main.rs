use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use dantags::cli::{Cli, Commands, ExtractOptions};
use dantags::logging::{self, LogTarget};
use dantags::tui::{App, ClipboardWriter, SystemClipboard};
use dantags::{Config, DanbooruClient};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(api_base) = cli.api_base {
        config.api_base_url = api_base;
        config.validate()?;
    }

    let command = cli.command.unwrap_or(Commands::Tui);

    // The TUI owns the terminal, so its logs go to a file
    let log_target = match command {
        Commands::Tui => LogTarget::File,
        Commands::Extract { .. } => LogTarget::Stderr,
    };
    logging::setup(&config.logging, log_target, cli.verbose)?;

    let client = DanbooruClient::new(&config)?;

    match command {
        Commands::Tui => {
            let app = App::new(config, Arc::new(client));
            let mut clipboard = SystemClipboard::new();
            dantags::tui::run_event_loop(app, &mut clipboard)?;
        }
        Commands::Extract {
            url,
            meta,
            hide,
            copy,
            json,
        } => {
            let options = ExtractOptions { meta, hide, json };
            let mut clipboard = SystemClipboard::new();
            let clipboard = copy.then_some(&mut clipboard as &mut dyn ClipboardWriter);
            dantags::cli::handle_extract(
                &url,
                &options,
                &client,
                client.api_base_url(),
                clipboard,
            )?;
        }
    }

    Ok(())
}
