//! ColorPick - multi-monitor screen color picker

mod cli;
mod clipboard;
mod display;
mod logging;
mod notify;
mod paths;
mod settings;

use crate::cli::{Cli, Command, PickArgs};
use crate::clipboard::SystemClipboard;
use crate::notify::DesktopNotifier;
use crate::settings::Settings;
use anyhow::Context;
use clap::Parser;
use color::ColorFormat;
use overlay::{Collaborators, PickOutcome, SessionCoordinator};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut settings = Settings::load();
    match cli.command.unwrap_or(Command::Pick(PickArgs::default())) {
        Command::Pick(args) => pick(settings, args),
        Command::Format { name: None } => {
            let format = settings.format();
            println!("{} ({})", format.name(), format.label());
            Ok(())
        }
        Command::Format { name: Some(name) } => {
            let format = parse_format(&name)?;
            settings.set_format(format)?;
            println!("{} ({})", format.name(), format.label());
            Ok(())
        }
        Command::Formats => {
            let current = settings.format();
            for format in ColorFormat::ALL {
                let marker = if format == current { '*' } else { ' ' };
                println!("{} {}  {:<7} {}", marker, format.index(), format.name(), format.label());
            }
            Ok(())
        }
    }
}

fn parse_format(name: &str) -> anyhow::Result<ColorFormat> {
    name.parse::<ColorFormat>()
        .with_context(|| "Run `colorpick formats` for the list of formats")
}

fn pick(settings: Settings, args: PickArgs) -> anyhow::Result<()> {
    let format = args.format.as_deref().map(parse_format).transpose()?;
    let tick_interval = settings.tick_interval();
    let config = settings.overlay_config();

    let (clipboard, clipboard_guard) = SystemClipboard::new();
    let collaborators = Collaborators {
        capture: Box::new(settings.capture()),
        clipboard: Box::new(clipboard),
        notifier: Box::new(DesktopNotifier::default()),
        store: Box::new(settings),
    };

    let mut coordinator = SessionCoordinator::new(config, collaborators);
    if let Some(format) = format {
        coordinator.set_format(format);
    }
    tracing::debug!("Picking with format {}", coordinator.format());

    match display::run_pick(coordinator, tick_interval)? {
        PickOutcome::Picked(text) => {
            if args.print {
                println!("{}", text);
            }
        }
        PickOutcome::Cancelled => tracing::info!("Pick cancelled"),
    }

    clipboard_guard.wait();
    Ok(())
}
