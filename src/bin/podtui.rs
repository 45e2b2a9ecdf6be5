use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use podtui::action::Action;
use podtui::components::Component;
use podtui::config::Config;
use podtui::core::{ContainerCreateOptions, Inventory};
use podtui::dialog::ContainerCreateDialog;
use podtui::tui::{Event, Tui};

/// Fill in a container create request from the terminal and print it as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides ~/.podtui-config.json5)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// JSON5 file listing the images, pods, networks and volumes to offer
    #[arg(long = "inventory", value_name = "PATH")]
    inventory: Option<PathBuf>,
    /// Print the request on a single line
    #[arg(long = "compact")]
    compact: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel { Error, Warn, Info, Debug, Trace }

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    podtui::errors::init()?;
    podtui::logging::init_with(None, args.logging.map(Into::into))?;

    let config = match Config::from_path(args.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(err) if args.config.is_some() => {
            return Err(err).wrap_err("failed to load --config file");
        }
        Err(err) => {
            warn!("Falling back to built-in config: {err}");
            Config::default()
        }
    };

    let inventory = match &args.inventory {
        Some(path) => Inventory::from_path(path)?,
        None => Inventory::default(),
    };
    info!(
        "inventory: {} images, {} pods, {} networks, {} volumes",
        inventory.images.len(),
        inventory.pods.len(),
        inventory.networks.len(),
        inventory.volumes.len()
    );

    let mut dialog = ContainerCreateDialog::new(std::sync::Arc::new(inventory));
    dialog.register_config_handler(config)?;

    let outcome = {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let res = run_app(&mut tui, &mut dialog);
        tui.exit()?;
        res?
    };

    if let Some(opts) = outcome {
        let json = if args.compact {
            serde_json::to_string(&opts)?
        } else {
            serde_json::to_string_pretty(&opts)?
        };
        println!("{json}");
    }
    Ok(())
}

/// Drive the dialog until it is submitted, cancelled or the user quits.
fn run_app(tui: &mut Tui, dialog: &mut ContainerCreateDialog) -> Result<Option<ContainerCreateOptions>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    dialog.register_action_handler(action_tx.clone())?;
    let size = tui.size()?;
    dialog.init(size)?;
    dialog.display();

    loop {
        tui.draw(|f| {
            if let Err(err) = dialog.draw(f, f.area()) {
                error!("Failed to draw: {err}");
            }
        })?;

        match tui.next_event()? {
            Event::Resize(w, h) => action_tx.send(Action::Resize(w, h))?,
            Event::Tick => {}
            event => {
                if let Some(action) = dialog.handle_events(Some(event))? {
                    action_tx.send(action)?;
                }
            }
        }

        while let Ok(action) = action_rx.try_recv() {
            debug!("Action: {action}");
            match action {
                Action::Quit | Action::DialogClose => return Ok(None),
                Action::ContainerCreate(opts) => return Ok(Some(*opts)),
                Action::Resize(w, h) => tui.resize(Rect::new(0, 0, w, h))?,
                Action::Error(msg) => error!("{msg}"),
                other => {
                    if let Some(follow_up) = dialog.update(other)? {
                        action_tx.send(follow_up)?;
                    }
                }
            }
        }
    }
}
