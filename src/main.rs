mod app;
mod components;
mod config;
mod error;
mod event;
mod format;
mod handler;
mod remote;
mod theme;
mod tree;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, ThemeConfig, TreeConfig};
use crate::event::{Event, EventHandler};
use crate::remote::client::RemoteClient;
use crate::tui::{install_panic_hook, Tui};

/// A terminal UI for browsing a remote file-listing service.
#[derive(Parser, Debug)]
#[command(name = "remdir", version, about)]
struct Cli {
    /// Server URL (e.g. http://localhost:8000); may also come from config
    server_url: Option<String>,

    /// Directory path to scope the root tree to (defaults to the service root)
    #[arg(long)]
    path: Option<String>,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Theme scheme: dark, light, or custom
    #[arg(long)]
    theme: Option<String>,

    /// Use ASCII indicators instead of nerd font icons
    #[arg(long)]
    ascii: bool,

    /// Disable mouse capture
    #[arg(long)]
    no_mouse: bool,
}

impl Cli {
    /// Convert CLI flags into a partial config for merging.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                server_url: self.server_url.clone(),
                root_path: self.path.clone(),
                mouse: self.no_mouse.then_some(false),
            },
            tree: TreeConfig {
                use_icons: self.ascii.then_some(false),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
            ..Default::default()
        }
    }
}

/// Set up tracing if `REMDIR_LOG` names a log file. The terminal owns
/// stdout/stderr, so without a file target logging stays off.
fn init_tracing() {
    let Ok(path) = std::env::var("REMDIR_LOG") else {
        return;
    };
    let Ok(file) = std::fs::File::create(&path) else {
        eprintln!("Warning: cannot create log file {}", path);
        return;
    };
    let filter =
        EnvFilter::try_from_env("REMDIR_LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("remdir=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let overrides = cli.overrides();
    let config = AppConfig::load(cli.config.as_deref(), Some(&overrides));

    let Some(server_url) = config.server_url() else {
        eprintln!("Error: no server URL given (pass it as an argument or set general.server_url)");
        std::process::exit(2);
    };
    let client = RemoteClient::new(server_url, config.request_timeout())?;
    tracing::info!(server_url, "starting remdir v{}", env!("CARGO_PKG_VERSION"));

    let theme = theme::resolve_theme(&config.theme);

    install_panic_hook();

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(16));
    let event_tx = events.sender();
    let mut app = App::new(
        client,
        config.root_path(),
        theme,
        config.use_icons(),
        config.show_metadata(),
        &event_tx,
    );

    loop {
        tui.draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key, &event_tx),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::ListingLoaded { ticket, listing } => {
                app.handle_listing_loaded(ticket, listing)
            }
            Event::ListingFailed {
                ticket,
                path,
                reason,
            } => app.handle_listing_failed(ticket, path, reason),
            Event::OpenFinished { path, error } => app.handle_open_finished(path, error),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
