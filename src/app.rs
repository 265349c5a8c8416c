use std::time::Instant;

use tokio::sync::mpsc::UnboundedSender;

use crate::event::Event;
use crate::remote::client::RemoteClient;
use crate::remote::protocol::Listing;
use crate::theme::ThemeColors;
use crate::tree::{Delivery, TreeCommand, TreeState};

/// A transient status bar message.
#[derive(Debug)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    created: Instant,
}

/// Main application state.
///
/// Owns the tree state machine and the remote client, and bridges between
/// them: commands returned by the tree are dispatched as spawned request
/// tasks; their completions come back as events and are fed to the tree's
/// `handle_*` methods.
pub struct App {
    pub tree_state: TreeState,
    pub client: RemoteClient,
    pub theme: ThemeColors,
    pub use_icons: bool,
    pub show_metadata: bool,
    pub should_quit: bool,
    pub status_message: Option<StatusMessage>,
}

impl App {
    /// Create the app and issue the root listing request. The root tree
    /// lives for the whole session.
    pub fn new(
        client: RemoteClient,
        root_path: &str,
        theme: ThemeColors,
        use_icons: bool,
        show_metadata: bool,
        tx: &UnboundedSender<Event>,
    ) -> Self {
        let (tree_state, bootstrap) = TreeState::new(root_path);
        let app = Self {
            tree_state,
            client,
            theme,
            use_icons,
            show_metadata,
            should_quit: false,
            status_message: None,
        };
        app.dispatch(bootstrap, tx);
        app
    }

    /// Spawn the network task for a tree command. Tasks are fire-and-forget;
    /// they only report back through the event channel.
    pub fn dispatch(&self, command: TreeCommand, tx: &UnboundedSender<Event>) {
        match command {
            TreeCommand::List { path, ticket } => {
                let client = self.client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    match client.list(&path).await {
                        Ok(listing) => {
                            let _ = tx.send(Event::ListingLoaded { ticket, listing });
                        }
                        Err(e) => {
                            let _ = tx.send(Event::ListingFailed {
                                ticket,
                                path,
                                reason: e.to_string(),
                            });
                        }
                    }
                });
            }
            TreeCommand::Open { path } => {
                let client = self.client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let error = client.open(&path).await.err().map(|e| e.to_string());
                    let _ = tx.send(Event::OpenFinished { path, error });
                });
            }
        }
    }

    /// Activate the selected row (open a file or toggle a directory),
    /// dispatching whatever request that produces.
    pub fn activate_selected(&mut self, tx: &UnboundedSender<Event>) {
        if let Some(command) = self.tree_state.activate_selected() {
            self.dispatch(command, tx);
        }
    }

    /// Apply a resolved listing. Stale responses (the subtree was collapsed
    /// while the request was in flight) are dropped by the tree layer.
    pub fn handle_listing_loaded(&mut self, ticket: u64, listing: Listing) {
        self.tree_state.handle_listing(ticket, &listing);
    }

    /// Record a listing failure and surface it in the status bar. Stale
    /// failures are dropped like stale successes.
    pub fn handle_listing_failed(&mut self, ticket: u64, path: String, reason: String) {
        let scope = if path.is_empty() { "/" } else { path.as_str() };
        match self.tree_state.handle_listing_error(ticket, reason.clone()) {
            Delivery::Applied => {
                tracing::warn!(%path, %reason, "listing failed");
                self.set_status(format!("Listing failed for {}: {}", scope, reason), true);
            }
            Delivery::Stale => {}
        }
    }

    /// Record the outcome of an open request.
    pub fn handle_open_finished(&mut self, path: String, error: Option<String>) {
        match &error {
            Some(reason) => {
                tracing::warn!(%path, %reason, "open failed");
                self.set_status(format!("Open failed for {}: {}", path, reason), true);
            }
            None => self.set_status(format!("Opened {}", path), false),
        }
        self.tree_state.handle_open_result(&path, error);
    }

    /// Set a status message with current timestamp.
    pub fn set_status(&mut self, text: String, is_error: bool) {
        self.status_message = Some(StatusMessage {
            text,
            is_error,
            created: Instant::now(),
        });
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some(msg) = &self.status_message {
            if msg.created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
