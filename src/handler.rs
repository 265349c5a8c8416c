use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::App;
use crate::event::Event;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent, tx: &UnboundedSender<Event>) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Down | KeyCode::Char('j') => app.tree_state.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.tree_state.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.tree_state.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.tree_state.select_last(),

        // Activate: open a file or toggle a directory.
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right | KeyCode::Char('l') => {
            app.activate_selected(tx)
        }

        // Collapse the selected directory, or jump to its parent.
        KeyCode::Left | KeyCode::Char('h') => app.tree_state.collapse_selected(),

        _ => {}
    }
}

/// Handle a mouse event (scroll moves the selection).
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.tree_state.select_next(),
        MouseEventKind::ScrollUp => app.tree_state.select_previous(),
        _ => {}
    }
}
