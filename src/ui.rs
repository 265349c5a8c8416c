use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::format::{format_mtime, format_size};
use crate::tree::RowKind;

/// Render the application UI: the tree panel above a one-line status bar.
pub fn render(app: &mut App, frame: &mut Frame) {
    let [tree_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    // Keep the selected row visible (account for the border).
    let visible_height = tree_area.height.saturating_sub(2) as usize;
    app.tree_state.update_scroll(visible_height);

    let block = Block::default()
        .title(format!(" {} ", app.client.base_url()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));

    let tree_widget =
        TreeWidget::new(&app.tree_state, &app.theme, app.use_icons, app.show_metadata).block(block);
    frame.render_widget(tree_widget, tree_area);

    // Status bar: selection path + entry info, or a transient message.
    let (path_str, entry_info) = selection_summary(app);
    let mut status = StatusBarWidget::new(&path_str, &entry_info, &app.theme);
    if let Some(msg) = &app.status_message {
        status = status.status_message(&msg.text, msg.is_error);
    }
    frame.render_widget(status, status_area);
}

/// Describe the selected row for the status bar: its path and, for files,
/// formatted size and mtime.
fn selection_summary(app: &App) -> (String, String) {
    let Some(item) = app.tree_state.flat_items.get(app.tree_state.selected_index) else {
        return (String::new(), String::new());
    };
    let info = match item.kind {
        RowKind::File => {
            let size = item.size.map(format_size).unwrap_or_default();
            match &item.mtime {
                Some(mtime) => format!("{}  {}", size, format_mtime(mtime)),
                None => size,
            }
        }
        RowKind::Directory { expanded } => {
            if expanded {
                "expanded".to_string()
            } else {
                "collapsed".to_string()
            }
        }
        RowKind::Pending => "loading".to_string(),
        RowKind::Failed => "listing failed".to_string(),
    };
    (item.path.clone(), info)
}
