use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::format::{format_mtime, format_size};
use crate::theme::ThemeColors;
use crate::tree::{FlatItem, RowKind, TreeState};

/// Tree widget that renders the remote directory tree with box-drawing
/// characters. Pending and failed listings render as placeholder rows
/// under their parent directory.
pub struct TreeWidget<'a> {
    tree_state: &'a TreeState,
    theme: &'a ThemeColors,
    use_icons: bool,
    show_metadata: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(
        tree_state: &'a TreeState,
        theme: &'a ThemeColors,
        use_icons: bool,
        show_metadata: bool,
    ) -> Self {
        Self {
            tree_state,
            theme,
            use_icons,
            show_metadata,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Build the prefix string for tree indentation using box-drawing characters.
    ///
    /// We need to know the ancestor chain to draw continuation lines correctly.
    fn build_prefix(item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
        if item.depth == 0 {
            return String::new();
        }

        let mut parts: Vec<&str> = Vec::new();

        // For each ancestor level (1..depth), determine if it's the last
        // sibling at that level by walking backwards through the flat list.
        for d in 1..item.depth {
            let mut ancestor_is_last = false;
            for j in (0..item_index).rev() {
                if items[j].depth == d {
                    ancestor_is_last = items[j].is_last_sibling;
                    break;
                }
                if items[j].depth < d {
                    break;
                }
            }
            if ancestor_is_last {
                parts.push("   ");
            } else {
                parts.push("│  ");
            }
        }

        if item.is_last_sibling {
            parts.push("└──");
        } else {
            parts.push("├──");
        }

        parts.join("")
    }

    /// Get the row indicator for the item's kind.
    fn item_indicator(&self, item: &FlatItem) -> &'static str {
        if self.use_icons {
            match item.kind {
                RowKind::Directory { expanded: true } => " ",
                RowKind::Directory { expanded: false } => " ",
                RowKind::File => " ",
                RowKind::Pending => "⟳ ",
                RowKind::Failed => " ",
            }
        } else {
            match item.kind {
                RowKind::Directory { expanded: true } => "[-] ",
                RowKind::Directory { expanded: false } => "[+] ",
                RowKind::File => "[F] ",
                RowKind::Pending => "[.] ",
                RowKind::Failed => "[!] ",
            }
        }
    }

    /// Right-hand column: size and mtime for files, empty otherwise.
    fn metadata_column(item: &FlatItem) -> String {
        if item.kind != RowKind::File {
            return String::new();
        }
        match (item.size, &item.mtime) {
            (Some(size), Some(mtime)) => format!("{}  {}", format_size(size), format_mtime(mtime)),
            (Some(size), None) => format_size(size),
            (None, Some(mtime)) => format_mtime(mtime),
            (None, None) => String::new(),
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let items = &self.tree_state.flat_items;
        let selected = self.tree_state.selected_index;
        let visible_height = inner_area.height as usize;

        if items.is_empty() || visible_height == 0 {
            return;
        }

        let scroll = self.tree_state.scroll_offset;
        let visible_items = items.iter().enumerate().skip(scroll).take(visible_height);

        for (i, (idx, item)) in visible_items.enumerate() {
            let y = inner_area.y + i as u16;
            if y >= inner_area.y + inner_area.height {
                break;
            }

            let prefix = Self::build_prefix(item, items, idx);
            let indicator = self.item_indicator(item);

            let is_selected = idx == selected;
            let (prefix_style, row_style, marker_style) = if is_selected {
                let style = Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD);
                (style, style, style)
            } else {
                let row_style = match item.kind {
                    RowKind::Directory { .. } => Style::default()
                        .fg(self.theme.tree_dir_fg)
                        .add_modifier(Modifier::BOLD),
                    RowKind::File => Style::default().fg(self.theme.tree_file_fg),
                    RowKind::Pending => Style::default()
                        .fg(self.theme.dim_fg)
                        .add_modifier(Modifier::ITALIC),
                    RowKind::Failed => Style::default().fg(self.theme.error_fg),
                }
                .bg(self.theme.tree_bg);
                (
                    Style::default()
                        .fg(self.theme.tree_fg)
                        .bg(self.theme.tree_bg),
                    row_style,
                    Style::default()
                        .fg(self.theme.warning_fg)
                        .bg(self.theme.tree_bg),
                )
            };

            let metadata = if self.show_metadata {
                Self::metadata_column(item)
            } else {
                String::new()
            };

            let width = inner_area.width as usize;
            let has_marker = item.open_error.is_some();
            let left_len = prefix.chars().count()
                + indicator.chars().count()
                + item.label.chars().count()
                + if has_marker { 2 } else { 0 };
            let meta_len = metadata.chars().count();

            let mut spans = vec![
                Span::styled(prefix, prefix_style),
                Span::styled(format!("{}{}", indicator, item.label), row_style),
            ];
            // Inline affordance for a failed open on this file.
            if has_marker {
                spans.push(Span::styled(" ⚠", marker_style));
            }
            if meta_len > 0 && left_len + meta_len + 2 <= width {
                let gap = width - left_len - meta_len;
                spans.push(Span::styled(
                    " ".repeat(gap),
                    if is_selected {
                        row_style
                    } else {
                        Style::default().bg(self.theme.tree_bg)
                    },
                ));
                spans.push(Span::styled(
                    metadata,
                    if is_selected {
                        row_style
                    } else {
                        Style::default().fg(self.theme.dim_fg).bg(self.theme.tree_bg)
                    },
                ));
            }
            let line = Line::from(spans);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::protocol::{Listing, WireEntry, WireTimestamp};
    use crate::theme;
    use crate::tree::TreeCommand;
    use ratatui::style::Color;

    fn sample_state() -> TreeState {
        let (mut state, cmd) = TreeState::new("");
        let ticket = match cmd {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        state.handle_listing(
            ticket,
            &Listing {
                folders: vec![WireEntry {
                    path: "docs".into(),
                    size: None,
                    mtime: None,
                }],
                entries: vec![WireEntry {
                    path: "readme.txt".into(),
                    size: Some(1536),
                    mtime: Some(WireTimestamp::Millis(1_700_000_000_000)),
                }],
            },
        );
        state
    }

    fn render_to_string(widget: TreeWidget, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_dir_then_file() {
        let state = sample_state();
        let tc = theme::dark_theme();
        let widget = TreeWidget::new(&state, &tc, false, false);
        let content = render_to_string(widget, 40, 4);
        let docs_pos = content.find("docs/").expect("docs row");
        let readme_pos = content.find("readme.txt").expect("readme row");
        assert!(docs_pos < readme_pos);
    }

    #[test]
    fn renders_metadata_column_for_files() {
        let state = sample_state();
        let tc = theme::dark_theme();
        let widget = TreeWidget::new(&state, &tc, false, true);
        let content = render_to_string(widget, 60, 4);
        assert!(content.contains("1.50 KiB"));
        assert!(content.contains("2023-11-14 22:13"));
    }

    #[test]
    fn renders_pending_row_for_inflight_child() {
        let mut state = sample_state();
        state.selected_index = state.find_index_by_path("docs").unwrap();
        state.activate_selected();

        let tc = theme::dark_theme();
        let widget = TreeWidget::new(&state, &tc, false, false);
        let content = render_to_string(widget, 40, 4);
        assert!(content.contains("loading…"));
        assert!(content.contains("└──"));
    }

    #[test]
    fn renders_error_row_for_failed_child() {
        let mut state = sample_state();
        state.selected_index = state.find_index_by_path("docs").unwrap();
        let ticket = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        state.handle_listing_error(ticket, "500 Internal Server Error".into());

        let tc = theme::dark_theme();
        let widget = TreeWidget::new(&state, &tc, false, false);
        let content = render_to_string(widget, 60, 4);
        assert!(content.contains("500 Internal Server Error"));
    }

    #[test]
    fn open_failure_marks_the_file_row() {
        let mut state = sample_state();
        state.handle_open_result("readme.txt", Some("403 Forbidden".into()));

        let tc = theme::dark_theme();
        let widget = TreeWidget::new(&state, &tc, false, false);
        let content = render_to_string(widget, 40, 4);
        assert!(content.contains("readme.txt ⚠"));
    }

    #[test]
    fn custom_tree_colors_apply_to_rows_and_prefixes() {
        let mut state = sample_state();
        state.selected_index = state.find_index_by_path("docs").unwrap();
        state.activate_selected();

        let mut tc = theme::dark_theme();
        tc.tree_bg = Color::Rgb(10, 10, 20);
        tc.tree_fg = Color::Rgb(200, 200, 200);

        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&state, &tc, false, false).render(area, &mut buf);

        // Row 1 is the unselected pending row; its "└──" prefix carries
        // tree_fg and the whole row carries tree_bg.
        let prefix_cell = buf.cell((0, 1)).unwrap();
        assert_eq!(prefix_cell.symbol(), "└");
        assert_eq!(prefix_cell.fg, Color::Rgb(200, 200, 200));
        assert_eq!(prefix_cell.bg, Color::Rgb(10, 10, 20));
    }

    #[test]
    fn open_failure_marker_uses_warning_color() {
        let mut state = sample_state();
        state.handle_open_result("readme.txt", Some("403 Forbidden".into()));

        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&state, &tc, false, false).render(area, &mut buf);

        let mut found = false;
        for y in 0..4 {
            for x in 0..40 {
                let cell = buf.cell((x, y)).unwrap();
                if cell.symbol() == "⚠" {
                    assert_eq!(cell.fg, tc.warning_fg);
                    found = true;
                }
            }
        }
        assert!(found, "warning marker rendered");
    }

    #[test]
    fn zero_area_does_not_panic() {
        let state = sample_state();
        let tc = theme::dark_theme();
        let widget = TreeWidget::new(&state, &tc, false, false);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
