use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Status bar widget that displays the selection path, entry info, key
/// hints, or a transient status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    entry_info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, entry_info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            entry_info,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.success_fg)
            };

            // Pad or truncate message to fill full width
            let display: String = if msg.chars().count() >= width {
                msg.chars().take(width).collect()
            } else {
                format!("{:<width$}", msg, width = width)
            };

            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [path] [entry_info] [key hints]
        // All truncation counts chars, not bytes, so multibyte paths are safe.
        let key_hints = " enter:open/toggle  h:collapse  q:quit ";
        let hints_len = key_hints.chars().count();
        let remaining = width.saturating_sub(hints_len);

        let info_len = self.entry_info.chars().count();
        let path_budget = remaining.saturating_sub(info_len).saturating_sub(1);

        let path_len = self.path_str.chars().count();
        let path_display: String = if path_len > path_budget {
            if path_budget > 3 {
                let tail: String = self
                    .path_str
                    .chars()
                    .skip(path_len - (path_budget - 3))
                    .collect();
                format!("...{}", tail)
            } else {
                self.path_str.chars().take(path_budget).collect()
            }
        } else {
            self.path_str.to_string()
        };

        let path_display_len = path_display.chars().count();
        let info_budget = remaining.saturating_sub(path_display_len);
        let info_display: String = if info_len > info_budget {
            self.entry_info.chars().take(info_budget).collect()
        } else {
            self.entry_info.to_string()
        };

        let gap = remaining
            .saturating_sub(path_display_len)
            .saturating_sub(info_display.chars().count());

        let bar_bg = self.theme.status_bg;
        let path_style = Style::default().fg(self.theme.status_fg).bg(bar_bg);
        let info_style = Style::default().fg(self.theme.info_fg).bg(bar_bg);
        let hints_style = Style::default()
            .fg(self.theme.dim_fg)
            .bg(bar_bg)
            .add_modifier(Modifier::DIM);

        let line = Line::from(vec![
            Span::styled(path_display, path_style),
            Span::styled(" ".repeat(gap), Style::default().bg(bar_bg)),
            Span::styled(info_display, info_style),
            Span::styled(key_hints, hints_style),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
