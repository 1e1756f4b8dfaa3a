//! Rendering for the Autocomplete widget.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use crate::option::AutocompleteOption;
use crate::overlay;
use crate::selection::SelectionMode;
use crate::state::Autocomplete;

/// Tallest panel rendered before the list is cut off.
const MAX_PANEL_HEIGHT: u16 = 8;

impl<T: AutocompleteOption> Autocomplete<T> {
    /// Render the widget into `area`: label row, input row, optional
    /// description row, and the dropdown panel when open.
    ///
    /// The input row and panel rectangles are cached for hit testing, so
    /// this must run before clicks for the same frame are dispatched.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        if area.width < 4 || area.height == 0 {
            return;
        }

        let label = self.label();
        let description = self.description();
        let mut row = area.y;

        if !label.is_empty() && row < area.y + area.height {
            let line = Line::from(Span::styled(
                label,
                Style::default().add_modifier(Modifier::BOLD),
            ));
            frame.render_widget(Paragraph::new(line), Rect::new(area.x, row, area.width, 1));
            row += 1;
        }

        if row >= area.y + area.height {
            self.set_rects(None, None, None);
            return;
        }
        let anchor = Rect::new(area.x, row, area.width, 1);
        let clear_rect = self.render_input_row(frame, anchor, focused);
        row += 1;

        if !description.is_empty() && row < area.y + area.height {
            let line = Line::from(Span::styled(
                description,
                Style::default().add_modifier(Modifier::DIM),
            ));
            frame.render_widget(Paragraph::new(line), Rect::new(area.x, row, area.width, 1));
        }

        let panel = if self.is_open() && self.filtered_count() > 0 {
            Some(self.render_panel(frame, anchor))
        } else {
            None
        };

        self.set_rects(Some(anchor), panel, clear_rect);
        self.clear_dirty();
    }

    /// Render the input row. Returns the clear control's rectangle, if drawn.
    fn render_input_row(&self, frame: &mut Frame, area: Rect, focused: bool) -> Option<Rect> {
        let query = self.query();
        let placeholder = self.placeholder();
        let disabled = self.is_disabled();
        let selection = self.selection();

        let base_style = if disabled {
            Style::default().add_modifier(Modifier::DIM)
        } else if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        // Right-hand side: chips, clear control, loading, open indicator.
        let mut right: Vec<Span<'static>> = Vec::new();
        let mut clear_offset = None;
        if selection.mode() == SelectionMode::Multi && !selection.is_empty() {
            for item in selection.items() {
                right.push(Span::styled(
                    format!("[{}]", item.label()),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
            clear_offset = Some(right.iter().map(|s| s.width()).sum::<usize>());
            right.push(Span::styled(
                "✕",
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        if self.is_loading() {
            right.push(Span::styled(
                " …",
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        let indicator = if self.is_open() { " ▲" } else { " ▼" };
        right.push(Span::styled(
            indicator.to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ));

        let right_width: usize = right.iter().map(|s| s.width()).sum();
        let text_width = (area.width as usize).saturating_sub(right_width);

        let mut spans = self.query_spans(&query, &placeholder, base_style, focused, text_width);
        let used: usize = spans.iter().map(|s| s.width()).sum();
        spans.push(Span::raw(" ".repeat(text_width.saturating_sub(used))));
        spans.extend(right);

        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        clear_offset.map(|offset| {
            let x = area.x + text_width.min(u16::MAX as usize) as u16 + offset as u16;
            Rect::new(x.min(area.x + area.width.saturating_sub(1)), area.y, 1, 1)
        })
    }

    /// Build the query spans, with a visible cursor block when focused.
    fn query_spans(
        &self,
        query: &str,
        placeholder: &str,
        base_style: Style,
        focused: bool,
        max_width: usize,
    ) -> Vec<Span<'static>> {
        if query.is_empty() && !focused {
            let shown: String = placeholder.chars().take(max_width).collect();
            return vec![Span::styled(
                shown,
                base_style.add_modifier(Modifier::DIM),
            )];
        }
        if !focused {
            let shown: String = query.chars().take(max_width).collect();
            return vec![Span::styled(shown, base_style)];
        }

        // Focused: split around the text cursor and reverse-video it.
        let text_cursor = self.text_cursor().min(query.len());
        let before = &query[..text_cursor];
        let cursor_char = query[text_cursor..].chars().next();
        let after_start = text_cursor + cursor_char.map(|c| c.len_utf8()).unwrap_or(0);
        let after = &query[after_start.min(query.len())..];

        // Keep the cursor visible: show the tail of the before-text.
        let max_before = max_width.saturating_sub(1);
        let before_chars = before.chars().count();
        let shown_before: String = before
            .chars()
            .skip(before_chars.saturating_sub(max_before))
            .collect();
        let remaining = max_width
            .saturating_sub(shown_before.chars().count())
            .saturating_sub(1);
        let shown_after: String = after.chars().take(remaining).collect();

        let cursor_span = Span::styled(
            cursor_char.map(|c| c.to_string()).unwrap_or_else(|| " ".into()),
            base_style.add_modifier(Modifier::REVERSED),
        );

        vec![
            Span::styled(shown_before, base_style),
            cursor_span,
            Span::styled(shown_after, base_style),
        ]
    }

    /// Render the dropdown panel anchored to the input row.
    fn render_panel(&self, frame: &mut Frame, anchor: Rect) -> Rect {
        let count = self.filtered_count();
        let height = (count as u16).min(MAX_PANEL_HEIGHT);
        let rect = overlay::panel_rect(frame.area(), anchor, anchor.width, height);
        frame.render_widget(Clear, rect);

        let cursor = self.cursor();
        for row in 0..rect.height as usize {
            let Some(option) = self.filtered_option(row) else {
                break;
            };
            let line = self
                .render_option_for(&option)
                .unwrap_or_else(|| Line::from(option.label().to_string()));
            let style = if row == cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let row_rect = Rect::new(rect.x, rect.y + row as u16, rect.width, 1);
            frame.render_widget(Paragraph::new(line).style(style), row_rect);
        }
        rect
    }
}
