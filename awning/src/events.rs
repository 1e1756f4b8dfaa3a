//! Event dispatch for the Autocomplete widget.
//!
//! The host event loop feeds key presses to the focused widget via
//! [`Autocomplete::handle_key`] and every mouse press to each live widget
//! via [`Autocomplete::handle_click`]; the click path doubles as the
//! outside-click dismissal (containment test against the rectangles cached
//! at render time). The subscription is scoped to the widget: when the host
//! stops feeding events, nothing else holds a reference to its state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

use crate::option::AutocompleteOption;
use crate::selection::SelectionMode;
use crate::state::Autocomplete;

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

fn contains(rect: Option<Rect>, x: u16, y: u16) -> bool {
    rect.is_some_and(|r| x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height)
}

impl<T: AutocompleteOption> Autocomplete<T> {
    /// Handle a key press while this widget has input focus.
    pub fn handle_key(&self, key: &KeyEvent) -> EventResult {
        if self.is_disabled() {
            return EventResult::Ignored;
        }
        // Leave chords to the host's keybinds.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            || key.modifiers.contains(KeyModifiers::ALT)
        {
            return EventResult::Ignored;
        }

        match key.code {
            // Navigation and commit work over the current filtered list
            // whether or not the panel is showing; closing the panel does
            // not discard the list or the cursor.
            KeyCode::Down => {
                self.cursor_down();
                EventResult::Consumed
            }
            KeyCode::Up => {
                self.cursor_up();
                EventResult::Consumed
            }
            KeyCode::Enter => {
                // No matches means nothing to commit.
                if self.filtered_count() > 0 {
                    self.commit_at_cursor();
                }
                EventResult::Consumed
            }
            KeyCode::Esc => {
                if self.is_open() {
                    self.close();
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            KeyCode::Char(c) => {
                self.insert_char(c);
                EventResult::Consumed
            }
            KeyCode::Backspace => {
                self.delete_char_before();
                EventResult::Consumed
            }
            KeyCode::Delete => {
                self.delete_char_at();
                EventResult::Consumed
            }
            KeyCode::Left => {
                self.text_cursor_left();
                EventResult::Consumed
            }
            KeyCode::Right => {
                self.text_cursor_right();
                EventResult::Consumed
            }
            KeyCode::Home => {
                self.text_cursor_home();
                EventResult::Consumed
            }
            KeyCode::End => {
                self.text_cursor_end();
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    /// Handle a mouse press at screen coordinates.
    ///
    /// Clicks on the clear control clear the selection; clicks on the input
    /// row focus the widget (opening the full list); clicks on an open
    /// panel row commit that row. Anything else counts as an outside click
    /// and closes the dropdown, returning `Ignored` so the host can route
    /// the press elsewhere.
    pub fn handle_click(&self, x: u16, y: u16) -> EventResult {
        if self.is_disabled() {
            return EventResult::Ignored;
        }

        if self.mode() == SelectionMode::Multi && contains(self.clear_rect(), x, y) {
            self.clear_selection();
            return EventResult::Consumed;
        }

        if contains(self.anchor_rect(), x, y) {
            self.focus();
            return EventResult::Consumed;
        }

        if self.is_open() {
            if let Some(panel) = self.panel_rect()
                && contains(Some(panel), x, y)
            {
                let index = (y - panel.y) as usize;
                if index < self.filtered_count() {
                    self.set_cursor(index);
                    self.commit_at_cursor();
                }
                return EventResult::Consumed;
            }
            // Outside both the input and the open list.
            self.close();
        }
        EventResult::Ignored
    }
}
