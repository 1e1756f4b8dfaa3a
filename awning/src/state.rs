//! Autocomplete widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use ratatui::layout::Rect;
use ratatui::text::Line;

use crate::filter::{FilterFn, FilterMatch, substring_filter};
use crate::option::AutocompleteOption;
use crate::selection::{Selection, SelectionMode};

/// Handler invoked on every selection mutation (pick, toggle, clear).
pub type ChangeHandler<T> = Arc<dyn Fn(&Selection<T>) + Send + Sync>;

/// Handler invoked with the raw query text on every keystroke.
pub type InputChangeHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Custom per-row renderer; falls back to the plain label when absent.
pub type OptionRenderer<T> = Arc<dyn Fn(&T) -> Line<'static> + Send + Sync>;

/// Unique identifier for an Autocomplete widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutocompleteId(usize);

impl AutocompleteId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for AutocompleteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__autocomplete_{}", self.0)
    }
}

/// Internal state for an Autocomplete widget.
struct AutocompleteInner<T: AutocompleteOption> {
    // Input state
    /// Live query text (uncommitted).
    query: String,
    /// Cursor position in the query (byte offset).
    text_cursor: usize,
    /// Field label shown above the input.
    label: String,
    /// Placeholder shown while the query is empty.
    placeholder: String,
    /// Optional helper text below the input.
    description: String,
    disabled: bool,
    loading: bool,

    // Options
    /// Host-supplied option list. Never mutated by the widget.
    options: Vec<T>,
    /// Filtered indices into `options`, in display order.
    filtered: Vec<FilterMatch>,
    /// Committed selection.
    selection: Selection<T>,

    // Customization points
    filter: Option<FilterFn>,
    render_option: Option<OptionRenderer<T>>,
    on_change: Option<ChangeHandler<T>>,
    on_input_change: Option<InputChangeHandler>,

    // Cached screen geometry for hit testing
    anchor_rect: Option<Rect>,
    panel_rect: Option<Rect>,
    clear_rect: Option<Rect>,
}

/// A text input with a filtered dropdown panel.
///
/// Owns the query text, open/closed state, the filtered list, the roving
/// cursor for keyboard navigation, and the committed selection (single or
/// multi, fixed at construction). The host wires callbacks for selection
/// and input changes and drives the widget from its event loop via
/// `handle_key` / `handle_click` / `focus`.
///
/// Cloning is cheap and shares state, so callbacks and timers can hold a
/// handle to the same instance.
pub struct Autocomplete<T: AutocompleteOption> {
    /// Unique identifier for this instance.
    id: AutocompleteId,
    inner: Arc<RwLock<AutocompleteInner<T>>>,
    /// Dirty flag for re-render.
    dirty: Arc<AtomicBool>,
    /// Whether the dropdown is open.
    is_open: Arc<AtomicBool>,
    /// Cursor position in the filtered list.
    cursor: Arc<AtomicUsize>,
}

impl<T: AutocompleteOption> Autocomplete<T> {
    /// Create a single-select autocomplete with the given field label.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_mode(label, SelectionMode::Single)
    }

    /// Create a multi-select autocomplete with the given field label.
    pub fn multi(label: impl Into<String>) -> Self {
        Self::with_mode(label, SelectionMode::Multi)
    }

    fn with_mode(label: impl Into<String>, mode: SelectionMode) -> Self {
        let selection = match mode {
            SelectionMode::Single => Selection::single(),
            SelectionMode::Multi => Selection::multi(),
        };
        Self {
            id: AutocompleteId::new(),
            inner: Arc::new(RwLock::new(AutocompleteInner {
                query: String::new(),
                text_cursor: 0,
                label: label.into(),
                placeholder: String::new(),
                description: String::new(),
                disabled: false,
                loading: false,
                options: Vec::new(),
                filtered: Vec::new(),
                selection,
                filter: None,
                render_option: None,
                on_change: None,
                on_input_change: None,
                anchor_rect: None,
                panel_rect: None,
                clear_rect: None,
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            is_open: Arc::new(AtomicBool::new(false)),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    // -------------------------------------------------------------------------
    // Builder-style configuration
    // -------------------------------------------------------------------------

    /// Set the option list.
    pub fn with_options(self, options: Vec<T>) -> Self {
        self.set_options(options);
        self
    }

    /// Set the placeholder shown while the query is empty.
    pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.placeholder = placeholder.into();
        }
        self
    }

    /// Set the helper text shown below the input.
    pub fn with_description(self, description: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.description = description.into();
        }
        self
    }

    /// Replace the default substring ranking with a custom strategy.
    pub fn with_filter(self, filter: FilterFn) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.filter = Some(filter);
            self.refilter_locked(&mut guard);
        }
        self
    }

    /// Install a custom row renderer for dropdown items.
    pub fn with_render_option(self, renderer: OptionRenderer<T>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.render_option = Some(renderer);
        }
        self
    }

    /// Pre-select an option. In single mode the query is set to its label.
    pub fn with_value(self, value: T) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            if guard.selection.mode() == SelectionMode::Single {
                guard.query = value.label().to_string();
                guard.text_cursor = guard.query.len();
            }
            guard.selection.toggle(value);
            self.refilter_locked(&mut guard);
        }
        self
    }

    /// Install the selection-change handler.
    pub fn on_change(self, handler: ChangeHandler<T>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.on_change = Some(handler);
        }
        self
    }

    /// Install the input-change handler, fired on every keystroke.
    pub fn on_input_change(self, handler: InputChangeHandler) -> Self {
        self.set_on_input_change(handler);
        self
    }

    /// Mark the widget disabled.
    pub fn disabled(self, disabled: bool) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.disabled = disabled;
        }
        self
    }

    // -------------------------------------------------------------------------
    // Host-controlled state
    // -------------------------------------------------------------------------

    /// Replace the option list. The previous filter result is recomputed.
    pub fn set_options(&self, options: Vec<T>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.options = options;
            self.refilter_locked(&mut guard);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Replace the committed selection (controlled-component contract).
    ///
    /// Does not fire `on_change`; the host already knows.
    pub fn set_value(&self, selection: Selection<T>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection = selection;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Replace the input-change handler.
    pub fn set_on_input_change(&self, handler: InputChangeHandler) {
        if let Ok(mut guard) = self.inner.write() {
            guard.on_input_change = Some(handler);
        }
    }

    /// Set the loading indicator.
    pub fn set_loading(&self, loading: bool) {
        if let Ok(mut guard) = self.inner.write()
            && guard.loading != loading
        {
            guard.loading = loading;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Get the unique ID for this autocomplete.
    pub fn id(&self) -> AutocompleteId {
        self.id
    }

    /// Current query text.
    pub fn query(&self) -> String {
        self.read(|g| g.query.clone()).unwrap_or_default()
    }

    /// Byte offset of the text cursor within the query.
    pub fn text_cursor(&self) -> usize {
        self.read(|g| g.text_cursor).unwrap_or(0)
    }

    /// Field label.
    pub fn label(&self) -> String {
        self.read(|g| g.label.clone()).unwrap_or_default()
    }

    /// Placeholder text.
    pub fn placeholder(&self) -> String {
        self.read(|g| g.placeholder.clone()).unwrap_or_default()
    }

    /// Helper text below the input.
    pub fn description(&self) -> String {
        self.read(|g| g.description.clone()).unwrap_or_default()
    }

    /// Whether the widget ignores input.
    pub fn is_disabled(&self) -> bool {
        self.read(|g| g.disabled).unwrap_or(false)
    }

    /// Whether the loading indicator is shown.
    pub fn is_loading(&self) -> bool {
        self.read(|g| g.loading).unwrap_or(false)
    }

    /// Clone of the committed selection.
    pub fn selection(&self) -> Selection<T> {
        self.read(|g| g.selection.clone())
            .unwrap_or_else(Selection::single)
    }

    /// Selection mode fixed at construction.
    pub fn mode(&self) -> SelectionMode {
        self.read(|g| g.selection.mode()).unwrap_or_default()
    }

    /// Current filter result (indices into the option list).
    pub fn filtered(&self) -> Vec<FilterMatch> {
        self.read(|g| g.filtered.clone()).unwrap_or_default()
    }

    /// Number of filtered items.
    pub fn filtered_count(&self) -> usize {
        self.read(|g| g.filtered.len()).unwrap_or(0)
    }

    /// Label of the item at a filtered index.
    pub fn filtered_label(&self, filtered_index: usize) -> Option<String> {
        self.inner.read().ok().and_then(|guard| {
            guard
                .filtered
                .get(filtered_index)
                .and_then(|m| guard.options.get(m.index))
                .map(|opt| opt.label().to_string())
        })
    }

    /// Clone of the option at a filtered index.
    pub fn filtered_option(&self, filtered_index: usize) -> Option<T> {
        self.inner.read().ok().and_then(|guard| {
            guard
                .filtered
                .get(filtered_index)
                .and_then(|m| guard.options.get(m.index))
                .cloned()
        })
    }

    pub(crate) fn render_option_for(&self, option: &T) -> Option<Line<'static>> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.render_option.as_ref().map(|r| r(option)))
    }

    fn read<R>(&self, f: impl FnOnce(&AutocompleteInner<T>) -> R) -> Option<R> {
        self.inner.read().ok().map(|guard| f(&guard))
    }

    // -------------------------------------------------------------------------
    // Query editing
    // -------------------------------------------------------------------------

    /// Replace the whole query, as if typed. Fires `on_input_change`.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.edit(|guard| {
            guard.query = query;
            guard.text_cursor = guard.query.len();
            true
        });
    }

    /// Insert a character at the text cursor.
    pub fn insert_char(&self, c: char) {
        self.edit(|guard| {
            let cursor = guard.text_cursor;
            guard.query.insert(cursor, c);
            guard.text_cursor += c.len_utf8();
            true
        });
    }

    /// Delete the character before the text cursor (backspace).
    pub fn delete_char_before(&self) {
        self.edit(|guard| {
            if guard.text_cursor == 0 {
                return false;
            }
            let prev = guard.query[..guard.text_cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            guard.query.remove(prev);
            guard.text_cursor = prev;
            true
        });
    }

    /// Delete the character at the text cursor (delete key).
    pub fn delete_char_at(&self) {
        self.edit(|guard| {
            if guard.text_cursor >= guard.query.len() {
                return false;
            }
            let cursor = guard.text_cursor;
            guard.query.remove(cursor);
            true
        });
    }

    /// Move the text cursor left one character.
    pub fn text_cursor_left(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.text_cursor > 0
        {
            guard.text_cursor = guard.query[..guard.text_cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Move the text cursor right one character.
    pub fn text_cursor_right(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.text_cursor < guard.query.len()
        {
            guard.text_cursor = guard.query[guard.text_cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| guard.text_cursor + i)
                .unwrap_or(guard.query.len());
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Move the text cursor to the start of the query.
    pub fn text_cursor_home(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.text_cursor != 0
        {
            guard.text_cursor = 0;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Move the text cursor to the end of the query.
    pub fn text_cursor_end(&self) {
        if let Ok(mut guard) = self.inner.write() {
            let end = guard.query.len();
            if guard.text_cursor != end {
                guard.text_cursor = end;
                self.dirty.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Apply a query mutation, refilter, apply the open/close rule and fire
    /// `on_input_change` outside the lock.
    fn edit(&self, f: impl FnOnce(&mut AutocompleteInner<T>) -> bool) {
        let notify = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            if !f(&mut guard) {
                return;
            }
            self.refilter_locked(&mut guard);
            // Typing opens the dropdown iff something matched; an empty
            // query closes it without touching the selection.
            let open = !guard.query.is_empty() && !guard.filtered.is_empty();
            self.is_open.store(open, Ordering::SeqCst);
            guard
                .on_input_change
                .clone()
                .map(|handler| (handler, guard.query.clone()))
        };
        self.dirty.store(true, Ordering::SeqCst);
        if let Some((handler, text)) = notify {
            handler(&text);
        }
    }

    /// Re-run the active filter with the current query.
    fn refilter_locked(&self, guard: &mut AutocompleteInner<T>) {
        guard.filtered = Self::filter_pass(guard, &guard.query.clone());
        // A shrinking filter must not leave the cursor dangling.
        if self.cursor.load(Ordering::SeqCst) >= guard.filtered.len() {
            self.cursor.store(0, Ordering::SeqCst);
        }
        log::trace!(
            "{} refilter query={:?} matches={}",
            self.id,
            guard.query,
            guard.filtered.len()
        );
    }

    fn filter_pass(guard: &AutocompleteInner<T>, query: &str) -> Vec<FilterMatch> {
        let labels: Vec<String> = guard
            .options
            .iter()
            .map(|opt| opt.label().to_string())
            .collect();
        match &guard.filter {
            Some(filter) => filter(query, &labels),
            None => substring_filter(query, &labels),
        }
    }

    // -------------------------------------------------------------------------
    // Dropdown open/close state
    // -------------------------------------------------------------------------

    /// Check if the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }

    /// Focus the input: show the entire option list and open the dropdown.
    ///
    /// Focus is special-cased apart from typing; even with a non-empty query
    /// it presents the full, unfiltered list.
    pub fn focus(&self) {
        if let Ok(mut guard) = self.inner.write() {
            if guard.disabled {
                return;
            }
            guard.filtered = Self::filter_pass(&guard, "");
            self.cursor.store(0, Ordering::SeqCst);
            self.is_open
                .store(!guard.filtered.is_empty(), Ordering::SeqCst);
            self.dirty.store(true, Ordering::SeqCst);
            log::debug!("{} focus options={}", self.id, guard.filtered.len());
        }
    }

    /// Close the dropdown without altering the selection or the query.
    pub fn close(&self) {
        if self.is_open.swap(false, Ordering::SeqCst) {
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Dropdown cursor navigation
    // -------------------------------------------------------------------------

    /// Current cursor position in the filtered list.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// Set the cursor position, clamped to the filtered list.
    pub fn set_cursor(&self, index: usize) {
        let max = self.filtered_count().saturating_sub(1);
        self.cursor.store(index.min(max), Ordering::SeqCst);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Move the cursor forward one item, wrapping past the end.
    pub fn cursor_down(&self) {
        let len = self.filtered_count();
        if len == 0 {
            return;
        }
        let current = self.cursor.load(Ordering::SeqCst);
        self.cursor.store((current + 1) % len, Ordering::SeqCst);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Move the cursor back one item, wrapping past the start.
    pub fn cursor_up(&self) {
        let len = self.filtered_count();
        if len == 0 {
            return;
        }
        let current = self.cursor.load(Ordering::SeqCst).min(len - 1);
        self.cursor.store((current + len - 1) % len, Ordering::SeqCst);
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Commit the option at the cursor, if any. No-op with no matches.
    ///
    /// Single mode: the option becomes the selection, the query becomes its
    /// label, the dropdown closes. Multi mode: toggles membership, resets
    /// the query to empty, leaves the dropdown open. Fires `on_change`.
    pub fn commit_at_cursor(&self) {
        let cursor = self.cursor.load(Ordering::SeqCst);
        self.commit_filtered(cursor);
    }

    /// Commit the option at a filtered index (list item click).
    pub fn commit_filtered(&self, filtered_index: usize) {
        let notify = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            let Some(m) = guard.filtered.get(filtered_index).copied() else {
                return;
            };
            let Some(option) = guard.options.get(m.index).cloned() else {
                return;
            };
            log::debug!("{} commit {:?}", self.id, option.label());
            match guard.selection.mode() {
                SelectionMode::Single => {
                    guard.query = option.label().to_string();
                    guard.text_cursor = guard.query.len();
                    guard.selection.toggle(option);
                    self.is_open.store(false, Ordering::SeqCst);
                }
                SelectionMode::Multi => {
                    guard.selection.toggle(option);
                    guard.query.clear();
                    guard.text_cursor = 0;
                }
            }
            self.refilter_locked(&mut guard);
            guard
                .on_change
                .clone()
                .map(|handler| (handler, guard.selection.clone()))
        };
        self.dirty.store(true, Ordering::SeqCst);
        if let Some((handler, selection)) = notify {
            handler(&selection);
        }
    }

    /// Reset the selection and the query to empty. Fires `on_change`.
    ///
    /// Does not open or close the dropdown by itself.
    pub fn clear_selection(&self) {
        let notify = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            guard.selection.clear();
            guard.query.clear();
            guard.text_cursor = 0;
            self.refilter_locked(&mut guard);
            guard
                .on_change
                .clone()
                .map(|handler| (handler, guard.selection.clone()))
        };
        self.dirty.store(true, Ordering::SeqCst);
        if let Some((handler, selection)) = notify {
            handler(&selection);
        }
    }

    // -------------------------------------------------------------------------
    // Screen geometry (written during render, read for hit testing)
    // -------------------------------------------------------------------------

    /// Screen rectangle of the input row, if rendered.
    pub fn anchor_rect(&self) -> Option<Rect> {
        self.read(|g| g.anchor_rect).unwrap_or(None)
    }

    /// Screen rectangle of the open dropdown panel, if rendered.
    pub fn panel_rect(&self) -> Option<Rect> {
        self.read(|g| g.panel_rect).unwrap_or(None)
    }

    /// Screen rectangle of the multi-mode clear control, if rendered.
    pub fn clear_rect(&self) -> Option<Rect> {
        self.read(|g| g.clear_rect).unwrap_or(None)
    }

    pub(crate) fn set_rects(
        &self,
        anchor: Option<Rect>,
        panel: Option<Rect>,
        clear: Option<Rect>,
    ) {
        if let Ok(mut guard) = self.inner.write() {
            guard.anchor_rect = anchor;
            guard.panel_rect = panel;
            guard.clear_rect = clear;
        }
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the widget state has changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<T: AutocompleteOption> Clone for Autocomplete<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            is_open: Arc::clone(&self.is_open),
            cursor: Arc::clone(&self.cursor),
        }
    }
}

impl<T: AutocompleteOption> std::fmt::Debug for Autocomplete<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autocomplete")
            .field("id", &self.id)
            .field("open", &self.is_open())
            .field("cursor", &self.cursor())
            .finish()
    }
}
