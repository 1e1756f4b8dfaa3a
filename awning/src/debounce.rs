//! Debounced wrapper around the base widget.
//!
//! Changes only the timing of `on_input_change` delivery: the visible input
//! stays synchronous, while the host is notified once per quiet period. Two
//! states: idle (no countdown) and pending (countdown running, loading on).
//! A keystroke while pending aborts the countdown and starts a fresh one,
//! so for any burst only the countdown started by the last keystroke can
//! fire. Dropping the wrapper aborts an outstanding countdown; a dropped
//! wrapper never notifies the host.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::task::JoinHandle;

use crate::events::EventResult;
use crate::option::AutocompleteOption;
use crate::state::{Autocomplete, InputChangeHandler};

/// Quiet period used when none is configured.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// An autocomplete whose input-change notifications are debounced.
///
/// Wraps a configured [`Autocomplete`] and takes over its `on_input_change`
/// slot; the handler passed to [`Debounced::new`] is called with the latest
/// query text once the quiet period elapses without a further keystroke.
/// Selection, filtering and rendering are untouched pass-throughs.
///
/// The countdown runs on the ambient tokio runtime, so keystrokes must be
/// delivered from within one.
pub struct Debounced<T: AutocompleteOption> {
    widget: Autocomplete<T>,
    delay_ms: Arc<AtomicU64>,
    /// True from a keystroke until the debounced delivery fires.
    pending: Arc<AtomicBool>,
    /// Host-supplied loading flag, OR'd with `pending`.
    host_loading: Arc<AtomicBool>,
    /// The single outstanding countdown, replaced on every keystroke.
    timer: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<T: AutocompleteOption> Debounced<T> {
    /// Wrap `widget`, delivering debounced query text to `on_input_change`.
    pub fn new(widget: Autocomplete<T>, on_input_change: InputChangeHandler) -> Self {
        let delay_ms = Arc::new(AtomicU64::new(DEFAULT_DELAY.as_millis() as u64));
        let pending = Arc::new(AtomicBool::new(false));
        let host_loading = Arc::new(AtomicBool::new(false));
        let timer: Arc<Mutex<Option<JoinHandle<()>>>> = Arc::new(Mutex::new(None));

        let handle = widget.clone();
        let delay = Arc::clone(&delay_ms);
        let pending_flag = Arc::clone(&pending);
        let host_flag = Arc::clone(&host_loading);
        let timer_slot = Arc::clone(&timer);

        widget.set_on_input_change(Arc::new(move |text: &str| {
            let text = text.to_string();
            pending_flag.store(true, Ordering::SeqCst);
            handle.set_loading(true);

            let quiet = Duration::from_millis(delay.load(Ordering::SeqCst));
            let pending_flag = Arc::clone(&pending_flag);
            let host_flag = Arc::clone(&host_flag);
            let handle = handle.clone();
            let notify = Arc::clone(&on_input_change);

            let task = tokio::spawn(async move {
                tokio::time::sleep(quiet).await;
                pending_flag.store(false, Ordering::SeqCst);
                handle.set_loading(host_flag.load(Ordering::SeqCst));
                log::debug!("debounced delivery: {:?}", text);
                notify(&text);
            });

            if let Ok(mut slot) = timer_slot.lock()
                && let Some(stale) = slot.replace(task)
            {
                // Never let an earlier countdown fire stale text.
                stale.abort();
            }
        }));

        Self {
            widget,
            delay_ms,
            pending,
            host_loading,
            timer,
        }
    }

    /// Override the quiet period (default 300 ms).
    pub fn with_delay(self, delay: Duration) -> Self {
        self.delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
        self
    }

    /// The wrapped widget.
    pub fn widget(&self) -> &Autocomplete<T> {
        &self.widget
    }

    /// Set the host's own loading flag, OR'd with the debounce countdown.
    pub fn set_host_loading(&self, loading: bool) {
        self.host_loading.store(loading, Ordering::SeqCst);
        self.widget
            .set_loading(loading || self.pending.load(Ordering::SeqCst));
    }

    /// True while a countdown is pending or the host reports loading.
    pub fn is_loading(&self) -> bool {
        self.pending.load(Ordering::SeqCst) || self.host_loading.load(Ordering::SeqCst)
    }

    // Pass-throughs; the wrapper adds no event or render logic of its own.

    /// See [`Autocomplete::handle_key`].
    pub fn handle_key(&self, key: &KeyEvent) -> EventResult {
        self.widget.handle_key(key)
    }

    /// See [`Autocomplete::handle_click`].
    pub fn handle_click(&self, x: u16, y: u16) -> EventResult {
        self.widget.handle_click(x, y)
    }

    /// See [`Autocomplete::focus`].
    pub fn focus(&self) {
        self.widget.focus();
    }

    /// See [`Autocomplete::render`].
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        self.widget.render(frame, area, focused);
    }
}

impl<T: AutocompleteOption> Drop for Debounced<T> {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.timer.lock()
            && let Some(task) = slot.take()
        {
            task.abort();
        }
    }
}
