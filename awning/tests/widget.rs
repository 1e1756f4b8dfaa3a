use std::sync::{Arc, Mutex};

use awning::{Autocomplete, EventResult, Selection};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

fn fruits() -> Vec<String> {
    ["apple", "grape", "pineapple"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_str(widget: &Autocomplete<String>, text: &str) {
    for c in text.chars() {
        widget.handle_key(&key(KeyCode::Char(c)));
    }
}

#[test]
fn focus_opens_with_full_list() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    widget.focus();
    assert!(widget.is_open());
    assert_eq!(widget.filtered_count(), 3);
    assert_eq!(widget.cursor(), 0);
}

#[test]
fn focus_ignores_current_query() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    type_str(&widget, "ap");
    assert_eq!(widget.filtered_count(), 2);
    widget.focus();
    assert_eq!(widget.filtered_count(), 3);
}

#[test]
fn typing_filters_and_opens() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    type_str(&widget, "ap");
    assert!(widget.is_open());
    assert_eq!(widget.filtered_label(0).as_deref(), Some("apple"));
    assert_eq!(widget.filtered_label(1).as_deref(), Some("pineapple"));
}

#[test]
fn deleting_to_empty_query_closes() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    type_str(&widget, "a");
    assert!(widget.is_open());
    widget.handle_key(&key(KeyCode::Backspace));
    assert!(widget.query().is_empty());
    assert!(!widget.is_open());
    assert!(widget.selection().is_empty());
}

#[test]
fn no_match_query_keeps_dropdown_closed() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    type_str(&widget, "zzz");
    assert!(!widget.is_open());
    assert_eq!(widget.filtered_count(), 0);
}

#[test]
fn cursor_wraps_in_both_directions() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    widget.focus();
    widget.cursor_up();
    assert_eq!(widget.cursor(), 2);
    widget.cursor_down();
    assert_eq!(widget.cursor(), 0);
    widget.cursor_down();
    widget.cursor_down();
    widget.cursor_down();
    assert_eq!(widget.cursor(), 0);
}

#[test]
fn navigation_with_no_options_does_nothing() {
    let widget: Autocomplete<String> = Autocomplete::new("Fruit");
    widget.focus();
    assert!(!widget.is_open());
    widget.handle_key(&key(KeyCode::Down));
    widget.handle_key(&key(KeyCode::Up));
    widget.handle_key(&key(KeyCode::Enter));
    assert!(widget.selection().is_empty());
    assert_eq!(widget.cursor(), 0);
}

#[test]
fn closing_keeps_the_filtered_list_and_cursor_live() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    type_str(&widget, "ap");
    widget.close();
    widget.handle_key(&key(KeyCode::Down));
    assert_eq!(widget.filtered_count(), 2);
    assert_eq!(widget.cursor(), 1);
    widget.handle_key(&key(KeyCode::Up));
    assert_eq!(widget.cursor(), 0);
}

#[test]
fn enter_commits_while_the_panel_is_closed() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    type_str(&widget, "ap");
    widget.handle_key(&key(KeyCode::Esc));
    assert!(!widget.is_open());
    widget.handle_key(&key(KeyCode::Enter));
    assert_eq!(widget.selection().as_single().map(String::as_str), Some("apple"));
    assert_eq!(widget.query(), "apple");
}

#[test]
fn single_commit_sets_query_and_closes() {
    let picked: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&picked);
    let widget = Autocomplete::new("Fruit")
        .with_options(fruits())
        .on_change(Arc::new(move |selection: &Selection<String>| {
            if let Some(item) = selection.as_single() {
                sink.lock().unwrap().push(item.clone());
            }
        }));

    type_str(&widget, "ap");
    widget.handle_key(&key(KeyCode::Down));
    widget.handle_key(&key(KeyCode::Enter));

    assert!(!widget.is_open());
    assert_eq!(widget.query(), "pineapple");
    assert_eq!(widget.selection().as_single().map(String::as_str), Some("pineapple"));
    assert_eq!(picked.lock().unwrap().as_slice(), &["pineapple".to_string()]);
}

#[test]
fn multi_commit_toggles_and_stays_open() {
    let widget = Autocomplete::multi("Fruits").with_options(fruits());
    type_str(&widget, "ap");
    widget.handle_key(&key(KeyCode::Enter));
    assert!(widget.is_open());
    assert!(widget.query().is_empty());
    assert_eq!(widget.selection().items(), &["apple".to_string()]);

    widget.focus();
    widget.set_cursor(1);
    widget.handle_key(&key(KeyCode::Enter));
    assert_eq!(
        widget.selection().items(),
        &["apple".to_string(), "grape".to_string()]
    );

    // Committing an already-selected item removes it.
    widget.set_cursor(0);
    widget.handle_key(&key(KeyCode::Enter));
    assert_eq!(widget.selection().items(), &["grape".to_string()]);
}

#[test]
fn clear_selection_resets_query_and_fires_handler() {
    let calls = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&calls);
    let widget = Autocomplete::multi("Fruits")
        .with_options(fruits())
        .on_change(Arc::new(move |_: &Selection<String>| {
            *sink.lock().unwrap() += 1;
        }));

    widget.focus();
    widget.handle_key(&key(KeyCode::Enter));
    type_str(&widget, "gr");
    widget.clear_selection();

    assert!(widget.selection().is_empty());
    assert!(widget.query().is_empty());
    assert_eq!(*calls.lock().unwrap(), 2);
}

#[test]
fn escape_closes_without_touching_state() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    type_str(&widget, "ap");
    let result = widget.handle_key(&key(KeyCode::Esc));
    assert_eq!(result, EventResult::Consumed);
    assert!(!widget.is_open());
    assert_eq!(widget.query(), "ap");

    // A second escape is not ours to consume.
    assert_eq!(widget.handle_key(&key(KeyCode::Esc)), EventResult::Ignored);
}

#[test]
fn enter_with_no_matches_is_a_noop() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    type_str(&widget, "zzz");
    widget.handle_key(&key(KeyCode::Enter));
    assert!(widget.selection().is_empty());
    assert_eq!(widget.query(), "zzz");
}

#[test]
fn input_change_fires_per_keystroke_with_raw_text() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let widget = Autocomplete::new("Fruit")
        .with_options(fruits())
        .on_input_change(Arc::new(move |text: &str| {
            sink.lock().unwrap().push(text.to_string());
        }));

    type_str(&widget, "ap");
    widget.handle_key(&key(KeyCode::Backspace));
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &["a".to_string(), "ap".to_string(), "a".to_string()]
    );
}

#[test]
fn set_value_does_not_fire_on_change() {
    let calls = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&calls);
    let widget = Autocomplete::new("Fruit")
        .with_options(fruits())
        .on_change(Arc::new(move |_: &Selection<String>| {
            *sink.lock().unwrap() += 1;
        }));

    let mut selection = Selection::single();
    selection.toggle("grape".to_string());
    widget.set_value(selection);

    assert_eq!(widget.selection().as_single().map(String::as_str), Some("grape"));
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn shrinking_filter_resets_dangling_cursor() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    widget.focus();
    widget.set_cursor(2);
    type_str(&widget, "ap");
    assert_eq!(widget.filtered_count(), 2);
    assert_eq!(widget.cursor(), 0);
}

#[test]
fn disabled_widget_ignores_input() {
    let widget = Autocomplete::new("Fruit")
        .with_options(fruits())
        .disabled(true);
    assert_eq!(widget.handle_key(&key(KeyCode::Char('a'))), EventResult::Ignored);
    widget.focus();
    assert!(!widget.is_open());
    assert!(widget.query().is_empty());
}

#[test]
fn modifier_chords_are_left_to_the_host() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    let chord = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
    assert_eq!(widget.handle_key(&chord), EventResult::Ignored);
    assert!(widget.query().is_empty());
}

fn draw(widget: &Autocomplete<String>) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
    terminal
        .draw(|frame| widget.render(frame, Rect::new(0, 0, 40, 4), true))
        .unwrap();
    terminal
}

#[test]
fn click_on_panel_row_commits_that_row() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    type_str(&widget, "ap");
    draw(&widget);

    let panel = widget.panel_rect().expect("open panel should cache a rect");
    let result = widget.handle_click(panel.x, panel.y + 1);
    assert_eq!(result, EventResult::Consumed);
    assert_eq!(widget.query(), "pineapple");
    assert!(!widget.is_open());
}

#[test]
fn click_on_input_row_focuses() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    draw(&widget);

    let anchor = widget.anchor_rect().expect("anchor rect cached after render");
    let result = widget.handle_click(anchor.x + 2, anchor.y);
    assert_eq!(result, EventResult::Consumed);
    assert!(widget.is_open());
    assert_eq!(widget.filtered_count(), 3);
}

#[test]
fn click_outside_closes_and_propagates() {
    let widget = Autocomplete::new("Fruit").with_options(fruits());
    type_str(&widget, "ap");
    draw(&widget);

    let result = widget.handle_click(30, 11);
    assert_eq!(result, EventResult::Ignored);
    assert!(!widget.is_open());
    assert_eq!(widget.query(), "ap");
}

#[test]
fn click_on_clear_control_clears_multi_selection() {
    let widget = Autocomplete::multi("Fruits").with_options(fruits());
    widget.focus();
    widget.handle_key(&key(KeyCode::Enter));
    assert_eq!(widget.selection().len(), 1);
    draw(&widget);

    let clear = widget.clear_rect().expect("multi selection renders a clear control");
    let result = widget.handle_click(clear.x, clear.y);
    assert_eq!(result, EventResult::Consumed);
    assert!(widget.selection().is_empty());
}
