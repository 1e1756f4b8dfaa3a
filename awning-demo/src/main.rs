//! Fruit-salad demo.
//!
//! Three autocomplete fields over the same fruit list:
//! - a plain single-select with a color-dot row renderer,
//! - a debounced single-select that logs each settled query,
//! - a multi-select that builds a fruit salad.
//!
//! Tab moves between fields, typing filters, Enter commits, Escape closes,
//! mouse clicks focus/commit/dismiss. Ctrl+C quits.

mod error;
mod terminal;

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use awning::prelude::*;
use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::error::DemoError;
use crate::terminal::Session;

#[derive(Clone, PartialEq)]
struct Fruit {
    name: &'static str,
    color: Color,
}

impl AutocompleteOption for Fruit {
    fn label(&self) -> &str {
        self.name
    }
}

const ORANGE: Color = Color::Rgb(255, 140, 0);
const PURPLE: Color = Color::Magenta;

fn fruits() -> Vec<Fruit> {
    [
        ("apple", Color::Red),
        ("banana", Color::Yellow),
        ("cherry", Color::Red),
        ("fig", PURPLE),
        ("grape", PURPLE),
        ("kiwi", Color::Green),
        ("lemon", Color::Yellow),
        ("mango", ORANGE),
        ("nectarine", ORANGE),
        ("orange", ORANGE),
        ("papaya", ORANGE),
        ("pear", Color::Green),
        ("pineapple", Color::Yellow),
        ("plum", PURPLE),
        ("raspberry", Color::Red),
        ("strawberry", Color::Red),
        ("watermelon", Color::Green),
    ]
    .into_iter()
    .map(|(name, color)| Fruit { name, color })
    .collect()
}

fn fruit_row(fruit: &Fruit) -> Line<'static> {
    Line::from(vec![
        Span::styled("● ", Style::default().fg(fruit.color)),
        Span::raw(fruit.name),
    ])
}

struct App {
    plain: Autocomplete<Fruit>,
    debounced: Debounced<Fruit>,
    multi: Autocomplete<Fruit>,
    focused: usize,
    status: Arc<Mutex<String>>,
}

impl App {
    fn new() -> Self {
        let status = Arc::new(Mutex::new(
            "Type to search, Tab to move between fields".to_string(),
        ));

        let plain_status = Arc::clone(&status);
        let plain = Autocomplete::new("Favorite fruit")
            .with_options(fruits())
            .with_placeholder("Type to search...")
            .with_render_option(Arc::new(fruit_row))
            .on_change(Arc::new(move |selection: &Selection<Fruit>| {
                if let (Some(fruit), Ok(mut status)) =
                    (selection.as_single(), plain_status.lock())
                {
                    *status = format!("Favorite fruit: {}", fruit.name);
                }
            }));

        let search = Autocomplete::new("Debounced search")
            .with_options(fruits())
            .with_placeholder("Pauses before notifying...")
            .with_description("Settles 300 ms after the last keystroke");
        let search_handle = search.clone();
        let search_status = Arc::clone(&status);
        let debounced = Debounced::new(
            search,
            Arc::new(move |text: &str| {
                let matches = search_handle.filtered_count();
                log::info!("settled query {:?} with {} matches", text, matches);
                if let Ok(mut status) = search_status.lock() {
                    *status = format!("Searched {:?}: {} matches", text, matches);
                }
            }),
        );

        let multi_status = Arc::clone(&status);
        let multi = Autocomplete::multi("Fruit salad")
            .with_options(fruits())
            .with_placeholder("Add fruits...")
            .with_render_option(Arc::new(fruit_row))
            .on_change(Arc::new(move |selection: &Selection<Fruit>| {
                let names: Vec<&str> = selection.items().iter().map(|f| f.name).collect();
                if let Ok(mut status) = multi_status.lock() {
                    *status = if names.is_empty() {
                        "Fruit salad: (empty)".to_string()
                    } else {
                        format!("Fruit salad: {}", names.join(", "))
                    };
                }
            }));

        Self {
            plain,
            debounced,
            multi,
            focused: 0,
            status,
        }
    }

    fn is_dirty(&self) -> bool {
        self.plain.is_dirty() || self.debounced.widget().is_dirty() || self.multi.is_dirty()
    }

    fn close_field(&self, index: usize) {
        match index {
            0 => self.plain.close(),
            1 => self.debounced.widget().close(),
            _ => self.multi.close(),
        }
    }

    fn focus_field(&self, index: usize) {
        match index {
            0 => self.plain.focus(),
            1 => self.debounced.focus(),
            _ => self.multi.focus(),
        }
    }

    fn cycle_focus(&mut self, step: usize) {
        self.close_field(self.focused);
        self.focused = (self.focused + step) % 3;
        self.focus_field(self.focused);
    }

    /// Returns true when the app should quit.
    fn on_key(&mut self, key: &KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match key.code {
            KeyCode::Tab => self.cycle_focus(1),
            KeyCode::BackTab => self.cycle_focus(2),
            _ => {
                match self.focused {
                    0 => self.plain.handle_key(key),
                    1 => self.debounced.handle_key(key),
                    _ => self.multi.handle_key(key),
                };
            }
        }
        false
    }

    /// Every field sees the press so an open dropdown elsewhere dismisses.
    fn on_click(&mut self, x: u16, y: u16) {
        if self.plain.handle_click(x, y).is_handled() {
            self.focused = 0;
        } else if self.debounced.handle_click(x, y).is_handled() {
            self.focused = 1;
        } else if self.multi.handle_click(x, y).is_handled() {
            self.focused = 2;
        }
    }

    fn render_field(&self, frame: &mut Frame, index: usize, area: Rect) {
        let focused = self.focused == index;
        match index {
            0 => self.plain.render(frame, area, focused),
            1 => self.debounced.render(frame, area, focused),
            _ => self.multi.render(frame, area, focused),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

        frame.render_widget(
            Paragraph::new("fruit salad").style(Style::default().add_modifier(Modifier::BOLD)),
            chunks[0],
        );

        let fields = [chunks[2], chunks[3], chunks[4]];
        // The focused field renders last so its dropdown overlays the rest.
        for index in 0..3 {
            if index != self.focused {
                self.render_field(frame, index, fields[index]);
            }
        }
        self.render_field(frame, self.focused, fields[self.focused]);

        let status = self
            .status
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default();
        frame.render_widget(
            Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM)),
            chunks[6],
        );
    }
}

async fn run(session: &mut Session) -> Result<(), DemoError> {
    let mut app = App::new();
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(33));
    let mut needs_draw = true;

    loop {
        if needs_draw || app.is_dirty() {
            session.draw(|frame| app.draw(frame))?;
            needs_draw = false;
        }

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if app.on_key(&key) {
                            break;
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                            app.on_click(mouse.column, mouse.row);
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => {
                        needs_draw = true;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        log::error!("event stream error: {err}");
                    }
                    None => break,
                }
            }
            _ = tick.tick() => {}
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), DemoError> {
    let log_file = File::create("awning-demo.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let mut session = Session::start()?;
    let result = run(&mut session).await;
    drop(session);

    if let Err(err) = &result {
        eprintln!("Error: {err}");
    }
    result
}
