//! Viewer state and event loop.

use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use futures::StreamExt;
use log::{debug, error, info, trace};
use scrollspy::{Page, ScrollSource, TrackerConfig, ViewportTracker};

use crate::config::AppConfig;
use crate::document::Document;
use crate::error::AppError;
use crate::loader::{Loaded, Loader};
use crate::terminal::TerminalGuard;
use crate::view;

/// How often skeleton placeholders pulse.
const PULSE_INTERVAL: Duration = Duration::from_millis(400);

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    page: Page,
    tracker: ViewportTracker<Page>,
    document: Document,
    loader: Loader,
    width: u16,
    frame: usize,
}

impl App {
    /// Lay out the document, observe every section and request the ones
    /// already on screen.
    pub fn new(config: &AppConfig, loader: Loader, width: u16, height: u16) -> Self {
        let document = Document::numbered(config.sections);
        let page = Page::new(width as u32, body_height(height) as u32);
        document.sync_page(&page, width);

        let tracker_config = TrackerConfig::new().with_threshold(config.threshold);
        let mut tracker = ViewportTracker::with_config(page.clone(), tracker_config);
        for section in document.sections() {
            tracker.observe(&section.id);
        }

        let mut app = Self {
            page,
            tracker,
            document,
            loader,
            width,
            frame: 0,
        };
        app.request_visible();
        app
    }

    pub fn handle_event(&mut self, event: Event) -> Flow {
        match event {
            Event::Key(key) => return self.handle_key(key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => self.scroll_by(WHEEL_STEP),
                MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_STEP),
                _ => {}
            },
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
        Flow::Continue
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind != KeyEventKind::Press {
            trace!("Ignoring non-press key event");
            return Flow::Continue;
        }

        let step = self.page.viewport().height as i64;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit;
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(step),
            KeyCode::PageUp => self.scroll_by(-step),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_to(0),
            KeyCode::End | KeyCode::Char('G') => self.scroll_to(self.page.max_scroll()),
            _ => {}
        }
        Flow::Continue
    }

    fn scroll_by(&mut self, delta: i64) {
        self.page.scroll_by(delta);
        self.request_visible();
    }

    fn scroll_to(&mut self, y: u32) {
        self.page.scroll_to(y);
        self.request_visible();
    }

    fn resize(&mut self, width: u16, height: u16) {
        debug!("Resize to {}x{}", width, height);
        self.width = width;
        self.page.resize(width as u32, body_height(height) as u32);
        self.document.sync_page(&self.page, width);
        self.request_visible();
    }

    /// Swap a section's skeleton for its content.
    pub fn apply_loaded(&mut self, loaded: Loaded) {
        if !self.document.set_loaded(&loaded.id, loaded.lines) {
            return;
        }
        debug!("Section '{}' loaded", loaded.id);
        self.document.sync_page(&self.page, self.width);
        self.request_visible();
    }

    /// Advance the pulse animation. Returns true if anything on screen pulses.
    pub fn tick(&mut self) -> bool {
        self.frame = self.frame.wrapping_add(1);
        self.document.sections().iter().any(|section| !section.is_loaded())
    }

    /// Whether tracked scroll or visibility state changed since the last call.
    pub fn take_changed(&self) -> bool {
        self.tracker.take_changed()
    }

    pub fn rows(&self) -> Vec<String> {
        view::compose(
            &self.document,
            self.page.viewport(),
            &self.tracker.visibility_map(),
            self.frame,
        )
    }

    pub fn status(&self) -> String {
        view::status_line(
            self.tracker.scroll_offset(),
            self.page.max_scroll(),
            &self.tracker.visibility_map(),
            self.document.loading_count(),
            self.width,
        )
    }

    /// Start loading every visible section that has not been requested.
    fn request_visible(&mut self) {
        let wanted: Vec<(String, usize)> = self
            .document
            .sections()
            .iter()
            .enumerate()
            .filter(|(_, section)| self.tracker.visibility(&section.id).is_visible())
            .map(|(index, section)| (section.id.clone(), index))
            .collect();

        for (id, index) in wanted {
            if self.document.mark_loading(&id) {
                self.loader.request(&id, index);
            }
        }
    }
}

/// Rows left for the document once the status line is drawn.
fn body_height(height: u16) -> u16 {
    height.saturating_sub(1)
}

pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let mut terminal = TerminalGuard::new()?;
    let (width, height) = terminal.size()?;

    let (loader, mut loaded_rx) = Loader::channel(config.load_delay);
    let mut app = App::new(&config, loader, width, height);
    info!(
        "Viewer ready: {} sections, {}x{}, offset {}",
        config.sections,
        width,
        height,
        app.page.scroll_offset()
    );

    let mut events = EventStream::new();
    let mut pulse = tokio::time::interval(PULSE_INTERVAL);
    terminal.draw(&app.rows(), &app.status())?;

    loop {
        let redraw = tokio::select! {
            Some(event) = events.next() => match event {
                Ok(event) => {
                    trace!("Terminal event: {:?}", event);
                    if app.handle_event(event) == Flow::Quit {
                        info!("Quit requested");
                        break;
                    }
                    true
                }
                Err(e) => {
                    error!("Event stream error: {}", e);
                    return Err(e.into());
                }
            },
            Some(loaded) = loaded_rx.recv() => {
                app.apply_loaded(loaded);
                true
            }
            _ = pulse.tick() => app.tick(),
        };

        if app.take_changed() || redraw {
            terminal.draw(&app.rows(), &app.status())?;
        }
    }

    Ok(())
}
