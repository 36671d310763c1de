use std::path::PathBuf;

use ::log::{debug, warn};
use ratatui::{
    crossterm::event::{
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    layout::{Position, Rect},
};
use smart_search::{Key, Notification, Record, SearchController, Size as SearchSize, Snapshot};
use tokio::sync::{mpsc, watch};

use crate::config::{AppConfig, load_records};
use crate::geometry::AppLayout;
use crate::log_capture::LogBuffer;
use crate::theme::Theme;
use crate::view_models::results::dropdown_size;
use crate::views::search::DropdownHitArea;

/// Events produced outside the main loop
#[derive(Debug)]
pub enum AppEvent {
    Terminal(Event),
    DataLoaded(anyhow::Result<Vec<Record>>),
}

#[derive(Debug)]
pub struct DebugConsole {
    pub logs: LogBuffer,
    pub is_open: bool,
    pub height_percent: u16,
}

pub struct App {
    pub controller: SearchController,
    pub snapshots: watch::Receiver<Snapshot>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
    pub theme: Theme,
    pub layout: Option<AppLayout>,
    /// Overlay size last reported to the controller
    pub overlay: Option<SearchSize>,
    /// Dropdown rows as drawn in the last frame
    pub dropdown: Option<DropdownHitArea>,
    /// Row under the pointer when the left button went down
    pub pressed_row: Option<usize>,
    pub debug_console: DebugConsole,
    pub data_file: Option<PathBuf>,
    pub status: String,
    pub tick: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        logs: LogBuffer,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let theme = Theme::from_token(config.search.theme_token());
        let (controller, notifications) = SearchController::new(config.search, Vec::new());
        let snapshots = controller.subscribe();

        let app = Self {
            controller,
            snapshots,
            event_tx,
            theme,
            layout: None,
            overlay: None,
            dropdown: None,
            pressed_row: None,
            debug_console: DebugConsole {
                logs,
                is_open: false,
                height_percent: 50,
            },
            data_file: config.data_file,
            status: String::new(),
            tick: 0,
            should_quit: false,
        };
        (app, notifications)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Report the screen geometry; the first call mounts the component
    pub fn sync_layout(&mut self, area: Rect) {
        let layout = AppLayout::new(area);
        match self.layout {
            None => {
                let overlay = dropdown_size(&self.snapshot(), layout.input.width);
                self.controller.mount(layout.anchor(), overlay, layout.viewport());
                self.overlay = Some(overlay);
            }
            Some(previous) if previous != layout => {
                self.controller.on_resize(layout.viewport(), layout.anchor());
            }
            Some(_) => {}
        }
        self.layout = Some(layout);
        self.sync_overlay();
    }

    /// The dropdown grows and shrinks with the result count
    pub fn sync_overlay(&mut self) {
        let Some(layout) = self.layout else {
            return;
        };
        let size = dropdown_size(&self.snapshot(), layout.input.width);
        if self.overlay != Some(size) {
            self.overlay = Some(size);
            self.controller.on_overlay_resized(size);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Terminal(Event::Key(key)) => self.handle_key(key),
            AppEvent::Terminal(Event::Mouse(mouse)) => self.handle_mouse(mouse),
            AppEvent::Terminal(Event::Resize(width, height)) => {
                self.sync_layout(Rect::new(0, 0, width, height));
            }
            AppEvent::Terminal(_) => {}
            AppEvent::DataLoaded(Ok(records)) => {
                self.status = format!("Loaded {} records", records.len());
                self.controller.on_collection_replaced(records);
                self.controller.set_loading(false);
            }
            AppEvent::DataLoaded(Err(err)) => {
                warn!("Loading data failed: {:#}", err);
                self.status = format!("Loading failed: {}", err);
                self.controller.set_loading(false);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('u') if ctrl => self.controller.on_clear(),
            KeyCode::F(12) => self.debug_console.is_open = !self.debug_console.is_open,
            KeyCode::F(5) => self.reload_data(),
            KeyCode::F(2) => {
                let disabled = !self.snapshot().disabled;
                self.controller.set_disabled(disabled);
            }
            KeyCode::Tab => {
                if self.snapshot().focused {
                    self.controller.on_blur();
                } else {
                    self.controller.on_focus();
                }
            }
            KeyCode::Up => {
                self.controller.on_key(Key::ArrowUp);
            }
            KeyCode::Down => {
                self.controller.on_key(Key::ArrowDown);
            }
            KeyCode::Enter => {
                self.controller.on_key(Key::Enter);
            }
            KeyCode::Esc => {
                // Open dropdown first, then focus, then the app itself
                if !self.controller.on_key(Key::Escape) {
                    if self.snapshot().focused {
                        self.controller.on_blur();
                    } else {
                        self.should_quit = true;
                    }
                }
            }
            KeyCode::Char(c) if !ctrl => {
                let snapshot = self.snapshot();
                if !snapshot.focused {
                    self.controller.on_focus();
                }
                let mut query = snapshot.query;
                query.push(c);
                self.controller.on_input(query);
            }
            KeyCode::Backspace => {
                let mut query = self.snapshot().query;
                if query.pop().is_some() {
                    self.controller.on_input(query);
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(layout) = self.layout else {
            return;
        };
        let row_under_pointer = self
            .dropdown
            .and_then(|dropdown| dropdown.row_at(mouse.column, mouse.row));

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = row_under_pointer {
                    self.pressed_row = Some(index);
                    self.controller.on_result_pointer_down();
                } else if is_clear_marker(layout.input, mouse.column, mouse.row)
                    && self.snapshot().clearable
                {
                    self.controller.on_clear();
                } else if layout.input.contains(Position::new(mouse.column, mouse.row)) {
                    self.controller.on_focus();
                } else {
                    self.pressed_row = None;
                    self.controller.on_blur();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(pressed) = self.pressed_row.take() else {
                    return;
                };
                if row_under_pointer != Some(pressed) {
                    debug!("Pointer released away from row {}", pressed);
                    self.controller.on_result_pointer_cancel();
                    return;
                }
                if let Some(record) = self.snapshot().results.get(pressed).cloned() {
                    self.controller.on_result_activate(record);
                }
            }
            _ => {}
        }
    }

    pub fn handle_notification(&mut self, notification: Notification) {
        self.status = serde_json::to_string(&notification)
            .unwrap_or_else(|err| format!("unprintable notification: {}", err));
    }

    /// Read the data file in the background; the input shows a spinner meanwhile
    pub fn reload_data(&mut self) {
        let Some(path) = self.data_file.clone() else {
            self.status = "No data file configured".to_string();
            return;
        };

        self.controller.set_loading(true);
        self.status = format!("Loading {}", path.display());
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = load_records(&path).await;
            let _ = tx.send(AppEvent::DataLoaded(result));
        });
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}

/// The `×` drawn at the right end of the input's top border
fn is_clear_marker(input: Rect, column: u16, row: u16) -> bool {
    row == input.y
        && column.saturating_add(4) >= input.right()
        && column < input.right().saturating_sub(1)
}
