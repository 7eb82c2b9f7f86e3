//! # Hub Overlay Component
//!
//! Centered overlay drawing the current [`HubFrame`]. Opened with F2.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `HubOverlayState` lives in `TuiState`
//! - `HubOverlay` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::navigation::HubFrame;
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

/// Rows the overlay adds around the hub rows: borders.
pub const OVERLAY_CHROME_HEIGHT: u16 = 2;

/// Persistent state for the hub overlay.
pub struct HubOverlayState {
    /// Highlighted display row.
    pub cursor: usize,
    /// Display slots used for the last frame.
    pub capacity: usize,
    pub list_state: ListState,
}

impl HubOverlayState {
    pub fn new(capacity: usize) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            cursor: 0,
            capacity,
            list_state,
        }
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.move_cursor(self.cursor);
    }

    pub fn reset_cursor(&mut self) {
        self.move_cursor(0);
    }

    fn move_cursor(&mut self, row: usize) {
        self.cursor = row.min(self.capacity.saturating_sub(1));
        self.list_state.select(Some(self.cursor));
    }
}

/// Events emitted by the hub overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubOverlayEvent {
    /// Activate display row `row`; `direction` 0 selects, ±1 adjusts.
    Select { row: usize, direction: i32 },
    /// Same as selecting the `BACK` row.
    Back,
}

impl EventHandler for HubOverlayState {
    type Event = HubOverlayEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<HubOverlayEvent> {
        if self.capacity == 0 {
            return None;
        }
        let row = self.cursor;
        match event {
            TuiEvent::CursorUp => {
                self.move_cursor(row.saturating_sub(1));
                None
            }
            TuiEvent::CursorDown => {
                self.move_cursor(row + 1);
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') => Some(HubOverlayEvent::Select { row, direction: 0 }),
            TuiEvent::CursorLeft => Some(HubOverlayEvent::Select { row, direction: -1 }),
            TuiEvent::CursorRight => Some(HubOverlayEvent::Select { row, direction: 1 }),
            TuiEvent::Escape | TuiEvent::Backspace => Some(HubOverlayEvent::Back),
            _ => None,
        }
    }
}

/// Transient render wrapper for the hub overlay.
pub struct HubOverlay<'a> {
    state: &'a mut HubOverlayState,
    frame: &'a HubFrame,
}

impl<'a> HubOverlay<'a> {
    pub fn new(state: &'a mut HubOverlayState, frame: &'a HubFrame) -> Self {
        Self { state, frame }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let height = (self.frame.rows.len() as u16).saturating_add(OVERLAY_CHROME_HEIGHT);
        let overlay = centered_rect(60, height, area);

        frame.render_widget(Clear, overlay);

        let help_text = match &self.frame.listening {
            Some(label) => format!(" Press a key for {label} "),
            None => " Enter Select  ←/→ Adjust  Esc Back ".to_string(),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.frame.title))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        let inner_width = overlay.width.saturating_sub(4) as usize; // borders + padding
        let items: Vec<ListItem> = self
            .frame
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let is_nav = (Some(i) == self.frame.next_row && self.frame.has_next) || i == self.frame.back_row;
                let style = if i == self.state.cursor {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if is_nav {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let mut text = truncate_str(row, inner_width);
                text.push_str(&" ".repeat(inner_width.saturating_sub(text.width())));
                ListItem::new(Line::from(Span::styled(text, style)))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Truncate a string to fit within `max_width` columns, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let budget = max_width - 3;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// A rect `percent_x` wide and `height` rows tall, centered in `outer`.
fn centered_rect(percent_x: u16, height: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(outer.height)),
        Constraint::Fill(1),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
