//! # StatusBar Component
//!
//! Top status bar showing hub state and the last notification.
//!
//! Purely presentational: it receives all data as props and has no internal
//! state. The text changes based on state:
//!
//! 1. **Capturing**: `"Modhub (7 pages) | Bound Jump | Listening: Jump"`
//! 2. **Status message**: `"Modhub (7 pages) | Bound Jump"`
//! 3. **Default**: `"Modhub (7 pages)"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub struct StatusBar {
    pub page_count: usize,
    pub status_message: String,
    /// Label of the row waiting for an input.
    pub listening: Option<String>,
}

impl StatusBar {
    pub fn new(page_count: usize, status_message: String, listening: Option<String>) -> Self {
        Self {
            page_count,
            status_message,
            listening,
        }
    }

    fn text(&self) -> String {
        let pages = if self.page_count == 1 { "page" } else { "pages" };
        let mut text = format!("Modhub ({} {})", self.page_count, pages);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if let Some(label) = &self.listening {
            text.push_str(" | Listening: ");
            text.push_str(label);
        }
        text
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}
