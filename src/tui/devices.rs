//! Terminal keyboard as an [`InputDevices`] source.
//!
//! Terminals report key presses, not held keys, so a key counts as pressed
//! from the event that reported it until the next [`TerminalDevices::clear`].

use std::collections::HashSet;

use crate::core::capture::InputDevices;
use crate::tui::event::TuiEvent;

#[derive(Debug)]
pub struct TerminalDevices {
    elements: Vec<String>,
    pressed: HashSet<String>,
}

impl Default for TerminalDevices {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDevices {
    pub fn new() -> Self {
        let mut elements: Vec<String> = ('A'..='Z').map(|c| c.to_string()).collect();
        elements.extend(('0'..='9').map(|d| format!("Alpha{d}")));
        elements.extend(
            ["Space", "Tab", "UpArrow", "DownArrow", "LeftArrow", "RightArrow"]
                .iter()
                .map(|s| s.to_string()),
        );
        elements.extend((1..=12).map(|n| format!("F{n}")));
        elements.extend(["Esc", "Return", "Backspace"].iter().map(|s| s.to_string()));
        Self {
            elements,
            pressed: HashSet::new(),
        }
    }

    pub fn record(&mut self, event: &TuiEvent) {
        if let Some(name) = event.element_name() {
            self.pressed.insert(name);
        }
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

impl InputDevices for TerminalDevices {
    fn keyboard_elements(&self) -> Vec<String> {
        self.elements.clone()
    }

    fn key_pressed(&self, element: &str) -> bool {
        self.pressed.contains(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binding::Binding;
    use crate::core::builder::KeybindOptions;
    use crate::core::capture::CaptureTick;
    use crate::core::hub::Hub;
    use crate::core::item::Bound;
    use crate::test_support::{owner, shared};

    #[test]
    fn test_recorded_keys_until_cleared() {
        let mut devices = TerminalDevices::new();
        devices.record(&TuiEvent::InputChar('j'));
        devices.record(&TuiEvent::Resize);
        assert!(devices.key_pressed("J"));
        devices.clear();
        assert!(!devices.key_pressed("J"));
    }

    #[test]
    fn test_terminal_keys_bind_through_hub() {
        let mut hub = Hub::default();
        let jump = shared(Binding::none());
        let cell = jump.clone();
        hub.register_page(&owner("demo"), "Controls", move |page| {
            page.keybind("Jump", Bound::from_cell(&cell), KeybindOptions::default())?;
            Ok(())
        })
        .unwrap();
        hub.open();
        hub.select(5, 0, 0);
        hub.select(5, 0, 0);
        assert!(hub.is_listening());

        let mut devices = TerminalDevices::new();
        devices.record(&TuiEvent::Submit);
        assert_eq!(hub.tick(&devices), CaptureTick::Waiting);
        devices.record(&TuiEvent::InputChar(' '));
        assert!(matches!(hub.tick(&devices), CaptureTick::Captured { changed: true, .. }));
        assert_eq!(*jump.borrow(), Binding::keyboard("Space"));
    }
}
