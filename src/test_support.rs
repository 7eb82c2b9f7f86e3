//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::core::capture::InputDevices;
use crate::core::page::Owner;

pub fn shared<T>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

pub fn owner(id: &str) -> Owner {
    Owner::new(id, id)
}

/// Scripted device state. Keys and buttons stay pressed until the mock is
/// rebuilt.
#[derive(Debug, Default, Clone)]
pub struct MockDevices {
    keys: Vec<String>,
    buttons: Vec<String>,
    pressed: HashSet<String>,
    axes: Vec<(String, String, String)>,
}

impl MockDevices {
    pub fn keyboard(keys: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_buttons(mut self, buttons: &[&str]) -> Self {
        self.buttons = buttons.iter().map(|b| b.to_string()).collect();
        self
    }

    pub fn press_key(mut self, key: &str) -> Self {
        self.pressed.insert(key.to_string());
        self
    }

    pub fn press_button(mut self, button: &str) -> Self {
        self.pressed.insert(button.to_string());
        self
    }

    /// Deflect the stick made of `x`/`y` so that `picked` is dominant.
    pub fn tilt(mut self, x: &str, y: &str, picked: &str) -> Self {
        self.axes.push((x.to_string(), y.to_string(), picked.to_string()));
        self
    }
}

impl InputDevices for MockDevices {
    fn keyboard_elements(&self) -> Vec<String> {
        self.keys.clone()
    }

    fn key_pressed(&self, element: &str) -> bool {
        self.keys.iter().any(|k| k == element) && self.pressed.contains(element)
    }

    fn controller_buttons(&self) -> Vec<String> {
        self.buttons.clone()
    }

    fn button_pressed(&self, element: &str) -> bool {
        self.buttons.iter().any(|b| b == element) && self.pressed.contains(element)
    }

    fn dominant_axis(&self, x_axis: &str, y_axis: &str) -> Option<String> {
        self.axes
            .iter()
            .find(|(x, y, _)| x == x_axis && y == y_axis)
            .map(|(_, _, picked)| picked.clone())
    }
}
