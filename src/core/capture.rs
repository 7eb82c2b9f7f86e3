//! # Input Capture
//!
//! The single "press the input you want to bind" slot.
//!
//! ```text
//!            claim(request)              tick: nothing pressed
//!   Idle ───────────────────▶ Listening ◀──────────────────────┐
//!    ▲                          │  │                           │
//!    │   cancel() / new claim   │  └───────────────────────────┘
//!    └──────────────────────────┤
//!    ▲                          │ tick: first allowed input found
//!    └──── apply + release ◀────┘
//! ```
//!
//! Claiming while another row listens replaces that row; there is no
//! stacking. Devices are polled keyboard first, then controller buttons,
//! then stick axes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{error, info};

use crate::core::binding::Binding;
use crate::core::error::guarded_value;
use crate::core::item::{Bound, Formatter, OnChanged};
use crate::core::value::update_if_changed;

/// Keys reserved for menu navigation; never captured.
pub const BANNED_KEYS: &[&str] = &[
    "Esc",
    "Backspace",
    "Return",
    "Enter",
    "LeftWindows",
    "RightWindows",
    "LeftCommand",
    "RightCommand",
];

/// Controller buttons reserved for menu navigation; never captured.
pub const BANNED_BUTTONS: &[&str] = &["Select", "Start", "Home"];

/// Stick axis pairs probed for a dominant direction, in order.
pub const STICK_AXES: [(&str, &str); 2] = [("LeftStickX", "LeftStickY"), ("RightStickX", "RightStickY")];

pub const DEFAULT_LISTENING_LABEL: &str = "Listening...";
pub const DEFAULT_UNBOUND_LABEL: &str = "Not set";

/// Physical input state, polled once per tick while a capture is active.
pub trait InputDevices {
    /// Keyboard element names in a stable enumeration order.
    fn keyboard_elements(&self) -> Vec<String>;

    fn key_pressed(&self, element: &str) -> bool;

    /// Controller buttons and triggers in a stable enumeration order.
    fn controller_buttons(&self) -> Vec<String> {
        Vec::new()
    }

    fn button_pressed(&self, _element: &str) -> bool {
        false
    }

    /// Whichever of the two axes is deflected past the device's threshold,
    /// if either is.
    fn dominant_axis(&self, _x_axis: &str, _y_axis: &str) -> Option<String> {
        None
    }
}

/// Device classes a capture row accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedDevices {
    pub keyboard: bool,
    pub buttons: bool,
    pub axes: bool,
}

impl Default for AllowedDevices {
    fn default() -> Self {
        Self {
            keyboard: true,
            buttons: true,
            axes: true,
        }
    }
}

/// Placeholder text used by binding rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureLabels {
    pub listening: String,
    pub unbound: String,
}

impl Default for CaptureLabels {
    fn default() -> Self {
        Self {
            listening: DEFAULT_LISTENING_LABEL.to_string(),
            unbound: DEFAULT_UNBOUND_LABEL.to_string(),
        }
    }
}

/// Everything a binding row hands the slot when it starts listening.
pub struct CaptureRequest {
    pub label: String,
    pub value: Bound<Binding>,
    pub allowed: AllowedDevices,
    pub formatter: Option<Formatter<Binding>>,
    pub on_changed: Option<OnChanged<Binding>>,
    pub labels: CaptureLabels,
}

impl CaptureRequest {
    /// Row text when this request is not the one listening.
    pub fn idle_label(&self) -> String {
        let binding = self.value.get();
        let mut value = match &self.formatter {
            Some(format) => format(&binding),
            None => binding.pretty(&self.labels.unbound),
        };
        if value.trim().is_empty() {
            value = self.labels.unbound.clone();
        }

        let device = binding.device().label();
        if !device.is_empty() && !binding.is_empty() {
            format!("{}: [{}] {}", self.label, device, value)
        } else {
            format!("{}: {}", self.label, value)
        }
    }

    pub fn listening_label(&self) -> String {
        format!("{}: {}", self.label, self.labels.listening)
    }

    fn poll(&self, devices: &dyn InputDevices) -> Option<Binding> {
        if self.allowed.keyboard {
            let hit = devices
                .keyboard_elements()
                .into_iter()
                .filter(|key| !is_banned(BANNED_KEYS, key))
                .find(|key| devices.key_pressed(key));
            if let Some(key) = hit {
                info!("Capture: keyboard {} for '{}'", key, self.label);
                return Some(Binding::keyboard(key));
            }
        }

        if self.allowed.buttons {
            let hit = devices
                .controller_buttons()
                .into_iter()
                .filter(|button| !is_banned(BANNED_BUTTONS, button))
                .find(|button| devices.button_pressed(button));
            if let Some(button) = hit {
                info!("Capture: controller {} for '{}'", button, self.label);
                return Some(Binding::joystick(button));
            }
        }

        if self.allowed.axes {
            for (x, y) in STICK_AXES {
                if let Some(axis) = devices.dominant_axis(x, y) {
                    info!("Capture: axis {} for '{}'", axis, self.label);
                    return Some(Binding::joystick(axis));
                }
            }
        }

        None
    }

    fn apply(&self, binding: Binding) -> bool {
        let notify = self.on_changed.as_deref();
        update_if_changed(&self.value, binding, notify)
    }
}

impl fmt::Debug for CaptureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureRequest")
            .field("label", &self.label)
            .field("allowed", &self.allowed)
            .finish_non_exhaustive()
    }
}

fn is_banned(banned: &[&str], element: &str) -> bool {
    banned.iter().any(|b| b.eq_ignore_ascii_case(element))
}

/// Result of one capture tick, so hosts know when to redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureTick {
    /// Nobody is listening.
    Idle,
    /// Listening, nothing allowed was pressed.
    Waiting,
    /// An input was captured and the slot released.
    Captured { binding: Binding, changed: bool },
    /// Applying the captured input failed; the slot was released anyway.
    Failed,
}

impl CaptureTick {
    pub fn needs_redraw(&self) -> bool {
        matches!(self, CaptureTick::Captured { .. } | CaptureTick::Failed)
    }
}

/// Shared handle to the one active capture request. Clones point at the
/// same slot.
#[derive(Clone, Default)]
pub struct CaptureSlot {
    active: Rc<RefCell<Option<Rc<CaptureRequest>>>>,
}

impl CaptureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening for `request`, replacing whoever listened before.
    pub fn claim(&self, request: &Rc<CaptureRequest>) {
        let previous = self.active.borrow_mut().replace(Rc::clone(request));
        if let Some(previous) = previous
            && !Rc::ptr_eq(&previous, request)
        {
            info!("Capture: '{}' replaced '{}'", request.label, previous.label);
        }
        info!("Capture: listening started for '{}'", request.label);
    }

    pub fn cancel(&self) {
        if let Some(request) = self.active.borrow_mut().take() {
            info!("Capture: listening cancelled for '{}'", request.label);
        }
    }

    pub fn is_listening(&self) -> bool {
        self.active.borrow().is_some()
    }

    pub fn is_owned_by(&self, request: &Rc<CaptureRequest>) -> bool {
        self.active
            .borrow()
            .as_ref()
            .is_some_and(|active| Rc::ptr_eq(active, request))
    }

    pub fn active_label(&self) -> Option<String> {
        self.active.borrow().as_ref().map(|r| r.label.clone())
    }

    /// Row text for `request`, depending on whether it owns the slot.
    pub fn row_label(&self, request: &Rc<CaptureRequest>) -> String {
        if self.is_owned_by(request) {
            request.listening_label()
        } else {
            request.idle_label()
        }
    }

    /// Poll `devices` for the active request. On a hit the binding is
    /// applied and the slot released.
    pub fn tick(&self, devices: &dyn InputDevices) -> CaptureTick {
        // Callbacks below may claim or cancel; never hold the borrow across them.
        let Some(request) = self.active.borrow().clone() else {
            return CaptureTick::Idle;
        };
        let Some(binding) = request.poll(devices) else {
            return CaptureTick::Waiting;
        };

        let outcome = guarded_value(|| request.apply(binding.clone()));
        self.release(&request);

        match outcome {
            Ok(changed) => CaptureTick::Captured { binding, changed },
            Err(e) => {
                error!("Failed to apply binding for '{}': {}", request.label, e);
                CaptureTick::Failed
            }
        }
    }

    /// Clear the slot only if `request` still owns it; a callback may have
    /// handed it to another row.
    fn release(&self, request: &Rc<CaptureRequest>) {
        let mut active = self.active.borrow_mut();
        if active.as_ref().is_some_and(|a| Rc::ptr_eq(a, request)) {
            *active = None;
        }
    }
}

impl fmt::Debug for CaptureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSlot")
            .field("active", &self.active_label())
            .finish()
    }
}
