//! # Input Bindings
//!
//! A [`Binding`] names one physical input: a device class plus an element
//! name on that device. The text form is `"<Device>:<Element>"`, or
//! `"None"` when unbound:
//!
//! ```text
//! "Keyboard:Space"     -> Binding { device: Keyboard, element: "Space" }
//! "joystick:LeftStickX" -> Binding { device: Joystick, element: "LeftStickX" }
//! "None", "", "  "     -> Binding::none()
//! ```
//!
//! Element names compare case-insensitively.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Element names that mean "nothing bound" when they show up in a binding.
const PLACEHOLDER_ELEMENTS: &[&str] = &["None", "Undefined", "Count"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceKind {
    #[default]
    None,
    Keyboard,
    Mouse,
    Joystick,
}

impl DeviceKind {
    /// Bracketed tag shown before a bound value. Empty for [`DeviceKind::None`].
    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::None => "",
            DeviceKind::Keyboard => "Keyboard",
            DeviceKind::Mouse => "Mouse",
            DeviceKind::Joystick => "Controller",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::None => "None",
            DeviceKind::Keyboard => "Keyboard",
            DeviceKind::Mouse => "Mouse",
            DeviceKind::Joystick => "Joystick",
        };
        f.write_str(name)
    }
}

impl FromStr for DeviceKind {
    type Err = BindingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(DeviceKind::None),
            "keyboard" => Ok(DeviceKind::Keyboard),
            "mouse" => Ok(DeviceKind::Mouse),
            "joystick" | "controller" => Ok(DeviceKind::Joystick),
            _ => Err(BindingParseError::UnknownDevice(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingParseError {
    /// No `:` between device and element.
    MissingSeparator(String),
    UnknownDevice(String),
    EmptyElement(String),
}

impl fmt::Display for BindingParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingParseError::MissingSeparator(raw) => {
                write!(f, "expected '<Device>:<Element>', got '{raw}'")
            }
            BindingParseError::UnknownDevice(device) => write!(f, "unknown input device '{device}'"),
            BindingParseError::EmptyElement(raw) => write!(f, "binding '{raw}' has no element"),
        }
    }
}

impl std::error::Error for BindingParseError {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Binding {
    device: DeviceKind,
    element: String,
}

impl Binding {
    pub fn new(device: DeviceKind, element: impl Into<String>) -> Self {
        Self {
            device,
            element: element.into(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn keyboard(element: impl Into<String>) -> Self {
        Self::new(DeviceKind::Keyboard, element)
    }

    pub fn mouse(element: impl Into<String>) -> Self {
        Self::new(DeviceKind::Mouse, element)
    }

    pub fn joystick(element: impl Into<String>) -> Self {
        Self::new(DeviceKind::Joystick, element)
    }

    pub fn device(&self) -> DeviceKind {
        self.device
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn is_empty(&self) -> bool {
        self.device == DeviceKind::None || self.element.trim().is_empty()
    }

    /// Parse, treating anything malformed as unbound.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// Human-readable element name, e.g. `LeftShift` -> `Left Shift`,
    /// `page_up` -> `page up`. Unbound and placeholder elements render
    /// as `unbound_label`.
    pub fn pretty(&self, unbound_label: &str) -> String {
        if self.is_empty() {
            return unbound_label.to_string();
        }
        let element = self.element.trim();
        if PLACEHOLDER_ELEMENTS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(element))
        {
            return unbound_label.to_string();
        }
        prettify(element)
    }
}

fn prettify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev: Option<char> = None;
    for c in raw.chars() {
        if c == '_' {
            out.push(' ');
        } else {
            if c.is_uppercase() && prev.is_some_and(char::is_lowercase) {
                out.push(' ');
            }
            out.push(c);
        }
        prev = Some(c);
    }
    out.trim().to_string()
}

/// All unbound values are equal, whatever device or blank element they carry.
impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => true,
            (false, false) => {
                self.device == other.device && self.element.eq_ignore_ascii_case(&other.element)
            }
            _ => false,
        }
    }
}

impl Eq for Binding {}

impl Hash for Binding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_empty() {
            DeviceKind::None.hash(state);
            return;
        }
        self.device.hash(state);
        self.element.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("None")
        } else {
            write!(f, "{}:{}", self.device, self.element)
        }
    }
}

impl FromStr for Binding {
    type Err = BindingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("none") {
            return Ok(Binding::none());
        }
        let (device, element) = text
            .split_once(':')
            .ok_or_else(|| BindingParseError::MissingSeparator(text.to_string()))?;
        let device: DeviceKind = device.parse()?;
        let element = element.trim();
        if element.is_empty() {
            return Err(BindingParseError::EmptyElement(text.to_string()));
        }
        Ok(Binding::new(device, element))
    }
}

impl TryFrom<String> for Binding {
    type Error = BindingParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Binding> for String {
    fn from(binding: Binding) -> Self {
        binding.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_unbound_values_are_equal() {
        let blank = Binding::new(DeviceKind::Keyboard, "");
        let spaces = Binding::new(DeviceKind::Mouse, "  ");
        assert_eq!(blank, Binding::none());
        assert_eq!(spaces, blank);
        assert_ne!(blank, Binding::keyboard("Space"));

        let set: HashSet<Binding> = [blank, spaces, Binding::none()].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_parse_valid_bindings() {
        assert_eq!("Keyboard:Space".parse::<Binding>().unwrap(), Binding::keyboard("Space"));
        assert_eq!(
            " joystick : LeftStickX ".parse::<Binding>().unwrap(),
            Binding::joystick("LeftStickX")
        );
        assert!("None".parse::<Binding>().unwrap().is_empty());
        assert!("".parse::<Binding>().unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "Space".parse::<Binding>(),
            Err(BindingParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "Wheel:Up".parse::<Binding>(),
            Err(BindingParseError::UnknownDevice(_))
        ));
        assert!(matches!(
            "Keyboard:  ".parse::<Binding>(),
            Err(BindingParseError::EmptyElement(_))
        ));
        assert!(Binding::parse_lenient("garbage").is_empty());
    }

    #[test]
    fn test_display_round_trips_text_form() {
        assert_eq!(Binding::mouse("Left").to_string(), "Mouse:Left");
        assert_eq!(Binding::none().to_string(), "None");
        assert_eq!(Binding::new(DeviceKind::Keyboard, "").to_string(), "None");
    }

    #[test]
    fn test_element_comparison_ignores_case() {
        assert_eq!(Binding::keyboard("space"), Binding::keyboard("SPACE"));
        assert_ne!(Binding::keyboard("Space"), Binding::joystick("Space"));
    }

    #[test]
    fn test_pretty_names() {
        assert_eq!(Binding::keyboard("LeftShift").pretty("Not set"), "Left Shift");
        assert_eq!(Binding::keyboard("page_up").pretty("Not set"), "page up");
        assert_eq!(Binding::keyboard("F12").pretty("Not set"), "F12");
        assert_eq!(Binding::keyboard("undefined").pretty("Not set"), "Not set");
        assert_eq!(Binding::none().pretty("Not set"), "Not set");
    }

    #[test]
    fn test_serde_uses_text_form() {
        let json = serde_json::to_string(&Binding::joystick("ButtonDown")).unwrap();
        assert_eq!(json, "\"Joystick:ButtonDown\"");
        let back: Binding = serde_json::from_str("\"keyboard:E\"").unwrap();
        assert_eq!(back, Binding::keyboard("E"));
        assert!(serde_json::from_str::<Binding>("\"bogus\"").is_err());
    }

    #[test]
    fn test_device_labels() {
        assert_eq!(DeviceKind::Joystick.label(), "Controller");
        assert_eq!(DeviceKind::None.label(), "");
        assert_eq!("Controller".parse::<DeviceKind>().unwrap(), DeviceKind::Joystick);
    }
}
