use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::warn;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    ForceQuit, // Ctrl+C
    ToggleHub, // F2
    Escape,
    Submit,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    InputChar(char),
    Tab,
    Backspace,
    FunctionKey(u8),
    Resize,
}

impl TuiEvent {
    /// Keyboard element name used by binding capture, if the key has one.
    pub fn element_name(&self) -> Option<String> {
        let name = match self {
            TuiEvent::Escape => "Esc".to_string(),
            TuiEvent::Submit => "Return".to_string(),
            TuiEvent::CursorUp => "UpArrow".to_string(),
            TuiEvent::CursorDown => "DownArrow".to_string(),
            TuiEvent::CursorLeft => "LeftArrow".to_string(),
            TuiEvent::CursorRight => "RightArrow".to_string(),
            TuiEvent::Tab => "Tab".to_string(),
            TuiEvent::Backspace => "Backspace".to_string(),
            TuiEvent::FunctionKey(n) => format!("F{n}"),
            TuiEvent::ToggleHub => "F2".to_string(),
            TuiEvent::InputChar(' ') => "Space".to_string(),
            TuiEvent::InputChar(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase().to_string(),
            TuiEvent::InputChar(c) if c.is_ascii_digit() => format!("Alpha{c}"),
            _ => return None,
        };
        Some(name)
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    let ready = event::poll(timeout)
        .inspect_err(|e| warn!("Event poll failed: {}", e))
        .ok()?;
    if !ready {
        return None;
    }
    let read = event::read()
        .inspect_err(|e| warn!("Event read failed: {}", e))
        .ok()?;
    match read {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (_, KeyCode::F(2)) => Some(TuiEvent::ToggleHub),
                (_, KeyCode::F(n)) => Some(TuiEvent::FunctionKey(n)),
                (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
                (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
                (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
                (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
                (_, KeyCode::Tab) => Some(TuiEvent::Tab),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                _ => None,
            }
        }
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}
