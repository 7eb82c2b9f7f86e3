//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, draws the hub overlay
//! and translates keyboard events into `Hub::select` calls.
//!
//! This is the only module that knows about ratatui and crossterm. A game
//! host would replace it with its own renderer and input polling.
//!
//! ## Redraw Strategy
//!
//! - **Listening** (a binding row waits for a key): polls every ~50ms so
//!   the capture tick sees keys promptly.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.

mod component;
mod components;
pub mod demo;
mod devices;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;

use crate::core::capture::CaptureTick;
use crate::core::config::ResolvedConfig;
use crate::core::hub::Hub;
use crate::core::navigation::NavOutcome;
use crate::tui::component::EventHandler;
use crate::tui::components::{HubOverlayEvent, HubOverlayState};
use crate::tui::demo::DemoSettings;
use crate::tui::devices::TerminalDevices;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of the hub)
pub struct TuiState {
    pub overlay: HubOverlayState,
    /// Slots requested by config; the drawn capacity may be smaller.
    pub preferred_capacity: usize,
    pub status_message: String,
}

impl TuiState {
    pub fn new(preferred_capacity: usize) -> Self {
        Self {
            overlay: HubOverlayState::new(preferred_capacity),
            preferred_capacity,
            status_message: String::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), Hide)?;
        info!("Terminal modes enabled (hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

/// What the loop should do after an event.
enum Flow {
    Continue,
    Quit,
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let demo = DemoSettings::default();
    let mut hub = demo::demo_hub(config.hub.clone(), &demo)
        .map_err(|e| std::io::Error::other(format!("failed to register demo pages: {e}")))?;
    let mut tui = TuiState::new(config.capacity);
    let mut devices = TerminalDevices::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true; // Force first frame
    let result = loop {
        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &mut hub, &mut tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let timeout = if hub.is_listening() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Flow::Quit = handle_event(&event, &mut hub, &mut tui, &mut devices) {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break Ok(());
        }

        if hub.is_listening() {
            let tick = hub.tick(&devices);
            if let CaptureTick::Captured { binding, changed } = &tick {
                tui.status_message = if *changed {
                    format!("Bound {}", binding.pretty("None"))
                } else {
                    format!("Kept {}", binding.pretty("None"))
                };
            }
            if tick.needs_redraw() {
                needs_redraw = true;
            }
        }
        devices.clear();
    };

    ratatui::restore();
    info!("Modhub shutting down");
    result
}

fn handle_event(event: &TuiEvent, hub: &mut Hub, tui: &mut TuiState, devices: &mut TerminalDevices) -> Flow {
    match event {
        // Resize just needs a redraw (already flagged by the caller)
        TuiEvent::Resize => return Flow::Continue,
        TuiEvent::ForceQuit => return Flow::Quit,
        _ => {}
    }

    if hub.is_listening() {
        devices.record(event);
        if matches!(event, TuiEvent::Escape) {
            hub.cancel_capture();
            tui.status_message = "Binding cancelled".to_string();
        }
        return Flow::Continue;
    }

    if matches!(event, TuiEvent::ToggleHub) {
        if hub.is_open() {
            hub.close();
        } else {
            hub.open();
            tui.overlay.reset_cursor();
        }
        return Flow::Continue;
    }

    if !hub.is_open() {
        return match event {
            TuiEvent::InputChar('q') | TuiEvent::Escape => Flow::Quit,
            _ => Flow::Continue,
        };
    }

    let Some(overlay_event) = tui.overlay.handle_event(event) else {
        return Flow::Continue;
    };
    let capacity = tui.overlay.capacity;
    let (row, direction) = match overlay_event {
        HubOverlayEvent::Select { row, direction } => (row, direction),
        HubOverlayEvent::Back => (capacity.saturating_sub(1), 0),
    };

    let outcome = hub.select(capacity, row, direction);
    debug!("Row {} ({:+}) -> {:?}", row, direction, outcome);
    match outcome {
        NavOutcome::Invoked(false) => {
            tui.status_message = "Setting failed, see modhub.log".to_string();
        }
        NavOutcome::Invoked(true) | NavOutcome::Ignored => {}
        NavOutcome::OpenedPage(_) | NavOutcome::Paged(_) | NavOutcome::ReturnedToIndex | NavOutcome::Closed => {
            tui.overlay.reset_cursor();
        }
    }
    Flow::Continue
}
