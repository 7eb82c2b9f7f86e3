//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `StatusBar`: Top status bar showing page count, status and capture state
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `HubOverlay`: The settings hub itself, with a row cursor
//!
//! ### Co-location of Concerns
//!
//! Each component file contains its state types, event types, rendering
//! logic, event handling and tests.
//!
//! ### Props-Based Data Flow
//!
//! Components receive external data as "props", not by reaching into the
//! hub. The overlay draws a `HubFrame`; it never calls `Hub::render` itself.
//!
//! ```rust,ignore
//! // Good: Dependencies are explicit
//! HubOverlay::new(&mut tui.overlay, &hub_frame).render(frame, area);
//!
//! // Bad: Hidden dependency on the hub
//! HubOverlay::new(&mut tui.overlay).render(frame, area); // reads from Hub
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── status_bar.rs    (Top status bar)
//! └── hub_overlay.rs   (Settings hub overlay)
//! ```

pub mod hub_overlay;
mod status_bar;

pub use hub_overlay::{HubOverlay, HubOverlayEvent, HubOverlayState};
pub use status_bar::StatusBar;
