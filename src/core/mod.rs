//! # Core Application Logic
//!
//! This module contains the settings hub itself.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Hub (registry, nav)  │
//!                    │  • PageBuilder (rows)   │
//!                    │  • CaptureSlot (input)  │
//!                    │                         │
//!                    │  No UI. Hosts drive it. │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Snapshot  │      │   Game     │
//!     │  Adapter   │      │   (JSON)   │      │   host     │
//!     │ (ratatui)  │      │            │      │  (future)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`hub`]: The `Hub` facade hosts talk to
//! - [`builder`]: Fluent row construction for one page
//! - [`navigation`]: Index/page views, paging and row dispatch
//! - [`capture`]: Single-slot key binding capture
//! - [`value`]: Steppers, fixed-point helpers and value formatting
//! - [`entries`]: Rows generated from declarative config entries
//! - [`config`]: `~/.modhub/config.toml` loading and resolution

pub mod binding;
pub mod builder;
pub mod capture;
pub mod config;
pub mod entries;
pub mod error;
pub mod hub;
pub mod item;
pub mod navigation;
pub mod page;
pub mod registry;
pub mod value;

// Re-export commonly used types for convenience
pub use binding::{Binding, DeviceKind};
pub use builder::PageBuilder;
pub use capture::InputDevices;
pub use error::BuildError;
pub use hub::{Hub, HubSettings};
pub use item::{Bound, Item};
pub use navigation::{HubFrame, NavOutcome, View};
pub use page::Owner;
