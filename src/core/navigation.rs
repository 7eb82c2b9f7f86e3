//! # Navigation
//!
//! Projects any number of pages and rows onto a fixed number of display
//! slots. The last slot is always `BACK`; the one above it is `NEXT` when
//! more entries remain past the current window:
//!
//! ```text
//!  capacity = 5, 7 pages         after NEXT
//!  ┌──────────────────┐          ┌──────────────────┐
//!  │ 0  Audio         │          │ 0  Keys          │
//!  │ 1  Video         │          │ 1  Mods          │
//!  │ 2  Gameplay      │          │ 2  Misc          │
//!  │ 3  NEXT          │          │ 3  NEXT          │
//!  │ 4  BACK          │          │ 4  BACK          │
//!  └──────────────────┘          └──────────────────┘
//! ```
//!
//! View transitions:
//!
//! ```text
//!  Closed ──open()──▶ Index ──select listed row──▶ Page(i)
//!    ▲                  │  ▲                          │
//!    └──────BACK────────┘  └──────────BACK────────────┘
//! ```

use log::{debug, error};
use serde::Serialize;

use crate::core::capture::CaptureSlot;
use crate::core::error::{HandlerResult, guarded, guarded_value};
use crate::core::item::{Item, MISSING_LABEL};
use crate::core::page::Page;
use crate::core::registry::PageRegistry;

pub const INDEX_TITLE: &str = "MOD SETTINGS";
pub const NEXT_LABEL: &str = "NEXT";
pub const BACK_LABEL: &str = "BACK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "view", content = "page", rename_all = "lowercase")]
pub enum View {
    #[default]
    Closed,
    Index,
    Page(usize),
}

/// Slot assignment for a given capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubLayout {
    pub capacity: usize,
    pub list_slots: usize,
    pub next_row: Option<usize>,
    pub back_row: usize,
    /// How far `NEXT` moves the window.
    pub step: usize,
}

impl HubLayout {
    /// `None` when there is nowhere to draw.
    pub fn new(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let list_slots = capacity.saturating_sub(2);
        Some(Self {
            capacity,
            list_slots,
            next_row: capacity.checked_sub(2),
            back_row: capacity - 1,
            step: list_slots.max(1),
        })
    }

    /// Exclusive end of the window starting at `start`.
    pub fn window_end(&self, start: usize, total: usize) -> usize {
        (start + self.list_slots).min(total)
    }
}

/// One rendered screen: a title and exactly `capacity` rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubFrame {
    pub title: String,
    pub view: View,
    pub rows: Vec<String>,
    pub next_row: Option<usize>,
    pub back_row: usize,
    /// Whether the `NEXT` row is live.
    pub has_next: bool,
    /// Label of the row waiting for an input, if any.
    pub listening: Option<String>,
}

/// What a `select` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Closed hub, empty slot, or a row outside the layout.
    Ignored,
    OpenedPage(usize),
    /// The window moved to a new offset.
    Paged(usize),
    ReturnedToIndex,
    Closed,
    /// A row handler ran. `false` when it failed and was logged.
    Invoked(bool),
}

impl NavOutcome {
    pub fn changed_view(&self) -> bool {
        !matches!(self, NavOutcome::Ignored)
    }
}

#[derive(Debug, Clone, Copy)]
enum Handler {
    Select,
    Adjust(i32),
}

impl Handler {
    fn name(&self) -> &'static str {
        match self {
            Handler::Select => "on_select",
            Handler::Adjust(_) => "on_adjust",
        }
    }
}

#[derive(Debug, Default)]
pub struct NavigationController {
    view: View,
    hub_offset: usize,
    item_offset: usize,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_open(&self) -> bool {
        self.view != View::Closed
    }

    pub fn hub_offset(&self) -> usize {
        self.hub_offset
    }

    pub fn item_offset(&self) -> usize {
        self.item_offset
    }

    pub fn open(&mut self) {
        debug!("Hub opened");
        self.view = View::Index;
        self.hub_offset = 0;
        self.item_offset = 0;
    }

    pub fn close(&mut self) {
        if self.is_open() {
            debug!("Hub closed");
        }
        self.view = View::Closed;
        self.hub_offset = 0;
        self.item_offset = 0;
    }

    /// Drop back to a valid view and window if the registry changed
    /// underneath us. Offsets stay on a `NEXT` boundary.
    fn settle(&mut self, layout: &HubLayout, registry: &PageRegistry) {
        if !self.is_open() {
            return;
        }
        if registry.is_empty() {
            debug!("No pages registered, closing hub");
            self.close();
            return;
        }
        self.hub_offset = settle_offset(self.hub_offset, registry.len(), layout.step);
        if let View::Page(index) = self.view {
            match registry.get(index) {
                Some(page) => {
                    let settled = settle_offset(self.item_offset, page.len(), layout.step);
                    if settled != self.item_offset {
                        debug!(
                            "Page {} shrank to {} rows, moving window {} -> {}",
                            index,
                            page.len(),
                            self.item_offset,
                            settled
                        );
                        self.item_offset = settled;
                    }
                }
                None => {
                    debug!("Active page {} no longer exists, returning to index", index);
                    self.view = View::Index;
                    self.item_offset = 0;
                }
            }
        }
    }

    pub fn render(&mut self, capacity: usize, registry: &PageRegistry, capture: &CaptureSlot) -> Option<HubFrame> {
        let layout = HubLayout::new(capacity)?;
        self.settle(&layout, registry);

        let (title, total, label_of): (String, usize, Box<dyn Fn(usize) -> String + '_>) = match self.view {
            View::Closed => return None,
            View::Index => (
                INDEX_TITLE.to_string(),
                registry.len(),
                Box::new(|i: usize| registry.display_title(i).unwrap_or_default()),
            ),
            View::Page(index) => {
                let page = registry.get(index)?;
                (
                    registry.display_title(index).unwrap_or_default(),
                    page.len(),
                    Box::new(move |i: usize| row_label(page, i)),
                )
            }
        };
        let start = match self.view {
            View::Page(_) => self.item_offset,
            _ => self.hub_offset,
        };

        let end = layout.window_end(start, total);
        let mut rows = vec![String::new(); layout.capacity];
        for (slot, index) in (start..end).enumerate() {
            rows[slot] = label_of(index);
        }
        let has_next = end < total;
        if let Some(next) = layout.next_row {
            rows[next] = if has_next { NEXT_LABEL.to_string() } else { String::new() };
        }
        rows[layout.back_row] = BACK_LABEL.to_string();

        Some(HubFrame {
            title,
            view: self.view,
            rows,
            next_row: layout.next_row,
            back_row: layout.back_row,
            has_next,
            listening: capture.active_label(),
        })
    }

    /// Route a selection on display row `row`. `direction` 0 selects a
    /// listed item; nonzero adjusts it.
    pub fn select(
        &mut self,
        capacity: usize,
        row: usize,
        direction: i32,
        registry: &PageRegistry,
        capture: &CaptureSlot,
    ) -> NavOutcome {
        let Some(layout) = HubLayout::new(capacity) else {
            return NavOutcome::Ignored;
        };
        self.settle(&layout, registry);

        match self.view {
            View::Closed => NavOutcome::Ignored,
            View::Index => self.select_in_index(&layout, row, registry, capture),
            View::Page(index) => match registry.get(index) {
                Some(page) => self.select_in_page(&layout, row, direction, page, capture),
                None => NavOutcome::Ignored,
            },
        }
    }

    fn select_in_index(
        &mut self,
        layout: &HubLayout,
        row: usize,
        registry: &PageRegistry,
        capture: &CaptureSlot,
    ) -> NavOutcome {
        let total = registry.len();
        let start = self.hub_offset;
        let end = layout.window_end(start, total);

        if row < layout.list_slots {
            let index = start + row;
            if index >= end {
                return NavOutcome::Ignored;
            }
            debug!("Opening page {}", index);
            self.view = View::Page(index);
            self.item_offset = 0;
            return NavOutcome::OpenedPage(index);
        }

        if Some(row) == layout.next_row && end < total {
            self.hub_offset = clamp_offset(self.hub_offset + layout.step, total);
            return NavOutcome::Paged(self.hub_offset);
        }

        if row == layout.back_row {
            capture.cancel();
            self.close();
            return NavOutcome::Closed;
        }

        NavOutcome::Ignored
    }

    fn select_in_page(
        &mut self,
        layout: &HubLayout,
        row: usize,
        direction: i32,
        page: &Page,
        capture: &CaptureSlot,
    ) -> NavOutcome {
        let total = page.len();
        let start = self.item_offset;
        let end = layout.window_end(start, total);

        if row < layout.list_slots {
            let index = start + row;
            let Some(item) = page.item(index).filter(|_| index < end) else {
                return NavOutcome::Ignored;
            };
            let handler = if direction != 0 {
                Handler::Adjust(direction)
            } else {
                Handler::Select
            };
            return NavOutcome::Invoked(invoke(page, index, item, handler));
        }

        if Some(row) == layout.next_row && end < total {
            self.item_offset = clamp_offset(self.item_offset + layout.step, total);
            return NavOutcome::Paged(self.item_offset);
        }

        if row == layout.back_row {
            capture.cancel();
            self.view = View::Index;
            self.item_offset = 0;
            return NavOutcome::ReturnedToIndex;
        }

        NavOutcome::Ignored
    }
}

fn clamp_offset(requested: usize, total: usize) -> usize {
    requested.min(total.saturating_sub(1))
}

/// Clamp, then pull back to the start of the window that holds it.
fn settle_offset(current: usize, total: usize, step: usize) -> usize {
    let clamped = clamp_offset(current, total);
    clamped - clamped % step.max(1)
}

fn row_label(page: &Page, index: usize) -> String {
    let Some(item) = page.item(index) else {
        return String::new();
    };
    match guarded_value(|| item.label()) {
        Ok(label) => label,
        Err(e) => {
            error!(
                "Exception during label for page '{}' item index {}: {}",
                page.name(),
                index,
                e
            );
            MISSING_LABEL.to_string()
        }
    }
}

fn invoke(page: &Page, index: usize, item: &Item, handler: Handler) -> bool {
    let result: HandlerResult = guarded(|| match handler {
        Handler::Select => item.select(),
        Handler::Adjust(direction) => item.adjust(direction),
    });
    match result {
        Ok(()) => true,
        Err(e) => {
            error!(
                "Exception during {} for page '{}' item index {}: {}",
                handler.name(),
                page.name(),
                index,
                e
            );
            false
        }
    }
}
