//! # Hub
//!
//! The one object a host talks to. It owns the page registry, the capture
//! slot and the navigation state, so there is no process-wide state and
//! [`Hub::reset`] gives a clean slate.
//!
//! ```text
//!   host startup ──register_page──▶ ┌──────────────────────────┐
//!                                   │           Hub            │
//!   host frame ────render(cap)────▶ │ PageRegistry             │──▶ HubFrame
//!   host input ────select(..)─────▶ │ NavigationController     │──▶ NavOutcome
//!   host tick ─────tick(devices)──▶ │ CaptureSlot              │──▶ CaptureTick
//!                                   └──────────────────────────┘
//! ```

use log::{error, info};

use crate::core::builder::{PageBuilder, RowDefaults};
use crate::core::capture::{CaptureSlot, CaptureTick, InputDevices};
use crate::core::entries::{ConfigEntry, EntryFilter, PercentPolicy};
use crate::core::error::BuildError;
use crate::core::navigation::{HubFrame, NavOutcome, NavigationController, View};
use crate::core::page::{Owner, Page};
use crate::core::registry::{DEFAULT_OWNER_LABEL_LEN, PageRegistry};

#[derive(Debug, Clone, PartialEq)]
pub struct HubSettings {
    pub rows: RowDefaults,
    pub owner_label_len: usize,
    pub percent_policy: PercentPolicy,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            rows: RowDefaults::default(),
            owner_label_len: DEFAULT_OWNER_LABEL_LEN,
            percent_policy: PercentPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub struct Hub {
    registry: PageRegistry,
    capture: CaptureSlot,
    nav: NavigationController,
    settings: HubSettings,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(HubSettings::default())
    }
}

impl Hub {
    pub fn new(settings: HubSettings) -> Self {
        Self {
            registry: PageRegistry::new(settings.owner_label_len),
            capture: CaptureSlot::new(),
            nav: NavigationController::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &HubSettings {
        &self.settings
    }

    // ── Registration ────────────────────────────────────────────────────

    /// Build a page with `configure` and register it, replacing an earlier
    /// page with the same owner and name. If `configure` fails nothing is
    /// registered.
    pub fn register_page<F>(&mut self, owner: &Owner, name: &str, configure: F) -> Result<usize, BuildError>
    where
        F: FnOnce(&mut PageBuilder) -> Result<(), BuildError>,
    {
        let mut builder = self.builder(owner, name)?;
        self.finish(&mut builder, configure)?;
        Ok(self.registry.add_or_replace(builder.into_page()))
    }

    /// Like [`register_page`](Self::register_page), with rows generated from
    /// `entries` ahead of whatever `configure` adds.
    pub fn register_page_from_entries<F>(
        &mut self,
        owner: &Owner,
        name: &str,
        entries: Vec<ConfigEntry>,
        filter: &EntryFilter,
        configure: F,
    ) -> Result<usize, BuildError>
    where
        F: FnOnce(&mut PageBuilder) -> Result<(), BuildError>,
    {
        let mut builder = self.builder(owner, name)?;
        let added = builder.entries(entries, filter, &self.settings.percent_policy);
        info!("Generated {} rows for settings page '{}'", added, builder.page_name());
        self.finish(&mut builder, configure)?;
        Ok(self.registry.add_or_replace(builder.into_page()))
    }

    fn builder(&self, owner: &Owner, name: &str) -> Result<PageBuilder, BuildError> {
        let page = Page::new(owner.clone(), name)?;
        Ok(PageBuilder::new(page, self.capture.clone(), self.settings.rows.clone()))
    }

    fn finish<F>(&self, builder: &mut PageBuilder, configure: F) -> Result<(), BuildError>
    where
        F: FnOnce(&mut PageBuilder) -> Result<(), BuildError>,
    {
        configure(builder).inspect_err(|e| {
            error!("Exception while configuring settings page '{}': {}", builder.page_name(), e);
        })
    }

    pub fn pages(&self) -> &[Page] {
        self.registry.pages()
    }

    pub fn display_title(&self, index: usize) -> Option<String> {
        self.registry.display_title(index)
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub fn open(&mut self) {
        self.nav.open();
    }

    pub fn close(&mut self) {
        self.capture.cancel();
        self.nav.close();
    }

    pub fn is_open(&self) -> bool {
        self.nav.is_open()
    }

    pub fn view(&self) -> View {
        self.nav.view()
    }

    /// The current screen for `capacity` display slots, or `None` when the
    /// hub is closed (or just closed itself because no pages remain).
    pub fn render(&mut self, capacity: usize) -> Option<HubFrame> {
        let frame = self.nav.render(capacity, &self.registry, &self.capture);
        if frame.is_none() && !self.nav.is_open() {
            self.capture.cancel();
        }
        frame
    }

    pub fn select(&mut self, capacity: usize, row: usize, direction: i32) -> NavOutcome {
        self.nav.select(capacity, row, direction, &self.registry, &self.capture)
    }

    // ── Capture ─────────────────────────────────────────────────────────

    pub fn tick(&self, devices: &dyn InputDevices) -> CaptureTick {
        self.capture.tick(devices)
    }

    pub fn is_listening(&self) -> bool {
        self.capture.is_listening()
    }

    pub fn cancel_capture(&self) {
        self.capture.cancel();
    }

    /// Forget every page and close the hub.
    pub fn reset(&mut self) {
        self.close();
        self.registry.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::{IntOptions, ToggleOptions};
    use crate::core::entries::EntryKind;
    use crate::core::item::Bound;
    use crate::test_support::{owner, shared};

    #[test]
    fn test_register_and_replace() {
        let mut hub = Hub::default();
        let lives = shared(1_i64);
        let cell = lives.clone();
        let first = hub
            .register_page(&owner("mod.a"), "Gameplay", |page| {
                page.int("Lives", Bound::from_cell(&cell), IntOptions::range(0, 5))?;
                Ok(())
            })
            .unwrap();
        hub.register_page(&owner("mod.a"), "Audio", |_| Ok(())).unwrap();
        let again = hub
            .register_page(&owner("MOD.A"), "gameplay ", |page| {
                page.int("Lives", Bound::from_cell(&lives), IntOptions::range(0, 9))?;
                page.int("Continues", Bound::from_cell(&lives), IntOptions::range(0, 9))?;
                Ok(())
            })
            .unwrap();

        assert_eq!(first, again);
        assert_eq!(hub.pages().len(), 2);
        assert_eq!(hub.pages()[0].len(), 2);
    }

    #[test]
    fn test_failed_configure_registers_nothing() {
        let mut hub = Hub::default();
        let result = hub.register_page(&owner("mod.a"), "Broken", |page| {
            page.toggle("Ok", Bound::from_cell(&shared(true)), ToggleOptions::default())?;
            page.int("Bad", Bound::from_cell(&shared(0_i64)), IntOptions::range(9, 1))?;
            Ok(())
        });
        assert!(matches!(result, Err(BuildError::InvertedBounds { .. })));
        assert!(hub.pages().is_empty());
    }

    #[test]
    fn test_blank_page_name_rejected() {
        let mut hub = Hub::default();
        assert_eq!(
            hub.register_page(&owner("mod.a"), "  ", |_| Ok(())),
            Err(BuildError::EmptyPageName)
        );
    }

    #[test]
    fn test_entries_then_configure() {
        let mut hub = Hub::default();
        hub.register_page_from_entries(
            &owner("mod.a"),
            "Config",
            vec![ConfigEntry::new(
                "General",
                "Enabled",
                EntryKind::Bool(Bound::from_cell(&shared(false))),
            )],
            &EntryFilter::default(),
            |page| {
                page.toggle("Extra", Bound::from_cell(&shared(true)), ToggleOptions::default())?;
                Ok(())
            },
        )
        .unwrap();

        hub.open();
        hub.select(5, 0, 0);
        let frame = hub.render(5).unwrap();
        assert_eq!(frame.rows[0], "Enabled: Off");
        assert_eq!(frame.rows[1], "Extra: On");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut hub = Hub::default();
        hub.register_page(&owner("mod.a"), "One", |_| Ok(())).unwrap();
        hub.open();
        hub.reset();
        assert!(!hub.is_open());
        assert!(hub.pages().is_empty());
        assert_eq!(hub.render(5), None);
    }

    #[test]
    fn test_render_closed_hub_is_none() {
        let mut hub = Hub::default();
        hub.register_page(&owner("mod.a"), "One", |_| Ok(())).unwrap();
        assert_eq!(hub.render(5), None);
        hub.open();
        assert_eq!(hub.view(), View::Index);
        assert!(hub.render(5).is_some());
        hub.close();
        assert_eq!(hub.render(5), None);
    }
}
