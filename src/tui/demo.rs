//! # Demo Host
//!
//! A stand-in for a game: owns some settings and registers pages for them
//! from three pretend mods. Shared by the interactive TUI and `--snapshot`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::info;

use crate::core::binding::Binding;
use crate::core::builder::{
    CycleOptions, FractionOptions, IntOptions, KeybindOptions, MultiplierChoices,
    MultiplierOptions, PercentOptions, ToggleOptions,
};
use crate::core::entries::{ConfigEntry, EntryFilter, EntryKind};
use crate::core::error::BuildError;
use crate::core::hub::{Hub, HubSettings};
use crate::core::item::{Bound, Item};
use crate::core::page::Owner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Story,
    Normal,
    Hard,
    Nightmare,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Story => "Story",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Nightmare => "Nightmare",
        };
        f.write_str(name)
    }
}

/// Settings the demo "game" owns. The hub only ever sees them through
/// [`Bound`] accessors.
pub struct DemoSettings {
    pub master_volume: Rc<RefCell<i64>>,
    pub music_volume: Rc<RefCell<i64>>,
    pub muted: Rc<RefCell<bool>>,
    pub resolution: Rc<RefCell<String>>,
    pub brightness: Rc<RefCell<f64>>,
    pub gamma: Rc<RefCell<f64>>,
    pub difficulty: Rc<RefCell<Difficulty>>,
    pub lives: Rc<RefCell<i64>>,
    pub damage: Rc<RefCell<f64>>,
    pub loot: Rc<RefCell<f64>>,
    pub hardcore: Rc<RefCell<bool>>,
    pub jump: Rc<RefCell<Binding>>,
    pub interact: Rc<RefCell<String>>,
    pub map_key: Rc<RefCell<Binding>>,
    pub subtitles: Rc<RefCell<bool>>,
    pub text_scale: Rc<RefCell<f64>>,
    pub hud_opacity: Rc<RefCell<f64>>,
    pub spawn_rate: Rc<RefCell<i64>>,
    pub weather: Rc<RefCell<usize>>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            master_volume: shared(80),
            music_volume: shared(55),
            muted: shared(false),
            resolution: shared("1920x1080".to_string()),
            brightness: shared(1.0),
            gamma: shared(0.5),
            difficulty: shared(Difficulty::Normal),
            lives: shared(3),
            damage: shared(1.0),
            loot: shared(1.0),
            hardcore: shared(false),
            jump: shared(Binding::keyboard("Space")),
            interact: shared("Keyboard:E".to_string()),
            map_key: shared(Binding::none()),
            subtitles: shared(true),
            text_scale: shared(1.0),
            hud_opacity: shared(0.8),
            spawn_rate: shared(10),
            weather: shared(0),
        }
    }
}

fn shared<T>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

pub const RESOLUTIONS: [&str; 4] = ["1280x720", "1600x900", "1920x1080", "2560x1440"];
pub const WEATHER: [&str; 4] = ["Clear", "Rain", "Storm", "Snow"];

/// Register every demo page on `hub`.
pub fn register_demo_pages(hub: &mut Hub, settings: &DemoSettings) -> Result<(), BuildError> {
    let core = Owner::new("demo.core", "Core");
    let extras = Owner::new("demo.extras", "Extras Pack");
    let tweaks = Owner::new("demo.tweaks", "Tweaks");

    hub.register_page(&core, "Audio", |page| {
        page.percent(
            "Master volume",
            Bound::from_cell(&settings.master_volume),
            PercentOptions {
                on_changed: Some(Rc::new(|v: &i64| info!("Master volume set to {}", v))),
                ..PercentOptions::default()
            },
        )?
        .percent(
            "Music volume",
            Bound::from_cell(&settings.music_volume),
            PercentOptions::default(),
        )?
        .on_off("Mute", Bound::from_cell(&settings.muted), ToggleOptions::default())?;
        Ok(())
    })?;

    hub.register_page(&core, "Video", |page| {
        page.cycle(
            "Resolution",
            Bound::from_cell(&settings.resolution),
            RESOLUTIONS.iter().map(|r| r.to_string()).collect(),
            CycleOptions::default().eq(|a: &String, b: &String| a.eq_ignore_ascii_case(b)),
        )?
        .multiplier(
            "Brightness",
            Bound::from_cell(&settings.brightness),
            MultiplierOptions::new(0.5, 2.0, 0.1),
        )?
        .percent_fraction(
            "Gamma",
            Bound::from_cell(&settings.gamma),
            FractionOptions::range(0.0, 1.0, 0.05).scale(100.0),
        )?;
        Ok(())
    })?;

    hub.register_page(&core, "Gameplay", |page| {
        page.cycle(
            "Difficulty",
            Bound::from_cell(&settings.difficulty),
            vec![
                Difficulty::Story,
                Difficulty::Normal,
                Difficulty::Hard,
                Difficulty::Nightmare,
            ],
            CycleOptions::default(),
        )?
        .int("Lives", Bound::from_cell(&settings.lives), IntOptions::range(1, 9).wrap())?;
        Ok(())
    })?;

    hub.register_page(&extras, "Gameplay", |page| {
        page.multiplier_options(
            "Damage",
            Bound::from_cell(&settings.damage),
            MultiplierChoices::default(),
        )?
        .multiplier_options(
            "Loot",
            Bound::from_cell(&settings.loot),
            MultiplierChoices {
                options: vec![0.25, 0.5, 1.0, 1.5, 2.0],
                ..MultiplierChoices::default()
            },
        )?
        .toggle(
            "Hardcore",
            Bound::from_cell(&settings.hardcore),
            ToggleOptions::default().labels("Yes", "No"),
        )?;
        Ok(())
    })?;

    hub.register_page(&core, "Controls", |page| {
        page.keybind("Jump", Bound::from_cell(&settings.jump), KeybindOptions::default())?
            .keybind_text(
                "Interact",
                Bound::from_cell(&settings.interact),
                KeybindOptions::default(),
            )?
            .keybind("Map", Bound::from_cell(&settings.map_key), KeybindOptions::default())?;
        Ok(())
    })?;

    hub.register_page(&core, "Accessibility", |page| {
        let subtitles = settings.subtitles.clone();
        page.toggle("Subtitles", Bound::from_cell(&settings.subtitles), ToggleOptions::default())?
            .multiplier(
                "Text scale",
                Bound::from_cell(&settings.text_scale),
                MultiplierOptions::new(0.75, 2.0, 0.25),
            )?
            .item(
                Item::new(|| "Reset subtitles".to_string()).on_select(move || {
                    *subtitles.borrow_mut() = true;
                    Ok(())
                }),
            );
        Ok(())
    })?;

    let entries = vec![
        ConfigEntry::new(
            "HUD",
            "Opacity",
            EntryKind::Float {
                value: Bound::from_cell(&settings.hud_opacity),
                min: Some(0.0),
                max: Some(1.0),
            },
        ),
        ConfigEntry::new(
            "World",
            "SpawnRate",
            EntryKind::Int {
                value: Bound::from_cell(&settings.spawn_rate),
                min: Some(0),
                max: Some(50),
            },
        ),
        ConfigEntry::new(
            "World",
            "Weather",
            EntryKind::Enum {
                value: Bound::from_cell(&settings.weather),
                names: WEATHER.iter().map(|w| w.to_string()).collect(),
            },
        ),
        ConfigEntry::new(
            "Internal",
            "ConfigVersion",
            EntryKind::Int {
                value: Bound::new(|| 3, |_| {}),
                min: None,
                max: None,
            },
        ),
    ];
    hub.register_page_from_entries(
        &tweaks,
        "Tweaks",
        entries,
        &EntryFilter::default().ignore_sections(&["internal"]),
        |_| Ok(()),
    )?;

    Ok(())
}

/// A fresh hub with the demo pages registered.
pub fn demo_hub(settings: HubSettings, demo: &DemoSettings) -> Result<Hub, BuildError> {
    let mut hub = Hub::new(settings);
    register_demo_pages(&mut hub, demo)?;
    info!("Registered {} demo pages", hub.pages().len());
    Ok(hub)
}
