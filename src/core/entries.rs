//! # Pages From Config Entries
//!
//! Builds rows straight from a list of typed configuration entries, so a
//! caller that already keeps its settings in a config store can surface
//! them without wiring each row by hand.
//!
//! | [`EntryKind`] | Row |
//! |---|---|
//! | `Bool` | toggle |
//! | `Int` | integer stepper, step 1 |
//! | `Float` | fractional percent, step and precision derived from the range |
//! | `Choice` | cycle over the allowed strings (skipped when there are none) |
//! | `Enum` | cycle over variant indices, shown by name |
//! | `Binding` | keybind row |

use std::collections::HashSet;

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::core::binding::Binding;
use crate::core::builder::{
    CycleOptions, FractionOptions, IntOptions, KeybindOptions, PageBuilder, ToggleOptions,
};
use crate::core::error::{BuildError, guarded_value};
use crate::core::item::Bound;
use crate::core::value::round_to_nearest_significant_five;

/// Float range assumed when an entry declares none.
pub const DEFAULT_FLOAT_RANGE: (f64, f64) = (0.0, 100.0);

const MAX_DERIVED_DECIMAL_PLACES: f64 = 4.0;

pub enum EntryKind {
    Bool(Bound<bool>),
    Int {
        value: Bound<i64>,
        min: Option<i64>,
        max: Option<i64>,
    },
    Float {
        value: Bound<f64>,
        min: Option<f64>,
        max: Option<f64>,
    },
    Choice {
        value: Bound<String>,
        options: Vec<String>,
    },
    Enum {
        value: Bound<usize>,
        names: Vec<String>,
    },
    Binding(Bound<Binding>),
}

impl EntryKind {
    fn name(&self) -> &'static str {
        match self {
            EntryKind::Bool(_) => "bool",
            EntryKind::Int { .. } => "int",
            EntryKind::Float { .. } => "float",
            EntryKind::Choice { .. } => "choice",
            EntryKind::Enum { .. } => "enum",
            EntryKind::Binding(_) => "binding",
        }
    }
}

/// One `section.key` setting and how to edit it.
pub struct ConfigEntry {
    pub section: String,
    pub key: String,
    pub kind: EntryKind,
}

impl ConfigEntry {
    pub fn new(section: impl Into<String>, key: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            section: section.into(),
            key: key.into(),
            kind,
        }
    }
}

/// Keys and sections to leave off the page. Matching ignores case.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    ignored_keys: HashSet<String>,
    ignored_sections: HashSet<String>,
}

impl EntryFilter {
    pub fn ignore_keys<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
        self.ignored_keys
            .extend(keys.iter().map(|k| k.as_ref().to_lowercase()));
        self
    }

    pub fn ignore_sections<S: AsRef<str>>(mut self, sections: &[S]) -> Self {
        self.ignored_sections
            .extend(sections.iter().map(|s| s.as_ref().to_lowercase()));
        self
    }

    pub fn accepts(&self, entry: &ConfigEntry) -> bool {
        !self.ignored_keys.contains(&entry.key.to_lowercase())
            && !self.ignored_sections.contains(&entry.section.to_lowercase())
    }
}

/// When a float range is shown as a percentage: `min_floor <= min < min_below`
/// and `max_above < max <= max_at_most`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentPolicy {
    pub min_floor: f64,
    pub min_below: f64,
    pub max_above: f64,
    pub max_at_most: f64,
}

impl Default for PercentPolicy {
    fn default() -> Self {
        Self {
            min_floor: 0.0,
            min_below: 0.5,
            max_above: 0.5,
            max_at_most: 5.0,
        }
    }
}

impl PercentPolicy {
    pub fn qualifies(&self, min: f64, max: f64) -> bool {
        (self.min_floor..self.min_below).contains(&min) && max > self.max_above && max <= self.max_at_most
    }
}

/// Step, precision and display scale derived from a float range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatDisplay {
    pub step: f64,
    pub decimal_places: u32,
    pub is_percent: bool,
    pub scale: f64,
}

/// One hundredth of the range, rounded to a "nice" step.
pub fn derive_float_display(min: f64, max: f64, policy: &PercentPolicy) -> Result<FloatDisplay, BuildError> {
    if max < min {
        return Err(BuildError::InvertedBounds {
            label: "float range".to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    let is_percent = policy.qualifies(min, max);
    let step = round_to_nearest_significant_five((max - min) / 100.0);
    let places = (1.0 / step).log10().round();
    let decimal_places = if places.is_finite() {
        places.clamp(0.0, MAX_DERIVED_DECIMAL_PLACES) as u32
    } else {
        MAX_DERIVED_DECIMAL_PLACES as u32
    };
    Ok(FloatDisplay {
        step,
        decimal_places,
        is_percent,
        scale: if is_percent { 100.0 } else { 1.0 },
    })
}

impl PageBuilder {
    /// Add a row per accepted entry. Entries that fail to build are logged
    /// and skipped. Returns how many rows were added.
    pub fn entries(&mut self, entries: Vec<ConfigEntry>, filter: &EntryFilter, policy: &PercentPolicy) -> usize {
        let before = self.len();
        for entry in entries {
            if !filter.accepts(&entry) {
                debug!("Skipping ignored config entry '{}.{}'", entry.section, entry.key);
                continue;
            }
            let section = entry.section.clone();
            let key = entry.key.clone();
            let kind = entry.kind.name();

            let outcome = guarded_value(|| self.entry(entry, policy));
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(e) => Some(e.to_string()),
            };
            if let Some(reason) = failure {
                error!(
                    "Exception while adding {} config entry '{}.{}' to settings page '{}': {}",
                    kind,
                    section,
                    key,
                    self.page_name(),
                    reason
                );
            }
        }
        self.len() - before
    }

    fn entry(&mut self, entry: ConfigEntry, policy: &PercentPolicy) -> Result<(), BuildError> {
        let label = entry.key.as_str();
        match entry.kind {
            EntryKind::Bool(value) => {
                self.on_off(label, value, ToggleOptions::default())?;
            }
            EntryKind::Int { value, min, max } => {
                let options = IntOptions {
                    min,
                    max,
                    ..IntOptions::default()
                };
                self.int(label, value, options)?;
            }
            EntryKind::Float { value, min, max } => {
                let min = min.unwrap_or(DEFAULT_FLOAT_RANGE.0);
                let max = max.unwrap_or(DEFAULT_FLOAT_RANGE.1);
                let display = derive_float_display(min, max, policy)?;
                let options = FractionOptions {
                    decimal_places: display.decimal_places,
                    show_percent: display.is_percent,
                    scale: display.scale,
                    ..FractionOptions::range(min, max, display.step)
                };
                self.percent_fraction(label, value, options)?;
            }
            EntryKind::Choice { value, options } => {
                if options.is_empty() {
                    debug!("Config entry '{}' has no allowed values, skipping", label);
                    return Ok(());
                }
                self.cycle(label, value, options, CycleOptions::default())?;
            }
            EntryKind::Enum { value, names } => {
                let indices: Vec<usize> = (0..names.len()).collect();
                let options = CycleOptions::default().formatter(move |i: &usize| {
                    names.get(*i).cloned().unwrap_or_else(|| i.to_string())
                });
                self.cycle(label, value, indices, options)?;
            }
            EntryKind::Binding(value) => {
                self.keybind(label, value, KeybindOptions::default())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capture::CaptureSlot;
    use crate::core::builder::RowDefaults;
    use crate::core::page::{Owner, Page};
    use crate::test_support::shared;

    fn builder() -> PageBuilder {
        let page = Page::new(Owner::new("cfg", "Config"), "From config").unwrap();
        PageBuilder::new(page, CaptureSlot::new(), RowDefaults::default())
    }

    #[test]
    fn test_derive_unit_range_is_percent() {
        let display = derive_float_display(0.0, 1.0, &PercentPolicy::default()).unwrap();
        assert!((display.step - 0.01).abs() < 1e-12);
        assert_eq!(display.decimal_places, 2);
        assert!(display.is_percent);
        assert_eq!(display.scale, 100.0);
    }

    #[test]
    fn test_derive_wide_range_is_plain() {
        let display = derive_float_display(0.0, 100.0, &PercentPolicy::default()).unwrap();
        assert!((display.step - 1.0).abs() < 1e-12);
        assert_eq!(display.decimal_places, 0);
        assert!(!display.is_percent);
        assert_eq!(display.scale, 1.0);
    }

    #[test]
    fn test_derive_rejects_inverted_range() {
        assert!(derive_float_display(2.0, 1.0, &PercentPolicy::default()).is_err());
    }

    #[test]
    fn test_policy_is_configurable() {
        let strict = PercentPolicy {
            max_at_most: 1.0,
            ..PercentPolicy::default()
        };
        assert!(PercentPolicy::default().qualifies(0.0, 2.0));
        assert!(!strict.qualifies(0.0, 2.0));
        assert!(!strict.qualifies(0.5, 1.0));
    }

    #[test]
    fn test_entries_build_one_row_per_supported_kind() {
        let mut b = builder();
        let added = b.entries(
            vec![
                ConfigEntry::new("General", "Enabled", EntryKind::Bool(Bound::from_cell(&shared(true)))),
                ConfigEntry::new(
                    "General",
                    "Lives",
                    EntryKind::Int {
                        value: Bound::from_cell(&shared(3_i64)),
                        min: Some(0),
                        max: Some(5),
                    },
                ),
                ConfigEntry::new(
                    "Tuning",
                    "DropRate",
                    EntryKind::Float {
                        value: Bound::from_cell(&shared(0.25_f64)),
                        min: Some(0.0),
                        max: Some(1.0),
                    },
                ),
                ConfigEntry::new(
                    "Tuning",
                    "Difficulty",
                    EntryKind::Enum {
                        value: Bound::from_cell(&shared(1_usize)),
                        names: vec!["Easy".into(), "Normal".into(), "Hard".into()],
                    },
                ),
                ConfigEntry::new(
                    "Keys",
                    "Jump",
                    EntryKind::Binding(Bound::from_cell(&shared(Binding::keyboard("Space")))),
                ),
            ],
            &EntryFilter::default(),
            &PercentPolicy::default(),
        );
        assert_eq!(added, 5);

        let page = b.into_page();
        let labels: Vec<String> = page.items().iter().map(|i| i.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Enabled: On",
                "Lives: 3",
                "DropRate: 25%",
                "Difficulty: Normal",
                "Jump: [Keyboard] Space",
            ]
        );
    }

    #[test]
    fn test_filter_ignores_keys_and_sections_case_insensitively() {
        let mut b = builder();
        let added = b.entries(
            vec![
                ConfigEntry::new("General", "Secret", EntryKind::Bool(Bound::from_cell(&shared(true)))),
                ConfigEntry::new("Debug", "Verbose", EntryKind::Bool(Bound::from_cell(&shared(true)))),
                ConfigEntry::new("General", "Shown", EntryKind::Bool(Bound::from_cell(&shared(true)))),
            ],
            &EntryFilter::default().ignore_keys(&["secret"]).ignore_sections(&["DEBUG"]),
            &PercentPolicy::default(),
        );
        assert_eq!(added, 1);
        assert_eq!(b.into_page().items()[0].label(), "Shown: On");
    }

    #[test]
    fn test_failing_entries_are_skipped() {
        let mut b = builder();
        let exploding: Bound<i64> = Bound::new(|| panic!("store offline"), |_| {});
        let added = b.entries(
            vec![
                ConfigEntry::new(
                    "General",
                    "Broken",
                    EntryKind::Int {
                        value: Bound::from_cell(&shared(0_i64)),
                        min: Some(5),
                        max: Some(1),
                    },
                ),
                ConfigEntry::new(
                    "General",
                    "Unreadable",
                    EntryKind::Float {
                        value: Bound::new(move || exploding.get() as f64, |_| {}),
                        min: None,
                        max: None,
                    },
                ),
                ConfigEntry::new(
                    "General",
                    "Mode",
                    EntryKind::Choice {
                        value: Bound::from_cell(&shared(String::new())),
                        options: Vec::new(),
                    },
                ),
                ConfigEntry::new("General", "Fine", EntryKind::Bool(Bound::from_cell(&shared(false)))),
            ],
            &EntryFilter::default(),
            &PercentPolicy::default(),
        );
        assert_eq!(added, 1);
        assert_eq!(b.into_page().items()[0].label(), "Fine: Off");
    }
}
