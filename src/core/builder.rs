//! # Page Builder
//!
//! Fluent construction of settings rows. Each method turns a [`Bound`]
//! value plus an options struct into an [`Item`] whose closures read and
//! write that value:
//!
//! | Method | Value | Select | Adjust |
//! |---|---|---|---|
//! | [`toggle`](PageBuilder::toggle) / [`on_off`](PageBuilder::on_off) | `bool` | flip | flip, or force by direction |
//! | [`int_stepper`](PageBuilder::int_stepper) / [`int`](PageBuilder::int) | `i64` | `+step` | `±step` |
//! | [`percent`](PageBuilder::percent) | `i64` | `+step` | `±step` |
//! | [`percent_fraction`](PageBuilder::percent_fraction) | `f64` | `+step` | `±step`, snapped to step |
//! | [`multiplier`](PageBuilder::multiplier) | `f64` | `+step` | `±step` |
//! | [`multiplier_options`](PageBuilder::multiplier_options) | `f64` | next option | prev/next option |
//! | [`cycle`](PageBuilder::cycle) | any `T` | next value | prev/next value |
//! | [`keybind`](PageBuilder::keybind) | [`Binding`] | start capture | start capture |
//!
//! Invalid arguments fail immediately with [`BuildError`]:
//!
//! ```ignore
//! page.toggle("Enabled", enabled, ToggleOptions::default())?
//!     .int("Extra lives", lives, IntOptions::range(0, 5))?;
//! ```

use std::fmt;
use std::rc::Rc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::binding::Binding;
use crate::core::capture::{AllowedDevices, CaptureLabels, CaptureRequest, CaptureSlot};
use crate::core::error::BuildError;
use crate::core::item::{Bound, Formatter, Item, OnChanged};
use crate::core::page::Page;
use crate::core::value::{
    FixedPoint, IntStepper, MAX_DECIMAL_PLACES, Normalizer, cycle_index, format_int_percent, format_multiplier,
    format_percent, normalize_direction, required_decimal_places, round_to_multiple_of,
    update_if_changed, update_if_changed_by,
};

/// Options offered by [`PageBuilder::multiplier_options`] when none are given.
pub const DEFAULT_MULTIPLIERS: [f64; 6] = [0.0, 0.5, 1.0, 2.0, 3.0, 4.0];

/// How left/right input behaves on toggle rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAdjustMode {
    /// Either direction flips the value.
    #[default]
    Toggle,
    /// Left forces off, right forces on.
    Directional,
}

/// Defaults every row built by one [`PageBuilder`] shares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowDefaults {
    pub toggle_mode: ToggleAdjustMode,
    pub capture_labels: CaptureLabels,
}

// ============================================================================
// Row options
// ============================================================================

pub struct ToggleOptions {
    pub on_label: String,
    pub off_label: String,
    /// `None` uses the builder's [`RowDefaults::toggle_mode`].
    pub adjust_mode: Option<ToggleAdjustMode>,
    pub on_changed: Option<OnChanged<bool>>,
}

impl Default for ToggleOptions {
    fn default() -> Self {
        Self {
            on_label: "On".to_string(),
            off_label: "Off".to_string(),
            adjust_mode: None,
            on_changed: None,
        }
    }
}

impl ToggleOptions {
    pub fn labels(mut self, on: &str, off: &str) -> Self {
        self.on_label = on.to_string();
        self.off_label = off.to_string();
        self
    }

    pub fn mode(mut self, mode: ToggleAdjustMode) -> Self {
        self.adjust_mode = Some(mode);
        self
    }

    pub fn on_changed(mut self, f: impl Fn(&bool) + 'static) -> Self {
        self.on_changed = Some(Rc::new(f));
        self
    }
}

pub struct IntOptions {
    pub step: i64,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub wrap: bool,
    pub normalizer: Option<Normalizer>,
    pub formatter: Option<Formatter<i64>>,
    pub on_changed: Option<OnChanged<i64>>,
}

impl Default for IntOptions {
    fn default() -> Self {
        Self {
            step: 1,
            min: None,
            max: None,
            wrap: false,
            normalizer: None,
            formatter: None,
            on_changed: None,
        }
    }
}

impl IntOptions {
    pub fn range(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::default()
        }
    }

    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn normalizer(mut self, f: impl Fn(i64) -> i64 + 'static) -> Self {
        self.normalizer = Some(Rc::new(f));
        self
    }

    pub fn formatter(mut self, f: impl Fn(&i64) -> String + 'static) -> Self {
        self.formatter = Some(Rc::new(f));
        self
    }

    pub fn on_changed(mut self, f: impl Fn(&i64) + 'static) -> Self {
        self.on_changed = Some(Rc::new(f));
        self
    }
}

/// Integer percent row. The stored value is shown as `trunc(value * scale)`.
pub struct PercentOptions {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub wrap: bool,
    pub show_percent: bool,
    pub scale: f64,
    pub on_changed: Option<OnChanged<i64>>,
}

impl Default for PercentOptions {
    fn default() -> Self {
        Self {
            min: 0,
            max: 100,
            step: 5,
            wrap: false,
            show_percent: true,
            scale: 1.0,
            on_changed: None,
        }
    }
}

/// Fractional percent row, e.g. a stored `0.25` shown as `25%` with
/// `scale = 100`.
pub struct FractionOptions {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub wrap: bool,
    /// Minimum precision; raised automatically when bounds, step or the
    /// current value need more digits. At most [`MAX_DECIMAL_PLACES`].
    pub decimal_places: u32,
    pub show_percent: bool,
    pub scale: f64,
    pub on_changed: Option<OnChanged<f64>>,
}

impl Default for FractionOptions {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 5.0,
            wrap: false,
            decimal_places: 1,
            show_percent: true,
            scale: 1.0,
            on_changed: None,
        }
    }
}

impl FractionOptions {
    pub fn range(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            ..Self::default()
        }
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

pub struct MultiplierOptions {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub wrap: bool,
    pub decimal_places: u32,
    pub formatter: Option<Formatter<f64>>,
    pub on_changed: Option<OnChanged<f64>>,
}

impl MultiplierOptions {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            wrap: false,
            decimal_places: 2,
            formatter: None,
            on_changed: None,
        }
    }
}

/// Fixed list of multipliers; an empty list means [`DEFAULT_MULTIPLIERS`].
#[derive(Default)]
pub struct MultiplierChoices {
    pub options: Vec<f64>,
    pub formatter: Option<Formatter<f64>>,
    pub on_changed: Option<OnChanged<f64>>,
}

pub type Equality<T> = Rc<dyn Fn(&T, &T) -> bool>;

pub struct CycleOptions<T> {
    pub formatter: Option<Formatter<T>>,
    pub on_changed: Option<OnChanged<T>>,
    /// Replaces `PartialEq` when locating the current value.
    pub eq: Option<Equality<T>>,
}

impl<T> Default for CycleOptions<T> {
    fn default() -> Self {
        Self {
            formatter: None,
            on_changed: None,
            eq: None,
        }
    }
}

impl<T> CycleOptions<T> {
    pub fn formatter(mut self, f: impl Fn(&T) -> String + 'static) -> Self {
        self.formatter = Some(Rc::new(f));
        self
    }

    pub fn on_changed(mut self, f: impl Fn(&T) + 'static) -> Self {
        self.on_changed = Some(Rc::new(f));
        self
    }

    pub fn eq(mut self, f: impl Fn(&T, &T) -> bool + 'static) -> Self {
        self.eq = Some(Rc::new(f));
        self
    }
}

#[derive(Default)]
pub struct KeybindOptions {
    pub allowed: AllowedDevices,
    pub formatter: Option<Formatter<Binding>>,
    pub on_changed: Option<OnChanged<Binding>>,
}

// ============================================================================
// Builder
// ============================================================================

pub struct PageBuilder {
    page: Page,
    capture: CaptureSlot,
    defaults: RowDefaults,
}

impl PageBuilder {
    pub fn new(page: Page, capture: CaptureSlot, defaults: RowDefaults) -> Self {
        Self {
            page,
            capture,
            defaults,
        }
    }

    pub fn page_name(&self) -> &str {
        self.page.name()
    }

    pub fn len(&self) -> usize {
        self.page.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_empty()
    }

    pub fn into_page(self) -> Page {
        self.page
    }

    /// Append an arbitrary row.
    pub fn item(&mut self, item: Item) -> &mut Self {
        self.page.push(item);
        self
    }

    // ── Toggles ─────────────────────────────────────────────────────────

    pub fn toggle(
        &mut self,
        label: &str,
        value: Bound<bool>,
        options: ToggleOptions,
    ) -> Result<&mut Self, BuildError> {
        let mode = options.adjust_mode.unwrap_or(self.defaults.toggle_mode);
        let ToggleOptions {
            on_label,
            off_label,
            on_changed,
            ..
        } = options;

        let label = label.to_string();
        let show = {
            let value = value.clone();
            move || {
                let state = if value.get() { &on_label } else { &off_label };
                format!("{label}: {state}")
            }
        };
        let set = {
            let value = value.clone();
            Rc::new(move |next: bool| {
                update_if_changed(&value, next, on_changed.as_deref());
            })
        };

        let select = {
            let set = Rc::clone(&set);
            let value = value.clone();
            move || {
                set(!value.get());
                Ok(())
            }
        };
        let adjust = move |direction: i32| {
            match normalize_direction(direction) {
                0 => {}
                d if mode == ToggleAdjustMode::Directional => set(d > 0),
                _ => set(!value.get()),
            }
            Ok(())
        };

        self.page.push(Item::new(show).on_select(select).on_adjust(adjust));
        Ok(self)
    }

    /// Alias of [`toggle`](Self::toggle).
    pub fn on_off(
        &mut self,
        label: &str,
        value: Bound<bool>,
        options: ToggleOptions,
    ) -> Result<&mut Self, BuildError> {
        self.toggle(label, value, options)
    }

    // ── Integer steppers ────────────────────────────────────────────────

    pub fn int_stepper(
        &mut self,
        label: &str,
        value: Bound<i64>,
        options: IntOptions,
    ) -> Result<&mut Self, BuildError> {
        let mut stepper = IntStepper::new(label, options.step, options.min, options.max, options.wrap)?;
        if let Some(normalizer) = options.normalizer {
            stepper = stepper.with_normalizer(normalizer);
        }
        self.push_stepper(label, value, stepper, options.formatter, options.on_changed);
        Ok(self)
    }

    /// Alias of [`int_stepper`](Self::int_stepper).
    pub fn int(
        &mut self,
        label: &str,
        value: Bound<i64>,
        options: IntOptions,
    ) -> Result<&mut Self, BuildError> {
        self.int_stepper(label, value, options)
    }

    pub fn percent(
        &mut self,
        label: &str,
        value: Bound<i64>,
        options: PercentOptions,
    ) -> Result<&mut Self, BuildError> {
        let stepper = IntStepper::new(
            label,
            options.step,
            Some(options.min),
            Some(options.max),
            options.wrap,
        )?;
        let (scale, show_percent) = (options.scale, options.show_percent);
        let formatter: Formatter<i64> = Rc::new(move |v: &i64| format_int_percent(*v, scale, show_percent));
        self.push_stepper(label, value, stepper, Some(formatter), options.on_changed);
        Ok(self)
    }

    pub fn percent_fraction(
        &mut self,
        label: &str,
        value: Bound<f64>,
        options: FractionOptions,
    ) -> Result<&mut Self, BuildError> {
        let range = FractionRange {
            min: options.min,
            max: options.max,
            step: options.step,
            wrap: options.wrap,
            decimal_places: options.decimal_places,
            snap_to_step: true,
        };
        let (scale, show_percent) = (options.scale, options.show_percent);
        self.push_fraction(
            label,
            value,
            range,
            move |v, places| format_percent(v, places, scale, show_percent),
            options.on_changed,
        )?;
        Ok(self)
    }

    pub fn multiplier(
        &mut self,
        label: &str,
        value: Bound<f64>,
        options: MultiplierOptions,
    ) -> Result<&mut Self, BuildError> {
        let range = FractionRange {
            min: options.min,
            max: options.max,
            step: options.step,
            wrap: options.wrap,
            decimal_places: options.decimal_places,
            snap_to_step: false,
        };
        let formatter = options.formatter;
        self.push_fraction(
            label,
            value,
            range,
            move |v, places| match &formatter {
                Some(format) => format(&v),
                None => format_multiplier(v, places),
            },
            options.on_changed,
        )?;
        Ok(self)
    }

    pub fn multiplier_options(
        &mut self,
        label: &str,
        value: Bound<f64>,
        choices: MultiplierChoices,
    ) -> Result<&mut Self, BuildError> {
        let options = if choices.options.is_empty() {
            DEFAULT_MULTIPLIERS.to_vec()
        } else {
            choices.options
        };
        let formatter: Formatter<f64> = match choices.formatter {
            Some(format) => format,
            None => {
                let places = required_decimal_places(&options);
                Rc::new(move |v: &f64| format_multiplier(*v, places))
            }
        };
        let cycle = CycleOptions {
            formatter: Some(formatter),
            on_changed: choices.on_changed,
            eq: None,
        };
        self.cycle(label, value, options, cycle)
    }

    // ── Cycles ──────────────────────────────────────────────────────────

    pub fn cycle<T>(
        &mut self,
        label: &str,
        value: Bound<T>,
        values: Vec<T>,
        options: CycleOptions<T>,
    ) -> Result<&mut Self, BuildError>
    where
        T: Clone + PartialEq + fmt::Display + 'static,
    {
        if values.is_empty() {
            return Err(BuildError::EmptyCycle {
                label: label.to_string(),
            });
        }

        let CycleOptions {
            formatter,
            on_changed,
            eq,
        } = options;
        let eq: Equality<T> = eq.unwrap_or_else(|| Rc::new(|a: &T, b: &T| a == b));

        let label = label.to_string();
        let show = {
            let value = value.clone();
            move || {
                let current = value.get();
                let text = match &formatter {
                    Some(format) => format(&current),
                    None => current.to_string(),
                };
                format!("{label}: {text}")
            }
        };

        let advance = Rc::new(move |direction: i32| {
            let current = value.get();
            let index = values.iter().position(|v| eq(v, &current));
            if let Some(next) = cycle_index(index, values.len(), direction) {
                update_if_changed_by(&value, values[next].clone(), &*eq, on_changed.as_deref());
            }
        });

        let select = {
            let advance = Rc::clone(&advance);
            move || {
                advance(1);
                Ok(())
            }
        };
        let adjust = move |direction: i32| {
            advance(direction);
            Ok(())
        };

        self.page.push(Item::new(show).on_select(select).on_adjust(adjust));
        Ok(self)
    }

    // ── Bindings ────────────────────────────────────────────────────────

    pub fn keybind(
        &mut self,
        label: &str,
        value: Bound<Binding>,
        options: KeybindOptions,
    ) -> Result<&mut Self, BuildError> {
        let request = Rc::new(CaptureRequest {
            label: label.to_string(),
            value,
            allowed: options.allowed,
            formatter: options.formatter,
            on_changed: options.on_changed,
            labels: self.defaults.capture_labels.clone(),
        });

        let show = {
            let slot = self.capture.clone();
            let request = Rc::clone(&request);
            move || slot.row_label(&request)
        };
        let select = {
            let slot = self.capture.clone();
            let request = Rc::clone(&request);
            move || {
                slot.claim(&request);
                Ok(())
            }
        };
        let slot = self.capture.clone();
        let adjust = move |_direction: i32| {
            slot.claim(&request);
            Ok(())
        };

        self.page.push(Item::new(show).on_select(select).on_adjust(adjust));
        Ok(self)
    }

    /// Binding row over a value stored in its text form. Unparseable text
    /// reads as unbound.
    pub fn keybind_text(
        &mut self,
        label: &str,
        value: Bound<String>,
        options: KeybindOptions,
    ) -> Result<&mut Self, BuildError> {
        let binding = value.map(|text| Binding::parse_lenient(&text), |binding| binding.to_string());
        self.keybind(label, binding, options)
    }

    // ── Shared plumbing ─────────────────────────────────────────────────

    fn push_stepper(
        &mut self,
        label: &str,
        value: Bound<i64>,
        stepper: IntStepper,
        formatter: Option<Formatter<i64>>,
        on_changed: Option<OnChanged<i64>>,
    ) {
        let label = label.to_string();
        let show = {
            let value = value.clone();
            move || {
                let current = value.get();
                let text = match &formatter {
                    Some(format) => format(&current),
                    None => current.to_string(),
                };
                format!("{label}: {text}")
            }
        };

        let step = Rc::new(move |direction: i32| {
            if normalize_direction(direction) == 0 {
                return;
            }
            let next = stepper.advance(value.get(), direction);
            update_if_changed(&value, next, on_changed.as_deref());
        });

        let select = {
            let step = Rc::clone(&step);
            move || {
                step(1);
                Ok(())
            }
        };
        let adjust = move |direction: i32| {
            step(direction);
            Ok(())
        };

        self.page.push(Item::new(show).on_select(select).on_adjust(adjust));
    }

    /// Fractional row: validate, pick a precision, then step in the scaled
    /// integer domain.
    fn push_fraction(
        &mut self,
        label: &str,
        value: Bound<f64>,
        range: FractionRange,
        render: impl Fn(f64, u32) -> String + 'static,
        on_changed: Option<OnChanged<f64>>,
    ) -> Result<(), BuildError> {
        let FractionRange {
            min,
            max,
            step,
            wrap,
            decimal_places,
            snap_to_step,
        } = range;

        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(BuildError::NotFinite {
                label: label.to_string(),
            });
        }
        if step <= 0.0 {
            return Err(BuildError::NonPositiveStep {
                label: label.to_string(),
            });
        }
        if decimal_places > MAX_DECIMAL_PLACES {
            return Err(BuildError::TooPrecise {
                label: label.to_string(),
                decimal_places,
                max: MAX_DECIMAL_PLACES,
            });
        }

        let fixed = FixedPoint::for_values(decimal_places, &[min, max, step, value.get()]);
        let places = fixed.decimal_places();

        let step_scaled = fixed.scale(step);
        if step_scaled <= 0 {
            return Err(BuildError::StepTooSmall {
                label: label.to_string(),
                step,
                decimal_places: places,
            });
        }
        let (min_scaled, max_scaled) = (fixed.scale(min), fixed.scale(max));
        if max_scaled < min_scaled {
            return Err(BuildError::InvertedBounds {
                label: label.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }

        let mut stepper = IntStepper::new(label, step_scaled, Some(min_scaled), Some(max_scaled), wrap)?;
        if snap_to_step {
            stepper = stepper.with_normalizer(Rc::new(move |v: i64| {
                if v == min_scaled || v == max_scaled {
                    v
                } else {
                    fixed.scale(round_to_multiple_of(fixed.unscale(v), step))
                }
            }));
        }
        debug!(
            "Fraction row '{}': {} places, scaled range {}..={} step {}",
            label, places, min_scaled, max_scaled, step_scaled
        );

        let scaled = value.map(move |v| fixed.scale(v), move |i| fixed.unscale(i));
        let formatter: Formatter<i64> = Rc::new(move |i: &i64| render(fixed.unscale(*i), places));
        let on_changed = on_changed.map(|notify| {
            Rc::new(move |i: &i64| notify(&fixed.unscale(*i))) as OnChanged<i64>
        });

        self.push_stepper(label, scaled, stepper, Some(formatter), on_changed);
        Ok(())
    }
}

impl fmt::Debug for PageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageBuilder")
            .field("page", &self.page.name())
            .field("rows", &self.page.len())
            .finish()
    }
}

struct FractionRange {
    min: f64,
    max: f64,
    step: f64,
    wrap: bool,
    decimal_places: u32,
    snap_to_step: bool,
}
