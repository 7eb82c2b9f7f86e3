//! # Value Adapters
//!
//! Pure numeric and formatting helpers behind every stepping row.
//!
//! Fractional rows never step in floating point. They pick a decimal
//! precision, scale every quantity into an integer domain, step there with
//! an [`IntStepper`], and scale back:
//!
//! ```text
//!  f64 value ──FixedPoint::scale──▶ i64 ──IntStepper::advance──▶ i64 ──unscale──▶ f64
//!   0.20            ×100               20          +5             25       ÷100     0.25
//! ```

use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::core::error::BuildError;
use crate::core::item::Bound;

/// Upper bound for auto-detected decimal places.
pub const MAX_AUTO_DECIMAL_PLACES: u32 = 6;

/// Upper bound for explicitly requested decimal places.
pub const MAX_DECIMAL_PLACES: u32 = 9;

/// Collapse any input direction to -1, 0 or +1.
pub fn normalize_direction(direction: i32) -> i32 {
    direction.signum()
}

/// Post-step hook applied before bounds are re-applied.
pub type Normalizer = Rc<dyn Fn(i64) -> i64>;

/// Bounded integer stepping with optional wraparound.
#[derive(Clone)]
pub struct IntStepper {
    step: i64,
    min: Option<i64>,
    max: Option<i64>,
    wrap: bool,
    normalizer: Option<Normalizer>,
}

impl IntStepper {
    pub fn new(
        label: &str,
        step: i64,
        min: Option<i64>,
        max: Option<i64>,
        wrap: bool,
    ) -> Result<Self, BuildError> {
        if step <= 0 {
            return Err(BuildError::NonPositiveStep {
                label: label.to_string(),
            });
        }
        if let (Some(lo), Some(hi)) = (min, max)
            && lo > hi
        {
            return Err(BuildError::InvertedBounds {
                label: label.to_string(),
                min: lo.to_string(),
                max: hi.to_string(),
            });
        }
        Ok(Self {
            step,
            min,
            max,
            wrap,
            normalizer: None,
        })
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn bounds(&self) -> (Option<i64>, Option<i64>) {
        (self.min, self.max)
    }

    /// Bounds are applied in `i128` so ranges spanning all of `i64` wrap
    /// without overflow.
    fn apply_bounds(&self, value: i128) -> i64 {
        if self.wrap
            && let (Some(min), Some(max)) = (self.min, self.max)
        {
            let (min, max) = (i128::from(min), i128::from(max));
            let range = (max - min) + i128::from(self.step);
            let wrapped = min + (value - min).rem_euclid(range);
            // Values that land between max and max + step re-enter at max;
            // the next step past it wraps to min.
            return narrow(wrapped.min(max));
        }

        let lo = self.min.map_or(i128::from(i64::MIN), i128::from);
        let hi = self.max.map_or(i128::from(i64::MAX), i128::from);
        narrow(value.clamp(lo, hi))
    }

    fn apply_wide(&self, raw: i128) -> i64 {
        let bounded = self.apply_bounds(raw);
        match &self.normalizer {
            Some(normalize) => self.apply_bounds(i128::from(normalize(bounded))),
            None => bounded,
        }
    }

    /// Bound a raw candidate, then run the normalizer and bound again.
    pub fn apply(&self, raw: i64) -> i64 {
        self.apply_wide(i128::from(raw))
    }

    /// Move `current` by one step in `direction` (sign only).
    pub fn advance(&self, current: i64, direction: i32) -> i64 {
        let delta = i128::from(normalize_direction(direction)) * i128::from(self.step);
        self.apply_wide(i128::from(current) + delta)
    }
}

/// Saturate an already-bounded wide value back into `i64`.
fn narrow(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

impl fmt::Debug for IntStepper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntStepper")
            .field("step", &self.step)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("wrap", &self.wrap)
            .field("normalizer", &self.normalizer.is_some())
            .finish()
    }
}

/// Round half away from zero, tolerating representation error right at .5
/// (`2.675 * 100` is `267.49999999999997` in binary).
pub fn round_half_away(value: f64) -> f64 {
    let frac = (value - value.trunc()).abs();
    if (frac - 0.5).abs() < 1e-9 {
        value.trunc() + value.signum()
    } else {
        value.round()
    }
}

fn pow10(exponent: u32) -> i64 {
    10_i64.pow(exponent)
}

/// Round `value` to `places` decimals, half away from zero.
pub fn round_to_places(value: f64, places: u32) -> f64 {
    let factor = pow10(places) as f64;
    round_half_away(value * factor) / factor
}

/// Smallest number of decimals (capped at [`MAX_AUTO_DECIMAL_PLACES`]) that
/// represents `value` exactly.
pub fn decimal_places_of(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let value = round_to_places(value.abs(), MAX_AUTO_DECIMAL_PLACES);
    for places in 0..=MAX_AUTO_DECIMAL_PLACES {
        let scaled = value * pow10(places) as f64;
        if (scaled - scaled.round()).abs() <= 1e-9 * scaled.abs().max(1.0) {
            return places;
        }
    }
    MAX_AUTO_DECIMAL_PLACES
}

/// Decimals needed to represent every value in the slice.
pub fn required_decimal_places(values: &[f64]) -> u32 {
    values
        .iter()
        .map(|v| decimal_places_of(*v))
        .max()
        .unwrap_or(0)
}

/// Fixed-point conversion between `f64` and a scaled `i64` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    decimal_places: u32,
    factor: i64,
}

impl FixedPoint {
    /// Precision is capped at [`MAX_DECIMAL_PLACES`]; builders reject
    /// anything finer before getting here.
    pub fn new(decimal_places: u32) -> Self {
        let decimal_places = decimal_places.min(MAX_DECIMAL_PLACES);
        Self {
            decimal_places,
            factor: pow10(decimal_places),
        }
    }

    /// `max(requested, auto-detected)` over the given values.
    pub fn for_values(requested: u32, values: &[f64]) -> Self {
        let auto = required_decimal_places(values);
        let fixed = Self::new(requested.max(auto));
        debug!(
            "FixedPoint: requested={} auto={} -> {} places",
            requested, auto, fixed.decimal_places
        );
        fixed
    }

    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    pub fn factor(&self) -> i64 {
        self.factor
    }

    pub fn scale(&self, value: f64) -> i64 {
        round_half_away(value * self.factor as f64) as i64
    }

    pub fn unscale(&self, scaled: i64) -> f64 {
        scaled as f64 / self.factor as f64
    }
}

/// Read the current value; if it differs from `candidate`, write it and
/// fire `on_changed`. Returns whether a write happened.
pub fn update_if_changed<T>(bound: &Bound<T>, candidate: T, on_changed: Option<&dyn Fn(&T)>) -> bool
where
    T: PartialEq + 'static,
{
    update_if_changed_by(bound, candidate, &|a, b| a == b, on_changed)
}

/// [`update_if_changed`] with caller-supplied equality.
pub fn update_if_changed_by<T: 'static>(
    bound: &Bound<T>,
    candidate: T,
    eq: &dyn Fn(&T, &T) -> bool,
    on_changed: Option<&dyn Fn(&T)>,
) -> bool {
    let current = bound.get();
    if eq(&current, &candidate) {
        return false;
    }
    match on_changed {
        Some(notify) => {
            // Keep a copy for the callback without requiring `T: Clone`:
            // read back what the setter stored.
            bound.set(candidate);
            notify(&bound.get());
        }
        None => bound.set(candidate),
    }
    true
}

/// Next index in a list of `len` values, seeding at the ends when the
/// current value is not in the list. `None` means "nothing to do".
pub fn cycle_index(current: Option<usize>, len: usize, direction: i32) -> Option<usize> {
    let step = normalize_direction(direction);
    if step == 0 || len <= 1 {
        return None;
    }
    match current {
        None if step > 0 => Some(0),
        None => Some(len - 1),
        Some(index) => {
            let len = len as i64;
            Some((index as i64 + i64::from(step)).rem_euclid(len) as usize)
        }
    }
}

pub fn round_to_multiple_of(value: f64, multiple: f64) -> f64 {
    if multiple == 0.0 {
        return value;
    }
    (value / multiple).round() * multiple
}

/// Round to the nearest half of the leading significant digit, e.g.
/// `0.013 -> 0.015`, `0.9 -> 1.0`, `7.0 -> 7.0`.
pub fn round_to_nearest_significant_five(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return 0.0;
    }
    let scale = 10_f64.powi(value.abs().log10().floor() as i32);
    round_to_multiple_of(value, 0.5 * scale)
}

/// Fixed decimals with trailing zeros (and a bare trailing dot) removed.
pub fn format_trimmed(value: f64, decimal_places: u32) -> String {
    let mut text = format!("{:.*}", decimal_places as usize, value);
    if decimal_places > 0 && text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// `value * scale` with derived decimals, e.g. `0.25` at scale 100 -> `25%`.
pub fn format_percent(value: f64, decimal_places: u32, scale: f64, show_percent: bool) -> String {
    let text = format_trimmed(value * scale, decimal_places);
    if show_percent { format!("{text}%") } else { text }
}

/// Integer percent rows truncate the scaled value.
pub fn format_int_percent(value: i64, scale: f64, show_percent: bool) -> String {
    let actual = (value as f64 * scale).trunc() as i64;
    if show_percent {
        format!("{actual}%")
    } else {
        actual.to_string()
    }
}

pub fn format_multiplier(value: f64, decimal_places: u32) -> String {
    format!("{}x", format_trimmed(value, decimal_places))
}
