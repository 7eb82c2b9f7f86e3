//! # Errors
//!
//! Two families, matching the two moments things can go wrong:
//!
//! - [`BuildError`]: a caller handed the builder something invalid
//!   (inverted bounds, zero step, empty cycle list). Raised immediately,
//!   never deferred to render time.
//! - [`HandlerError`]: a row callback failed or panicked while the hub was
//!   running. Caught at the navigation/capture boundary, logged, swallowed.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Invalid arguments supplied while building a page or row.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Page name was empty or whitespace.
    EmptyPageName,
    /// Owner id was empty or whitespace.
    EmptyOwner,
    /// Step must be strictly positive.
    NonPositiveStep { label: String },
    /// `min > max`.
    InvertedBounds { label: String, min: String, max: String },
    /// The step rounds to zero at the chosen precision.
    StepTooSmall { label: String, step: f64, decimal_places: u32 },
    /// More decimal places were requested than the scaled domain supports.
    TooPrecise { label: String, decimal_places: u32, max: u32 },
    /// Cycle rows need at least one value.
    EmptyCycle { label: String },
    /// A bound or step was NaN or infinite.
    NotFinite { label: String },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::EmptyPageName => write!(f, "page name must not be empty"),
            BuildError::EmptyOwner => write!(f, "page owner id must not be empty"),
            BuildError::NonPositiveStep { label } => {
                write!(f, "'{label}': step must be positive")
            }
            BuildError::InvertedBounds { label, min, max } => {
                write!(f, "'{label}': max ({max}) must be >= min ({min})")
            }
            BuildError::StepTooSmall {
                label,
                step,
                decimal_places,
            } => write!(
                f,
                "'{label}': step {step} is too small for {decimal_places} decimal places"
            ),
            BuildError::TooPrecise {
                label,
                decimal_places,
                max,
            } => write!(
                f,
                "'{label}': {decimal_places} decimal places requested, at most {max} supported"
            ),
            BuildError::EmptyCycle { label } => {
                write!(f, "'{label}': at least one value must be supplied")
            }
            BuildError::NotFinite { label } => {
                write!(f, "'{label}': bounds and step must be finite")
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// A row callback failed at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The callback returned an error.
    Failed(String),
    /// The callback panicked; carries the panic message when it was a string.
    Panicked(String),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Failed(msg) => write!(f, "handler failed: {msg}"),
            HandlerError::Panicked(msg) => write!(f, "handler panicked: {msg}"),
        }
    }
}

impl std::error::Error for HandlerError {}

pub type HandlerResult = Result<(), HandlerError>;

/// Run a row callback, turning a panic into [`HandlerError::Panicked`].
///
/// Callbacks close over caller-owned state through `Rc<RefCell<_>>`; a
/// `RefCell` borrow is released during unwinding, so the state stays usable
/// after a caught panic.
pub(crate) fn guarded<F>(f: F) -> HandlerResult
where
    F: FnOnce() -> HandlerResult,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(HandlerError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Same as [`guarded`] for callbacks that produce a value.
pub(crate) fn guarded_value<T, F>(f: F) -> Result<T, HandlerError>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| HandlerError::Panicked(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_passes_through_ok_and_err() {
        assert_eq!(guarded(|| Ok(())), Ok(()));
        assert_eq!(
            guarded(|| Err(HandlerError::failed("nope"))),
            Err(HandlerError::Failed("nope".to_string()))
        );
    }

    #[test]
    fn test_guarded_catches_panics() {
        let result = guarded(|| panic!("row exploded"));
        assert_eq!(result, Err(HandlerError::Panicked("row exploded".to_string())));
    }

    #[test]
    fn test_guarded_value_catches_formatted_panics() {
        let result: Result<String, _> = guarded_value(|| panic!("bad {}", 42));
        assert_eq!(result, Err(HandlerError::Panicked("bad 42".to_string())));
    }

    #[test]
    fn test_build_error_display_names_the_row() {
        let err = BuildError::InvertedBounds {
            label: "Lives".to_string(),
            min: "5".to_string(),
            max: "1".to_string(),
        };
        assert_eq!(err.to_string(), "'Lives': max (1) must be >= min (5)");
    }
}
