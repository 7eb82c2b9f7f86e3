//! # Items and Bound Values
//!
//! An [`Item`] is one interactive row of a settings page: a label provider,
//! an optional select action and an optional adjust action. Items never own
//! the setting they edit; they reach it through a [`Bound`] accessor handed
//! in by whoever does own it.
//!
//! ```text
//! caller state ──get/set──▶ Bound<T> ──captured by──▶ Item closures
//!                                                        │
//!                               NavigationController ◀───┘ label()/select()/adjust()
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::error::HandlerResult;

/// Custom value formatter shared between an item's closures.
pub type Formatter<T> = Rc<dyn Fn(&T) -> String>;

/// Change notification, fired only when a value actually changes.
pub type OnChanged<T> = Rc<dyn Fn(&T)>;

/// Getter/setter pair over a value owned elsewhere.
///
/// Cloning is cheap: both halves are reference counted.
pub struct Bound<T> {
    get: Rc<dyn Fn() -> T>,
    set: Rc<dyn Fn(T)>,
}

impl<T> Clone for Bound<T> {
    fn clone(&self) -> Self {
        Self {
            get: Rc::clone(&self.get),
            set: Rc::clone(&self.set),
        }
    }
}

impl<T> fmt::Debug for Bound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Bound(..)")
    }
}

impl<T: 'static> Bound<T> {
    pub fn new(get: impl Fn() -> T + 'static, set: impl Fn(T) + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    pub fn get(&self) -> T {
        (self.get)()
    }

    pub fn set(&self, value: T) {
        (self.set)(value)
    }

    /// View this value through a conversion pair, e.g. a float as scaled
    /// integers or a string as a parsed binding.
    pub fn map<U: 'static>(
        &self,
        to: impl Fn(T) -> U + 'static,
        from: impl Fn(U) -> T + 'static,
    ) -> Bound<U> {
        let get = Rc::clone(&self.get);
        let set = Rc::clone(&self.set);
        Bound::new(move || to(get()), move |value| set(from(value)))
    }
}

impl<T: Clone + 'static> Bound<T> {
    /// Bind to a shared cell.
    pub fn from_cell(cell: &Rc<RefCell<T>>) -> Self {
        let read = Rc::clone(cell);
        let write = Rc::clone(cell);
        Bound::new(
            move || read.borrow().clone(),
            move |value| *write.borrow_mut() = value,
        )
    }
}

type LabelFn = Box<dyn Fn() -> String>;
type SelectFn = Box<dyn Fn() -> HandlerResult>;
type AdjustFn = Box<dyn Fn(i32) -> HandlerResult>;

/// Placeholder shown for rows built without a label provider.
pub const MISSING_LABEL: &str = "(item)";

/// One row of a settings page.
#[derive(Default)]
pub struct Item {
    label: Option<LabelFn>,
    on_select: Option<SelectFn>,
    on_adjust: Option<AdjustFn>,
}

impl Item {
    pub fn new(label: impl Fn() -> String + 'static) -> Self {
        Self {
            label: Some(Box::new(label)),
            on_select: None,
            on_adjust: None,
        }
    }

    pub fn on_select(mut self, f: impl Fn() -> HandlerResult + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// `direction` is -1 for left and +1 for right.
    pub fn on_adjust(mut self, f: impl Fn(i32) -> HandlerResult + 'static) -> Self {
        self.on_adjust = Some(Box::new(f));
        self
    }

    pub fn label(&self) -> String {
        match &self.label {
            Some(label) => label(),
            None => MISSING_LABEL.to_string(),
        }
    }

    pub fn has_select(&self) -> bool {
        self.on_select.is_some()
    }

    pub fn has_adjust(&self) -> bool {
        self.on_adjust.is_some()
    }

    /// Run the select action. Rows without one accept the input silently.
    pub fn select(&self) -> HandlerResult {
        match &self.on_select {
            Some(f) => f(),
            None => Ok(()),
        }
    }

    pub fn adjust(&self, direction: i32) -> HandlerResult {
        match &self.on_adjust {
            Some(f) => f(direction),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("has_label", &self.label.is_some())
            .field("has_select", &self.has_select())
            .field("has_adjust", &self.has_adjust())
            .finish()
    }
}
