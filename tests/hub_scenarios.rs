//! End-to-end scenarios driven through the public `Hub` API, the way a
//! game host would: register pages at startup, then render, select and tick.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use modhub::core::binding::Binding;
use modhub::core::builder::{FractionOptions, IntOptions, KeybindOptions, ToggleOptions};
use modhub::core::capture::{CaptureTick, InputDevices};
use modhub::core::error::HandlerError;
use modhub::core::hub::Hub;
use modhub::core::item::{Bound, Item};
use modhub::core::navigation::{NavOutcome, View};
use modhub::core::page::Owner;

fn shared<T>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

fn owner(id: &str) -> Owner {
    Owner::new(id, id)
}

/// Keyboard with a fixed set of held keys.
struct HeldKeys {
    keys: Vec<String>,
    held: HashSet<String>,
}

impl HeldKeys {
    fn new(keys: &[&str], held: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            held: held.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl InputDevices for HeldKeys {
    fn keyboard_elements(&self) -> Vec<String> {
        self.keys.clone()
    }

    fn key_pressed(&self, element: &str) -> bool {
        self.held.contains(element)
    }
}

fn hub_with_pages(count: usize) -> Hub {
    let mut hub = Hub::default();
    for i in 0..count {
        hub.register_page(&owner("mod.pages"), &format!("Page {i}"), |_| Ok(()))
            .unwrap();
    }
    hub
}

/// Register a single page and open it.
fn open_single_page<F>(hub: &mut Hub, configure: F)
where
    F: FnOnce(&mut modhub::core::builder::PageBuilder) -> Result<(), modhub::core::error::BuildError>,
{
    hub.register_page(&owner("mod.test"), "Test", configure).unwrap();
    hub.open();
    assert_eq!(hub.select(5, 0, 0), NavOutcome::OpenedPage(0));
}

#[test]
fn test_wrapping_stepper_reenters_at_opposite_bound() {
    let mut hub = Hub::default();
    let level = shared(9_i64);
    let cell = level.clone();
    open_single_page(&mut hub, move |page| {
        page.int("Level", Bound::from_cell(&cell), IntOptions::range(0, 9).wrap())?;
        Ok(())
    });

    hub.select(5, 0, 1);
    assert_eq!(*level.borrow(), 0);
    hub.select(5, 0, -1);
    assert_eq!(*level.borrow(), 9);
    assert_eq!(hub.render(5).unwrap().rows[0], "Level: 9");
}

#[test]
fn test_wrapping_stepper_with_uneven_step_stops_at_max_first() {
    let mut hub = Hub::default();
    let charge = shared(9_i64);
    let cell = charge.clone();
    open_single_page(&mut hub, move |page| {
        page.int(
            "Charge",
            Bound::from_cell(&cell),
            IntOptions::range(0, 10).step(3).wrap(),
        )?;
        Ok(())
    });

    hub.select(5, 0, 1);
    assert_eq!(*charge.borrow(), 10);
    hub.select(5, 0, 1);
    assert_eq!(*charge.borrow(), 0);
}

#[test]
fn test_fractional_percent_steps_and_renders() {
    let mut hub = Hub::default();
    let chance = shared(0.20_f64);
    let cell = chance.clone();
    open_single_page(&mut hub, move |page| {
        page.percent_fraction(
            "Chance",
            Bound::from_cell(&cell),
            FractionOptions::range(0.0, 1.0, 0.05).scale(100.0),
        )?;
        Ok(())
    });

    assert_eq!(hub.select(5, 0, 1), NavOutcome::Invoked(true));
    assert!((*chance.borrow() - 0.25).abs() < 1e-9);
    assert_eq!(hub.render(5).unwrap().rows[0], "Chance: 25%");
}

#[test]
fn test_seven_pages_page_through_capacity_five() {
    let mut hub = hub_with_pages(7);
    hub.open();

    let frame = hub.render(5).unwrap();
    assert_eq!(frame.title, "MOD SETTINGS");
    assert_eq!(frame.rows, vec!["Page 0", "Page 1", "Page 2", "NEXT", "BACK"]);
    assert!(frame.has_next);

    assert_eq!(hub.select(5, 3, 0), NavOutcome::Paged(3));
    let frame = hub.render(5).unwrap();
    assert_eq!(frame.rows, vec!["Page 3", "Page 4", "Page 5", "NEXT", "BACK"]);

    assert_eq!(hub.select(5, 3, 0), NavOutcome::Paged(6));
    let frame = hub.render(5).unwrap();
    assert_eq!(frame.rows, vec!["Page 6", "", "", "", "BACK"]);
    assert!(!frame.has_next);

    // The dead NEXT slot and empty rows do nothing.
    assert_eq!(hub.select(5, 3, 0), NavOutcome::Ignored);
    assert_eq!(hub.select(5, 1, 0), NavOutcome::Ignored);

    assert_eq!(hub.select(5, 0, 0), NavOutcome::OpenedPage(6));
    assert_eq!(hub.render(5).unwrap().title, "Page 6");
}

#[test]
fn test_back_walks_out_of_page_then_hub() {
    let mut hub = hub_with_pages(2);
    hub.open();
    hub.select(4, 1, 0);
    assert_eq!(hub.view(), View::Page(1));
    assert_eq!(hub.select(4, 3, 0), NavOutcome::ReturnedToIndex);
    assert_eq!(hub.select(4, 3, 0), NavOutcome::Closed);
    assert!(!hub.is_open());
    assert_eq!(hub.render(4), None);
}

#[test]
fn test_second_capture_claim_takes_over() {
    let mut hub = Hub::default();
    let jump = shared(Binding::none());
    let crouch = shared(Binding::keyboard("C"));
    let (a, b) = (jump.clone(), crouch.clone());
    open_single_page(&mut hub, move |page| {
        page.keybind("Jump", Bound::from_cell(&a), KeybindOptions::default())?
            .keybind("Crouch", Bound::from_cell(&b), KeybindOptions::default())?;
        Ok(())
    });

    hub.select(5, 0, 0);
    let frame = hub.render(5).unwrap();
    assert_eq!(frame.rows[0], "Jump: Listening...");
    assert_eq!(frame.listening.as_deref(), Some("Jump"));

    hub.select(5, 1, 0);
    let frame = hub.render(5).unwrap();
    assert_eq!(frame.rows[0], "Jump: Not set");
    assert_eq!(frame.rows[1], "Crouch: Listening...");

    let devices = HeldKeys::new(&["Esc", "X"], &["Esc"]);
    assert_eq!(hub.tick(&devices), CaptureTick::Waiting);

    let devices = HeldKeys::new(&["Esc", "X"], &["X"]);
    assert_eq!(
        hub.tick(&devices),
        CaptureTick::Captured {
            binding: Binding::keyboard("X"),
            changed: true
        }
    );
    assert_eq!(*crouch.borrow(), Binding::keyboard("X"));
    assert!(jump.borrow().is_empty());
    assert!(!hub.is_listening());
    assert_eq!(hub.render(5).unwrap().rows[1], "Crouch: [Keyboard] X");
}

#[test]
fn test_back_cancels_pending_capture() {
    let mut hub = Hub::default();
    let jump = shared(Binding::none());
    let cell = jump.clone();
    open_single_page(&mut hub, move |page| {
        page.keybind("Jump", Bound::from_cell(&cell), KeybindOptions::default())?;
        Ok(())
    });

    hub.select(5, 0, 0);
    assert!(hub.is_listening());
    hub.select(5, 4, 0);
    assert!(!hub.is_listening());
    assert_eq!(hub.tick(&HeldKeys::new(&["X"], &["X"])), CaptureTick::Idle);
    assert!(jump.borrow().is_empty());
}

#[test]
fn test_reregistering_replaces_in_place() {
    let mut hub = hub_with_pages(3);
    let index = hub
        .register_page(&owner("MOD.PAGES"), "page 1", |page| {
            page.toggle("Fresh", Bound::from_cell(&shared(true)), ToggleOptions::default())?;
            Ok(())
        })
        .unwrap();
    assert_eq!(index, 1);
    assert_eq!(hub.pages().len(), 3);
    assert_eq!(hub.pages()[1].len(), 1);
}

#[test]
fn test_same_page_name_from_two_owners_is_disambiguated() {
    let mut hub = Hub::default();
    hub.register_page(&Owner::new("a.mod", "Alpha Industries"), "General", |_| Ok(()))
        .unwrap();
    hub.register_page(&Owner::new("b.mod", "Beta"), "General", |_| Ok(()))
        .unwrap();
    hub.open();
    let frame = hub.render(5).unwrap();
    assert_eq!(frame.rows[0], "General (Alpha In)");
    assert_eq!(frame.rows[1], "General (Beta)");
}

#[test]
fn test_broken_row_does_not_take_down_the_page() {
    let mut hub = Hub::default();
    let volume = shared(50_i64);
    let calls = Rc::new(Cell::new(0));
    let (cell, counter) = (volume.clone(), calls.clone());
    open_single_page(&mut hub, move |page| {
        page.item(Item::new(|| "Explodes".to_string()).on_select(|| panic!("row exploded")))
            .item(
                Item::new(|| "Refuses".to_string())
                    .on_select(move || {
                        counter.set(counter.get() + 1);
                        Err(HandlerError::failed("not today"))
                    }),
            )
            .int("Volume", Bound::from_cell(&cell), IntOptions::range(0, 100))?;
        Ok(())
    });

    assert_eq!(hub.select(5, 0, 0), NavOutcome::Invoked(false));
    assert_eq!(hub.select(5, 1, 0), NavOutcome::Invoked(false));
    assert_eq!(calls.get(), 1);
    assert_eq!(hub.select(5, 2, 1), NavOutcome::Invoked(true));
    assert_eq!(*volume.borrow(), 51);
    assert_eq!(hub.view(), View::Page(0));
}

#[test]
fn test_panicking_label_falls_back_to_placeholder() {
    let mut hub = Hub::default();
    open_single_page(&mut hub, |page| {
        page.item(Item::new(|| panic!("no label for you")));
        Ok(())
    });
    assert_eq!(hub.render(5).unwrap().rows[0], "(item)");
}

#[test]
fn test_reset_gives_independent_scenarios() {
    let mut hub = hub_with_pages(4);
    hub.open();
    hub.select(5, 3, 0);
    hub.reset();

    assert!(hub.pages().is_empty());
    assert!(!hub.is_open());
    hub.open();
    assert_eq!(hub.render(5), None);
    assert!(!hub.is_open());

    hub.register_page(&owner("mod.fresh"), "Fresh", |_| Ok(())).unwrap();
    hub.open();
    assert_eq!(hub.render(5).unwrap().rows[0], "Fresh");
}

/// Register `rows` plain rows on the "mod.pages" page `name`.
fn register_rows(hub: &mut Hub, name: &str, rows: usize, prefix: &'static str) {
    hub.register_page(&owner("mod.pages"), name, |page| {
        for r in 0..rows {
            page.item(Item::new(move || format!("{prefix} {r}")));
        }
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_replacing_open_page_with_fewer_rows() {
    let mut hub = Hub::default();
    register_rows(&mut hub, "Tuning", 10, "Old");
    hub.open();
    assert_eq!(hub.select(5, 0, 0), NavOutcome::OpenedPage(0));
    assert_eq!(hub.select(5, 3, 0), NavOutcome::Paged(3));
    assert_eq!(hub.select(5, 3, 0), NavOutcome::Paged(6));

    register_rows(&mut hub, "Tuning", 2, "New");
    let frame = hub.render(5).unwrap();
    assert_eq!(frame.title, "Tuning");
    assert_eq!(frame.rows, vec!["New 0", "New 1", "", "", "BACK"]);
    assert!(!frame.has_next);
    assert_eq!(hub.view(), View::Page(0));
    assert_eq!(hub.select(5, 1, 0), NavOutcome::Invoked(true));
    assert_eq!(hub.select(5, 4, 0), NavOutcome::ReturnedToIndex);
}

#[test]
fn test_replacing_open_page_keeps_reachable_window() {
    let mut hub = Hub::default();
    register_rows(&mut hub, "Tuning", 10, "Old");
    hub.open();
    hub.select(5, 0, 0);
    hub.select(5, 3, 0);
    hub.select(5, 3, 0);

    register_rows(&mut hub, "Tuning", 7, "New");
    let frame = hub.render(5).unwrap();
    assert_eq!(frame.rows, vec!["New 6", "", "", "", "BACK"]);

    register_rows(&mut hub, "Tuning", 5, "New");
    let frame = hub.render(5).unwrap();
    assert_eq!(frame.rows, vec!["New 3", "New 4", "", "", "BACK"]);
}

#[test]
fn test_replacing_page_while_on_index() {
    let mut hub = hub_with_pages(7);
    hub.open();
    hub.select(5, 3, 0);
    assert_eq!(hub.render(5).unwrap().rows[0], "Page 3");

    register_rows(&mut hub, "Page 4", 3, "Row");
    let frame = hub.render(5).unwrap();
    assert_eq!(frame.rows, vec!["Page 3", "Page 4", "Page 5", "NEXT", "BACK"]);
    assert_eq!(hub.select(5, 1, 0), NavOutcome::OpenedPage(4));
    assert_eq!(
        hub.render(5).unwrap().rows,
        vec!["Row 0", "Row 1", "Row 2", "", "BACK"]
    );
}
