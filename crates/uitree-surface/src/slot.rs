//! Ordered presentation slots with strict stack discipline.
//!
//! A slot holds the visuals of the widgets currently shown in it, in show
//! order. Only the topmost visual is displayed; showing a widget occludes
//! the previous top, hiding restores it. Hiding anything but the top is a
//! contract violation: the UI model assumes strict LIFO, not arbitrary
//! removal.

use std::cell::{Cell, RefCell};

use uitree_core::surface::{visual_eq, VisualHandle};

pub struct WidgetSlot {
    visuals: RefCell<Vec<VisualHandle>>,
    enabled: Cell<bool>,
}

impl Default for WidgetSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetSlot {
    pub fn new() -> Self {
        Self {
            visuals: RefCell::new(Vec::new()),
            enabled: Cell::new(true),
        }
    }

    pub fn len(&self) -> usize {
        self.visuals.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.borrow().is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    pub fn top(&self) -> Option<VisualHandle> {
        self.visuals.borrow().last().cloned()
    }

    /// Pushes `visual` onto the slot and occludes the sibling it covers.
    pub fn show(&self, visual: VisualHandle) {
        let mut visuals = self.visuals.borrow_mut();
        if let Some(covered) = visuals.last() {
            covered.set_displayed(false);
        }
        visuals.push(visual);
    }

    /// Removes `visual`, which must be the topmost element, and restores
    /// the sibling it uncovered.
    pub fn hide(&self, visual: &VisualHandle) {
        let mut visuals = self.visuals.borrow_mut();
        let top = visuals
            .last()
            .unwrap_or_else(|| panic!("cannot hide from an empty slot"));
        assert!(
            visual_eq(top, visual),
            "only the topmost widget of a slot can be hidden"
        );
        visuals.pop();
        if let Some(uncovered) = visuals.last() {
            uncovered.set_displayed(true);
        }
    }
}
