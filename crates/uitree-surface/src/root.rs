//! Root widget: the top-of-tree surface binding.
//!
//! Show/hide requests bubbling up from descendants terminate here and are
//! mapped onto two slots: a normal stack and a modal stack, chosen by the
//! shown widget's modal capability. While the modal stack is non-empty
//! the whole normal stack is disabled.

use std::rc::Rc;

use uitree_core::behavior::WidgetBehavior;
use uitree_core::events::Payload;
use uitree_core::widget::Widget;

use crate::slot::WidgetSlot;

/// Presentation-side state owned by a [`RootWidget`]. Shared so callers
/// can keep inspecting the slots after the behavior moved into a widget.
pub struct RootView {
    widget_slot: WidgetSlot,
    modal_slot: WidgetSlot,
}

impl RootView {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            widget_slot: WidgetSlot::new(),
            modal_slot: WidgetSlot::new(),
        })
    }

    pub fn widget_slot(&self) -> &WidgetSlot {
        &self.widget_slot
    }

    pub fn modal_slot(&self) -> &WidgetSlot {
        &self.modal_slot
    }
}

/// Behavior for the widget at the top of a tree. Intercepts show/hide
/// requests forwarded by the intervening ancestors and applies the slot
/// stacking discipline.
pub struct RootWidget {
    view: Rc<RootView>,
}

impl RootWidget {
    pub fn new() -> Self {
        Self {
            view: RootView::new(),
        }
    }

    pub fn view(&self) -> Rc<RootView> {
        self.view.clone()
    }
}

impl Default for RootWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetBehavior for RootWidget {
    fn on_attach(&mut self, _host: &Widget, _argument: Payload<'_>) {}

    fn on_detach(&mut self, _host: &Widget, _argument: Payload<'_>) {}

    fn show_widget(&mut self, _host: &Widget, shown: &Widget) -> bool {
        // Only viewable widgets generate show traffic; swallow anything
        // else so it does not escape past the root.
        let Some(visual) = shown.visual() else {
            return true;
        };
        if shown.is_modal() {
            log::debug!("show modal widget {shown:?}");
            self.view.modal_slot.show(visual);
            self.view.widget_slot.set_enabled(false);
        } else {
            log::debug!("show widget {shown:?}");
            self.view.widget_slot.show(visual);
        }
        true
    }

    fn hide_widget(&mut self, _host: &Widget, hidden: &Widget) -> bool {
        let Some(visual) = hidden.visual() else {
            return true;
        };
        if hidden.is_modal() {
            log::debug!("hide modal widget {hidden:?}");
            self.view.modal_slot.hide(&visual);
            if self.view.modal_slot.is_empty() {
                self.view.widget_slot.set_enabled(true);
            }
        } else {
            log::debug!("hide widget {hidden:?}");
            self.view.widget_slot.hide(&visual);
        }
        true
    }
}
