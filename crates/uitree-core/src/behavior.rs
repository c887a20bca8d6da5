//! Behavior trait supplied by concrete widget types.
//!
//! A [`Widget`](crate::widget::Widget) is engine plumbing; all
//! domain-specific setup and teardown lives in its [`WidgetBehavior`].
//! `on_attach`/`on_detach` are mandatory, everything else defaults to pure
//! bubbling or a no-op so most behaviors implement only what they need.

use std::any::Any;

use crate::events::Payload;
use crate::surface::Viewable;
use crate::widget::Widget;

pub trait WidgetBehavior: Any {
    /// Domain setup. Runs while the widget is `Attaching`, before its
    /// children cascade. Children attached from here join the cascade.
    fn on_attach(&mut self, host: &Widget, argument: Payload<'_>);

    /// Domain teardown. Runs while the widget is `Detaching`, after its
    /// children have detached.
    fn on_detach(&mut self, host: &Widget, argument: Payload<'_>);

    fn on_before_attach(&mut self, _host: &Widget, _argument: Payload<'_>) {}
    fn on_after_attach(&mut self, _host: &Widget, _argument: Payload<'_>) {}
    fn on_before_detach(&mut self, _host: &Widget, _argument: Payload<'_>) {}
    fn on_after_detach(&mut self, _host: &Widget, _argument: Payload<'_>) {}

    /// Bubbled notifications. `descendant` is always the originating
    /// widget, not the intermediate ancestor the bubble passed through.
    fn on_before_descendant_attach(
        &mut self,
        _host: &Widget,
        _descendant: &Widget,
        _argument: Payload<'_>,
    ) {
    }
    fn on_after_descendant_attach(
        &mut self,
        _host: &Widget,
        _descendant: &Widget,
        _argument: Payload<'_>,
    ) {
    }
    fn on_before_descendant_detach(
        &mut self,
        _host: &Widget,
        _descendant: &Widget,
        _argument: Payload<'_>,
    ) {
    }
    fn on_after_descendant_detach(
        &mut self,
        _host: &Widget,
        _descendant: &Widget,
        _argument: Payload<'_>,
    ) {
    }

    /// Show/hide interception. Return `true` when handled; the default
    /// leaves the request to bubble toward the root binding.
    fn show_widget(&mut self, _host: &Widget, _shown: &Widget) -> bool {
        false
    }
    fn hide_widget(&mut self, _host: &Widget, _hidden: &Widget) -> bool {
        false
    }

    /// Teardown of owned resources, called once during disposal. Disposal
    /// is strictly children-first: every auto-dispose child has already
    /// been disposed when this runs, so a teardown here may not rely on
    /// any child still being usable.
    fn on_dispose(&mut self, _host: &Widget) {}

    /// Whether detaching this widget from its parent disposes it
    /// immediately.
    fn dispose_automatically(&self) -> bool {
        true
    }

    /// Whether the root binding places this widget on the modal slot.
    fn is_modal(&self) -> bool {
        false
    }

    /// Optional presentation capability.
    fn as_viewable(&self) -> Option<&dyn Viewable> {
        None
    }
}

impl dyn WidgetBehavior {
    pub fn as_any(&self) -> &dyn Any {
        self
    }

    pub fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
