//! Attach/detach orchestrator.
//!
//! Drives the lifecycle state machine and the event fabric together:
//! attach walks the subtree top-down, detach bottom-up in reverse child
//! order (last attached, first detached). For each widget the phases are
//!
//! attach:  before events → Attaching → behavior attach hook → show →
//!          children → Attached → after events
//! detach:  before events → Detaching → children (reverse) → hide →
//!          behavior detach hook → Detached, surface cleared → after events
//!
//! Every before/after phase bubbles to each ancestor exactly once,
//! nearest first, carrying the originating widget. All bubbling for one
//! phase completes before the next structural step begins, so children are
//! fully attached before the parent's after-attach fires and fully
//! detached before the parent's after-detach fires.
//!
//! No rollback is attempted: if a hook panics mid-cascade the tree keeps
//! whatever progress the cascade made, and the caller is expected to tear
//! the subtree down via detach/dispose.

use crate::events::{EventKind, Payload};
use crate::lifecycle::WidgetState;
use crate::surface::{surface_eq, SurfaceHandle};
use crate::widget::Widget;

pub(crate) fn attach(widget: &Widget, surface: &SurfaceHandle, argument: Payload<'_>) {
    assert!(
        !widget.is_disposed(),
        "widget {widget:?} is disposed and cannot attach"
    );
    assert!(
        widget.is_non_attached(),
        "widget {widget:?} must be non-attached to attach"
    );
    debug_assert!(widget.surface().is_none());

    emit_self_and_bubble(
        widget,
        argument,
        EventKind::BeforeAttach,
        EventKind::BeforeDescendantAttach,
    );
    log::trace!("attaching {widget:?}");

    *widget.inner.surface.borrow_mut() = Some(surface.clone());
    widget.inner.state.set(WidgetState::Attaching);
    widget.inner.behavior.borrow_mut().on_attach(widget, argument);
    // Only viewable widgets produce visibility traffic toward the root
    // binding; a widget without a visual has nothing to stack.
    if widget.visual().is_some() {
        if let Some(parent) = widget.parent() {
            parent.request_show(widget);
        }
    }
    for child in widget.children() {
        attach(&child, surface, argument);
    }
    widget.inner.state.set(WidgetState::Attached);

    emit_self_and_bubble(
        widget,
        argument,
        EventKind::AfterAttach,
        EventKind::AfterDescendantAttach,
    );
    log::trace!("attached {widget:?}");
}

pub(crate) fn detach(widget: &Widget, surface: &SurfaceHandle, argument: Payload<'_>) {
    assert!(
        widget.is_attached(),
        "widget {widget:?} must be attached to detach"
    );
    let current = widget
        .surface()
        .expect("attached widget must hold a surface");
    assert!(
        surface_eq(&current, surface),
        "widget {widget:?} is attached to a different surface"
    );

    emit_self_and_bubble(
        widget,
        argument,
        EventKind::BeforeDetach,
        EventKind::BeforeDescendantDetach,
    );
    log::trace!("detaching {widget:?}");

    widget.inner.state.set(WidgetState::Detaching);
    for child in widget.children().into_iter().rev() {
        detach(&child, surface, argument);
    }
    if widget.visual().is_some() {
        if let Some(parent) = widget.parent() {
            parent.request_hide(widget);
        }
    }
    widget.inner.behavior.borrow_mut().on_detach(widget, argument);
    widget.inner.state.set(WidgetState::Detached);
    *widget.inner.surface.borrow_mut() = None;

    emit_self_and_bubble(
        widget,
        argument,
        EventKind::AfterDetach,
        EventKind::AfterDescendantDetach,
    );
    log::trace!("detached {widget:?}");
}

/// Fires one phase: the origin's behavior hook, then its subscribers, then
/// each ancestor nearest first (hook before subscribers) with the origin
/// forwarded.
fn emit_self_and_bubble(
    origin: &Widget,
    argument: Payload<'_>,
    self_kind: EventKind,
    descendant_kind: EventKind,
) {
    {
        let mut behavior = origin.inner.behavior.borrow_mut();
        match self_kind {
            EventKind::BeforeAttach => behavior.on_before_attach(origin, argument),
            EventKind::AfterAttach => behavior.on_after_attach(origin, argument),
            EventKind::BeforeDetach => behavior.on_before_detach(origin, argument),
            EventKind::AfterDetach => behavior.on_after_detach(origin, argument),
            other => unreachable!("{other:?} is not a self phase"),
        }
    }
    origin.inner.events.emit_self(self_kind, argument);

    for ancestor in origin.ancestors() {
        {
            let mut behavior = ancestor.inner.behavior.borrow_mut();
            match descendant_kind {
                EventKind::BeforeDescendantAttach => {
                    behavior.on_before_descendant_attach(&ancestor, origin, argument)
                }
                EventKind::AfterDescendantAttach => {
                    behavior.on_after_descendant_attach(&ancestor, origin, argument)
                }
                EventKind::BeforeDescendantDetach => {
                    behavior.on_before_descendant_detach(&ancestor, origin, argument)
                }
                EventKind::AfterDescendantDetach => {
                    behavior.on_after_descendant_detach(&ancestor, origin, argument)
                }
                other => unreachable!("{other:?} is not a descendant phase"),
            }
        }
        ancestor
            .inner
            .events
            .emit_descendant(descendant_kind, origin, argument);
    }
}
