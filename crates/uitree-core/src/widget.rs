//! Widget handles and the structural tree.
//!
//! A [`Widget`] is a cheap `Rc` handle with reference identity. The child
//! list is the sole owning edge of the tree; parent links are `Weak` so a
//! detached subtree drops as a unit, children first. Structural mutation
//! happens only through [`Widget::attach_child`] and
//! [`Widget::detach_child`] (plus the surface entry points for roots);
//! the lifecycle cascade itself lives in the orchestrator module.
//!
//! Contract violations (attaching a duplicate child, detaching a
//! non-child, disposing an attached widget) are caller bugs and panic
//! immediately. Nothing here retries or rolls back.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::attach;
use crate::behavior::WidgetBehavior;
use crate::cancellation::{CancellationToken, SignalInner};
use crate::events::{EventKind, EventRegistry, Payload, Subscription};
use crate::lifecycle::WidgetState;
use crate::surface::{SurfaceHandle, Viewable, VisualHandle};

pub(crate) struct WidgetInner {
    pub(crate) state: Cell<WidgetState>,
    pub(crate) disposed: Cell<bool>,
    pub(crate) surface: RefCell<Option<SurfaceHandle>>,
    pub(crate) parent: RefCell<Option<Weak<WidgetInner>>>,
    // Guards the append/remove step only; the recursive cascade runs with
    // this borrow released so hooks can inspect the tree.
    pub(crate) children: RefCell<Vec<Widget>>,
    pub(crate) behavior: RefCell<Box<dyn WidgetBehavior>>,
    pub(crate) events: EventRegistry,
    dispose_signal: RefCell<Option<Rc<SignalInner>>>,
}

/// Handle to one node of the widget tree.
pub struct Widget {
    pub(crate) inner: Rc<WidgetInner>,
}

impl Clone for Widget {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("state", &self.state())
            .field("disposed", &self.is_disposed())
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}

impl Widget {
    pub fn new(behavior: impl WidgetBehavior + 'static) -> Self {
        Self {
            inner: Rc::new(WidgetInner {
                state: Cell::new(WidgetState::Unattached),
                disposed: Cell::new(false),
                surface: RefCell::new(None),
                parent: RefCell::new(None),
                children: RefCell::new(Vec::new()),
                behavior: RefCell::new(Box::new(behavior)),
                events: EventRegistry::default(),
                dispose_signal: RefCell::new(None),
            }),
        }
    }

    /// Reference identity; widgets have no value equality.
    pub fn ptr_eq(&self, other: &Widget) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // State

    pub fn state(&self) -> WidgetState {
        self.inner.state.get()
    }

    pub fn is_attached(&self) -> bool {
        self.state().is_attached()
    }

    pub fn is_non_attached(&self) -> bool {
        self.state().is_non_attached()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// The surface this widget is attached to, non-`None` exactly while the
    /// state is `Attaching`, `Attached`, or `Detaching`.
    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.inner.surface.borrow().clone()
    }

    // Structure

    pub fn parent(&self) -> Option<Widget> {
        self.inner
            .parent
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Widget { inner })
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Snapshot of the current child list, in insertion order.
    pub fn children(&self) -> Vec<Widget> {
        self.inner.children.borrow().clone()
    }

    pub fn has_children(&self) -> bool {
        !self.inner.children.borrow().is_empty()
    }

    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: self.parent(),
        }
    }

    pub fn ancestors_and_self(&self) -> Ancestors {
        Ancestors {
            next: Some(self.clone()),
        }
    }

    /// Depth-first descendants. Each widget's children are read when the
    /// iterator reaches it, so the walk reflects the live tree; mutating
    /// the tree while iterating is unsupported.
    pub fn descendants(&self) -> Descendants {
        let mut stack = self.children();
        stack.reverse();
        Descendants { stack }
    }

    pub fn descendants_and_self(&self) -> Descendants {
        Descendants {
            stack: vec![self.clone()],
        }
    }

    // Attach/detach

    /// Appends `child` and, when this widget is attached to a surface,
    /// immediately cascades the attach through the child's subtree with
    /// `argument` forwarded. On a non-surfaced subtree the argument must be
    /// `None`: it only has meaning when a real transition occurs.
    pub fn attach_child(&self, child: &Widget, argument: Payload<'_>) {
        assert!(
            !self.contains_child(child),
            "widget {self:?} already has child {child:?}"
        );
        assert!(
            child.parent().is_none(),
            "child {child:?} already has a parent"
        );
        log::debug!("attach child {child:?} under {self:?}");
        {
            let mut children = self.inner.children.borrow_mut();
            children.push(child.clone());
            *child.inner.parent.borrow_mut() = Some(Rc::downgrade(&self.inner));
        }
        if self.is_attached() {
            let surface = self
                .surface()
                .expect("attached widget must hold a surface");
            attach::attach(child, &surface, argument);
        } else {
            assert!(
                argument.is_none(),
                "attach argument requires a surfaced subtree"
            );
        }
    }

    /// Detaches `child` (cascading bottom-up first when attached), removes
    /// it from the child list, and disposes it when its auto-dispose
    /// capability holds.
    pub fn detach_child(&self, child: &Widget, argument: Payload<'_>) {
        assert!(
            self.contains_child(child),
            "widget {self:?} has no child {child:?}"
        );
        log::debug!("detach child {child:?} from {self:?}");
        if self.is_attached() {
            let surface = self
                .surface()
                .expect("attached widget must hold a surface");
            attach::detach(child, &surface, argument);
        } else {
            assert!(
                argument.is_none(),
                "detach argument requires a surfaced subtree"
            );
        }
        {
            let mut children = self.inner.children.borrow_mut();
            let index = children
                .iter()
                .position(|entry| entry.ptr_eq(child))
                .expect("child list changed during detach");
            children.remove(index);
            *child.inner.parent.borrow_mut() = None;
        }
        if child.dispose_automatically() {
            child.dispose();
        }
    }

    /// Detaches this widget from its parent, or from its surface when it is
    /// an attached root.
    pub fn detach_self(&self, argument: Payload<'_>) {
        if let Some(parent) = self.parent() {
            parent.detach_child(self, argument);
        } else if self.is_attached() {
            self.detach_from_surface(argument);
        } else {
            panic!("widget {self:?} has no parent and is not attached");
        }
    }

    /// Detaches every child, last-attached first.
    pub fn detach_children(&self, argument: Payload<'_>) {
        for child in self.children().into_iter().rev() {
            self.detach_child(&child, argument);
        }
    }

    /// Attaches this root widget to a surface and cascades through its
    /// subtree. The surface must be mounted.
    pub fn attach_to_surface(&self, surface: SurfaceHandle, argument: Payload<'_>) {
        assert!(
            self.is_root(),
            "only a root widget can attach to a surface directly"
        );
        assert!(surface.is_mounted(), "surface is not mounted");
        attach::attach(self, &surface, argument);
    }

    /// Detaches this root widget (and its subtree) from its surface.
    pub fn detach_from_surface(&self, argument: Payload<'_>) {
        assert!(
            self.is_root(),
            "only a root widget can detach from a surface directly"
        );
        let surface = self
            .surface()
            .unwrap_or_else(|| panic!("widget {self:?} is not attached to a surface"));
        attach::detach(self, &surface, argument);
    }

    fn contains_child(&self, child: &Widget) -> bool {
        self.inner
            .children
            .borrow()
            .iter()
            .any(|entry| entry.ptr_eq(child))
    }

    // Disposal

    /// Disposes this widget: every auto-dispose child first (depth-first,
    /// children before self), then the behavior's teardown, then the
    /// cancellation signal. Disposing twice, or while attached, is a
    /// contract violation.
    pub fn dispose(&self) {
        assert!(!self.is_disposed(), "widget {self:?} is already disposed");
        assert!(
            self.is_non_attached(),
            "widget {self:?} must be non-attached to dispose"
        );
        log::debug!("dispose {self:?}");
        for child in self.children() {
            if child.dispose_automatically() {
                child.dispose();
            }
        }
        self.inner.behavior.borrow_mut().on_dispose(self);
        self.inner.disposed.set(true);
        let signal = self.inner.dispose_signal.borrow().clone();
        if let Some(signal) = signal {
            signal.fire();
        }
    }

    /// Token fired at disposal. Created lazily on first access; requesting
    /// it on an already-disposed widget yields an already-cancelled token.
    pub fn dispose_token(&self) -> CancellationToken {
        let mut slot = self.inner.dispose_signal.borrow_mut();
        let inner = slot
            .get_or_insert_with(|| SignalInner::new(self.inner.disposed.get()))
            .clone();
        CancellationToken::from_inner(inner)
    }

    /// Fresh token cancelled by this widget's next after-detach event. The
    /// backing subscription removes itself once fired.
    pub fn detach_token(&self) -> CancellationToken {
        let signal = SignalInner::new(false);
        let fire = signal.clone();
        // The closure lives in this widget's own registry; a strong handle
        // here would cycle and keep the widget alive past disposal.
        let host = Rc::downgrade(&self.inner);
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let registered = slot.clone();
        let subscription = self.on_after_detach(move |_argument| {
            fire.fire();
            if let Some(subscription) = registered.borrow_mut().take() {
                if let Some(inner) = host.upgrade() {
                    inner.events.unsubscribe(subscription);
                }
            }
        });
        *slot.borrow_mut() = Some(subscription);
        CancellationToken::from_inner(signal)
    }

    // Capabilities

    pub fn dispose_automatically(&self) -> bool {
        self.inner.behavior.borrow().dispose_automatically()
    }

    pub fn is_modal(&self) -> bool {
        self.inner.behavior.borrow().is_modal()
    }

    /// The widget's presentation element, when its behavior is viewable.
    pub fn visual(&self) -> Option<VisualHandle> {
        let behavior = self.inner.behavior.borrow();
        behavior.as_viewable().map(Viewable::visual)
    }

    /// Borrows the behavior downcast to its concrete type.
    pub fn with_behavior<B: WidgetBehavior, R>(&self, f: impl FnOnce(&B) -> R) -> Option<R> {
        let behavior = self.inner.behavior.borrow();
        behavior.as_ref().as_any().downcast_ref::<B>().map(f)
    }

    pub fn with_behavior_mut<B: WidgetBehavior, R>(
        &self,
        f: impl FnOnce(&mut B) -> R,
    ) -> Option<R> {
        let mut behavior = self.inner.behavior.borrow_mut();
        behavior.as_mut().as_any_mut().downcast_mut::<B>().map(f)
    }

    // Show/hide plumbing: requests bubble toward the root binding unless a
    // behavior on the way intercepts them.

    pub(crate) fn request_show(&self, shown: &Widget) {
        let handled = self.inner.behavior.borrow_mut().show_widget(self, shown);
        if handled {
            return;
        }
        match self.parent() {
            Some(parent) => parent.request_show(shown),
            None => panic!("no surface binding above {self:?} handled show"),
        }
    }

    pub(crate) fn request_hide(&self, hidden: &Widget) {
        let handled = self.inner.behavior.borrow_mut().hide_widget(self, hidden);
        if handled {
            return;
        }
        match self.parent() {
            Some(parent) => parent.request_hide(hidden),
            None => panic!("no surface binding above {self:?} handled hide"),
        }
    }

    // Events

    pub fn on_before_attach(&self, callback: impl FnMut(Payload<'_>) + 'static) -> Subscription {
        self.inner.events.subscribe_self(EventKind::BeforeAttach, callback)
    }

    pub fn on_after_attach(&self, callback: impl FnMut(Payload<'_>) + 'static) -> Subscription {
        self.inner.events.subscribe_self(EventKind::AfterAttach, callback)
    }

    pub fn on_before_detach(&self, callback: impl FnMut(Payload<'_>) + 'static) -> Subscription {
        self.inner.events.subscribe_self(EventKind::BeforeDetach, callback)
    }

    pub fn on_after_detach(&self, callback: impl FnMut(Payload<'_>) + 'static) -> Subscription {
        self.inner.events.subscribe_self(EventKind::AfterDetach, callback)
    }

    pub fn on_before_descendant_attach(
        &self,
        callback: impl FnMut(&Widget, Payload<'_>) + 'static,
    ) -> Subscription {
        self.inner
            .events
            .subscribe_descendant(EventKind::BeforeDescendantAttach, callback)
    }

    pub fn on_after_descendant_attach(
        &self,
        callback: impl FnMut(&Widget, Payload<'_>) + 'static,
    ) -> Subscription {
        self.inner
            .events
            .subscribe_descendant(EventKind::AfterDescendantAttach, callback)
    }

    pub fn on_before_descendant_detach(
        &self,
        callback: impl FnMut(&Widget, Payload<'_>) + 'static,
    ) -> Subscription {
        self.inner
            .events
            .subscribe_descendant(EventKind::BeforeDescendantDetach, callback)
    }

    pub fn on_after_descendant_detach(
        &self,
        callback: impl FnMut(&Widget, Payload<'_>) + 'static,
    ) -> Subscription {
        self.inner
            .events
            .subscribe_descendant(EventKind::AfterDescendantDetach, callback)
    }

    /// Removes a previously registered callback. Returns `false` when the
    /// subscription was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.inner.events.unsubscribe(subscription)
    }
}

/// Iterator over a widget's ancestor chain, nearest first.
pub struct Ancestors {
    next: Option<Widget>,
}

impl Iterator for Ancestors {
    type Item = Widget;

    fn next(&mut self) -> Option<Widget> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

/// Depth-first, preorder iterator over descendants.
pub struct Descendants {
    stack: Vec<Widget>,
}

impl Iterator for Descendants {
    type Item = Widget;

    fn next(&mut self) -> Option<Widget> {
        let current = self.stack.pop()?;
        let mut children = current.children();
        children.reverse();
        self.stack.extend(children);
        Some(current)
    }
}
