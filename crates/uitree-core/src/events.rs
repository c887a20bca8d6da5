//! Ordered multicast event lists for widget lifecycle notifications.
//!
//! Every widget owns eight subscriber lists: before/after × attach/detach
//! for the widget itself, and the four matching "descendant" lists that
//! receive bubbled notifications with the originating widget. Subscribers
//! fire in subscription order and are removed deterministically through the
//! [`Subscription`] handle returned at registration; dropping the handle
//! does not unsubscribe. Subscriptions stay registered for the widget's
//! full lifetime, including across a detach/re-attach cycle.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::widget::Widget;

/// Caller-defined payload forwarded verbatim through every hook and
/// bubbling call of a single attach or detach transition.
pub type Payload<'a> = Option<&'a dyn Any>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum EventKind {
    BeforeAttach,
    AfterAttach,
    BeforeDetach,
    AfterDetach,
    BeforeDescendantAttach,
    AfterDescendantAttach,
    BeforeDescendantDetach,
    AfterDescendantDetach,
}

impl EventKind {
    fn is_descendant(self) -> bool {
        matches!(
            self,
            EventKind::BeforeDescendantAttach
                | EventKind::AfterDescendantAttach
                | EventKind::BeforeDescendantDetach
                | EventKind::AfterDescendantDetach
        )
    }
}

/// Handle identifying one registered callback on one widget.
///
/// Pass it back to [`Widget::unsubscribe`] to remove the callback. The
/// handle is deliberately not `Clone`: a subscription can be removed at
/// most once.
#[derive(Debug)]
pub struct Subscription {
    pub(crate) kind: EventKind,
    pub(crate) id: u64,
}

type SelfCallback = Rc<RefCell<dyn FnMut(Payload<'_>)>>;
type DescendantCallback = Rc<RefCell<dyn FnMut(&Widget, Payload<'_>)>>;

thread_local! {
    // Ids are unique across every registry on the thread, so a handle from
    // one widget never matches an entry of another widget's registry.
    static NEXT_SUBSCRIPTION_ID: Cell<u64> = const { Cell::new(0) };
}

struct Multicast<F: ?Sized> {
    entries: RefCell<IndexMap<u64, Rc<RefCell<F>>>>,
}

impl<F: ?Sized> Default for Multicast<F> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(IndexMap::new()),
        }
    }
}

impl<F: ?Sized> Multicast<F> {
    fn insert(&self, id: u64, callback: Rc<RefCell<F>>) {
        self.entries.borrow_mut().insert(id, callback);
    }

    fn remove(&self, id: u64) -> bool {
        // shift_remove keeps the firing order of the remaining entries.
        self.entries.borrow_mut().shift_remove(&id).is_some()
    }

    /// Snapshot taken so callbacks may subscribe or unsubscribe while the
    /// list is being fired without poisoning the iteration.
    fn snapshot(&self) -> Vec<Rc<RefCell<F>>> {
        self.entries.borrow().values().cloned().collect()
    }
}

#[derive(Default)]
pub(crate) struct EventRegistry {
    before_attach: Multicast<dyn FnMut(Payload<'_>)>,
    after_attach: Multicast<dyn FnMut(Payload<'_>)>,
    before_detach: Multicast<dyn FnMut(Payload<'_>)>,
    after_detach: Multicast<dyn FnMut(Payload<'_>)>,
    before_descendant_attach: Multicast<dyn FnMut(&Widget, Payload<'_>)>,
    after_descendant_attach: Multicast<dyn FnMut(&Widget, Payload<'_>)>,
    before_descendant_detach: Multicast<dyn FnMut(&Widget, Payload<'_>)>,
    after_descendant_detach: Multicast<dyn FnMut(&Widget, Payload<'_>)>,
}

impl EventRegistry {
    fn allocate_id(&self) -> u64 {
        NEXT_SUBSCRIPTION_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        })
    }

    fn self_list(&self, kind: EventKind) -> &Multicast<dyn FnMut(Payload<'_>)> {
        match kind {
            EventKind::BeforeAttach => &self.before_attach,
            EventKind::AfterAttach => &self.after_attach,
            EventKind::BeforeDetach => &self.before_detach,
            EventKind::AfterDetach => &self.after_detach,
            other => unreachable!("{other:?} is not a self event"),
        }
    }

    fn descendant_list(&self, kind: EventKind) -> &Multicast<dyn FnMut(&Widget, Payload<'_>)> {
        match kind {
            EventKind::BeforeDescendantAttach => &self.before_descendant_attach,
            EventKind::AfterDescendantAttach => &self.after_descendant_attach,
            EventKind::BeforeDescendantDetach => &self.before_descendant_detach,
            EventKind::AfterDescendantDetach => &self.after_descendant_detach,
            other => unreachable!("{other:?} is not a descendant event"),
        }
    }

    pub(crate) fn subscribe_self(
        &self,
        kind: EventKind,
        callback: impl FnMut(Payload<'_>) + 'static,
    ) -> Subscription {
        let id = self.allocate_id();
        let callback: SelfCallback = Rc::new(RefCell::new(callback));
        self.self_list(kind).insert(id, callback);
        Subscription { kind, id }
    }

    pub(crate) fn subscribe_descendant(
        &self,
        kind: EventKind,
        callback: impl FnMut(&Widget, Payload<'_>) + 'static,
    ) -> Subscription {
        let id = self.allocate_id();
        let callback: DescendantCallback = Rc::new(RefCell::new(callback));
        self.descendant_list(kind).insert(id, callback);
        Subscription { kind, id }
    }

    pub(crate) fn unsubscribe(&self, subscription: Subscription) -> bool {
        if subscription.kind.is_descendant() {
            self.descendant_list(subscription.kind).remove(subscription.id)
        } else {
            self.self_list(subscription.kind).remove(subscription.id)
        }
    }

    pub(crate) fn emit_self(&self, kind: EventKind, argument: Payload<'_>) {
        for callback in self.self_list(kind).snapshot() {
            (&mut *callback.borrow_mut())(argument);
        }
    }

    pub(crate) fn emit_descendant(
        &self,
        kind: EventKind,
        descendant: &Widget,
        argument: Payload<'_>,
    ) {
        for callback in self.descendant_list(kind).snapshot() {
            (&mut *callback.borrow_mut())(descendant, argument);
        }
    }
}
