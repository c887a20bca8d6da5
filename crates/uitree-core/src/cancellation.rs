//! One-shot cancellation signal tied to widget disposal.
//!
//! Each widget lazily creates a single signal on first token access. The
//! signal fires exactly once, at [`Widget::dispose`], and can never be
//! re-armed. Consumers hand the token to asynchronous collaborators (for
//! example an in-flight asset load) so the operation can abort
//! cooperatively once its owning widget is gone. The engine only produces
//! the signal; it never blocks on it.
//!
//! [`Widget::dispose`]: crate::widget::Widget::dispose

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

pub(crate) struct SignalInner {
    cancelled: Cell<bool>,
    wakers: RefCell<Vec<Waker>>,
}

impl SignalInner {
    pub(crate) fn new(cancelled: bool) -> Rc<Self> {
        Rc::new(Self {
            cancelled: Cell::new(cancelled),
            wakers: RefCell::new(Vec::new()),
        })
    }

    /// Fires the signal. Idempotent: the second and later calls are no-ops,
    /// so observers are woken exactly once.
    pub(crate) fn fire(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        let wakers: Vec<Waker> = self.wakers.borrow_mut().drain(..).collect();
        for waker in wakers {
            waker.wake();
        }
    }
}

/// Handle to a widget's disposal signal.
///
/// Cheap to clone; every clone observes the same underlying signal.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Rc<SignalInner>,
}

impl CancellationToken {
    pub(crate) fn from_inner(inner: Rc<SignalInner>) -> Self {
        Self { inner }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Future that resolves once the signal fires. Resolves immediately if
    /// the signal already fired.
    pub fn cancelled(&self) -> Cancelled {
        Cancelled {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Future returned by [`CancellationToken::cancelled`].
pub struct Cancelled {
    inner: Rc<SignalInner>,
}

impl Future for Cancelled {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.inner.cancelled.get() {
            return Poll::Ready(());
        }
        let mut wakers = self.inner.wakers.borrow_mut();
        if !wakers.iter().any(|waker| waker.will_wake(cx.waker())) {
            wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_task::{waker, ArcWake};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingWake {
        wakes: AtomicUsize,
    }

    impl ArcWake for CountingWake {
        fn wake_by_ref(arc_self: &Arc<Self>) {
            arc_self.wakes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn poll(future: &mut Cancelled, cx: &mut Context<'_>) -> Poll<()> {
        Pin::new(future).poll(cx)
    }

    #[test]
    fn token_observes_fire_exactly_once() {
        let signal = SignalInner::new(false);
        let token = CancellationToken::from_inner(signal.clone());
        let clone = token.clone();
        assert!(!token.is_cancelled());

        signal.fire();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());

        // Second fire is a no-op.
        signal.fire();
        assert!(token.is_cancelled());
    }

    #[test]
    fn token_created_after_fire_is_already_cancelled() {
        let signal = SignalInner::new(true);
        let token = CancellationToken::from_inner(signal);
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancelled_future_wakes_on_fire() {
        let signal = SignalInner::new(false);
        let token = CancellationToken::from_inner(signal.clone());
        let wake = Arc::new(CountingWake {
            wakes: AtomicUsize::new(0),
        });
        let waker = waker(wake.clone());
        let mut cx = Context::from_waker(&waker);

        let mut future = token.cancelled();
        assert_eq!(poll(&mut future, &mut cx), Poll::Pending);
        // Re-polling with the same waker must not register it twice.
        assert_eq!(poll(&mut future, &mut cx), Poll::Pending);

        signal.fire();
        assert_eq!(wake.wakes.load(Ordering::SeqCst), 1);
        assert_eq!(poll(&mut future, &mut cx), Poll::Ready(()));
    }

    #[test]
    fn cancelled_future_is_immediate_after_fire() {
        let signal = SignalInner::new(false);
        signal.fire();
        let token = CancellationToken::from_inner(signal);
        let waker = futures_task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut future = token.cancelled();
        assert_eq!(poll(&mut future, &mut cx), Poll::Ready(()));
    }
}
