//! Core widget-tree engine.
//!
//! A tree of logical [`Widget`] nodes whose attachment to a presentation
//! [`Surface`] is mediated by a strict lifecycle state machine. The engine
//! owns structure (parent/child links), ordering (top-down attach,
//! bottom-up detach, bubbled before/after events), and disposal with a
//! one-shot cancellation signal. Rendering, layout, and resource loading
//! stay behind the narrow traits in [`surface`] and [`behavior`].
//!
//! Trees are single-threaded by construction: handles are `Rc`-based and
//! mutation of the same node from concurrent contexts is unsupported.

mod attach;
pub mod behavior;
pub mod cancellation;
pub mod events;
pub mod lifecycle;
pub mod surface;
pub mod widget;

pub use behavior::WidgetBehavior;
pub use cancellation::{Cancelled, CancellationToken};
pub use events::{Payload, Subscription};
pub use lifecycle::WidgetState;
pub use surface::{surface_eq, visual_eq, Surface, SurfaceHandle, Viewable, Visual, VisualHandle};
pub use widget::{Ancestors, Descendants, Widget};

pub mod prelude {
    pub use crate::behavior::WidgetBehavior;
    pub use crate::cancellation::CancellationToken;
    pub use crate::events::{Payload, Subscription};
    pub use crate::lifecycle::WidgetState;
    pub use crate::surface::{Surface, SurfaceHandle, Viewable, Visual, VisualHandle};
    pub use crate::widget::Widget;
}
