//! Narrow interfaces to the presentation side.
//!
//! The engine never renders anything itself. A subtree attaches to a
//! [`Surface`], and widgets that carry a presentation element expose it as
//! a [`Visual`] through the [`Viewable`] capability. The root binding in
//! the surface crate drives `Visual::set_displayed` to keep only the top
//! of each slot rendered; everything beyond these traits is out of scope.

use std::any::Any;
use std::rc::Rc;

/// External presentation target a subtree becomes attached to.
pub trait Surface: Any {
    /// Whether the surface is currently able to host widgets. Attaching a
    /// subtree to an unmounted surface is rejected.
    fn is_mounted(&self) -> bool;
}

/// Shared handle to a surface. Identity is the allocation, not the value.
pub type SurfaceHandle = Rc<dyn Surface>;

/// Compares two surface handles by identity.
pub fn surface_eq(a: &SurfaceHandle, b: &SurfaceHandle) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

/// Presentation element bound to a widget. The root binding toggles
/// display as part of the slot stacking discipline.
pub trait Visual: Any {
    fn set_displayed(&self, displayed: bool);
    fn is_displayed(&self) -> bool;
}

/// Shared handle to a visual. Identity is the allocation.
pub type VisualHandle = Rc<dyn Visual>;

/// Compares two visual handles by identity.
pub fn visual_eq(a: &VisualHandle, b: &VisualHandle) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

/// Capability of behaviors that own a presentation element.
pub trait Viewable {
    fn visual(&self) -> VisualHandle;
}
