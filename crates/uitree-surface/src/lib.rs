//! Root/surface binding for the uitree widget engine.
//!
//! Maps logical attach/detach of viewable widgets onto ordered
//! presentation slots: a normal stack and a modal stack with strict LIFO
//! visibility (only the top of each slot is displayed, the modal stack
//! disables the normal one while occupied).

pub mod root;
pub mod slot;

pub use root::{RootView, RootWidget};
pub use slot::WidgetSlot;

pub mod prelude {
    pub use crate::root::{RootView, RootWidget};
    pub use crate::slot::WidgetSlot;
}
