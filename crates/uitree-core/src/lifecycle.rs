//! Lifecycle states for widgets.
//!
//! A widget starts in [`WidgetState::Unattached`] and is driven through
//! `Attaching → Attached → Detaching → Detached` by the attach/detach
//! orchestrator. `Detached` is re-enterable: a widget detached without
//! disposal may be attached again, but it never returns to `Unattached`.

/// Attachment state of a single widget.
///
/// Transitions are owned by the engine; external code observes the state
/// but never mutates it directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetState {
    /// Initial state. Never re-entered once left.
    Unattached,
    /// The widget's own attach hook has run (or is running) and its
    /// children are being attached.
    Attaching,
    /// The widget and its entire subtree are attached to a surface.
    Attached,
    /// The widget's children are being detached; its own detach hook has
    /// not completed yet.
    Detaching,
    /// Fully detached. May transition to `Attaching` again.
    Detached,
}

impl WidgetState {
    pub fn is_attached(self) -> bool {
        matches!(self, WidgetState::Attached)
    }

    pub fn is_attaching(self) -> bool {
        matches!(self, WidgetState::Attaching)
    }

    pub fn is_detaching(self) -> bool {
        matches!(self, WidgetState::Detaching)
    }

    /// Shared precondition for attach, dispose, and re-attach: the widget
    /// holds no surface reference in these states.
    pub fn is_non_attached(self) -> bool {
        matches!(self, WidgetState::Unattached | WidgetState::Detached)
    }
}

#[cfg(test)]
mod tests {
    use super::WidgetState;

    #[test]
    fn non_attached_covers_initial_and_terminal_states() {
        assert!(WidgetState::Unattached.is_non_attached());
        assert!(WidgetState::Detached.is_non_attached());
        assert!(!WidgetState::Attaching.is_non_attached());
        assert!(!WidgetState::Attached.is_non_attached());
        assert!(!WidgetState::Detaching.is_non_attached());
    }

    #[test]
    fn attached_is_exclusive() {
        assert!(WidgetState::Attached.is_attached());
        assert!(!WidgetState::Attaching.is_attached());
        assert!(!WidgetState::Detaching.is_attached());
    }
}
