use std::panic::{catch_unwind, AssertUnwindSafe};

use uitree_core::widget::Widget;

use uitree_testing::{EventLog, ProbeBehavior, StubSurface};

fn probe(name: &str, log: &EventLog) -> Widget {
    Widget::new(ProbeBehavior::new(name, log))
}

#[test]
fn dispose_cascades_to_auto_dispose_children_only() {
    let log = EventLog::new();
    let parent = probe("parent", &log);
    let auto1 = probe("auto1", &log);
    let auto2 = probe("auto2", &log);
    let manual = Widget::new(ProbeBehavior::new("manual", &log).manual_dispose());
    parent.attach_child(&auto1, None);
    parent.attach_child(&auto2, None);
    parent.attach_child(&manual, None);

    parent.dispose();

    assert!(auto1.is_disposed());
    assert!(auto2.is_disposed());
    assert!(!manual.is_disposed());
    assert!(parent.is_disposed());
    // Children dispose before the parent's own teardown.
    assert_eq!(
        log.take(),
        vec!["dispose:auto1", "dispose:auto2", "dispose:parent"]
    );
}

#[test]
fn detach_child_disposes_automatically() {
    let log = EventLog::new();
    let parent = probe("parent", &log);
    let child = probe("child", &log);
    parent.attach_child(&child, None);

    parent.detach_child(&child, None);
    assert!(child.is_disposed());
    assert!(child.parent().is_none());
    assert!(!parent.has_children());
}

#[test]
fn detach_child_honors_manual_dispose() {
    let log = EventLog::new();
    let parent = probe("parent", &log);
    let child = Widget::new(ProbeBehavior::new("child", &log).manual_dispose());
    parent.attach_child(&child, None);

    parent.detach_child(&child, None);
    assert!(!child.is_disposed());
    assert!(child.parent().is_none());
}

#[test]
#[should_panic(expected = "must be non-attached to dispose")]
fn disposing_an_attached_widget_is_a_contract_violation() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let surface = StubSurface::new();
    root.attach_to_surface(surface.handle(), None);
    root.dispose();
}

#[test]
#[should_panic(expected = "is already disposed")]
fn double_dispose_is_a_contract_violation() {
    let log = EventLog::new();
    let widget = probe("w", &log);
    widget.dispose();
    widget.dispose();
}

#[test]
fn dispose_tokens_share_one_signal_fired_at_dispose() {
    let log = EventLog::new();
    let widget = probe("w", &log);

    let first = widget.dispose_token();
    let second = widget.dispose_token();
    assert!(!first.is_cancelled());
    assert!(!second.is_cancelled());

    widget.dispose();
    assert!(first.is_cancelled());
    assert!(second.is_cancelled());
}

#[test]
fn dispose_token_after_dispose_is_already_cancelled() {
    let log = EventLog::new();
    let widget = probe("w", &log);
    widget.dispose();
    assert!(widget.dispose_token().is_cancelled());
}

#[test]
fn detach_token_fires_on_next_detach_only() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let surface = StubSurface::new();

    let token = root.detach_token();
    root.attach_to_surface(surface.handle(), None);
    assert!(!token.is_cancelled());

    root.detach_from_surface(None);
    assert!(token.is_cancelled());

    // The backing subscription removed itself; a second cycle needs a
    // fresh token.
    let fresh = root.detach_token();
    root.attach_to_surface(surface.handle(), None);
    root.detach_from_surface(None);
    assert!(fresh.is_cancelled());
}

#[test]
fn duplicate_attach_panics_without_mutating_the_tree() {
    let log = EventLog::new();
    let parent = probe("parent", &log);
    let child = probe("child", &log);
    parent.attach_child(&child, None);

    let result = catch_unwind(AssertUnwindSafe(|| {
        parent.attach_child(&child, None);
    }));
    assert!(result.is_err());
    assert_eq!(parent.children().len(), 1);
    assert!(child.parent().expect("child keeps its parent").ptr_eq(&parent));
}

#[test]
#[should_panic(expected = "has no child")]
fn detaching_a_non_child_is_a_contract_violation() {
    let log = EventLog::new();
    let parent = probe("parent", &log);
    let stranger = probe("stranger", &log);
    parent.detach_child(&stranger, None);
}
