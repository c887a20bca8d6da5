use uitree_core::lifecycle::WidgetState;
use uitree_core::widget::Widget;

use uitree_testing::{EventLog, ProbeBehavior, StubSurface};

fn probe(name: &str, log: &EventLog) -> Widget {
    Widget::new(ProbeBehavior::new(name, log))
}

fn filtered(log: &EventLog, hook: &str) -> Vec<String> {
    log.entries()
        .into_iter()
        .filter(|entry| entry.starts_with(&format!("{hook}:")))
        .collect()
}

#[test]
fn attach_runs_top_down_and_detach_is_lifo() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let c1 = probe("c1", &log);
    let c2 = probe("c2", &log);
    let c3 = probe("c3", &log);
    root.attach_child(&c1, None);
    root.attach_child(&c2, None);
    root.attach_child(&c3, None);

    let surface = StubSurface::new();
    root.attach_to_surface(surface.handle(), None);
    assert_eq!(
        filtered(&log, "attach"),
        vec!["attach:root", "attach:c1", "attach:c2", "attach:c3"]
    );
    assert!(root.is_attached());
    assert!(c3.is_attached());

    log.clear();
    root.detach_from_surface(None);
    assert_eq!(
        filtered(&log, "detach"),
        vec!["detach:c3", "detach:c2", "detach:c1", "detach:root"]
    );
    assert_eq!(root.state(), WidgetState::Detached);
    assert_eq!(c1.state(), WidgetState::Detached);
}

#[test]
fn children_complete_before_parent_after_attach() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let child = probe("child", &log);
    root.attach_child(&child, None);

    let surface = StubSurface::new();
    root.attach_to_surface(surface.handle(), None);

    assert_eq!(
        log.take(),
        vec![
            "before_attach:root",
            "attach:root",
            "before_attach:child",
            "before_descendant_attach:root<-child",
            "attach:child",
            "after_attach:child",
            "after_descendant_attach:root<-child",
            "after_attach:root",
        ]
    );
}

#[test]
fn children_detach_before_parent_detach_hook() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let child = probe("child", &log);
    root.attach_child(&child, None);

    let surface = StubSurface::new();
    root.attach_to_surface(surface.handle(), None);
    log.clear();

    root.detach_from_surface(None);
    assert_eq!(
        log.take(),
        vec![
            "before_detach:root",
            "before_detach:child",
            "before_descendant_detach:root<-child",
            "detach:child",
            "after_detach:child",
            "after_descendant_detach:root<-child",
            "detach:root",
            "after_detach:root",
        ]
    );
}

#[test]
fn attach_child_to_attached_parent_cascades_immediately() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let surface = StubSurface::new();
    root.attach_to_surface(surface.handle(), None);
    log.clear();

    let late = probe("late", &log);
    root.attach_child(&late, None);
    assert!(late.is_attached());
    assert_eq!(filtered(&log, "attach"), vec!["attach:late"]);
}

#[test]
fn detached_widget_can_attach_again() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let surface = StubSurface::new();

    root.attach_to_surface(surface.handle(), None);
    root.detach_from_surface(None);
    assert_eq!(root.state(), WidgetState::Detached);

    root.attach_to_surface(surface.handle(), None);
    assert!(root.is_attached());
    assert_eq!(
        filtered(&log, "attach"),
        vec!["attach:root", "attach:root"]
    );
}

#[test]
fn subscriptions_survive_reattach_until_unsubscribed() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let surface = StubSurface::new();

    let seen = EventLog::new();
    let sink = seen.clone();
    let subscription = root.on_after_attach(move |_| sink.push("after"));

    root.attach_to_surface(surface.handle(), None);
    root.detach_from_surface(None);
    root.attach_to_surface(surface.handle(), None);
    assert_eq!(seen.take(), vec!["after", "after"]);

    root.detach_from_surface(None);
    assert!(root.unsubscribe(subscription));
    root.attach_to_surface(surface.handle(), None);
    assert!(seen.take().is_empty());
}

#[test]
fn payload_reaches_hooks_and_subscribers_for_one_transition() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let surface = StubSurface::new();
    root.attach_to_surface(surface.handle(), None);

    let child = probe("child", &log);
    let seen = EventLog::new();
    let sink = seen.clone();
    child.on_after_attach(move |argument| {
        let value = argument
            .and_then(|any| any.downcast_ref::<u32>())
            .copied()
            .unwrap_or_default();
        sink.push(format!("payload={value}"));
    });

    root.attach_child(&child, Some(&42u32));
    assert_eq!(seen.take(), vec!["payload=42"]);
}

#[test]
#[should_panic(expected = "attach argument requires a surfaced subtree")]
fn attach_argument_rejected_on_unsurfaced_subtree() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let child = probe("child", &log);
    root.attach_child(&child, Some(&1u32));
}

#[test]
#[should_panic(expected = "surface is not mounted")]
fn attach_to_unmounted_surface_is_rejected() {
    let log = EventLog::new();
    let root = probe("root", &log);
    let surface = StubSurface::unmounted();
    root.attach_to_surface(surface.handle(), None);
}

#[test]
#[should_panic(expected = "is not attached to a surface")]
fn detach_from_surface_requires_attachment() {
    let log = EventLog::new();
    let root = probe("root", &log);
    root.detach_from_surface(None);
}
