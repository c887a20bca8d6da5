//! Testing utilities for the uitree widget engine.
//!
//! [`EventLog`] records lifecycle traffic as flat strings, and
//! [`ProbeBehavior`] is a widget behavior that writes every hook it
//! receives into such a log. [`StubSurface`] and [`StubVisual`] stand in
//! for the excluded presentation collaborators.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use uitree_core::behavior::WidgetBehavior;
use uitree_core::events::Payload;
use uitree_core::surface::{Surface, SurfaceHandle, Viewable, Visual, VisualHandle};
use uitree_core::widget::Widget;

/// Shared, ordered record of observed events. Cheap to clone.
#[derive(Clone, Default)]
pub struct EventLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Drains the log, returning everything recorded so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Returns the probe name of `widget`, or `"?"` for non-probe behaviors.
pub fn probe_name(widget: &Widget) -> String {
    widget
        .with_behavior::<ProbeBehavior, _>(|probe| probe.name().to_owned())
        .unwrap_or_else(|| "?".to_owned())
}

/// Behavior that records every lifecycle hook into an [`EventLog`].
///
/// Entries follow the pattern `hook:name`, with bubbled hooks written as
/// `hook:name<-origin`.
pub struct ProbeBehavior {
    name: String,
    log: EventLog,
    auto_dispose: bool,
    modal: bool,
    visual: Option<Rc<StubVisual>>,
}

impl ProbeBehavior {
    pub fn new(name: impl Into<String>, log: &EventLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            auto_dispose: true,
            modal: false,
            visual: None,
        }
    }

    /// Disables the auto-dispose capability.
    pub fn manual_dispose(mut self) -> Self {
        self.auto_dispose = false;
        self
    }

    /// Marks the probe for the modal slot of a root binding.
    pub fn modal(mut self) -> Self {
        self.modal = true;
        self
    }

    /// Gives the probe a presentation element, making it viewable.
    pub fn with_visual(mut self, visual: Rc<StubVisual>) -> Self {
        self.visual = Some(visual);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn record(&self, hook: &str) {
        self.log.push(format!("{hook}:{}", self.name));
    }

    fn record_bubble(&self, hook: &str, origin: &Widget) {
        self.log
            .push(format!("{hook}:{}<-{}", self.name, probe_name(origin)));
    }
}

impl Viewable for ProbeBehavior {
    fn visual(&self) -> VisualHandle {
        self.visual
            .clone()
            .expect("probe behavior queried for a visual it does not have")
    }
}

impl WidgetBehavior for ProbeBehavior {
    fn on_attach(&mut self, _host: &Widget, _argument: Payload<'_>) {
        self.record("attach");
    }

    fn on_detach(&mut self, _host: &Widget, _argument: Payload<'_>) {
        self.record("detach");
    }

    fn on_before_attach(&mut self, _host: &Widget, _argument: Payload<'_>) {
        self.record("before_attach");
    }

    fn on_after_attach(&mut self, _host: &Widget, _argument: Payload<'_>) {
        self.record("after_attach");
    }

    fn on_before_detach(&mut self, _host: &Widget, _argument: Payload<'_>) {
        self.record("before_detach");
    }

    fn on_after_detach(&mut self, _host: &Widget, _argument: Payload<'_>) {
        self.record("after_detach");
    }

    fn on_before_descendant_attach(
        &mut self,
        _host: &Widget,
        descendant: &Widget,
        _argument: Payload<'_>,
    ) {
        self.record_bubble("before_descendant_attach", descendant);
    }

    fn on_after_descendant_attach(
        &mut self,
        _host: &Widget,
        descendant: &Widget,
        _argument: Payload<'_>,
    ) {
        self.record_bubble("after_descendant_attach", descendant);
    }

    fn on_before_descendant_detach(
        &mut self,
        _host: &Widget,
        descendant: &Widget,
        _argument: Payload<'_>,
    ) {
        self.record_bubble("before_descendant_detach", descendant);
    }

    fn on_after_descendant_detach(
        &mut self,
        _host: &Widget,
        descendant: &Widget,
        _argument: Payload<'_>,
    ) {
        self.record_bubble("after_descendant_detach", descendant);
    }

    fn on_dispose(&mut self, _host: &Widget) {
        self.record("dispose");
    }

    fn dispose_automatically(&self) -> bool {
        self.auto_dispose
    }

    fn is_modal(&self) -> bool {
        self.modal
    }

    fn as_viewable(&self) -> Option<&dyn Viewable> {
        if self.visual.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

/// Stub presentation surface.
pub struct StubSurface {
    mounted: Cell<bool>,
}

impl StubSurface {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            mounted: Cell::new(true),
        })
    }

    pub fn unmounted() -> Rc<Self> {
        Rc::new(Self {
            mounted: Cell::new(false),
        })
    }

    pub fn set_mounted(&self, mounted: bool) {
        self.mounted.set(mounted);
    }

    pub fn handle(self: &Rc<Self>) -> SurfaceHandle {
        let handle: SurfaceHandle = self.clone();
        handle
    }
}

impl Surface for StubSurface {
    fn is_mounted(&self) -> bool {
        self.mounted.get()
    }
}

/// Stub visual tracking only its displayed flag. Starts displayed.
pub struct StubVisual {
    displayed: Cell<bool>,
}

impl StubVisual {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            displayed: Cell::new(true),
        })
    }

    pub fn handle(self: &Rc<Self>) -> VisualHandle {
        let handle: VisualHandle = self.clone();
        handle
    }
}

impl Visual for StubVisual {
    fn set_displayed(&self, displayed: bool) {
        self.displayed.set(displayed);
    }

    fn is_displayed(&self) -> bool {
        self.displayed.get()
    }
}
