//! A pass wired entirely to recorders.
//!
//! # Example
//!
//! ```
//! use trellis_core::{ComponentId, Value};
//! use trellis_testing::PassHarness;
//!
//! let harness = PassHarness::new();
//! harness.pass().set_state(ComponentId::new(1), Value::from(true));
//! assert_eq!(harness.log().render_requests(), 1);
//! ```

use trellis_core::{
    BuildError, Context, Dispatch, Element, Pass, StateStore, Value, VTree, Widget,
};

use crate::recorders::{
    CountingNormalizer, EventLog, RecordingCommit, RecordingFactory, RecordingScheduler,
};

pub struct PassHarness {
    log: EventLog,
    states: StateStore,
    scheduler: RecordingScheduler,
    normalizer: CountingNormalizer,
    pass: Pass,
}

impl PassHarness {
    pub fn new() -> Self {
        Self::with_context(Context::empty(), Dispatch::noop())
    }

    pub fn with_context(context: Context, dispatch: Dispatch) -> Self {
        let log = EventLog::new();
        let states = StateStore::new();
        let scheduler = RecordingScheduler::new(log.clone());
        let normalizer = CountingNormalizer::new(log.clone());
        let pass = Pass::builder(context, dispatch, states.clone())
            .committer(RecordingCommit::new(log.clone()))
            .scheduler(scheduler.clone())
            .normalizer(normalizer.clone())
            .node_factory(RecordingFactory::new(log.clone()))
            .build();
        Self {
            log,
            states,
            scheduler,
            normalizer,
            pass,
        }
    }

    pub fn pass(&self) -> &Pass {
        &self.pass
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn states(&self) -> &StateStore {
        &self.states
    }

    pub fn render_requests(&self) -> usize {
        self.scheduler.requests()
    }

    pub fn normalizer_calls(&self) -> usize {
        self.normalizer.calls()
    }

    pub fn build(&self, el: &Element) -> Result<Option<VTree>, BuildError> {
        self.pass.build(el)
    }

    /// Builds `el`, which must be a component node, and initializes the widget.
    ///
    /// # Panics
    /// Panics if `el` does not build to a widget.
    pub fn mount(&self, el: &Element) -> Result<Widget, BuildError> {
        let mut widget = match self.pass.build(el)? {
            Some(VTree::Widget(widget)) => widget,
            other => panic!("mount: expected a component element, built {other:?}"),
        };
        widget.init()?;
        Ok(widget)
    }

    pub fn state_of(&self, widget: &Widget) -> Option<Value> {
        self.states.get(widget.id())
    }
}

impl Default for PassHarness {
    fn default() -> Self {
        Self::new()
    }
}
