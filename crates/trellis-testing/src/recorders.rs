//! Recording stand-ins for the host ports and external collaborators.
//!
//! All recorders can share one [`EventLog`], which makes cross-port ordering
//! (commit before render request, children before parent) directly
//! observable in a test.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_core::{
    CommitState, ComponentId, DefaultNormalizer, Hyperscript, NodeFactory, PropNormalizer, Props,
    RenderScheduler, StateStore, VTree, Value,
};

/// One observable call into a port.
#[derive(Debug, Clone, PartialEq)]
pub enum PortEvent {
    Commit { id: ComponentId, state: Value },
    RenderRequested,
    Normalized { keys: Vec<String> },
    NodeMade { tag: String, children: usize },
}

/// Shared, ordered record of port calls.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<PortEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: PortEvent) {
        log::trace!("port event: {:?}", event);
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<PortEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn count(&self, matches: impl Fn(&PortEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| matches(e)).count()
    }

    pub fn render_requests(&self) -> usize {
        self.count(|e| matches!(e, PortEvent::RenderRequested))
    }

    pub fn commits(&self) -> usize {
        self.count(|e| matches!(e, PortEvent::Commit { .. }))
    }

    /// Tags in the order the node factory built them.
    pub fn nodes_made(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                PortEvent::NodeMade { tag, .. } => Some(tag.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Render scheduler that only records requests.
#[derive(Debug, Clone)]
pub struct RecordingScheduler {
    log: EventLog,
    requests: Rc<Cell<usize>>,
}

impl RecordingScheduler {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            requests: Rc::new(Cell::new(0)),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl RenderScheduler for RecordingScheduler {
    fn request_render(&self) {
        self.requests.set(self.requests.get() + 1);
        self.log.push(PortEvent::RenderRequested);
    }
}

/// Commit port that writes into the store and records the call.
#[derive(Debug, Clone)]
pub struct RecordingCommit {
    log: EventLog,
}

impl RecordingCommit {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl CommitState for RecordingCommit {
    fn commit(&self, states: &StateStore, id: ComponentId, state: Value) {
        states.insert(id, state.clone());
        self.log.push(PortEvent::Commit { id, state });
    }
}

/// [`DefaultNormalizer`] that records each call.
#[derive(Debug, Clone)]
pub struct CountingNormalizer {
    log: EventLog,
    calls: Rc<Cell<usize>>,
}

impl CountingNormalizer {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl PropNormalizer for CountingNormalizer {
    fn normalize(&self, props: &Props) -> Props {
        self.calls.set(self.calls.get() + 1);
        self.log.push(PortEvent::Normalized {
            keys: props.keys().cloned().collect(),
        });
        DefaultNormalizer.normalize(props)
    }
}

/// [`Hyperscript`] factory that records each node it makes.
#[derive(Debug, Clone)]
pub struct RecordingFactory {
    log: EventLog,
}

impl RecordingFactory {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl NodeFactory for RecordingFactory {
    fn make_node(&self, tag: &str, props: Props, children: Vec<Option<VTree>>) -> VTree {
        self.log.push(PortEvent::NodeMade {
            tag: tag.to_string(),
            children: children.len(),
        });
        Hyperscript.make_node(tag, props, children)
    }
}
