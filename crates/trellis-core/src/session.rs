//! A minimal hosting runtime.
//!
//! [`Session`] owns the state store for an application session and drives
//! render cycles: it builds the root through a fresh [`Pass`], instantiates
//! every widget depth-first (reusing the previous frame's widget for the same
//! slot), and tears down widgets that disappeared. Render requests from
//! `set_state` are coalesced and served by [`Session::flush`].

use crate::collections::map::HashMap;
use crate::context::{Context, Dispatch};
use crate::element::Element;
use crate::identity::ComponentId;
use crate::pass::Pass;
use crate::platform::CoalescingScheduler;
use crate::state::StateStore;
use crate::vtree::VTree;
use crate::widget::{UpdateOutcome, Widget};
use crate::BuildError;

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Keep rendering inside [`Session::flush`] while renders are requested.
    pub auto_flush: bool,
    /// Upper bound on renders per flush when `auto_flush` is on.
    pub max_flush_passes: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            auto_flush: true,
            max_flush_passes: 16,
        }
    }
}

impl SessionOptions {
    pub fn with_auto_flush(mut self, auto_flush: bool) -> Self {
        self.auto_flush = auto_flush;
        self
    }

    pub fn with_max_flush_passes(mut self, passes: usize) -> Self {
        self.max_flush_passes = passes.max(1);
        self
    }
}

/// Counters from the most recent render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub initialized: usize,
    pub reused: usize,
    pub rerendered: usize,
    pub removed: usize,
}

type RootFn = Box<dyn Fn() -> Element>;

pub struct Session {
    context: Context,
    dispatch: Dispatch,
    states: StateStore,
    scheduler: CoalescingScheduler,
    root: RootFn,
    options: SessionOptions,
    tree: Option<VTree>,
    mounted: HashMap<ComponentId, Widget>,
    render_count: usize,
    last_stats: RenderStats,
}

impl Session {
    pub fn new(
        context: Context,
        dispatch: Dispatch,
        root: impl Fn() -> Element + 'static,
        options: SessionOptions,
    ) -> Self {
        Self {
            context,
            dispatch,
            states: StateStore::new(),
            scheduler: CoalescingScheduler::new(),
            root: Box::new(root),
            options,
            tree: None,
            mounted: HashMap::default(),
            render_count: 0,
            last_stats: RenderStats::default(),
        }
    }

    /// A fresh pass over this session's store, reporting to its scheduler.
    pub fn pass(&self) -> Pass {
        Pass::builder(
            self.context.clone(),
            self.dispatch.clone(),
            self.states.clone(),
        )
        .scheduler(self.scheduler.clone())
        .build()
    }

    /// Runs one render cycle and returns the expanded tree.
    ///
    /// On error the render is rolled back: widgets initialized during it are
    /// destroyed, slots they seeded are removed, and the previous tree and
    /// widgets stay in place.
    pub fn render(&mut self) -> Result<Option<&VTree>, BuildError> {
        self.scheduler.take_pending();
        let pass = self.pass();
        let root = (self.root)();
        let mut tree = pass.build(&root)?;

        let mut expansion = Expansion::new(&self.mounted);
        if let Some(tree) = tree.as_mut() {
            if let Err(err) = expansion.expand(tree) {
                expansion.roll_back();
                return Err(err);
            }
        }
        let Expansion {
            mounted, mut stats, ..
        } = expansion;

        for (id, widget) in &self.mounted {
            if !mounted.contains_key(id) {
                widget.destroy();
                self.states.remove(*id);
                stats.removed += 1;
            }
        }

        self.render_count += 1;
        log::debug!(
            "render #{}: {} initialized, {} reused, {} rerendered, {} removed",
            self.render_count,
            stats.initialized,
            stats.reused,
            stats.rerendered,
            stats.removed
        );
        self.mounted = mounted;
        self.last_stats = stats;
        self.tree = tree;
        Ok(self.tree.as_ref())
    }

    /// Serves pending render requests. Returns how many renders ran.
    pub fn flush(&mut self) -> Result<usize, BuildError> {
        let mut passes = 0;
        while self.scheduler.is_pending() {
            self.render()?;
            passes += 1;
            if !self.options.auto_flush || passes >= self.options.max_flush_passes {
                break;
            }
        }
        if passes > 0 && self.scheduler.is_pending() && self.options.auto_flush {
            log::warn!(
                "flush: still pending after {} renders; a component keeps requesting renders",
                passes
            );
        }
        Ok(passes)
    }

    pub fn tree(&self) -> Option<&VTree> {
        self.tree.as_ref()
    }

    pub fn markup(&self) -> String {
        self.tree.as_ref().map(VTree::to_markup).unwrap_or_default()
    }

    pub fn states(&self) -> &StateStore {
        &self.states
    }

    pub fn scheduler(&self) -> &CoalescingScheduler {
        &self.scheduler
    }

    pub fn is_render_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn last_stats(&self) -> RenderStats {
        self.last_stats
    }

    /// The live widget bound to `id`, if it rendered in the last cycle.
    pub fn widget(&self, id: ComponentId) -> Option<&Widget> {
        self.mounted.get(&id)
    }

    pub fn mounted_ids(&self) -> Vec<ComponentId> {
        self.mounted.keys().copied().collect()
    }
}

/// Subtrees without widgets need no expansion and stay shared.
fn has_widgets(tree: &VTree) -> bool {
    match tree {
        VTree::Text(_) => false,
        VTree::Widget(_) => true,
        VTree::List(items) => items.iter().flatten().any(has_widgets),
        VTree::Node(node) => node.children.iter().flatten().any(has_widgets),
    }
}

/// A widget first initialized during the current render.
struct Created {
    widget: Widget,
    /// The slot was empty before `init` seeded it.
    seeded: bool,
}

/// Depth-first instantiation of one render's widgets.
struct Expansion<'a> {
    previous: &'a HashMap<ComponentId, Widget>,
    mounted: HashMap<ComponentId, Widget>,
    stats: RenderStats,
    created: Vec<Created>,
}

impl<'a> Expansion<'a> {
    fn new(previous: &'a HashMap<ComponentId, Widget>) -> Self {
        Self {
            previous,
            mounted: HashMap::default(),
            stats: RenderStats::default(),
            created: Vec::new(),
        }
    }

    fn expand(&mut self, tree: &mut VTree) -> Result<(), BuildError> {
        match tree {
            VTree::Text(_) => {}
            VTree::List(items) => {
                for item in items.iter_mut().flatten() {
                    self.expand(item)?;
                }
            }
            VTree::Node(node) => {
                for child in node.children.iter_mut().flatten() {
                    self.expand(child)?;
                }
            }
            VTree::Widget(widget) => {
                self.visit(widget)?;
                if widget.rendered().is_some_and(has_widgets) {
                    if let Some(rendered) = widget.rendered_mut() {
                        self.expand(rendered)?;
                    }
                }
                if self.mounted.insert(widget.id(), widget.clone()).is_some() {
                    log::warn!(
                        "render: two {} instances share slot {}",
                        widget.component().name(),
                        widget.id()
                    );
                }
            }
        }
        Ok(())
    }

    fn visit(&mut self, widget: &mut Widget) -> Result<(), BuildError> {
        let id = widget.id();
        let states = widget.pass().states().clone();
        let had_slot = states.contains(id);
        let outcome = match self.previous.get(&id) {
            Some(old) => widget.update(old),
            None => widget.init().map(|()| UpdateOutcome::Initialized),
        };
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                if !had_slot {
                    states.remove(id);
                }
                return Err(err);
            }
        };
        match outcome {
            UpdateOutcome::Initialized => {
                self.stats.initialized += 1;
                self.created.push(Created {
                    widget: widget.clone(),
                    seeded: !had_slot,
                });
            }
            UpdateOutcome::Reused => self.stats.reused += 1,
            UpdateOutcome::Rerendered => self.stats.rerendered += 1,
        }
        Ok(())
    }

    /// Undoes the side effects of a failed render, newest widget first.
    fn roll_back(self) {
        log::debug!(
            "render failed: rolling back {} new widgets",
            self.created.len()
        );
        for created in self.created.into_iter().rev() {
            created.widget.destroy();
            if created.seeded {
                created.widget.pass().states().remove(created.widget.id());
            }
        }
    }
}
