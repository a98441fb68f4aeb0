//! The externally observable aggregate published by every driver

use super::step::StepLog;
use std::fmt::Debug;

/// The family of types one driver records and publishes.
///
/// Each driver declares a zero-sized marker implementing this trait so the
/// engine can be written once and reused by every algorithm family.
pub trait Visualization: Debug + Clone + 'static {
    /// Semantic step kind (compare, swap, try, backtrack, ...)
    type Kind: Copy + Debug + PartialEq;
    /// Point-in-time copy of the driver's working data
    type Snapshot: Clone + Debug;
    /// Value a recursive call returns, attached when its step completes
    type Output: Clone + Debug;
    /// Final payload of a run
    type Solution: Clone + Debug;
    /// Driver-specific live aggregate (array, dp table, buckets, nodes + edges)
    type View: Clone + Debug + Default;
}

/// Current aggregate state of a driver
///
/// Handed to subscribers on every notify and returned by `get_state()`. A
/// clone shares snapshot allocations with the original, which is sound because
/// a snapshot is never written after it is attached to a step.
#[derive(Debug, Clone)]
pub struct RunState<V: Visualization> {
    pub log: StepLog<V>,
    pub message: String,
    pub is_complete: bool,
    pub solution: Option<V::Solution>,
    pub view: V::View,
}

impl<V: Visualization> RunState<V> {
    pub fn new(view: V::View) -> Self {
        RunState {
            log: StepLog::new(),
            message: String::new(),
            is_complete: false,
            solution: None,
            view,
        }
    }

    /// Id of the most recently recorded step
    pub fn current_step(&self) -> Option<usize> {
        self.log.current()
    }

    /// Update a subscriber's copy in place from a published state
    pub fn sync_from(&mut self, source: &Self) {
        self.log.sync_from(&source.log);
        self.message.clone_from(&source.message);
        self.is_complete = source.is_complete;
        self.solution.clone_from(&source.solution);
        self.view.clone_from(&source.view);
    }
}

impl<V: Visualization> Default for RunState<V> {
    fn default() -> Self {
        Self::new(V::View::default())
    }
}
