//! Recorded steps and the append-only log that holds them
//!
//! A [`Step`] wraps an immutable [`Arc`]ed snapshot together with its id,
//! semantic kind, recursion level and call-tree links. The [`StepLog`] is an
//! arena addressed by step id: ids are dense (`0, 1, 2, ...`), so the id of a
//! step is also its index.
//!
//! # Call tree
//!
//! Recursive drivers pass a parent id when recording. The log appends the new
//! id to the parent's `children`, so the tree is built without walking it.
//! Recursive steps also carry a [`CallStatus`]:
//!
//! ```text
//! Pending → Active → (children) → Returning → Complete
//!              └──────── leaf ──────────────→ Complete
//! ```

use super::state::Visualization;
use std::sync::Arc;

/// Dense step identifier, equal to the step's index in its log
pub type StepId = usize;

/// Execution state of a recursive call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Pending,
    Active,
    Returning,
    Complete,
}

impl CallStatus {
    /// Whether moving from `self` to `next` follows the call lifecycle
    pub fn can_become(self, next: CallStatus) -> bool {
        use CallStatus::{Active, Complete, Pending, Returning};
        matches!(
            (self, next),
            (Pending, Active) | (Active, Returning) | (Active, Complete) | (Returning, Complete)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            CallStatus::Pending => "pending",
            CallStatus::Active => "active",
            CallStatus::Returning => "returning",
            CallStatus::Complete => "complete",
        }
    }
}

/// One recorded point in a run
#[derive(Debug, Clone)]
pub struct Step<V: Visualization> {
    pub id: StepId,
    pub kind: V::Kind,
    pub level: usize,
    pub parent: Option<StepId>,
    pub children: Vec<StepId>,
    /// Only set for steps that model a call
    pub status: Option<CallStatus>,
    /// Value returned by the call, set when it completes
    pub result: Option<V::Output>,
    pub snapshot: Arc<V::Snapshot>,
    pub description: String,
}

/// Append-only history of the current run
#[derive(Debug, Clone)]
pub struct StepLog<V: Visualization> {
    steps: Vec<Step<V>>,
    current: Option<StepId>,
    /// Call steps not yet complete, in the order they were opened
    open: Vec<StepId>,
}

impl<V: Visualization> StepLog<V> {
    pub fn new() -> Self {
        StepLog {
            steps: Vec::new(),
            current: None,
            open: Vec::new(),
        }
    }

    /// Append a step and make it current. Returns its id.
    pub fn append(
        &mut self,
        kind: V::Kind,
        level: usize,
        snapshot: V::Snapshot,
        description: String,
        parent: Option<StepId>,
    ) -> StepId {
        let id = self.steps.len();

        if let Some(parent_id) = parent {
            debug_assert!(
                parent_id < id,
                "parent step {} does not exist (next id {})",
                parent_id,
                id
            );
            if let Some(parent_step) = self.steps.get_mut(parent_id) {
                debug_assert_eq!(
                    parent_step.level + 1,
                    level,
                    "child level must be one below its parent"
                );
                parent_step.children.push(id);
            }
        }

        self.steps.push(Step {
            id,
            kind,
            level,
            parent,
            children: Vec::new(),
            status: None,
            result: None,
            snapshot: Arc::new(snapshot),
            description,
        });
        self.current = Some(id);
        id
    }

    /// Flip the call status of a step.
    ///
    /// Completing a step requires every child to be complete already.
    pub fn set_status(&mut self, id: StepId, status: CallStatus) {
        debug_assert!(
            status != CallStatus::Complete || self.children_complete(id),
            "step {} completed before its children",
            id
        );
        if let Some(step) = self.steps.get_mut(id) {
            if let Some(old) = step.status {
                debug_assert!(
                    old.can_become(status),
                    "illegal call transition {:?} -> {:?} on step {}",
                    old,
                    status,
                    id
                );
            }
            step.status = Some(status);
            if status == CallStatus::Complete {
                self.open.retain(|&open| open != id);
            } else if !self.open.contains(&id) {
                self.open.push(id);
            }
        }
    }

    /// Attach the return value of a call step
    pub fn set_result(&mut self, id: StepId, result: V::Output) {
        if let Some(step) = self.steps.get_mut(id) {
            step.result = Some(result);
        }
    }

    fn children_complete(&self, id: StepId) -> bool {
        self.steps.get(id).map_or(true, |step| {
            step.children.iter().all(|child| {
                self.steps.get(*child).is_some_and(|c| {
                    c.status.map_or(true, |s| s == CallStatus::Complete)
                })
            })
        })
    }

    pub fn get(&self, id: StepId) -> Option<&Step<V>> {
        self.steps.get(id)
    }

    /// Id of the most recently appended step
    pub fn current(&self) -> Option<StepId> {
        self.current
    }

    pub fn current_step(&self) -> Option<&Step<V>> {
        self.current.and_then(|id| self.steps.get(id))
    }

    pub fn steps(&self) -> &[Step<V>] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step<V>> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps without a parent, in recording order
    pub fn roots(&self) -> impl Iterator<Item = &Step<V>> {
        self.steps.iter().filter(|s| s.parent.is_none())
    }

    /// Bring this copy up to date with `source`, the log it was cloned from.
    ///
    /// Copies the steps appended since the last sync and refreshes the calls
    /// that were still open; completed steps never change again. A `source`
    /// holding a different history (after a reset) is cloned whole.
    pub fn sync_from(&mut self, source: &Self) {
        let same_history = self.steps.last().map_or(true, |last| {
            source
                .steps
                .get(last.id)
                .is_some_and(|theirs| Arc::ptr_eq(&theirs.snapshot, &last.snapshot))
        });
        if !same_history {
            *self = source.clone();
            return;
        }

        for &id in &self.open {
            if let (Some(mine), Some(theirs)) = (self.steps.get_mut(id), source.steps.get(id)) {
                mine.status = theirs.status;
                mine.result.clone_from(&theirs.result);
            }
        }

        let start = self.steps.len();
        for step in &source.steps[start..] {
            // Parents appended in this batch already carry their children
            if let Some(parent) = step.parent.filter(|&p| p < start) {
                if let Some(mine) = self.steps.get_mut(parent) {
                    mine.children.push(step.id);
                }
            }
            self.steps.push(step.clone());
        }
        self.open.clone_from(&source.open);
        self.current = source.current;
    }

    /// Number of steps of the given kind
    pub fn count_kind(&self, kind: V::Kind) -> usize {
        self.steps.iter().filter(|s| s.kind == kind).count()
    }
}

impl<V: Visualization> Default for StepLog<V> {
    fn default() -> Self {
        Self::new()
    }
}
