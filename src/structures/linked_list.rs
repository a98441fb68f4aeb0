//! Singly linked list of boxed nodes
//!
//! Walks are animated one node per step before the list is relinked, so the
//! relink itself never spans a suspension point.

use super::Op;
use crate::config::EngineConfig;
use crate::engine::{Driver, Result, RunToken, StateContainer, Visualization};

#[derive(Debug)]
struct ListNode {
    value: i64,
    next: Option<Box<ListNode>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    /// Node values from head to tail
    pub values: Vec<i64>,
    pub highlight: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct LinkedListFamily;

impl Visualization for LinkedListFamily {
    type Kind = Op;
    type Snapshot = ListView;
    type Output = ();
    type Solution = ();
    type View = ListView;
}

pub struct LinkedListDriver {
    head: Option<Box<ListNode>>,
    len: usize,
    state: StateContainer<LinkedListFamily>,
}

impl LinkedListDriver {
    pub fn new(initial: &[i64]) -> Self {
        Self::with_config(initial, &EngineConfig::default())
    }

    pub fn with_config(initial: &[i64], config: &EngineConfig) -> Self {
        let mut list = LinkedListDriver {
            head: None,
            len: 0,
            state: StateContainer::new(ListView::default(), config.delay),
        };
        for (index, &value) in initial.iter().enumerate() {
            list.link(index, value);
        }
        list.sync();
        list
    }

    pub fn values(&self) -> Vec<i64> {
        let mut values = Vec::with_capacity(self.len);
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            values.push(n.value);
            node = n.next.as_deref();
        }
        values
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub async fn prepend(&mut self, value: i64) -> Result<()> {
        let run = self.state.continue_run();
        self.link(0, value);
        self.mark(&[0], Op::Insert, format!("Prepend {}", value));
        self.state.wait(&run).await?;
        self.done(format!("Prepended {}", value));
        Ok(())
    }

    pub async fn append(&mut self, value: i64) -> Result<()> {
        let run = self.state.continue_run();
        let at = self.len;
        self.walk(&run, at).await?;
        self.link(at, value);
        self.mark(&[at], Op::Insert, format!("Append {}", value));
        self.state.wait(&run).await?;
        self.done(format!("Appended {}", value));
        Ok(())
    }

    /// Insert so the new node sits at `index`; past the end appends.
    /// Returns the index the node landed at.
    pub async fn insert(&mut self, value: i64, index: usize) -> Result<usize> {
        if index == 0 {
            self.prepend(value).await?;
            return Ok(0);
        }
        let run = self.state.continue_run();
        let at = index.min(self.len);
        self.walk(&run, at).await?;
        self.link(at, value);
        self.mark(&[at], Op::Insert, format!("Insert {} at index {}", value, at));
        self.state.wait(&run).await?;
        self.done(format!("Inserted {}", value));
        Ok(at)
    }

    /// Returns `None` when `index` is out of range
    pub async fn delete(&mut self, index: usize) -> Result<Option<i64>> {
        if index >= self.len {
            return Ok(None);
        }
        let run = self.state.continue_run();
        self.walk(&run, index).await?;
        self.mark(&[index], Op::Delete, format!("Delete node at index {}", index));
        self.state.wait(&run).await?;

        let value = self.unlink(index);
        self.mark(&[], Op::Done, format!("Unlinked node {}", index));
        self.done(format!("Deleted index {}", index));
        Ok(value)
    }

    pub async fn search(&mut self, value: i64) -> Result<Option<usize>> {
        let run = self.state.continue_run();
        let values = self.values();
        for (index, &v) in values.iter().enumerate() {
            self.mark(&[index], Op::Visit, format!("Check node {}", index));
            self.state.wait(&run).await?;
            if v == value {
                self.mark(&[index], Op::Found, format!("Found {} at index {}", value, index));
                self.done(format!("Found {}", value));
                return Ok(Some(index));
            }
        }
        self.mark(&[], Op::NotFound, format!("{} is not in the list", value));
        self.done(format!("{} not found", value));
        Ok(None)
    }

    /// Animate the walk over the nodes before `index`
    async fn walk(&mut self, run: &RunToken, index: usize) -> Result<()> {
        for i in 0..index {
            self.mark(&[i], Op::Visit, format!("Walk past node {}", i));
            self.state.wait(run).await?;
        }
        Ok(())
    }

    /// The link that points at node `index`
    fn link_mut(&mut self, index: usize) -> Option<&mut Option<Box<ListNode>>> {
        let mut link = &mut self.head;
        for _ in 0..index {
            match link {
                Some(node) => link = &mut node.next,
                None => return None,
            }
        }
        Some(link)
    }

    fn link(&mut self, index: usize, value: i64) {
        if let Some(slot) = self.link_mut(index) {
            let next = slot.take();
            *slot = Some(Box::new(ListNode { value, next }));
            self.len += 1;
        }
    }

    fn unlink(&mut self, index: usize) -> Option<i64> {
        let slot = self.link_mut(index)?;
        let node = slot.take()?;
        *slot = node.next;
        self.len -= 1;
        Some(node.value)
    }

    fn sync(&mut self) {
        let values = self.values();
        self.state.view_mut().values = values;
    }

    fn mark(&mut self, highlight: &[usize], op: Op, description: String) {
        self.sync();
        self.state.view_mut().highlight = highlight.to_vec();
        let snapshot = self.state.view().clone();
        self.state.add_step(op, 0, snapshot, description, None);
    }

    fn done(&mut self, message: String) {
        self.sync();
        self.state.view_mut().highlight.clear();
        self.state.finish(None, message);
    }
}

impl Drop for LinkedListDriver {
    // Unlink iteratively so a long list cannot overflow the stack
    fn drop(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

impl Driver for LinkedListDriver {
    type Family = LinkedListFamily;

    fn container(&self) -> &StateContainer<LinkedListFamily> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<LinkedListFamily> {
        &mut self.state
    }
}
