//! Fixed-capacity LIFO stack

use super::Op;
use crate::config::EngineConfig;
use crate::engine::{Driver, Result, StateContainer, Visualization};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackView {
    /// Bottom first
    pub items: Vec<i64>,
    pub capacity: usize,
    pub highlight: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct StackFamily;

impl Visualization for StackFamily {
    type Kind = Op;
    type Snapshot = StackView;
    type Output = ();
    type Solution = ();
    type View = StackView;
}

pub struct StackDriver {
    state: StateContainer<StackFamily>,
}

impl StackDriver {
    pub fn new(initial: &[i64], capacity: usize) -> Self {
        Self::build(initial, capacity, &EngineConfig::default())
    }

    pub fn with_config(initial: &[i64], config: &EngineConfig) -> Self {
        Self::build(initial, config.stack_capacity, config)
    }

    fn build(initial: &[i64], capacity: usize, config: &EngineConfig) -> Self {
        let view = StackView {
            items: initial.to_vec(),
            capacity,
            highlight: Vec::new(),
        };
        StackDriver {
            state: StateContainer::new(view, config.delay),
        }
    }

    pub fn items(&self) -> &[i64] {
        &self.state.view().items
    }

    pub fn size(&self) -> usize {
        self.items().len()
    }

    pub fn capacity(&self) -> usize {
        self.state.view().capacity
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.size() >= self.capacity()
    }

    /// Returns `false` when the stack is full
    pub async fn push(&mut self, value: i64) -> Result<bool> {
        if self.is_full() {
            return Ok(false);
        }
        let run = self.state.continue_run();
        let view = self.state.view_mut();
        view.items.push(value);
        view.highlight = vec![view.items.len() - 1];
        self.record(Op::Push, format!("Push {}", value));
        self.state.wait(&run).await?;
        self.done(format!("Pushed {}", value));
        Ok(true)
    }

    /// Returns `None` when the stack is empty
    pub async fn pop(&mut self) -> Result<Option<i64>> {
        let Some(&top) = self.items().last() else {
            return Ok(None);
        };
        let run = self.state.continue_run();
        self.state.view_mut().highlight = vec![self.size() - 1];
        self.record(Op::Pop, format!("Pop {}", top));
        self.state.wait(&run).await?;

        self.state.view_mut().items.pop();
        self.settle(format!("Popped {}", top));
        Ok(Some(top))
    }

    pub async fn peek(&mut self) -> Result<Option<i64>> {
        let Some(&top) = self.items().last() else {
            return Ok(None);
        };
        let run = self.state.continue_run();
        self.state.view_mut().highlight = vec![self.size() - 1];
        self.record(Op::Peek, format!("Top is {}", top));
        self.state.wait(&run).await?;
        self.done(format!("Top is {}", top));
        Ok(Some(top))
    }

    fn record(&mut self, op: Op, description: String) {
        let snapshot = self.state.view().clone();
        self.state.add_step(op, 0, snapshot, description, None);
    }

    fn done(&mut self, message: String) {
        self.state.view_mut().highlight.clear();
        self.state.finish(None, message);
    }

    /// Record the stack after a removal, then finish
    fn settle(&mut self, message: String) {
        self.state.view_mut().highlight.clear();
        self.record(Op::Done, message.clone());
        self.state.finish(None, message);
    }
}

impl Driver for StackDriver {
    type Family = StackFamily;

    fn container(&self) -> &StateContainer<StackFamily> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<StackFamily> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_peek_leaves_stack_unchanged() {
        let config = EngineConfig::instant();
        let mut stack = StackDriver::with_config(&[1, 2], &config);
        assert_eq!(stack.capacity(), 10);
        assert_eq!(stack.peek().await.unwrap(), Some(2));
        assert_eq!(stack.items(), &[1, 2]);
        assert_eq!(stack.get_state().log.count_kind(Op::Peek), 1);
    }

    #[tokio::test]
    async fn test_full_and_empty_record_nothing() {
        let mut stack = StackDriver::new(&[], 1);
        stack.set_delay(std::time::Duration::ZERO);
        assert!(stack.push(1).await.unwrap());
        assert!(!stack.push(2).await.unwrap());
        assert_eq!(stack.pop().await.unwrap(), Some(1));
        assert_eq!(stack.pop().await.unwrap(), None);
        assert_eq!(stack.peek().await.unwrap(), None);
        assert_eq!(stack.get_state().log.len(), 3);
    }

    #[tokio::test]
    async fn test_pop_records_stack_without_top() {
        let mut stack = StackDriver::with_config(&[1, 2], &EngineConfig::instant());
        assert_eq!(stack.pop().await.unwrap(), Some(2));

        let state = stack.get_state();
        let last = state.log.steps().last().unwrap();
        assert_eq!(last.kind, Op::Done);
        assert_eq!(last.snapshot.items, vec![1]);
        assert!(last.snapshot.highlight.is_empty());
    }
}
