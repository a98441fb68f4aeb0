//! Fixed-capacity FIFO queue on a circular buffer
//!
//! `front` and `rear` are slot indices, both `None` while the queue is empty.
//! Emptying the queue resets them, so the next enqueue lands in slot 0.

use super::Op;
use crate::config::EngineConfig;
use crate::engine::{Driver, Result, StateContainer, Visualization};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueView {
    pub slots: Vec<Option<i64>>,
    pub front: Option<usize>,
    pub rear: Option<usize>,
    pub highlight: Vec<usize>,
}

impl QueueView {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn size(&self) -> usize {
        match (self.front, self.rear) {
            (Some(front), Some(rear)) if rear >= front => rear - front + 1,
            (Some(front), Some(rear)) => self.capacity() - (front - rear - 1),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueueFamily;

impl Visualization for QueueFamily {
    type Kind = Op;
    type Snapshot = QueueView;
    type Output = ();
    type Solution = ();
    type View = QueueView;
}

pub struct QueueDriver {
    state: StateContainer<QueueFamily>,
}

impl QueueDriver {
    pub fn new(capacity: usize) -> Self {
        Self::build(capacity, &EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self::build(config.queue_capacity, config)
    }

    fn build(capacity: usize, config: &EngineConfig) -> Self {
        let view = QueueView {
            slots: vec![None; capacity],
            ..Default::default()
        };
        QueueDriver {
            state: StateContainer::new(view, config.delay),
        }
    }

    pub fn view(&self) -> &QueueView {
        self.state.view()
    }

    pub fn size(&self) -> usize {
        self.view().size()
    }

    pub fn capacity(&self) -> usize {
        self.view().capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.view().front.is_none()
    }

    pub fn is_full(&self) -> bool {
        self.size() == self.capacity()
    }

    pub fn front(&self) -> Option<usize> {
        self.view().front
    }

    pub fn rear(&self) -> Option<usize> {
        self.view().rear
    }

    /// Values from front to rear
    pub fn items(&self) -> Vec<i64> {
        let view = self.view();
        let Some(front) = view.front else {
            return Vec::new();
        };
        (0..view.size())
            .filter_map(|offset| view.slots[(front + offset) % view.capacity()])
            .collect()
    }

    /// Returns `false` when the queue is full
    pub async fn enqueue(&mut self, value: i64) -> Result<bool> {
        if self.is_full() {
            return Ok(false);
        }
        let run = self.state.continue_run();
        let view = self.state.view_mut();
        let rear = match view.rear {
            Some(rear) => (rear + 1) % view.capacity(),
            None => {
                view.front = Some(0);
                0
            }
        };
        view.rear = Some(rear);
        view.slots[rear] = Some(value);
        view.highlight = vec![rear];
        self.record(Op::Enqueue, format!("Enqueue {} at slot {}", value, rear));
        self.state.wait(&run).await?;
        self.done(format!("Enqueued {}", value));
        Ok(true)
    }

    /// Returns `None` when the queue is empty
    pub async fn dequeue(&mut self) -> Result<Option<i64>> {
        let Some(front) = self.front() else {
            return Ok(None);
        };
        let run = self.state.continue_run();
        let value = self.view().slots[front];
        self.state.view_mut().highlight = vec![front];
        self.record(Op::Dequeue, format!("Dequeue from slot {}", front));
        self.state.wait(&run).await?;

        let view = self.state.view_mut();
        view.slots[front] = None;
        if view.rear == Some(front) {
            view.front = None;
            view.rear = None;
        } else {
            view.front = Some((front + 1) % view.capacity());
        }
        let message = match value {
            Some(value) => format!("Dequeued {}", value),
            None => "Dequeued".to_string(),
        };
        self.settle(message);
        Ok(value)
    }

    pub async fn peek(&mut self) -> Result<Option<i64>> {
        let Some(front) = self.front() else {
            return Ok(None);
        };
        let run = self.state.continue_run();
        let value = self.view().slots[front];
        self.state.view_mut().highlight = vec![front];
        self.record(Op::Peek, format!("Front is slot {}", front));
        self.state.wait(&run).await?;
        self.done("Peeked".to_string());
        Ok(value)
    }

    fn record(&mut self, op: Op, description: String) {
        let snapshot = self.state.view().clone();
        self.state.add_step(op, 0, snapshot, description, None);
    }

    fn done(&mut self, message: String) {
        self.state.view_mut().highlight.clear();
        self.state.finish(None, message);
    }

    fn settle(&mut self, message: String) {
        self.state.view_mut().highlight.clear();
        self.record(Op::Done, message.clone());
        self.state.finish(None, message);
    }
}

impl Driver for QueueDriver {
    type Family = QueueFamily;

    fn container(&self) -> &StateContainer<QueueFamily> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<QueueFamily> {
        &mut self.state
    }
}
