//! Dynamic array with insert, delete, linear search, bubble sort and reverse

use super::Op;
use crate::config::EngineConfig;
use crate::engine::{Driver, Result, StateContainer, Visualization};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayView {
    pub data: Vec<i64>,
    pub highlight: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct ArrayFamily;

impl Visualization for ArrayFamily {
    type Kind = Op;
    type Snapshot = ArrayView;
    type Output = ();
    type Solution = ();
    type View = ArrayView;
}

pub struct ArrayDriver {
    state: StateContainer<ArrayFamily>,
}

impl ArrayDriver {
    pub fn new(initial: &[i64]) -> Self {
        Self::with_config(initial, &EngineConfig::default())
    }

    pub fn with_config(initial: &[i64], config: &EngineConfig) -> Self {
        let view = ArrayView {
            data: initial.to_vec(),
            highlight: Vec::new(),
        };
        ArrayDriver {
            state: StateContainer::new(view, config.delay),
        }
    }

    pub fn data(&self) -> &[i64] {
        &self.state.view().data
    }

    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// Insert at `index`, or append when `index` is `None`
    pub async fn insert(&mut self, value: i64, index: Option<usize>) -> Result<bool> {
        let index = index.unwrap_or(self.len());
        if index > self.len() {
            return Ok(false);
        }
        let run = self.state.continue_run();
        self.state.view_mut().data.insert(index, value);
        self.highlight(&[index]);
        self.record(Op::Insert, format!("Insert {} at index {}", value, index));
        self.state.wait(&run).await?;
        self.done("Insert complete");
        Ok(true)
    }

    pub async fn delete(&mut self, index: usize) -> Result<Option<i64>> {
        if index >= self.len() {
            return Ok(None);
        }
        let run = self.state.continue_run();
        let value = self.data()[index];
        self.highlight(&[index]);
        self.record(Op::Delete, format!("Delete {} at index {}", value, index));
        self.state.wait(&run).await?;

        self.state.view_mut().data.remove(index);
        self.highlight(&[]);
        self.record(Op::Done, format!("Removed {} from index {}", value, index));
        self.done(format!("Deleted {}", value));
        Ok(Some(value))
    }

    /// Linear scan; returns the first matching index
    pub async fn search(&mut self, value: i64) -> Result<Option<usize>> {
        let run = self.state.continue_run();
        for i in 0..self.len() {
            self.highlight(&[i]);
            self.record(Op::Visit, format!("Check index {}", i));
            self.state.wait(&run).await?;
            if self.data()[i] == value {
                self.record(Op::Found, format!("Found {} at index {}", value, i));
                self.done(format!("Found {} at index {}", value, i));
                return Ok(Some(i));
            }
        }
        self.highlight(&[]);
        self.record(Op::NotFound, format!("{} is not in the array", value));
        self.done(format!("{} not found", value));
        Ok(None)
    }

    /// Bubble sort in place
    pub async fn sort(&mut self) -> Result<()> {
        let run = self.state.continue_run();
        let n = self.len();
        for i in 0..n {
            for j in 0..n.saturating_sub(i + 1) {
                self.highlight(&[j, j + 1]);
                let (a, b) = (self.data()[j], self.data()[j + 1]);
                self.record(Op::Compare, format!("Compare {} and {}", a, b));
                self.state.wait(&run).await?;
                if a > b {
                    self.state.view_mut().data.swap(j, j + 1);
                    self.record(Op::Swap, format!("Swap {} and {}", a, b));
                    self.state.wait(&run).await?;
                }
            }
        }
        self.done("Array sorted");
        Ok(())
    }

    pub async fn reverse(&mut self) -> Result<()> {
        let run = self.state.continue_run();
        let (mut left, mut right) = (0, self.len().saturating_sub(1));
        while left < right {
            self.state.view_mut().data.swap(left, right);
            self.highlight(&[left, right]);
            self.record(
                Op::Swap,
                format!("Swap indices {} and {}", left, right),
            );
            self.state.wait(&run).await?;
            left += 1;
            right -= 1;
        }
        self.done("Array reversed");
        Ok(())
    }

    fn highlight(&mut self, indices: &[usize]) {
        self.state.view_mut().highlight = indices.to_vec();
    }

    fn record(&mut self, op: Op, description: String) {
        let snapshot = self.state.view().clone();
        self.state.add_step(op, 0, snapshot, description, None);
    }

    fn done(&mut self, message: impl Into<String>) {
        self.state.view_mut().highlight.clear();
        self.state.finish(None, message);
    }
}

impl Driver for ArrayDriver {
    type Family = ArrayFamily;

    fn container(&self) -> &StateContainer<ArrayFamily> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<ArrayFamily> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(initial: &[i64]) -> ArrayDriver {
        ArrayDriver::with_config(initial, &EngineConfig::instant())
    }

    #[tokio::test]
    async fn test_insert_and_delete() {
        let mut d = driver(&[1, 2, 3]);
        assert!(d.insert(9, Some(1)).await.unwrap());
        assert!(d.insert(7, None).await.unwrap());
        assert_eq!(d.data(), &[1, 9, 2, 3, 7]);

        assert_eq!(d.delete(0).await.unwrap(), Some(1));
        assert_eq!(d.data(), &[9, 2, 3, 7]);
    }

    #[tokio::test]
    async fn test_bad_index_records_nothing() {
        let mut d = driver(&[1]);
        assert!(!d.insert(5, Some(3)).await.unwrap());
        assert_eq!(d.delete(1).await.unwrap(), None);
        assert!(d.get_state().log.is_empty());
    }

    #[tokio::test]
    async fn test_search_visits_until_found() {
        let mut d = driver(&[4, 8, 15, 16]);
        assert_eq!(d.search(15).await.unwrap(), Some(2));

        let state = d.get_state();
        assert_eq!(state.log.count_kind(Op::Visit), 3);
        assert_eq!(state.log.count_kind(Op::Found), 1);
        assert_eq!(d.search(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sort_and_reverse() {
        let mut d = driver(&[3, 1, 2]);
        d.sort().await.unwrap();
        assert_eq!(d.data(), &[1, 2, 3]);
        d.reverse().await.unwrap();
        assert_eq!(d.data(), &[3, 2, 1]);
    }

    #[tokio::test]
    async fn test_log_accumulates_until_reset() {
        let mut d = driver(&[]);
        d.insert(1, None).await.unwrap();
        d.insert(2, None).await.unwrap();
        assert_eq!(d.get_state().log.len(), 2);

        d.reset();
        assert!(d.get_state().log.is_empty());
        assert_eq!(d.data(), &[1, 2]);
    }
}
