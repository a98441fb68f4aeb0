//! Dynamic-programming driver
//!
//! Fills a 1-D or 2-D table one cell at a time. Each cell write is bracketed
//! by two steps: one with the table before the write (`update == false`) and
//! one after it (`update == true`). The optimal answer is then recovered by
//! walking back through the filled table and published in a `Solution` step.

use crate::config::EngineConfig;
use crate::engine::{Driver, EngineError, Result, RunToken, StateContainer, Visualization};
use std::fmt;

/// Largest table the driver will allocate
const MAX_TABLE_CELLS: usize = 1 << 20;

/// Reject tables of `rows * cols` cells beyond `MAX_TABLE_CELLS`
fn check_table(rows: usize, cols: usize) -> Result<()> {
    match rows.checked_mul(cols) {
        Some(cells) if cells <= MAX_TABLE_CELLS => Ok(()),
        _ => Err(EngineError::invalid(format!(
            "a {} x {} table is too large",
            rows, cols
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpKind {
    Init,
    Calculate,
    Solution,
}

impl DpKind {
    pub fn label(self) -> &'static str {
        match self {
            DpKind::Init => "init",
            DpKind::Calculate => "calculate",
            DpKind::Solution => "solution",
        }
    }
}

/// One edit in an edit-distance script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Keep(char),
    Replace { from: char, to: char },
    Delete(char),
    Insert(char),
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::Keep(c) => write!(f, "keep {}", c),
            EditOp::Replace { from, to } => write!(f, "replace {} with {}", from, to),
            EditOp::Delete(c) => write!(f, "delete {}", c),
            EditOp::Insert(c) => write!(f, "insert {}", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DpSolution {
    Subsequence { length: usize, sequence: Vec<i64> },
    Knapsack { max_value: i64, items: Vec<usize> },
    EditScript { distance: usize, operations: Vec<EditOp> },
}

/// Table state at one point of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DpFrame {
    /// 1-D problems use a single row
    pub table: Vec<Vec<i64>>,
    /// Cell being written
    pub current: Option<(usize, usize)>,
    /// Cell the current one is derived from
    pub comparing: Option<(usize, usize)>,
    /// Set on the step taken right after a write
    pub update: bool,
    /// Predecessor links for the subsequence walk-back
    pub prev: Vec<Option<usize>>,
    /// Cells on the reconstructed optimal path
    pub path: Vec<(usize, usize)>,
    pub solution: Option<DpSolution>,
}

#[derive(Debug, Clone, Copy)]
pub struct DynamicProgramming;

impl Visualization for DynamicProgramming {
    type Kind = DpKind;
    type Snapshot = DpFrame;
    type Output = ();
    type Solution = DpSolution;
    type View = DpFrame;
}

pub struct DynamicProgrammingDriver {
    state: StateContainer<DynamicProgramming>,
}

impl DynamicProgrammingDriver {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        DynamicProgrammingDriver {
            state: StateContainer::new(DpFrame::default(), config.delay),
        }
    }

    pub fn frame(&self) -> &DpFrame {
        self.state.view()
    }

    /// Length of the longest strictly increasing subsequence, plus one such sequence
    pub async fn longest_increasing_subsequence(&mut self, nums: &[i64]) -> Result<DpSolution> {
        let run = self.state.start_run();
        let n = nums.len();
        *self.state.view_mut() = DpFrame {
            table: vec![vec![1; n]],
            prev: vec![None; n],
            ..Default::default()
        };

        if n == 0 {
            self.record(DpKind::Init, "Empty input, nothing to compute");
            self.state.wait(&run).await?;
            let solution = DpSolution::Subsequence {
                length: 0,
                sequence: Vec::new(),
            };
            return Ok(self.solve(solution, "Longest increasing subsequence has length 0"));
        }

        self.record(
            DpKind::Init,
            "Every element starts a subsequence of length 1",
        );
        self.state.wait(&run).await?;

        let mut best = 0;
        for i in 1..n {
            for j in 0..i {
                self.focus((0, i), Some((0, j)));
                self.record(
                    DpKind::Calculate,
                    format!("Compare nums[{}] = {} with nums[{}] = {}", i, nums[i], j, nums[j]),
                );
                self.state.wait(&run).await?;

                let dp = &self.state.view().table[0];
                if nums[i] > nums[j] && dp[j] + 1 > dp[i] {
                    let length = dp[j] + 1;
                    let frame = self.state.view_mut();
                    frame.table[0][i] = length;
                    frame.prev[i] = Some(j);
                    self.updated(format!("dp[{}] = dp[{}] + 1 = {}", i, j, length), &run)
                        .await?;
                }
            }
            if self.cell(0, i) > self.cell(0, best) {
                best = i;
            }
        }

        let mut sequence = Vec::new();
        let mut path = Vec::new();
        let mut at = Some(best);
        while let Some(i) = at {
            sequence.push(nums[i]);
            path.push((0, i));
            at = self.state.view().prev[i];
        }
        sequence.reverse();
        path.reverse();
        self.state.view_mut().path = path;

        let length = sequence.len();
        let description = format!(
            "Longest increasing subsequence has length {}: {:?}",
            length, sequence
        );
        Ok(self.solve(DpSolution::Subsequence { length, sequence }, description))
    }

    /// 0/1 knapsack; returns the best total value and the chosen item indices
    pub async fn knapsack(
        &mut self,
        weights: &[usize],
        values: &[i64],
        capacity: usize,
    ) -> Result<DpSolution> {
        if weights.len() != values.len() {
            return Err(EngineError::invalid(format!(
                "{} weights but {} values",
                weights.len(),
                values.len()
            )));
        }
        let n = weights.len();
        check_table(n + 1, capacity.saturating_add(1))?;
        let run = self.state.start_run();
        *self.state.view_mut() = DpFrame {
            table: vec![vec![0; capacity + 1]; n + 1],
            ..Default::default()
        };
        self.record(
            DpKind::Init,
            format!("{} items, capacity {}", n, capacity),
        );
        self.state.wait(&run).await?;

        for i in 1..=n {
            let (weight, value) = (weights[i - 1], values[i - 1]);
            for w in 0..=capacity {
                let skip = self.cell(i - 1, w);
                let next = if weight <= w {
                    let take = self.cell(i - 1, w - weight) + value;
                    self.focus((i, w), Some((i - 1, w - weight)));
                    self.record(
                        DpKind::Calculate,
                        format!(
                            "Item {} (weight {}, value {}) at capacity {}: skip {} or take {}",
                            i - 1,
                            weight,
                            value,
                            w,
                            skip,
                            take
                        ),
                    );
                    take.max(skip)
                } else {
                    self.focus((i, w), Some((i - 1, w)));
                    self.record(
                        DpKind::Calculate,
                        format!(
                            "Item {} (weight {}) does not fit capacity {}",
                            i - 1,
                            weight,
                            w
                        ),
                    );
                    skip
                };
                self.state.wait(&run).await?;

                self.state.view_mut().table[i][w] = next;
                self.updated(format!("dp[{}][{}] = {}", i, w, next), &run)
                    .await?;
            }
        }

        let mut items = Vec::new();
        let mut path = Vec::new();
        let (mut i, mut w) = (n, capacity);
        while i > 0 {
            if self.cell(i, w) != self.cell(i - 1, w) {
                items.push(i - 1);
                path.push((i, w));
                w -= weights[i - 1];
            }
            i -= 1;
        }
        items.reverse();
        path.reverse();
        self.state.view_mut().path = path;

        let max_value = self.cell(n, capacity);
        let description = format!(
            "Best value is {}, choosing items {:?}",
            max_value, items
        );
        Ok(self.solve(DpSolution::Knapsack { max_value, items }, description))
    }

    /// Levenshtein distance with unit costs, plus one shortest edit script
    pub async fn edit_distance(&mut self, word1: &str, word2: &str) -> Result<DpSolution> {
        let a: Vec<char> = word1.chars().collect();
        let b: Vec<char> = word2.chars().collect();
        let (m, n) = (a.len(), b.len());
        check_table(m + 1, n + 1)?;
        let run = self.state.start_run();
        *self.state.view_mut() = DpFrame {
            table: vec![vec![0; n + 1]; m + 1],
            ..Default::default()
        };
        self.record(
            DpKind::Init,
            format!("Transform {:?} into {:?}", word1, word2),
        );
        self.state.wait(&run).await?;

        let frame = self.state.view_mut();
        for (i, row) in frame.table.iter_mut().enumerate() {
            row[0] = i as i64;
        }
        for (j, cell) in frame.table[0].iter_mut().enumerate() {
            *cell = j as i64;
        }
        self.updated("Base cases: i deletions or j insertions".to_string(), &run)
            .await?;

        for i in 1..=m {
            for j in 1..=n {
                self.focus((i, j), Some((i - 1, j - 1)));
                let next = if a[i - 1] == b[j - 1] {
                    self.record(
                        DpKind::Calculate,
                        format!("{} matches, copy the diagonal", a[i - 1]),
                    );
                    self.cell(i - 1, j - 1)
                } else {
                    let delete = self.cell(i - 1, j);
                    let insert = self.cell(i, j - 1);
                    let replace = self.cell(i - 1, j - 1);
                    self.record(
                        DpKind::Calculate,
                        format!(
                            "{} vs {}: delete {}, insert {}, replace {}",
                            a[i - 1],
                            b[j - 1],
                            delete,
                            insert,
                            replace
                        ),
                    );
                    1 + delete.min(insert).min(replace)
                };
                self.state.wait(&run).await?;

                self.state.view_mut().table[i][j] = next;
                self.updated(format!("dp[{}][{}] = {}", i, j, next), &run)
                    .await?;
            }
        }

        let mut operations = Vec::new();
        let mut path = vec![(m, n)];
        let (mut i, mut j) = (m, n);
        while i > 0 || j > 0 {
            if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
                operations.push(EditOp::Keep(a[i - 1]));
                i -= 1;
                j -= 1;
            } else if i > 0 && j > 0 && self.cell(i, j) == self.cell(i - 1, j - 1) + 1 {
                operations.push(EditOp::Replace {
                    from: a[i - 1],
                    to: b[j - 1],
                });
                i -= 1;
                j -= 1;
            } else if i > 0 && self.cell(i, j) == self.cell(i - 1, j) + 1 {
                operations.push(EditOp::Delete(a[i - 1]));
                i -= 1;
            } else {
                operations.push(EditOp::Insert(b[j - 1]));
                j -= 1;
            }
            path.push((i, j));
        }
        operations.reverse();
        path.reverse();
        self.state.view_mut().path = path;

        let distance = self.cell(m, n) as usize;
        let script: Vec<String> = operations.iter().map(|op| op.to_string()).collect();
        let description = format!("Edit distance is {}: {}", distance, script.join(", "));
        Ok(self.solve(
            DpSolution::EditScript {
                distance,
                operations,
            },
            description,
        ))
    }

    fn cell(&self, row: usize, col: usize) -> i64 {
        self.state.view().table[row][col]
    }

    fn focus(&mut self, current: (usize, usize), comparing: Option<(usize, usize)>) {
        let frame = self.state.view_mut();
        frame.current = Some(current);
        frame.comparing = comparing;
        frame.update = false;
    }

    /// Record the table right after a write
    async fn updated(&mut self, description: String, run: &RunToken) -> Result<()> {
        self.state.view_mut().update = true;
        self.record(DpKind::Calculate, description);
        self.state.view_mut().update = false;
        self.state.wait(run).await
    }

    fn solve(&mut self, solution: DpSolution, description: impl Into<String>) -> DpSolution {
        let description = description.into();
        let frame = self.state.view_mut();
        frame.current = None;
        frame.comparing = None;
        frame.update = false;
        frame.solution = Some(solution.clone());
        self.record(DpKind::Solution, description.clone());
        self.state.finish(Some(solution.clone()), description);
        solution
    }

    fn record(&mut self, kind: DpKind, description: impl Into<String>) {
        let snapshot = self.state.view().clone();
        self.state.add_step(kind, 0, snapshot, description, None);
    }
}

impl Default for DynamicProgrammingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for DynamicProgrammingDriver {
    type Family = DynamicProgramming;

    fn container(&self) -> &StateContainer<DynamicProgramming> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<DynamicProgramming> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> DynamicProgrammingDriver {
        DynamicProgrammingDriver::with_config(&EngineConfig::instant())
    }

    #[tokio::test]
    async fn test_lis_reconstructs_sequence() {
        let mut d = driver();
        let solution = d
            .longest_increasing_subsequence(&[10, 9, 2, 5, 3, 7, 101, 18])
            .await
            .unwrap();

        assert_eq!(
            solution,
            DpSolution::Subsequence {
                length: 4,
                sequence: vec![2, 5, 7, 101],
            }
        );
        let state = d.get_state();
        assert!(state.is_complete);
        assert_eq!(state.log.count_kind(DpKind::Solution), 1);
    }

    #[tokio::test]
    async fn test_lis_is_strict() {
        let mut d = driver();
        let solution = d.longest_increasing_subsequence(&[3, 3, 3]).await.unwrap();
        assert_eq!(
            solution,
            DpSolution::Subsequence {
                length: 1,
                sequence: vec![3],
            }
        );
    }

    #[tokio::test]
    async fn test_lis_empty_input() {
        let mut d = driver();
        let solution = d.longest_increasing_subsequence(&[]).await.unwrap();
        assert_eq!(
            solution,
            DpSolution::Subsequence {
                length: 0,
                sequence: vec![],
            }
        );
        let state = d.get_state();
        assert_eq!(state.log.len(), 2);
        assert_eq!(state.log.count_kind(DpKind::Init), 1);
    }

    #[tokio::test]
    async fn test_every_write_is_bracketed() {
        let mut d = driver();
        d.knapsack(&[1, 3], &[15, 20], 4).await.unwrap();

        let state = d.get_state();
        let steps = state.log.steps();
        for (i, step) in steps.iter().enumerate() {
            if step.snapshot.update {
                let before = &steps[i - 1];
                assert!(!before.snapshot.update);
                assert_eq!(before.snapshot.current, step.snapshot.current);
            }
        }
        // 2 items x 5 capacities, two steps per cell, plus init and solution
        assert_eq!(steps.len(), 2 * 2 * 5 + 2);
    }

    #[tokio::test]
    async fn test_knapsack_is_zero_one() {
        let mut d = driver();
        let solution = d
            .knapsack(&[1, 3, 4, 5], &[1, 4, 5, 7], 7)
            .await
            .unwrap();
        assert_eq!(
            solution,
            DpSolution::Knapsack {
                max_value: 9,
                items: vec![1, 2],
            }
        );
    }

    #[tokio::test]
    async fn test_knapsack_rejects_mismatched_input() {
        let mut d = driver();
        let err = d.knapsack(&[1, 2], &[3], 5).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(d.get_state().log.is_empty());
    }

    #[tokio::test]
    async fn test_edit_distance_script() {
        let mut d = driver();
        let solution = d.edit_distance("horse", "ros").await.unwrap();
        let DpSolution::EditScript {
            distance,
            operations,
        } = solution
        else {
            panic!("expected an edit script");
        };

        assert_eq!(distance, 3);
        let edits = operations
            .iter()
            .filter(|op| !matches!(op, EditOp::Keep(_)))
            .count();
        assert_eq!(edits, 3);
    }

    #[tokio::test]
    async fn test_edit_distance_from_empty() {
        let mut d = driver();
        let solution = d.edit_distance("", "ab").await.unwrap();
        assert_eq!(
            solution,
            DpSolution::EditScript {
                distance: 2,
                operations: vec![EditOp::Insert('a'), EditOp::Insert('b')],
            }
        );
    }

    #[tokio::test]
    async fn test_knapsack_keeps_weightless_items() {
        let mut d = driver();
        let solution = d.knapsack(&[0, 1], &[5, 1], 1).await.unwrap();
        assert_eq!(
            solution,
            DpSolution::Knapsack {
                max_value: 6,
                items: vec![0, 1],
            }
        );
    }

    #[tokio::test]
    async fn test_oversized_table_is_rejected() {
        let mut d = driver();
        let err = d.knapsack(&[1], &[1], usize::MAX).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(d.get_state().log.is_empty());
    }
}
