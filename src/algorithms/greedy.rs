//! Greedy driver
//!
//! Coin change with largest-coin-first selection and interval scheduling by
//! earliest end time. Each candidate records one `Select` or `Skip` step and
//! the run ends with a `Solution` step.

use crate::config::EngineConfig;
use crate::engine::{Driver, Result, StateContainer, Visualization};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreedyKind {
    Select,
    Skip,
    Solution,
}

impl GreedyKind {
    pub fn label(self) -> &'static str {
        match self {
            GreedyKind::Select => "select",
            GreedyKind::Skip => "skip",
            GreedyKind::Solution => "solution",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinUse {
    pub coin: u64,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub id: u32,
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreedyView {
    Change {
        /// Coins in the order they are considered
        coins: Vec<u64>,
        current: Option<usize>,
        used: Vec<CoinUse>,
        remaining: u64,
    },
    Activities {
        /// Activities sorted by end time
        activities: Vec<Activity>,
        current: Option<usize>,
        selected: Vec<Activity>,
        last_end: u64,
    },
}

impl Default for GreedyView {
    fn default() -> Self {
        GreedyView::Change {
            coins: Vec::new(),
            current: None,
            used: Vec::new(),
            remaining: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreedySolution {
    /// `remaining` is non-zero when the amount cannot be paid exactly
    Change { used: Vec<CoinUse>, remaining: u64 },
    Activities(Vec<Activity>),
}

impl GreedySolution {
    pub fn total_coins(&self) -> u64 {
        match self {
            GreedySolution::Change { used, .. } => used.iter().map(|u| u.count).sum(),
            GreedySolution::Activities(_) => 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Greedy;

impl Visualization for Greedy {
    type Kind = GreedyKind;
    type Snapshot = GreedyView;
    type Output = ();
    type Solution = GreedySolution;
    type View = GreedyView;
}

pub struct GreedyDriver {
    state: StateContainer<Greedy>,
}

impl GreedyDriver {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        GreedyDriver {
            state: StateContainer::new(GreedyView::default(), config.delay),
        }
    }

    /// Pay `amount` taking as many of each coin as fit, largest coin first
    pub async fn make_change(&mut self, amount: u64, coins: &[u64]) -> Result<GreedySolution> {
        let run = self.state.start_run();
        let mut sorted: Vec<u64> = coins.iter().copied().filter(|&c| c > 0).collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));

        let mut used = Vec::new();
        let mut remaining = amount;
        for (index, &coin) in sorted.iter().enumerate() {
            if remaining == 0 {
                break;
            }
            let count = remaining / coin;
            let (kind, description) = if count > 0 {
                used.push(CoinUse { coin, count });
                remaining -= coin * count;
                (
                    GreedyKind::Select,
                    format!("Use {} x {}, {} left", count, coin, remaining),
                )
            } else {
                (
                    GreedyKind::Skip,
                    format!("Skip {}, it exceeds the remaining {}", coin, remaining),
                )
            };
            *self.state.view_mut() = GreedyView::Change {
                coins: sorted.clone(),
                current: Some(index),
                used: used.clone(),
                remaining,
            };
            self.record(kind, description);
            self.state.wait(&run).await?;
        }

        let solution = GreedySolution::Change {
            used: used.clone(),
            remaining,
        };
        let description = if remaining == 0 {
            format!("Paid {} with {} coins", amount, solution.total_coins())
        } else {
            format!("Cannot pay exactly, {} left over", remaining)
        };
        *self.state.view_mut() = GreedyView::Change {
            coins: sorted,
            current: None,
            used,
            remaining,
        };
        self.record(GreedyKind::Solution, description.clone());
        self.state.finish(Some(solution.clone()), description);
        Ok(solution)
    }

    /// Largest set of pairwise compatible activities, by earliest end time
    pub async fn select_activities(&mut self, activities: &[Activity]) -> Result<GreedySolution> {
        let run = self.state.start_run();
        let mut sorted = activities.to_vec();
        sorted.sort_by_key(|a| a.end);

        let mut selected: Vec<Activity> = Vec::new();
        let mut last_end = 0;
        for (index, activity) in sorted.iter().enumerate() {
            let (kind, description) = if activity.start >= last_end {
                selected.push(*activity);
                last_end = activity.end;
                (
                    GreedyKind::Select,
                    format!(
                        "Select activity {} ({}..{})",
                        activity.id, activity.start, activity.end
                    ),
                )
            } else {
                (
                    GreedyKind::Skip,
                    format!(
                        "Skip activity {}, it starts before {}",
                        activity.id, last_end
                    ),
                )
            };
            *self.state.view_mut() = GreedyView::Activities {
                activities: sorted.clone(),
                current: Some(index),
                selected: selected.clone(),
                last_end,
            };
            self.record(kind, description);
            self.state.wait(&run).await?;
        }

        let description = format!("Selected {} activities", selected.len());
        *self.state.view_mut() = GreedyView::Activities {
            activities: sorted,
            current: None,
            selected: selected.clone(),
            last_end,
        };
        self.record(GreedyKind::Solution, description.clone());
        let solution = GreedySolution::Activities(selected);
        self.state.finish(Some(solution.clone()), description);
        Ok(solution)
    }

    fn record(&mut self, kind: GreedyKind, description: String) {
        let snapshot = self.state.view().clone();
        self.state.add_step(kind, 0, snapshot, description, None);
    }
}

impl Default for GreedyDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for GreedyDriver {
    type Family = Greedy;

    fn container(&self) -> &StateContainer<Greedy> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<Greedy> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> GreedyDriver {
        GreedyDriver::with_config(&EngineConfig::instant())
    }

    #[tokio::test]
    async fn test_make_change_largest_first() {
        let mut d = driver();
        let solution = d.make_change(63, &[1, 5, 25, 10]).await.unwrap();

        assert_eq!(
            solution,
            GreedySolution::Change {
                used: vec![
                    CoinUse { coin: 25, count: 2 },
                    CoinUse { coin: 10, count: 1 },
                    CoinUse { coin: 1, count: 3 },
                ],
                remaining: 0,
            }
        );
        assert_eq!(solution.total_coins(), 6);

        let state = d.get_state();
        assert_eq!(state.log.count_kind(GreedyKind::Select), 3);
        assert_eq!(state.log.count_kind(GreedyKind::Skip), 1);
        assert_eq!(state.log.count_kind(GreedyKind::Solution), 1);
    }

    #[tokio::test]
    async fn test_make_change_reports_remainder() {
        let mut d = driver();
        let solution = d.make_change(7, &[5, 3]).await.unwrap();
        assert_eq!(
            solution,
            GreedySolution::Change {
                used: vec![CoinUse { coin: 5, count: 1 }],
                remaining: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_select_activities_by_end_time() {
        let activities = [
            Activity { id: 1, start: 1, end: 4 },
            Activity { id: 2, start: 3, end: 5 },
            Activity { id: 3, start: 0, end: 6 },
            Activity { id: 4, start: 5, end: 7 },
            Activity { id: 5, start: 8, end: 9 },
        ];
        let mut d = driver();
        let solution = d.select_activities(&activities).await.unwrap();

        let GreedySolution::Activities(selected) = solution else {
            panic!("expected activities");
        };
        let ids: Vec<u32> = selected.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 4, 5]);
    }
}
