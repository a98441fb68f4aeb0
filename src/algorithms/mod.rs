//! Algorithm drivers
//!
//! - [`sorting`]: ten sorts over a tagged array
//! - [`dynamic`]: LIS, 0/1 knapsack and edit distance table fillers
//! - [`backtracking`]: permutations, N-Queens and Sudoku search trees
//! - [`recursion`]: Fibonacci, factorial and Towers of Hanoi call trees
//! - [`greedy`]: coin change and activity selection

pub mod backtracking;
pub mod dynamic;
pub mod greedy;
pub mod recursion;
pub mod sorting;

pub use backtracking::{Arrangement, BacktrackingDriver, SearchKind};
pub use dynamic::{DpKind, DpSolution, DynamicProgrammingDriver, EditOp};
pub use greedy::{Activity, CoinUse, GreedyDriver, GreedyKind, GreedySolution};
pub use recursion::{CallKind, HanoiMove, RecursionDriver};
pub use sorting::{SortKind, SortingDriver, Tag};
