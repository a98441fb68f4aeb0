//! Backtracking driver
//!
//! Permutations, N-Queens and Sudoku share one depth-first search that keeps
//! its frames on an explicit stack instead of the call stack. Each accepted
//! candidate records a `Try` step whose parent is the `Try` step that led to
//! it, so the log forms the search tree. Candidates are tried in ascending
//! order (input index, column, digit) and the search keeps going after a
//! solution until every branch is exhausted.

use crate::config::EngineConfig;
use crate::engine::{
    CallStatus, Driver, EngineError, Result, RunToken, StateContainer, StepId, Visualization,
};

const SUDOKU_SIZE: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Try,
    Backtrack,
    Solution,
}

impl SearchKind {
    pub fn label(self) -> &'static str {
        match self {
            SearchKind::Try => "try",
            SearchKind::Backtrack => "backtrack",
            SearchKind::Solution => "solution",
        }
    }
}

/// A partial or complete candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arrangement {
    /// Permutation prefix
    Sequence(Vec<i64>),
    /// N-Queens board (1 marks a queen) or Sudoku grid (0 marks a blank)
    Grid(Vec<Vec<u8>>),
}

impl Default for Arrangement {
    fn default() -> Self {
        Arrangement::Sequence(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFrame {
    pub arrangement: Arrangement,
    /// Most recently decided cell, for the grid puzzles
    pub focus: Option<(usize, usize)>,
    pub solutions_found: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Backtracking;

impl Visualization for Backtracking {
    type Kind = SearchKind;
    type Snapshot = SearchFrame;
    type Output = ();
    type Solution = Vec<Arrangement>;
    type View = SearchFrame;
}

/// A problem the search can extend one decision at a time
trait Puzzle {
    /// Number of candidates at the current depth
    fn choices(&self) -> usize;
    fn is_solved(&self) -> bool;
    fn fits(&self, choice: usize) -> bool;
    fn place(&mut self, choice: usize);
    fn remove(&mut self, choice: usize);
    fn describe(&self, choice: usize) -> String;
    fn focus(&self) -> Option<(usize, usize)>;
    fn arrangement(&self) -> Arrangement;
}

struct Permutations<'a> {
    nums: &'a [i64],
    used: Vec<bool>,
    current: Vec<i64>,
}

impl Puzzle for Permutations<'_> {
    fn choices(&self) -> usize {
        self.nums.len()
    }

    fn is_solved(&self) -> bool {
        self.current.len() == self.nums.len()
    }

    fn fits(&self, choice: usize) -> bool {
        !self.used[choice]
    }

    fn place(&mut self, choice: usize) {
        self.used[choice] = true;
        self.current.push(self.nums[choice]);
    }

    fn remove(&mut self, choice: usize) {
        self.used[choice] = false;
        self.current.pop();
    }

    fn describe(&self, choice: usize) -> String {
        format!("{} (index {})", self.nums[choice], choice)
    }

    fn focus(&self) -> Option<(usize, usize)> {
        None
    }

    fn arrangement(&self) -> Arrangement {
        Arrangement::Sequence(self.current.clone())
    }
}

struct Queens {
    board: Vec<Vec<u8>>,
    /// Column of the queen in each filled row
    columns: Vec<usize>,
}

impl Queens {
    fn new(n: usize) -> Self {
        Queens {
            board: vec![vec![0; n]; n],
            columns: Vec::with_capacity(n),
        }
    }
}

impl Puzzle for Queens {
    fn choices(&self) -> usize {
        self.board.len()
    }

    fn is_solved(&self) -> bool {
        self.columns.len() == self.board.len()
    }

    /// Checks the column and both upward diagonals
    fn fits(&self, col: usize) -> bool {
        let row = self.columns.len();
        self.columns
            .iter()
            .enumerate()
            .all(|(r, &c)| c != col && row - r != c.abs_diff(col))
    }

    fn place(&mut self, col: usize) {
        let row = self.columns.len();
        self.board[row][col] = 1;
        self.columns.push(col);
    }

    fn remove(&mut self, col: usize) {
        self.columns.pop();
        let row = self.columns.len();
        self.board[row][col] = 0;
    }

    fn describe(&self, col: usize) -> String {
        format!("queen at row {} column {}", self.columns.len(), col)
    }

    fn focus(&self) -> Option<(usize, usize)> {
        self.columns.last().map(|&col| (self.columns.len() - 1, col))
    }

    fn arrangement(&self) -> Arrangement {
        Arrangement::Grid(self.board.clone())
    }
}

struct Sudoku {
    grid: Vec<Vec<u8>>,
    /// Cells filled by the search, most recent last
    filled: Vec<(usize, usize)>,
}

impl Sudoku {
    fn next_blank(&self) -> Option<(usize, usize)> {
        (0..SUDOKU_SIZE)
            .flat_map(|r| (0..SUDOKU_SIZE).map(move |c| (r, c)))
            .find(|&(r, c)| self.grid[r][c] == 0)
    }

    fn digit(choice: usize) -> u8 {
        choice as u8 + 1
    }
}

impl Puzzle for Sudoku {
    fn choices(&self) -> usize {
        SUDOKU_SIZE
    }

    fn is_solved(&self) -> bool {
        self.next_blank().is_none()
    }

    /// Checks the row, the column and the 3x3 box
    fn fits(&self, choice: usize) -> bool {
        let Some((row, col)) = self.next_blank() else {
            return false;
        };
        let digit = Self::digit(choice);
        let (box_row, box_col) = (row / 3 * 3, col / 3 * 3);
        (0..SUDOKU_SIZE).all(|x| self.grid[row][x] != digit && self.grid[x][col] != digit)
            && (0..3).all(|i| (0..3).all(|j| self.grid[box_row + i][box_col + j] != digit))
    }

    fn place(&mut self, choice: usize) {
        if let Some((row, col)) = self.next_blank() {
            self.grid[row][col] = Self::digit(choice);
            self.filled.push((row, col));
        }
    }

    fn remove(&mut self, _choice: usize) {
        if let Some((row, col)) = self.filled.pop() {
            self.grid[row][col] = 0;
        }
    }

    fn describe(&self, choice: usize) -> String {
        match self.next_blank() {
            Some((row, col)) => format!("{} at ({}, {})", Self::digit(choice), row, col),
            None => format!("{}", Self::digit(choice)),
        }
    }

    fn focus(&self) -> Option<(usize, usize)> {
        self.filled.last().copied()
    }

    fn arrangement(&self) -> Arrangement {
        Arrangement::Grid(self.grid.clone())
    }
}

/// One level of the search
struct Frame {
    /// Next candidate to consider
    next: usize,
    /// Candidate that opened this level and the `Try` step recording it
    entry: Option<(usize, StepId)>,
}

pub struct BacktrackingDriver {
    state: StateContainer<Backtracking>,
}

impl BacktrackingDriver {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        BacktrackingDriver {
            state: StateContainer::new(SearchFrame::default(), config.delay),
        }
    }

    /// Every ordering of `nums`, in lexicographic order of input positions
    pub async fn permutations(&mut self, nums: &[i64]) -> Result<Vec<Arrangement>> {
        let mut puzzle = Permutations {
            nums,
            used: vec![false; nums.len()],
            current: Vec::with_capacity(nums.len()),
        };
        self.search(&mut puzzle, "Permutations").await
    }

    /// Every placement of `n` non-attacking queens on an `n` x `n` board
    pub async fn n_queens(&mut self, n: usize) -> Result<Vec<Arrangement>> {
        let mut puzzle = Queens::new(n);
        self.search(&mut puzzle, "N-Queens").await
    }

    /// Every completion of a 9x9 grid; 0 marks a blank cell
    pub async fn sudoku(&mut self, board: &[Vec<u8>]) -> Result<Vec<Arrangement>> {
        if board.len() != SUDOKU_SIZE || board.iter().any(|row| row.len() != SUDOKU_SIZE) {
            return Err(EngineError::invalid("sudoku board must be 9x9"));
        }
        if board.iter().flatten().any(|&digit| digit > 9) {
            return Err(EngineError::invalid("sudoku cells must hold 0..=9"));
        }
        let mut puzzle = Sudoku {
            grid: board.to_vec(),
            filled: Vec::new(),
        };
        self.search(&mut puzzle, "Sudoku").await
    }

    async fn search<P: Puzzle>(&mut self, puzzle: &mut P, name: &str) -> Result<Vec<Arrangement>> {
        let run = self.state.start_run();
        *self.state.view_mut() = SearchFrame {
            arrangement: puzzle.arrangement(),
            focus: puzzle.focus(),
            solutions_found: 0,
        };
        let mut solutions = Vec::new();
        let mut frames = vec![Frame {
            next: 0,
            entry: None,
        }];

        while let Some(top) = frames.last() {
            let depth = frames.len() - 1;
            let parent = top.entry.map(|(_, id)| id);

            if top.next == 0 && puzzle.is_solved() {
                solutions.push(puzzle.arrangement());
                self.state.view_mut().solutions_found = solutions.len();
                self.record(
                    puzzle,
                    SearchKind::Solution,
                    depth,
                    parent,
                    format!("Solution {} found", solutions.len()),
                );
                self.state.wait(&run).await?;
            }

            let limit = if puzzle.is_solved() { 0 } else { puzzle.choices() };
            let mut choice = top.next;
            while choice < limit && !puzzle.fits(choice) {
                choice += 1;
            }

            if choice < limit {
                let description = format!("Try {}", puzzle.describe(choice));
                puzzle.place(choice);
                let id = self.open(puzzle, depth, parent, description);
                if let Some(frame) = frames.last_mut() {
                    frame.next = choice + 1;
                }
                self.state.wait(&run).await?;
                frames.push(Frame {
                    next: 0,
                    entry: Some((choice, id)),
                });
                continue;
            }

            // Level exhausted: undo the choice that opened it
            let Some(Frame {
                entry: Some((choice, id)),
                ..
            }) = frames.pop()
            else {
                break;
            };
            self.close(&run, puzzle, depth - 1, id, choice, &frames).await?;
        }

        let message = format!("{} finished with {} solutions", name, solutions.len());
        self.state.finish(Some(solutions.clone()), message);
        Ok(solutions)
    }

    fn open<P: Puzzle>(
        &mut self,
        puzzle: &P,
        level: usize,
        parent: Option<StepId>,
        description: String,
    ) -> StepId {
        self.sync(puzzle);
        let snapshot = self.state.view().clone();
        let id = self
            .state
            .add_call(SearchKind::Try, level, snapshot, description, parent);
        self.state.set_status(id, CallStatus::Active);
        id
    }

    async fn close<P: Puzzle>(
        &mut self,
        run: &RunToken,
        puzzle: &mut P,
        level: usize,
        id: StepId,
        choice: usize,
        frames: &[Frame],
    ) -> Result<()> {
        self.state.set_status(id, CallStatus::Returning);
        puzzle.remove(choice);
        let parent = frames.last().and_then(|f| f.entry.map(|(_, id)| id));
        let description = format!("Backtrack {}", puzzle.describe(choice));
        self.record(puzzle, SearchKind::Backtrack, level, parent, description);
        self.state.wait(run).await?;
        self.state.set_status(id, CallStatus::Complete);
        Ok(())
    }

    fn record<P: Puzzle>(
        &mut self,
        puzzle: &P,
        kind: SearchKind,
        level: usize,
        parent: Option<StepId>,
        description: String,
    ) {
        self.sync(puzzle);
        let snapshot = self.state.view().clone();
        self.state.add_step(kind, level, snapshot, description, parent);
    }

    fn sync<P: Puzzle>(&mut self, puzzle: &P) {
        let frame = self.state.view_mut();
        frame.arrangement = puzzle.arrangement();
        frame.focus = puzzle.focus();
    }
}

impl Default for BacktrackingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for BacktrackingDriver {
    type Family = Backtracking;

    fn container(&self) -> &StateContainer<Backtracking> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<Backtracking> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> BacktrackingDriver {
        BacktrackingDriver::with_config(&EngineConfig::instant())
    }

    #[tokio::test]
    async fn test_queen_counts() {
        let mut d = driver();
        for (n, expected) in [(1, 1), (2, 0), (3, 0), (4, 2), (5, 10), (6, 4)] {
            let solutions = d.n_queens(n).await.unwrap();
            assert_eq!(solutions.len(), expected, "n = {}", n);
        }
    }

    #[tokio::test]
    async fn test_first_four_queens_solution() {
        let mut d = driver();
        let solutions = d.n_queens(4).await.unwrap();
        assert_eq!(
            solutions[0],
            Arrangement::Grid(vec![
                vec![0, 1, 0, 0],
                vec![0, 0, 0, 1],
                vec![1, 0, 0, 0],
                vec![0, 0, 1, 0],
            ])
        );
    }

    #[tokio::test]
    async fn test_try_steps_complete_and_nest() {
        let mut d = driver();
        d.permutations(&[1, 2]).await.unwrap();

        let state = d.get_state();
        for step in state.log.iter() {
            if step.kind == SearchKind::Try {
                assert_eq!(step.status, Some(CallStatus::Complete));
            }
            if let Some(parent) = step.parent {
                let parent = state.log.get(parent).unwrap();
                assert_eq!(parent.kind, SearchKind::Try);
                assert_eq!(parent.level + 1, step.level);
            }
        }
    }

    #[tokio::test]
    async fn test_sudoku_fills_last_blank() {
        let solved: Vec<Vec<u8>> = vec![
            vec![5, 3, 4, 6, 7, 8, 9, 1, 2],
            vec![6, 7, 2, 1, 9, 5, 3, 4, 8],
            vec![1, 9, 8, 3, 4, 2, 5, 6, 7],
            vec![8, 5, 9, 7, 6, 1, 4, 2, 3],
            vec![4, 2, 6, 8, 5, 3, 7, 9, 1],
            vec![7, 1, 3, 9, 2, 4, 8, 5, 6],
            vec![9, 6, 1, 5, 3, 7, 2, 8, 4],
            vec![2, 8, 7, 4, 1, 9, 6, 3, 5],
            vec![3, 4, 5, 2, 8, 6, 1, 7, 9],
        ];
        let mut board = solved.clone();
        board[0][0] = 0;
        board[4][4] = 0;
        board[8][8] = 0;

        let mut d = driver();
        let solutions = d.sudoku(&board).await.unwrap();
        assert_eq!(solutions, vec![Arrangement::Grid(solved)]);

        let state = d.get_state();
        assert_eq!(state.log.count_kind(SearchKind::Try), 3);
        let solution = state
            .log
            .iter()
            .find(|s| s.kind == SearchKind::Solution)
            .unwrap();
        assert_eq!(solution.level, 3);
    }

    #[tokio::test]
    async fn test_sudoku_rejects_bad_shape() {
        let mut d = driver();
        let err = d.sudoku(&vec![vec![0; 9]; 8]).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(d.get_state().log.is_empty());
    }
}
