//! # Introduction
//!
//! algotrace runs classic algorithms and data-structure operations step by
//! step, recording a snapshot of the working data at every meaningful moment.
//! The recorded history is published live to subscribers and can be replayed
//! forward and backward in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Driver operation → StateContainer → StepLog → subscribers → TUI / headless log
//!                          ↑
//!                   DelayScheduler (pacing + cancellation)
//! ```
//!
//! 1. [`engine`]: the step log, state container, subscriber fan-out and the
//!    delay scheduler that paces every run.
//! 2. [`algorithms`]: sorting, dynamic programming, backtracking, recursion
//!    and greedy drivers.
//! 3. [`structures`]: array, stack, queue, linked list, binary search tree,
//!    hash table and graph drivers.
//! 4. [`config`]: [`config::EngineConfig`], the defaults every driver is built from.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Concurrency
//!
//! Drivers are single-threaded and `async`. An operation only yields inside
//! the scheduler's delay, so a UI polled on the same task always observes
//! whole steps. Starting a new run or calling [`engine::RunControl::cancel`]
//! makes the run in flight stop at its next delay with
//! [`engine::EngineError::Cancelled`].

pub mod algorithms;
pub mod config;
pub mod engine;
pub mod structures;
pub mod ui;
