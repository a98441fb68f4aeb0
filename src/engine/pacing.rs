//! Pacing between steps and run generations
//!
//! [`DelayScheduler::wait`] is the only suspension point in the engine. Every
//! run is issued a [`RunToken`] carrying the generation it started in; cancelling
//! or resetting bumps the generation, and the next `wait` of a stale run fails
//! with [`EngineError::Cancelled`] instead of letting it keep writing to the
//! driver's state.

use super::error::{EngineError, Result};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Default pause between two steps
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug)]
struct Pacing {
    delay: Cell<Duration>,
    generation: Cell<u64>,
}

/// Configurable inter-step delay shared by a driver and its controls
#[derive(Debug, Clone)]
pub struct DelayScheduler {
    inner: Rc<Pacing>,
}

/// Proof that a run is the driver's current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken {
    generation: u64,
}

impl RunToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl DelayScheduler {
    pub fn new(delay: Duration) -> Self {
        DelayScheduler {
            inner: Rc::new(Pacing {
                delay: Cell::new(delay),
                generation: Cell::new(0),
            }),
        }
    }

    /// Change the delay used by every subsequent wait
    pub fn set_delay(&self, delay: Duration) {
        self.inner.delay.set(delay);
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay.get()
    }

    /// Start a new run, invalidating any earlier one
    pub fn begin_run(&self) -> RunToken {
        RunToken {
            generation: self.bump(),
        }
    }

    /// Invalidate the current run without starting another
    pub fn cancel(&self) {
        let generation = self.bump();
        tracing::debug!(generation, "run cancelled");
    }

    fn bump(&self) -> u64 {
        let next = self.inner.generation.get() + 1;
        self.inner.generation.set(next);
        next
    }

    pub fn is_current(&self, token: &RunToken) -> bool {
        token.generation == self.inner.generation.get()
    }

    /// Suspend for the current delay, then confirm the run is still current.
    ///
    /// A zero delay still yields to the executor once.
    pub async fn wait(&self, token: &RunToken) -> Result<()> {
        let delay = self.delay();
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }

        if self.is_current(token) {
            Ok(())
        } else {
            tracing::warn!(
                generation = token.generation,
                current = self.inner.generation.get(),
                "stale run stopped at suspension point"
            );
            Err(EngineError::Cancelled {
                generation: token.generation,
            })
        }
    }

    /// Control handle for code that does not own the driver
    pub fn control(&self) -> RunControl {
        RunControl {
            scheduler: self.clone(),
        }
    }
}

impl Default for DelayScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

/// Pacing and cancellation for a driver that is busy running
///
/// Driver operations borrow the driver mutably for the whole run, so anything
/// that needs to slow down, speed up or stop a run in flight holds one of these.
#[derive(Debug, Clone)]
pub struct RunControl {
    scheduler: DelayScheduler,
}

impl RunControl {
    pub fn set_delay(&self, delay: Duration) {
        self.scheduler.set_delay(delay);
    }

    pub fn delay(&self) -> Duration {
        self.scheduler.delay()
    }

    /// Stop the in-flight run at its next suspension point
    pub fn cancel(&self) {
        self.scheduler.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delay() {
        assert_eq!(DelayScheduler::default().delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_begin_run_invalidates_previous_token() {
        let scheduler = DelayScheduler::new(Duration::ZERO);
        let first = scheduler.begin_run();
        let second = scheduler.begin_run();

        assert!(!scheduler.is_current(&first));
        assert!(scheduler.is_current(&second));
    }

    #[tokio::test]
    async fn test_wait_succeeds_for_current_run() {
        let scheduler = DelayScheduler::new(Duration::ZERO);
        let token = scheduler.begin_run();
        assert_eq!(scheduler.wait(&token).await, Ok(()));
    }

    #[tokio::test]
    async fn test_wait_fails_after_cancel() {
        let scheduler = DelayScheduler::new(Duration::ZERO);
        let token = scheduler.begin_run();
        scheduler.control().cancel();

        let result = scheduler.wait(&token).await;
        assert_eq!(
            result,
            Err(EngineError::Cancelled {
                generation: token.generation()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_delay_applies_to_next_wait() {
        let scheduler = DelayScheduler::new(Duration::from_millis(500));
        let control = scheduler.control();
        let token = scheduler.begin_run();

        control.set_delay(Duration::from_millis(20));
        let started = tokio::time::Instant::now();
        scheduler.wait(&token).await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_millis(500));
    }
}
