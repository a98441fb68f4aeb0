//! Plain-text step stream for runs without a terminal UI

use crate::engine::{Driver, RunState, Step, Subscription};
use crate::ui::scene::Scene;
use std::cell::{Cell, RefCell};
use std::io::Write;

/// `#<id> L<level> <kind> <description>`
pub fn format_step<V: Scene>(step: &Step<V>) -> String {
    format!(
        "#{} L{} {} {}",
        step.id,
        step.level,
        V::kind_label(step.kind),
        step.description
    )
}

/// Final message plus the solution summary, if the run produced one
pub fn format_outcome<V: Scene>(state: &RunState<V>) -> String {
    match &state.solution {
        Some(solution) => format!("{}\n=> {}", state.message, V::summarize(solution)),
        None => state.message.clone(),
    }
}

/// Writes every newly recorded step to `out` as it is published
pub struct HeadlessLog {
    subscription: Subscription,
}

impl HeadlessLog {
    pub fn attach<D, W>(driver: &D, out: W) -> Self
    where
        D: Driver,
        D::Family: Scene,
        W: Write + 'static,
    {
        let out = RefCell::new(out);
        let printed = Cell::new(driver.get_state().log.len());
        let subscription = driver.subscribe(move |state| {
            // The log shrinks on reset
            if state.log.len() < printed.get() {
                printed.set(0);
            }
            let mut out = out.borrow_mut();
            for step in state.log.steps().iter().skip(printed.get()) {
                if writeln!(out, "{}", format_step(step)).is_err() {
                    break;
                }
            }
            printed.set(state.log.len());
        });
        HeadlessLog { subscription }
    }
}

impl Drop for HeadlessLog {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::RecursionDriver;
    use crate::config::EngineConfig;
    use crate::structures::StackDriver;
    use std::io;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.borrow())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[tokio::test]
    async fn test_each_step_printed_once() {
        let mut driver = StackDriver::with_config(&[], &EngineConfig::instant());
        let out = Shared::default();
        let log = HeadlessLog::attach(&driver, out.clone());

        driver.push(4).await.unwrap();
        driver.pop().await.unwrap();
        drop(log);
        driver.push(5).await.unwrap();

        let lines = out.lines();
        assert_eq!(lines.len(), driver.get_state().log.len() - 1);
        assert!(lines[0].starts_with("#0 L0 push"));
    }

    #[tokio::test]
    async fn test_levels_and_outcome() {
        let mut driver = RecursionDriver::with_config(&EngineConfig::instant());
        let out = Shared::default();
        let _log = HeadlessLog::attach(&driver, out.clone());

        driver.factorial(2).await.unwrap();

        let lines = out.lines();
        assert!(lines.iter().any(|l| l.contains(" L1 ")));
        let state = driver.get_state();
        assert!(format_outcome(&state).starts_with(&state.message));
    }
}
