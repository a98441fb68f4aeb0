//! The state container every driver owns
//!
//! [`StateContainer`] combines the published [`RunState`], the subscriber
//! registry and the [`DelayScheduler`]. Drivers mutate their working data,
//! record a step with [`StateContainer::add_step`] (which notifies), then
//! suspend on [`StateContainer::wait`].

use super::error::Result;
use super::pacing::{DelayScheduler, RunControl, RunToken};
use super::state::{RunState, Visualization};
use super::step::{CallStatus, StepId};
use super::subscription::{SubscriberSet, Subscription};
use std::time::Duration;

pub struct StateContainer<V: Visualization> {
    state: RunState<V>,
    subscribers: SubscriberSet<V>,
    scheduler: DelayScheduler,
}

impl<V: Visualization> StateContainer<V> {
    pub fn new(view: V::View, delay: Duration) -> Self {
        StateContainer {
            state: RunState::new(view),
            subscribers: SubscriberSet::new(),
            scheduler: DelayScheduler::new(delay),
        }
    }

    /// Register a callback for every subsequent notification
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&RunState<V>) + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Shared registry handle, usable from inside a callback
    pub fn subscribers(&self) -> SubscriberSet<V> {
        self.subscribers.clone()
    }

    /// Independent copy of the published state
    pub fn get_state(&self) -> RunState<V> {
        self.state.clone()
    }

    pub fn state(&self) -> &RunState<V> {
        &self.state
    }

    pub fn view(&self) -> &V::View {
        &self.state.view
    }

    pub fn view_mut(&mut self) -> &mut V::View {
        &mut self.state.view
    }

    /// Set the message and fan out the state to every subscriber
    pub fn notify(&mut self, message: impl Into<String>) {
        self.state.message = message.into();
        self.subscribers.notify(&self.state);
    }

    /// Fan out without touching the message
    pub fn publish(&self) {
        self.subscribers.notify(&self.state);
    }

    /// Record a step and notify with its description
    pub fn add_step(
        &mut self,
        kind: V::Kind,
        level: usize,
        snapshot: V::Snapshot,
        description: impl Into<String>,
        parent: Option<StepId>,
    ) -> StepId {
        let description = description.into();
        let id = self
            .state
            .log
            .append(kind, level, snapshot, description.clone(), parent);
        tracing::trace!(id, level, ?kind, parent = ?parent, "{}", description);
        self.notify(description);
        id
    }

    /// Record a step that models a call; it starts out `Pending`
    pub fn add_call(
        &mut self,
        kind: V::Kind,
        level: usize,
        snapshot: V::Snapshot,
        description: impl Into<String>,
        parent: Option<StepId>,
    ) -> StepId {
        let description = description.into();
        let id = self
            .state
            .log
            .append(kind, level, snapshot, description.clone(), parent);
        self.state.log.set_status(id, CallStatus::Pending);
        tracing::trace!(id, level, ?kind, parent = ?parent, "call: {}", description);
        self.notify(description);
        id
    }

    /// Move a call step along its lifecycle and publish
    pub fn set_status(&mut self, id: StepId, status: CallStatus) {
        self.state.log.set_status(id, status);
        self.publish();
    }

    /// Mark a call step complete with the value it returned
    pub fn complete_call(&mut self, id: StepId, result: V::Output) {
        self.state.log.set_result(id, result);
        self.set_status(id, CallStatus::Complete);
    }

    /// Record the run's payload, flag it complete and notify
    pub fn finish(&mut self, solution: Option<V::Solution>, message: impl Into<String>) {
        self.state.solution = solution;
        self.state.is_complete = true;
        self.notify(message);
    }

    /// Begin a fresh run: clears history but keeps the view
    pub fn start_run(&mut self) -> RunToken {
        self.clear_history();
        let token = self.scheduler.begin_run();
        tracing::debug!(generation = token.generation(), "run started");
        token
    }

    /// Begin a run that appends to the existing history
    pub fn continue_run(&mut self) -> RunToken {
        self.state.is_complete = false;
        self.scheduler.begin_run()
    }

    /// Clear the log and run metadata, invalidate any run in flight, notify once
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.clear_history();
        tracing::debug!("state reset");
        self.notify("");
    }

    fn clear_history(&mut self) {
        let view = std::mem::take(&mut self.state.view);
        self.state = RunState::new(view);
    }

    pub async fn wait(&self, token: &RunToken) -> Result<()> {
        self.scheduler.wait(token).await
    }

    pub fn set_delay(&self, delay: Duration) {
        self.scheduler.set_delay(delay);
    }

    pub fn delay(&self) -> Duration {
        self.scheduler.delay()
    }

    pub fn control(&self) -> RunControl {
        self.scheduler.control()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::EngineError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone)]
    struct Counter;

    impl Visualization for Counter {
        type Kind = &'static str;
        type Snapshot = Vec<u32>;
        type Output = u32;
        type Solution = u32;
        type View = Vec<u32>;
    }

    fn container() -> StateContainer<Counter> {
        StateContainer::new(vec![1, 2, 3], Duration::ZERO)
    }

    #[test]
    fn test_add_step_notifies_with_description() {
        let mut state = container();
        let messages = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&messages);
        let _ = state.subscribe(move |s| sink.borrow_mut().push(s.message.clone()));

        let snapshot = state.view().clone();
        state.add_step("init", 0, snapshot, "start", None);

        assert_eq!(*messages.borrow(), vec!["start".to_string()]);
        assert_eq!(state.state().current_step(), Some(0));
    }

    #[test]
    fn test_get_state_is_independent() {
        let mut state = container();
        let snapshot = state.view().clone();
        state.add_step("init", 0, snapshot, "start", None);

        let mut copy = state.get_state();
        copy.view.push(99);
        copy.message.push_str(" edited");

        assert_eq!(state.view(), &vec![1, 2, 3]);
        assert_eq!(state.state().message, "start");
    }

    #[test]
    fn test_reset_twice_yields_same_empty_state() {
        let mut state = container();
        let snapshot = state.view().clone();
        state.add_step("init", 0, snapshot.clone(), "a", None);
        state.add_step("init", 0, snapshot, "b", None);

        state.reset();
        let first = state.get_state();
        state.reset();
        let second = state.get_state();

        for s in [&first, &second] {
            assert!(s.log.is_empty());
            assert_eq!(s.current_step(), None);
            assert_eq!(s.message, "");
            assert!(!s.is_complete);
            assert!(s.solution.is_none());
        }

        let snapshot = state.view().clone();
        assert_eq!(state.add_step("init", 0, snapshot, "again", None), 0);
    }

    #[test]
    fn test_reset_notifies_once() {
        let mut state = container();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let _ = state.subscribe(move |_| *counter.borrow_mut() += 1);

        state.reset();
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_reset_invalidates_run_token() {
        let mut state = container();
        let token = state.start_run();
        state.reset();

        assert!(matches!(
            state.wait(&token).await,
            Err(EngineError::Cancelled { .. })
        ));
    }

    #[test]
    fn test_finish_marks_complete() {
        let mut state = container();
        state.start_run();
        state.finish(Some(6), "done");

        let published = state.get_state();
        assert!(published.is_complete);
        assert_eq!(published.solution, Some(6));
        assert_eq!(published.message, "done");
    }
}
