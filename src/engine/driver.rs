//! Surface shared by every driver

use super::container::StateContainer;
use super::pacing::RunControl;
use super::state::{RunState, Visualization};
use super::subscription::{SubscriberSet, Subscription};
use std::time::Duration;

/// The contract between a driver and whatever renders it.
///
/// Implementors only expose their [`StateContainer`]; subscription, state
/// access, pacing and reset come from the provided methods.
pub trait Driver {
    type Family: Visualization;

    fn container(&self) -> &StateContainer<Self::Family>;

    fn container_mut(&mut self) -> &mut StateContainer<Self::Family>;

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&RunState<Self::Family>) + 'static,
    {
        self.container().subscribe(callback)
    }

    fn subscribers(&self) -> SubscriberSet<Self::Family> {
        self.container().subscribers()
    }

    fn get_state(&self) -> RunState<Self::Family> {
        self.container().get_state()
    }

    fn set_delay(&self, delay: Duration) {
        self.container().set_delay(delay);
    }

    fn control(&self) -> RunControl {
        self.container().control()
    }

    /// Clear the step log, reset ids to 0 and notify once
    fn reset(&mut self) {
        self.container_mut().reset();
    }
}
