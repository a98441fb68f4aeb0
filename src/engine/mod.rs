//! Step-recording and replay engine shared by every driver
//!
//! - [`step`]: [`Step`], the append-only [`StepLog`] arena and [`CallStatus`]
//! - [`state`]: the published [`RunState`] and the [`Visualization`] type family
//! - [`subscription`]: subscriber registry with synchronous fan-out
//! - [`pacing`]: [`DelayScheduler`], run generations and [`RunControl`]
//! - [`container`]: [`StateContainer`], which ties the above together
//! - [`driver`]: the [`Driver`] trait every algorithm and structure implements
//! - [`error`]: [`EngineError`]
//!
//! # Execution model
//!
//! Everything runs on one thread. A driver operation mutates its working data
//! synchronously, records a step (deep copy of the data + notify), then awaits
//! [`DelayScheduler::wait`]. That await is the only place another task (the UI)
//! gets to run, so subscribers never observe a half-applied mutation.

pub mod container;
pub mod driver;
pub mod error;
pub mod pacing;
pub mod state;
pub mod step;
pub mod subscription;

pub use container::StateContainer;
pub use driver::Driver;
pub use error::{EngineError, Result};
pub use pacing::{DelayScheduler, RunControl, RunToken, DEFAULT_DELAY};
pub use state::{RunState, Visualization};
pub use step::{CallStatus, Step, StepId, StepLog};
pub use subscription::{SubscriberSet, Subscription};
