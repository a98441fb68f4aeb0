//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]**: application state, keyboard event loop, replay cursor, pane focus
//! - **[`panes`]**: stateless render functions for each visible pane (scene, steps,
//!   step details, status bar)
//! - **[`scene`]**: the [`Scene`] trait that turns a driver's snapshot into lines
//! - **[`theme`]**: centralized color palette used by all panes
//! - **[`headless`]**: plain-text step stream used when there is no terminal UI
//!
//! The entry point for consumers is [`App`]: attach it to a driver with
//! [`App::attach`] and hand the driver's operation to [`App::run`], which
//! polls the operation and the keyboard together on the current task.
//!
//! [`App::attach`]: app::App::attach
//! [`App::run`]: app::App::run

pub mod app;
pub mod headless;
pub mod panes;
pub mod scene;
pub mod theme;

pub use app::App;
pub use headless::HeadlessLog;
pub use scene::Scene;
