//! Terminal viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: playback state, keyboard event loop, pane focus
//! - **[`panes`]**: stateless render functions for each visible pane (structure,
//!   instruction list, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with the
//! [`Scenario`] to open first and call [`App::run`] to start the event loop.
//!
//! [`Scenario`]: crate::scenarios::Scenario
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
