//! uptop - terminal console for uptime monitoring targets.
//!
//! The console core (transport, registry view, selection, dispatcher, status line) is
//! independent of the terminal so it can be driven from tests against a fake API.

pub mod api;
pub mod app;
pub mod console;
pub mod detail;
pub mod error;
pub mod form;
pub mod profiles;
pub mod registry;
pub mod selection;
pub mod status;
pub mod transport;
pub mod types;
pub mod ui;

pub use console::{Confirm, Console, ConsoleState};
pub use error::{ConsoleError, Result};
