//! `shipdeck` - A catalog manager for historical ship records
//!
//! This library provides the ship record model, clients for the remote ship
//! service and an in-memory stand-in, and the session-gated view state that
//! keeps a local copy of the collection in step with the store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod collection;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod render;
pub mod session;
pub mod shell;
pub mod ship;
pub mod store;
pub mod view;

pub use collection::ShipCollection;
pub use config::Config;
pub use controller::ViewController;
pub use error::{Error, Operation, Result};
pub use logging::init_logging;
pub use session::{Session, SessionState, TokenSession};
pub use shell::Shell;
pub use ship::{LaunchYear, Ship, ShipDraft, ShipQuery};
pub use store::{HttpShipStore, MemoryShipStore, ShipStore};
pub use view::{Action, Mode, Notification, NotificationKind, ViewState};
