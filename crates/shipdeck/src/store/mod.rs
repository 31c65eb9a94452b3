//! Ship store clients.
//!
//! This module defines the [`ShipStore`] trait that the view controller
//! talks to, with two implementations:
//!
//! - [`HttpShipStore`]: the remote ship service over JSON/HTTP.
//! - [`MemoryShipStore`]: an in-process store with the same semantics, used
//!   in standalone mode and in tests.
//!
//! Store calls never touch local view state; the caller reconciles results.

mod http;
mod memory;

pub use http::HttpShipStore;
pub use memory::MemoryShipStore;

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::ship::{Ship, ShipDraft, ShipQuery};

/// Remote operations on the ship collection.
///
/// Every failure is an [`Error::Network`](crate::Error::Network); nothing is
/// retried.
#[async_trait]
pub trait ShipStore: Send + Sync + fmt::Debug {
    /// Fetch every ship.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success status or transport failure.
    async fn list(&self) -> Result<Vec<Ship>>;

    /// Create a ship from a draft, minting its identifier.
    ///
    /// Returns the store's copy of the new ship.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success status or transport failure.
    async fn create(&self, draft: ShipDraft) -> Result<Ship>;

    /// Replace every descriptive field of the ship with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the ship does not exist or the call fails.
    async fn update(&self, id: &str, draft: ShipDraft) -> Result<Ship>;

    /// Delete the ship with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the ship does not exist or the call fails.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Fetch one ship by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the ship does not exist or the call fails.
    async fn get(&self, id: &str) -> Result<Ship>;

    /// Fetch the ships passing every filter in `query`.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success status or transport failure.
    async fn search(&self, query: &ShipQuery) -> Result<Vec<Ship>>;

    /// Probe the store and return its status message.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn ping(&self) -> Result<String>;

    /// Short name of this store for logs and status output.
    fn name(&self) -> &'static str;
}
