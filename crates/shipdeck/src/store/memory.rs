//! In-process ship store.

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::ShipStore;
use crate::error::{Error, Operation, Result};
use crate::ship::{Ship, ShipDraft, ShipQuery};

const NOT_FOUND: &str = "ship not found";

/// A [`ShipStore`] that keeps ships in memory.
///
/// Mirrors the remote service: creates reject an id that is already taken,
/// and reads or writes of an unknown id fail as a not-found network error.
/// Ships keep their insertion order.
#[derive(Debug, Default)]
pub struct MemoryShipStore {
    ships: RwLock<Vec<Ship>>,
}

impl MemoryShipStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `ships`; a later duplicate id replaces an earlier one.
    #[must_use]
    pub fn with_ships(ships: Vec<Ship>) -> Self {
        let mut unique: Vec<Ship> = Vec::with_capacity(ships.len());
        for ship in ships {
            match unique.iter_mut().find(|s| s.id == ship.id) {
                Some(slot) => *slot = ship,
                None => unique.push(ship),
            }
        }
        Self {
            ships: RwLock::new(unique),
        }
    }

    /// Create a store preloaded from a JSON array of ships.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of
    /// ships.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;
        let ships: Vec<Ship> = serde_json::from_slice(&bytes)?;
        info!(count = ships.len(), path = %path.display(), "seeded standalone store");
        Ok(Self::with_ships(ships))
    }

    /// Add a ship with its own id.
    ///
    /// # Errors
    ///
    /// Returns an error if a ship with the same id already exists.
    pub async fn insert(&self, ship: Ship) -> Result<Ship> {
        let mut ships = self.ships.write().await;
        if ships.iter().any(|s| s.id == ship.id) {
            warn!(id = %ship.id, "duplicate ship id");
            return Err(Error::network(
                Operation::Create,
                "ship with this id already exists",
            ));
        }
        ships.push(ship.clone());
        Ok(ship)
    }

    /// Number of stored ships.
    pub async fn len(&self) -> usize {
        self.ships.read().await.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.ships.read().await.is_empty()
    }
}

#[async_trait]
impl ShipStore for MemoryShipStore {
    async fn list(&self) -> Result<Vec<Ship>> {
        Ok(self.ships.read().await.clone())
    }

    async fn create(&self, draft: ShipDraft) -> Result<Ship> {
        let ship = Ship::from_draft(Ship::mint_id(), draft);
        debug!(id = %ship.id, "creating ship in memory");
        self.insert(ship).await
    }

    async fn update(&self, id: &str, draft: ShipDraft) -> Result<Ship> {
        let mut ships = self.ships.write().await;
        let slot = ships
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::network(Operation::Update, NOT_FOUND))?;
        *slot = Ship::from_draft(id, draft);
        Ok(slot.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut ships = self.ships.write().await;
        let index = ships
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::network(Operation::Delete, NOT_FOUND))?;
        ships.remove(index);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Ship> {
        self.ships
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::network(Operation::Get, NOT_FOUND))
    }

    async fn search(&self, query: &ShipQuery) -> Result<Vec<Ship>> {
        Ok(self
            .ships
            .read()
            .await
            .iter()
            .filter(|s| query.accepts(s))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<String> {
        Ok("Online".to_string())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
