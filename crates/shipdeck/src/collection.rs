//! Local collection state.
//!
//! [`ShipCollection`] is the view's cache of the last ship set the store
//! confirmed. It performs no I/O; it is only changed by reconciling the
//! result of a successful store call.

use crate::ship::Ship;

/// Ordered in-memory list of known ships.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipCollection {
    ships: Vec<Ship>,
}

impl ShipCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection, as after a list call.
    pub fn replace_all(&mut self, ships: Vec<Ship>) {
        self.ships = ships;
    }

    /// Add a ship at the end, as after a create call.
    pub fn append(&mut self, ship: Ship) {
        self.ships.push(ship);
    }

    /// Replace the ship with the given id, as after an update call.
    ///
    /// Returns `false` and leaves the collection untouched when no ship has
    /// that id.
    pub fn replace_by_id(&mut self, id: &str, ship: Ship) -> bool {
        match self.ships.iter_mut().find(|s| s.id == id) {
            Some(slot) => {
                *slot = ship;
                true
            }
            None => false,
        }
    }

    /// Remove every ship with the given id, as after a delete call.
    ///
    /// Returns the number of ships removed; an absent id is a no-op.
    pub fn remove_by_id(&mut self, id: &str) -> usize {
        let before = self.ships.len();
        self.ships.retain(|s| s.id != id);
        before - self.ships.len()
    }

    /// Look up a ship by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id == id)
    }

    /// Ships whose name, type, or country contains `term`, ignoring case.
    #[must_use]
    pub fn filter(&self, term: &str) -> Vec<&Ship> {
        self.ships.iter().filter(|s| s.matches(term)).collect()
    }

    /// Iterate over all ships in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Ship> {
        self.ships.iter()
    }

    /// Number of ships.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    /// Check if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// The ships as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Ship] {
        &self.ships
    }
}

impl<'a> IntoIterator for &'a ShipCollection {
    type Item = &'a Ship;
    type IntoIter = std::slice::Iter<'a, Ship>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<Ship>> for ShipCollection {
    fn from(ships: Vec<Ship>) -> Self {
        Self { ships }
    }
}
