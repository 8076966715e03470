//! Swarm State Storage
//!
//! One record per room name. A missing record is never an error: callers
//! use [`SwarmStore::get_or_init`] to lazily create the default.

use std::collections::BTreeMap;

use swarm_common::{Result, RoomName, StoreError, SwarmState};

/// Trait for per-room state storage backends
pub trait SwarmStore {
    /// Get the record for `room`, if one exists
    fn get(&self, room: &RoomName) -> Option<&SwarmState>;

    /// Get the record for `room`, inserting a fresh default if absent
    fn get_or_init(&mut self, room: &RoomName) -> &mut SwarmState;

    /// Replace the record for `room`
    fn put(&mut self, room: RoomName, state: SwarmState);

    /// All rooms with a record, in a stable order
    fn room_names(&self) -> Vec<RoomName>;

    /// Drop the record for `room`
    fn remove(&mut self, room: &RoomName) -> Option<SwarmState>;

    /// Number of records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory storage implementation
///
/// Ordered by room name so iteration and serialized output are stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemorySwarmStore {
    rooms: BTreeMap<RoomName, SwarmState>,
}

impl InMemorySwarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize every record to a JSON object keyed by room name
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(&self.rooms)
            .map_err(|e| StoreError::Encode(e.to_string()))?;
        Ok(json)
    }

    /// Restore a store previously written by [`InMemorySwarmStore::to_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        let rooms = serde_json::from_str(json).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Self { rooms })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoomName, &SwarmState)> {
        self.rooms.iter()
    }
}

impl SwarmStore for InMemorySwarmStore {
    fn get(&self, room: &RoomName) -> Option<&SwarmState> {
        self.rooms.get(room)
    }

    fn get_or_init(&mut self, room: &RoomName) -> &mut SwarmState {
        self.rooms.entry(room.clone()).or_default()
    }

    fn put(&mut self, room: RoomName, state: SwarmState) {
        self.rooms.insert(room, state);
    }

    fn room_names(&self) -> Vec<RoomName> {
        self.rooms.keys().cloned().collect()
    }

    fn remove(&mut self, room: &RoomName) -> Option<SwarmState> {
        self.rooms.remove(room)
    }

    fn len(&self) -> usize {
        self.rooms.len()
    }
}
