//! Identity primitives for the scheduling domain

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed entity ID using phantom types for type safety
///
/// IDs are globally unique and persistent. The phantom type parameter
/// ensures that IDs for different entity types cannot be mixed up at
/// compile time: a `TicketId` can never be passed where a `ScheduleId`
/// is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId<T> {
    id: Uuid,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Create an entity ID from an existing UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

/// Marker for schedule entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleMarker;

/// Marker for ticket entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketMarker;

/// Identifier for a schedule
pub type ScheduleId = EntityId<ScheduleMarker>;

/// Identifier for a ticket
pub type TicketId = EntityId<TicketMarker>;

/// Identifier for a venue in the external seat directory's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VenueId(pub u64);

/// Identifier for a hall within a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HallId(pub u64);

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for HallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marker trait for aggregate roots
///
/// Aggregate roots are the entry points for modifying aggregates. The
/// version supports optimistic concurrency at the store layer.
pub trait AggregateRoot: Sized {
    /// The type of ID for this aggregate
    type Id: Copy + Eq + Send + Sync;

    /// Get the aggregate's ID
    fn id(&self) -> Self::Id;

    /// Get the aggregate's version for optimistic concurrency
    fn version(&self) -> u64;

    /// Increment the version
    fn increment_version(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_uniqueness() {
        let id1 = ScheduleId::new();
        let id2 = ScheduleId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_uuid().is_nil());
    }

    #[test]
    fn test_entity_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = TicketId::from_uuid(uuid);

        assert_eq!(id.as_uuid(), &uuid);
        assert_eq!(format!("{id}"), format!("{uuid}"));
    }

    #[test]
    fn test_entity_id_serde_roundtrip() {
        let original = ScheduleId::new();

        let json = serde_json::to_string(&original).unwrap();
        let deserialized: ScheduleId = serde_json::from_str(&json).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_entity_id_as_map_key() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        let id1 = ScheduleId::new();
        let id2 = ScheduleId::new();

        map.insert(id1, "first");
        map.insert(id2, "second");

        assert_eq!(map.get(&id1), Some(&"first"));
        assert_eq!(map.get(&id2), Some(&"second"));
    }

    #[test]
    fn test_venue_and_hall_display() {
        assert_eq!(VenueId(3).to_string(), "3");
        assert_eq!(HallId(12).to_string(), "12");
    }
}
