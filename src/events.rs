//! Domain events emitted by the activation workflow
//!
//! Events report what happened; they carry no transport. The coordinator
//! hands them to an [`EventPublisher`] so the surrounding service decides
//! how (or whether) to fan them out.

use crate::entity::ScheduleId;
use crate::state_machine::ScheduleStatus;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Things that happen in the scheduling domain
pub trait DomainEvent: Debug + Send + Sync {
    /// The aggregate this event belongs to
    fn aggregate_id(&self) -> Uuid;

    /// Event type name for routing and logging
    fn event_type(&self) -> &'static str;
}

/// A schedule moved along a pass-through edge of the status graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleStatusChanged {
    /// Schedule that changed
    pub schedule_id: ScheduleId,
    /// Status before the transition
    pub from: ScheduleStatus,
    /// Status after the transition
    pub to: ScheduleStatus,
}

impl DomainEvent for ScheduleStatusChanged {
    fn aggregate_id(&self) -> Uuid {
        self.schedule_id.into()
    }

    fn event_type(&self) -> &'static str {
        "ScheduleStatusChanged"
    }
}

/// A schedule was activated and its ticket inventory materialized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleActivated {
    /// Schedule that was activated
    pub schedule_id: ScheduleId,
    /// Number of tickets created, one per seat in the hall
    pub ticket_count: usize,
}

impl DomainEvent for ScheduleActivated {
    fn aggregate_id(&self) -> Uuid {
        self.schedule_id.into()
    }

    fn event_type(&self) -> &'static str {
        "ScheduleActivated"
    }
}

/// An activation was reverted after the ticket bulk write failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationRolledBack {
    /// Schedule whose status was reverted to Scheduled
    pub schedule_id: ScheduleId,
    /// Why the activation could not complete
    pub reason: String,
}

impl DomainEvent for ActivationRolledBack {
    fn aggregate_id(&self) -> Uuid {
        self.schedule_id.into()
    }

    fn event_type(&self) -> &'static str {
        "ActivationRolledBack"
    }
}

/// Event publisher trait for the coordinator to emit events
pub trait EventPublisher: Send + Sync {
    /// Publish domain events
    fn publish_events(&self, events: Vec<Box<dyn DomainEvent>>) -> Result<(), String>;
}

/// Publisher that drops all events, for callers without an event pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventPublisher;

impl EventPublisher for NoopEventPublisher {
    fn publish_events(&self, _events: Vec<Box<dyn DomainEvent>>) -> Result<(), String> {
        Ok(())
    }
}

/// Mock event publisher for testing
#[derive(Clone, Default)]
pub struct MockEventPublisher {
    published_events: Arc<RwLock<Vec<(String, Uuid)>>>,
}

impl MockEventPublisher {
    /// Create a new mock event publisher for testing
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (event type, aggregate id) pairs for verification in tests.
    ///
    /// Only the type name is tracked to avoid cloning trait objects.
    pub fn get_published_events(&self) -> Vec<(String, Uuid)> {
        self.published_events.read().unwrap().clone()
    }
}

impl EventPublisher for MockEventPublisher {
    fn publish_events(&self, events: Vec<Box<dyn DomainEvent>>) -> Result<(), String> {
        let mut published = self.published_events.write().unwrap();
        for event in events {
            published.push((event.event_type().to_string(), event.aggregate_id()));
        }
        Ok(())
    }
}
