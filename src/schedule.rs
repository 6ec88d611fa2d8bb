//! Schedule aggregate
//!
//! A schedule is a planned screening in a specific hall of a venue. It owns
//! its ticket inventory: tickets are materialized exactly once, on the
//! Scheduled -> Active transition, and reference the schedule that issued
//! them.

use crate::entity::{AggregateRoot, HallId, ScheduleId, VenueId};
use crate::errors::{DomainError, DomainResult};
use crate::state_machine::{ScheduleStatus, State, StateTransitions};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A planned screening with a lifecycle status
///
/// The venue/hall coordinates live on the entity itself; the activation
/// workflow reads them from here when querying the seat directory, so two
/// schedules in different halls never share a seat layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Unique, immutable identity
    pub id: ScheduleId,
    /// Title of the movie being screened
    pub movie_title: String,
    /// Venue whose seat directory applies
    pub venue_id: VenueId,
    /// Hall within the venue
    pub hall_id: HallId,
    /// When the screening starts
    pub start_time: DateTime<Utc>,
    /// Price every materialized ticket is issued at (non-negative)
    pub base_price: Decimal,
    /// Current lifecycle status
    pub status: ScheduleStatus,
    /// Version for optimistic concurrency
    pub version: u64,
}

impl Schedule {
    /// Create a new schedule in Draft status
    pub fn new(
        movie_title: impl Into<String>,
        venue_id: VenueId,
        hall_id: HallId,
        start_time: DateTime<Utc>,
        base_price: Decimal,
    ) -> DomainResult<Self> {
        if base_price.is_sign_negative() {
            return Err(DomainError::InvariantViolation(format!(
                "base price must be non-negative, got {base_price}"
            )));
        }

        Ok(Self {
            id: ScheduleId::new(),
            movie_title: movie_title.into(),
            venue_id,
            hall_id,
            start_time,
            base_price,
            status: ScheduleStatus::Draft,
            version: 0,
        })
    }

    /// Apply a status transition, validated against the state graph.
    ///
    /// Makes no change and returns `InvalidTransition` when the edge is
    /// illegal, including any attempt to leave a terminal state.
    pub fn transition_to(&mut self, target: ScheduleStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::InvalidTransition {
                schedule_id: self.id,
                from: self.status.name().to_string(),
                to: target.name().to_string(),
            });
        }

        self.status = target;
        self.increment_version();
        Ok(())
    }

    /// Whether activation is currently a legal transition
    pub fn can_activate(&self) -> bool {
        self.status.can_transition_to(&ScheduleStatus::Active)
            && self.status.is_activation_edge(&ScheduleStatus::Active)
    }
}

impl AggregateRoot for Schedule {
    type Id = ScheduleId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn increment_version(&mut self) {
        self.version += 1;
    }
}
