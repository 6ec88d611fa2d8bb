//! Persistence contracts for schedules and tickets
//!
//! The activation workflow only needs three things from storage: point
//! lookup by id, a conditional status update, and an all-or-nothing ticket
//! bulk insert. Everything else about the storage engine is a collaborator
//! concern behind these traits.

use crate::entity::ScheduleId;
use crate::schedule::Schedule;
use crate::state_machine::ScheduleStatus;
use crate::ticket::Ticket;
use async_trait::async_trait;
use thiserror::Error;

/// Errors produced at the store boundary
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The referenced record does not exist
    #[error("record not found")]
    NotFound,

    /// A conditional update found a different current value
    #[error("precondition failed: current status is {actual}")]
    PreconditionFailed {
        /// The status actually found
        actual: ScheduleStatus,
    },

    /// The storage backend failed
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Persists schedules and their status
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Insert a new schedule
    async fn insert(&self, schedule: Schedule) -> Result<(), StoreError>;

    /// Point lookup by id
    async fn get(&self, id: ScheduleId) -> Result<Option<Schedule>, StoreError>;

    /// Atomically set the status to `next` if and only if the current
    /// status equals `expected`; returns the updated schedule.
    ///
    /// This is the per-schedule serialization point: of any number of
    /// concurrent callers, exactly one observes `expected` and wins.
    async fn compare_and_set_status(
        &self,
        id: ScheduleId,
        expected: ScheduleStatus,
        next: ScheduleStatus,
    ) -> Result<Schedule, StoreError>;
}

/// Persists tickets, keyed by (schedule, seat)
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert a batch of tickets with all-or-nothing semantics: either
    /// every ticket is durably applied or none is.
    async fn insert_batch(&self, tickets: Vec<Ticket>) -> Result<(), StoreError>;

    /// All tickets belonging to a schedule
    async fn tickets_for_schedule(&self, id: ScheduleId) -> Result<Vec<Ticket>, StoreError>;

    /// Number of tickets belonging to a schedule
    async fn count_for_schedule(&self, id: ScheduleId) -> Result<usize, StoreError> {
        Ok(self.tickets_for_schedule(id).await?.len())
    }
}
