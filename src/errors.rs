//! Error types for domain operations

use crate::entity::{HallId, ScheduleId, VenueId};
use thiserror::Error;

/// The write that was in flight when a persistence failure occurred.
///
/// Infrastructure errors carry the stage so an operator (or a retrying
/// client) knows exactly how far an activation got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    /// The initial schedule lookup
    ScheduleLoad,
    /// The insert of a newly created schedule
    ScheduleInsert,
    /// The conditional status update on the schedule
    StatusWrite,
    /// The all-or-nothing ticket bulk insert
    TicketBulkWrite,
}

impl std::fmt::Display for WriteStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WriteStage::ScheduleLoad => "schedule load",
            WriteStage::ScheduleInsert => "schedule insert",
            WriteStage::StatusWrite => "status write",
            WriteStage::TicketBulkWrite => "ticket bulk write",
        };
        write!(f, "{s}")
    }
}

/// Errors that can occur in domain operations
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Referenced schedule does not exist
    #[error("Schedule not found: {id}")]
    ScheduleNotFound {
        /// ID that was searched for
        id: ScheduleId,
    },

    /// The requested status transition is not legal from the current state
    #[error("Invalid status transition for schedule {schedule_id}: {from} -> {to}")]
    InvalidTransition {
        /// Schedule the transition was attempted on
        schedule_id: ScheduleId,
        /// Current status
        from: String,
        /// Attempted target status
        to: String,
    },

    /// The external seat directory could not be queried
    #[error("Seat directory unavailable for venue {venue_id} hall {hall_id}: {reason}")]
    SeatDirectoryUnavailable {
        /// Venue that was queried
        venue_id: VenueId,
        /// Hall that was queried
        hall_id: HallId,
        /// Underlying failure description
        reason: String,
    },

    /// A store-layer write failed
    #[error("Persistence failure for schedule {schedule_id} during {stage}: {reason}")]
    PersistenceFailure {
        /// Schedule the write belonged to
        schedule_id: ScheduleId,
        /// Which write failed
        stage: WriteStage,
        /// Underlying failure description
        reason: String,
    },

    /// The compensating revert failed; the schedule needs operator attention
    #[error(
        "Activation of schedule {schedule_id} partially applied: status is Active \
         with {tickets_written} tickets written; manual remediation required"
    )]
    PartiallyApplied {
        /// Schedule left in the partially applied state
        schedule_id: ScheduleId,
        /// Number of tickets actually persisted
        tickets_written: usize,
    },

    /// Invariant violation
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Infrastructure errors that a caller may safely retry.
    ///
    /// `PartiallyApplied` is deliberately not retryable: retrying the
    /// activation would be rejected at the precondition check, and the
    /// state needs the compensating path instead.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::SeatDirectoryUnavailable { .. }
                | DomainError::PersistenceFailure { .. }
        )
    }

    /// Validation errors rejected before any observable mutation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::ScheduleNotFound { .. }
                | DomainError::InvalidTransition { .. }
                | DomainError::InvariantViolation(_)
        )
    }
}
