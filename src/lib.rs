//! # Cinema Domain
//!
//! Schedule lifecycle and ticket-inventory materialization for a cinema
//! bounded context.
//!
//! The core workflow: when a screening schedule moves from `Scheduled` to
//! `Active`, the [`ActivationCoordinator`] fetches the authoritative seat
//! layout from the external seat directory and materializes one purchasable
//! ticket per seat, priced from the schedule, exactly once. Status and
//! inventory are committed so that neither can exist without the other.
//!
//! ## Design Principles
//!
//! 1. **Type Safety**: phantom-typed IDs keep schedule and ticket
//!    identities apart at compile time
//! 2. **Controlled State**: the status enum restricts transitions to the
//!    edges of a defined graph; activation fires on exactly one edge
//! 3. **Snapshot Immutability**: tickets embed a copy of their seat, so
//!    later layout changes never alter issued inventory
//! 4. **Explicit Consistency**: activation reserves the transition with a
//!    compare-and-set only after seats are fetched and tickets built, and
//!    compensates if the bulk write fails
//!
//! ## Example
//!
//! ```no_run
//! use cinema_domain::{
//!     ActivationConfig, ActivationCoordinator, HallId, NoopEventPublisher, Schedule,
//!     ScheduleStatus, ScheduleStore, VenueId,
//!     infrastructure::{InMemoryScheduleStore, InMemoryTicketStore, NatsSeatDirectory,
//!                      NatsSeatDirectoryConfig},
//! };
//! use rust_decimal_macros::dec;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let schedules = Arc::new(InMemoryScheduleStore::new());
//! let tickets = Arc::new(InMemoryTicketStore::new());
//! let directory =
//!     Arc::new(NatsSeatDirectory::connect(NatsSeatDirectoryConfig::default()).await?);
//!
//! let coordinator = ActivationCoordinator::new(
//!     schedules.clone(),
//!     tickets,
//!     directory,
//!     Arc::new(NoopEventPublisher),
//!     ActivationConfig::default(),
//! );
//!
//! let mut schedule = Schedule::new(
//!     "Blade Runner",
//!     VenueId(1),
//!     HallId(2),
//!     chrono::Utc::now(),
//!     dec!(40.00),
//! )?;
//! schedule.transition_to(ScheduleStatus::Scheduled)?;
//! let id = schedule.id;
//! schedules.insert(schedule).await?;
//!
//! let report = coordinator.activate(id).await?;
//! println!("materialized {} tickets", report.ticket_count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod activation;
mod entity;
mod errors;
mod events;
mod schedule;
mod seat;
mod seat_directory;
mod state_machine;
mod stores;
mod ticket;

pub mod infrastructure;

pub use activation::{ActivationConfig, ActivationCoordinator, ActivationReport};
pub use entity::{
    AggregateRoot, EntityId, HallId, ScheduleId, ScheduleMarker, TicketId, TicketMarker, VenueId,
};
pub use errors::{DomainError, DomainResult, WriteStage};
pub use events::{
    ActivationRolledBack, DomainEvent, EventPublisher, MockEventPublisher, NoopEventPublisher,
    ScheduleActivated, ScheduleStatusChanged,
};
pub use schedule::Schedule;
pub use seat::Seat;
pub use seat_directory::{SeatDirectory, SeatDirectoryError};
pub use state_machine::{ScheduleStatus, State, StateTransitions};
pub use stores::{ScheduleStore, StoreError, TicketStore};
pub use ticket::{Ticket, TicketStatus};
