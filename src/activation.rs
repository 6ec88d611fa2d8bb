//! Schedule transition coordinator
//!
//! Orchestrates the activation workflow: validate the transition, fetch the
//! authoritative seat layout, materialize one ticket per seat, and commit
//! status plus inventory so that neither can exist without the other.
//!
//! Consistency policy: the transition is reserved only after the seats have
//! been fetched and every ticket constructed in memory. The reservation is
//! a compare-and-set on the schedule status, which also serializes
//! concurrent activations of the same schedule. If the ticket bulk write
//! then fails, a compensating compare-and-set reverts the status; only if
//! that revert itself fails does the caller see a partially-applied error.

use crate::entity::{HallId, ScheduleId, VenueId};
use crate::errors::{DomainError, DomainResult, WriteStage};
use crate::events::{
    ActivationRolledBack, DomainEvent, EventPublisher, ScheduleActivated, ScheduleStatusChanged,
};
use crate::schedule::Schedule;
use crate::seat::Seat;
use crate::seat_directory::{SeatDirectory, SeatDirectoryError};
use crate::state_machine::{ScheduleStatus, State, StateTransitions};
use crate::stores::{ScheduleStore, StoreError, TicketStore};
use crate::ticket::Ticket;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Tuning for the activation workflow
#[derive(Debug, Clone)]
pub struct ActivationConfig {
    /// Total attempts against the seat directory before giving up
    pub seat_directory_attempts: u32,
    /// Delay between seat directory attempts
    pub retry_backoff: Duration,
    /// Price seeded onto newly created schedules
    pub default_base_price: Decimal,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            seat_directory_attempts: 3,
            retry_backoff: Duration::from_millis(200),
            default_base_price: dec!(40.00),
        }
    }
}

/// Outcome of a successful activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    /// Schedule that was activated
    pub schedule_id: ScheduleId,
    /// Number of tickets materialized, one per seat
    pub ticket_count: usize,
}

/// Coordinates schedule status transitions and ticket materialization
pub struct ActivationCoordinator {
    schedules: Arc<dyn ScheduleStore>,
    tickets: Arc<dyn TicketStore>,
    seat_directory: Arc<dyn SeatDirectory>,
    publisher: Arc<dyn EventPublisher>,
    config: ActivationConfig,
}

impl ActivationCoordinator {
    /// Create a coordinator over long-lived, injected collaborators
    pub fn new(
        schedules: Arc<dyn ScheduleStore>,
        tickets: Arc<dyn TicketStore>,
        seat_directory: Arc<dyn SeatDirectory>,
        publisher: Arc<dyn EventPublisher>,
        config: ActivationConfig,
    ) -> Self {
        Self {
            schedules,
            tickets,
            seat_directory,
            publisher,
            config,
        }
    }

    /// Create and persist a schedule in Draft status, priced at the
    /// configured default base price.
    pub async fn create_schedule(
        &self,
        movie_title: impl Into<String>,
        venue_id: VenueId,
        hall_id: HallId,
        start_time: DateTime<Utc>,
    ) -> DomainResult<Schedule> {
        let schedule = Schedule::new(
            movie_title,
            venue_id,
            hall_id,
            start_time,
            self.config.default_base_price,
        )?;

        let schedule_id = schedule.id;
        self.schedules
            .insert(schedule.clone())
            .await
            .map_err(|e| DomainError::PersistenceFailure {
                schedule_id,
                stage: WriteStage::ScheduleInsert,
                reason: e.to_string(),
            })?;

        debug!(schedule_id = %schedule_id, "schedule created");
        Ok(schedule)
    }

    /// Activate a schedule: move it Scheduled -> Active and materialize one
    /// ticket per seat of its hall, exactly once.
    ///
    /// Validation failures (`ScheduleNotFound`, `InvalidTransition`) occur
    /// before any mutation. On infrastructure failure the schedule is left
    /// in its prior status with zero new tickets, except for the explicit
    /// `PartiallyApplied` case where the compensating revert also failed.
    pub async fn activate(&self, schedule_id: ScheduleId) -> DomainResult<ActivationReport> {
        let schedule = self.load(schedule_id).await?;

        // Reject before any I/O so duplicate calls observe a clean error.
        if !schedule.can_activate() {
            return Err(DomainError::InvalidTransition {
                schedule_id,
                from: schedule.status.name().to_string(),
                to: ScheduleStatus::Active.name().to_string(),
            });
        }

        // Fetch seats and build the full ticket set in memory before any
        // state is touched; a directory failure here mutates nothing.
        let seats = self.fetch_seats(&schedule).await?;
        let tickets: Vec<Ticket> = seats
            .into_iter()
            .map(|seat| Ticket::issue(&schedule, seat))
            .collect();
        let ticket_count = tickets.len();

        // Reserve the transition. The CAS is the serialization point: of
        // concurrent activators, exactly one finds Scheduled and proceeds.
        self.cas_status(schedule_id, ScheduleStatus::Scheduled, ScheduleStatus::Active)
            .await?;

        if let Err(e) = self.tickets.insert_batch(tickets).await {
            return Err(self.compensate(schedule_id, ticket_count, e).await);
        }

        info!(
            schedule_id = %schedule_id,
            ticket_count,
            "schedule activated, ticket inventory materialized"
        );
        self.publish(vec![Box::new(ScheduleActivated {
            schedule_id,
            ticket_count,
        })]);

        Ok(ActivationReport {
            schedule_id,
            ticket_count,
        })
    }

    /// Apply a status transition, routing the activation edge through
    /// [`activate`](Self::activate). All other legal edges are pass-through
    /// status writes with no ticket side effect.
    pub async fn change_status(
        &self,
        schedule_id: ScheduleId,
        target: ScheduleStatus,
    ) -> DomainResult<()> {
        let schedule = self.load(schedule_id).await?;

        if schedule.status.is_activation_edge(&target) {
            self.activate(schedule_id).await?;
            return Ok(());
        }

        if !schedule.status.can_transition_to(&target) {
            return Err(DomainError::InvalidTransition {
                schedule_id,
                from: schedule.status.name().to_string(),
                to: target.name().to_string(),
            });
        }

        let from = schedule.status;
        self.cas_status(schedule_id, from, target).await?;

        debug!(schedule_id = %schedule_id, %from, to = %target, "status changed");
        self.publish(vec![Box::new(ScheduleStatusChanged {
            schedule_id,
            from,
            to: target,
        })]);

        Ok(())
    }

    async fn load(&self, schedule_id: ScheduleId) -> DomainResult<Schedule> {
        self.schedules
            .get(schedule_id)
            .await
            .map_err(|e| DomainError::PersistenceFailure {
                schedule_id,
                stage: WriteStage::ScheduleLoad,
                reason: e.to_string(),
            })?
            .ok_or(DomainError::ScheduleNotFound { id: schedule_id })
    }

    /// Query the seat directory with bounded retry and fixed backoff.
    ///
    /// An empty seat list is a legitimate answer, not a failure. A response
    /// listing the same seat twice is rejected without retry: mapping it
    /// into tickets would mint duplicate inventory for that seat.
    async fn fetch_seats(&self, schedule: &Schedule) -> DomainResult<Vec<Seat>> {
        let attempts = self.config.seat_directory_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            debug!(
                venue_id = %schedule.venue_id,
                hall_id = %schedule.hall_id,
                attempt,
                "querying seat directory"
            );

            match self
                .seat_directory
                .list_seats(schedule.venue_id, schedule.hall_id)
                .await
            {
                Ok(seats) => {
                    if let Some(seat_id) = duplicate_seat(&seats) {
                        let e = SeatDirectoryError::MalformedResponse(format!(
                            "seat {seat_id} listed more than once"
                        ));
                        warn!(
                            venue_id = %schedule.venue_id,
                            hall_id = %schedule.hall_id,
                            error = %e,
                            "seat directory response rejected"
                        );
                        return Err(DomainError::SeatDirectoryUnavailable {
                            venue_id: schedule.venue_id,
                            hall_id: schedule.hall_id,
                            reason: e.to_string(),
                        });
                    }
                    debug!(seat_count = seats.len(), "got seats");
                    return Ok(seats);
                }
                Err(e) => {
                    warn!(
                        venue_id = %schedule.venue_id,
                        hall_id = %schedule.hall_id,
                        attempt,
                        error = %e,
                        "seat directory query failed"
                    );
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.config.retry_backoff).await;
                    }
                }
            }
        }

        Err(DomainError::SeatDirectoryUnavailable {
            venue_id: schedule.venue_id,
            hall_id: schedule.hall_id,
            reason: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn cas_status(
        &self,
        schedule_id: ScheduleId,
        expected: ScheduleStatus,
        next: ScheduleStatus,
    ) -> DomainResult<Schedule> {
        self.schedules
            .compare_and_set_status(schedule_id, expected, next)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => DomainError::ScheduleNotFound { id: schedule_id },
                StoreError::PreconditionFailed { actual } => DomainError::InvalidTransition {
                    schedule_id,
                    from: actual.name().to_string(),
                    to: next.name().to_string(),
                },
                StoreError::Backend(reason) => DomainError::PersistenceFailure {
                    schedule_id,
                    stage: WriteStage::StatusWrite,
                    reason,
                },
            })
    }

    /// Revert a reserved activation after the ticket bulk write failed.
    ///
    /// The bulk write is all-or-nothing, so on entry zero tickets exist for
    /// this schedule. A successful revert leaves the schedule exactly as it
    /// was before the call; a failed revert is the one outcome that needs
    /// an operator, and is surfaced as `PartiallyApplied`.
    async fn compensate(
        &self,
        schedule_id: ScheduleId,
        ticket_count: usize,
        cause: StoreError,
    ) -> DomainError {
        error!(
            schedule_id = %schedule_id,
            ticket_count,
            error = %cause,
            "ticket bulk write failed, reverting activation"
        );

        match self
            .schedules
            .compare_and_set_status(schedule_id, ScheduleStatus::Active, ScheduleStatus::Scheduled)
            .await
        {
            Ok(_) => {
                self.publish(vec![Box::new(ActivationRolledBack {
                    schedule_id,
                    reason: cause.to_string(),
                })]);
                DomainError::PersistenceFailure {
                    schedule_id,
                    stage: WriteStage::TicketBulkWrite,
                    reason: cause.to_string(),
                }
            }
            Err(revert_err) => {
                error!(
                    schedule_id = %schedule_id,
                    error = %revert_err,
                    "compensating status revert failed"
                );
                DomainError::PartiallyApplied {
                    schedule_id,
                    // insert_batch is all-or-nothing and it failed
                    tickets_written: 0,
                }
            }
        }
    }

    fn publish(&self, events: Vec<Box<dyn DomainEvent>>) {
        // Event fan-out is best-effort; the activation outcome is already
        // durable when we get here.
        if let Err(e) = self.publisher.publish_events(events) {
            warn!(error = %e, "failed to publish domain events");
        }
    }
}

/// First seat id that appears more than once in the list, if any
fn duplicate_seat(seats: &[Seat]) -> Option<&str> {
    let mut seen = HashSet::new();
    seats
        .iter()
        .find(|seat| !seen.insert(seat.seat_id.as_str()))
        .map(|seat| seat.seat_id.as_str())
}
