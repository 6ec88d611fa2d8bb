//! In-memory store implementations
//!
//! Backed by `tokio::sync::RwLock` maps. The schedule store implements the
//! conditional status update under a single write lock, which gives the
//! same winner-takes-all semantics a database CAS would. Both stores carry
//! a failure switch so tests can exercise the coordinator's rollback paths.

use crate::entity::{AggregateRoot, ScheduleId, TicketId};
use crate::schedule::Schedule;
use crate::state_machine::ScheduleStatus;
use crate::stores::{ScheduleStore, StoreError, TicketStore};
use crate::ticket::Ticket;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::RwLock;

/// In-memory schedule store
pub struct InMemoryScheduleStore {
    schedules: RwLock<HashMap<ScheduleId, Schedule>>,
    writes_before_failure: AtomicI64,
}

impl Default for InMemoryScheduleStore {
    fn default() -> Self {
        Self {
            schedules: RwLock::new(HashMap::new()),
            writes_before_failure: AtomicI64::new(i64::MAX),
        }
    }
}

impl InMemoryScheduleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `count` more conditional status updates to succeed, then fail
    /// every subsequent one at the backend. Used by tests to exercise the
    /// compensation and partially-applied paths.
    pub fn fail_writes_after(&self, count: i64) {
        self.writes_before_failure.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn insert(&self, schedule: Schedule) -> Result<(), StoreError> {
        let mut schedules = self.schedules.write().await;
        schedules.insert(schedule.id, schedule);
        Ok(())
    }

    async fn get(&self, id: ScheduleId) -> Result<Option<Schedule>, StoreError> {
        Ok(self.schedules.read().await.get(&id).cloned())
    }

    async fn compare_and_set_status(
        &self,
        id: ScheduleId,
        expected: ScheduleStatus,
        next: ScheduleStatus,
    ) -> Result<Schedule, StoreError> {
        if self.writes_before_failure.fetch_sub(1, Ordering::SeqCst) <= 0 {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }

        let mut schedules = self.schedules.write().await;
        let schedule = schedules.get_mut(&id).ok_or(StoreError::NotFound)?;

        if schedule.status != expected {
            return Err(StoreError::PreconditionFailed {
                actual: schedule.status,
            });
        }

        schedule.status = next;
        schedule.increment_version();
        Ok(schedule.clone())
    }
}

/// In-memory ticket store, keyed by (schedule, seat)
#[derive(Default)]
pub struct InMemoryTicketStore {
    tickets: RwLock<HashMap<TicketId, Ticket>>,
    fail_next_batch: AtomicBool,
}

impl InMemoryTicketStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next bulk insert fail without writing anything.
    /// Used by tests to exercise the coordinator's compensation path.
    pub fn fail_next_batch(&self) {
        self.fail_next_batch.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn insert_batch(&self, batch: Vec<Ticket>) -> Result<(), StoreError> {
        if self.fail_next_batch.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected batch failure".to_string()));
        }

        let mut tickets = self.tickets.write().await;

        // Validate the whole batch before writing anything so a rejected
        // batch leaves the store untouched (all-or-nothing). A (schedule,
        // seat) pair must be unique across persisted tickets and within
        // the batch itself.
        let mut in_batch = HashSet::new();
        for ticket in &batch {
            let key = (ticket.schedule_id, ticket.seat.seat_id.as_str());
            let duplicate = !in_batch.insert(key)
                || tickets.values().any(|existing| {
                    existing.schedule_id == ticket.schedule_id
                        && existing.seat.seat_id == ticket.seat.seat_id
                });
            if duplicate {
                return Err(StoreError::Backend(format!(
                    "duplicate seat {} for schedule {}",
                    ticket.seat.seat_id, ticket.schedule_id
                )));
            }
        }

        for ticket in batch {
            tickets.insert(ticket.id, ticket);
        }
        Ok(())
    }

    async fn tickets_for_schedule(&self, id: ScheduleId) -> Result<Vec<Ticket>, StoreError> {
        Ok(self
            .tickets
            .read()
            .await
            .values()
            .filter(|t| t.schedule_id == id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{HallId, VenueId};
    use crate::seat::Seat;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn scheduled() -> Schedule {
        let mut s = Schedule::new("Alien", VenueId(1), HallId(1), Utc::now(), dec!(40.00)).unwrap();
        s.transition_to(ScheduleStatus::Scheduled).unwrap();
        s
    }

    #[tokio::test]
    async fn test_schedule_store_insert_and_get() {
        let store = InMemoryScheduleStore::new();
        let schedule = scheduled();
        let id = schedule.id;

        store.insert(schedule.clone()).await.unwrap();

        assert_eq!(store.get(id).await.unwrap(), Some(schedule));
        assert_eq!(store.get(ScheduleId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cas_succeeds_once_then_rejects() {
        let store = InMemoryScheduleStore::new();
        let schedule = scheduled();
        let id = schedule.id;
        store.insert(schedule).await.unwrap();

        let updated = store
            .compare_and_set_status(id, ScheduleStatus::Scheduled, ScheduleStatus::Active)
            .await
            .unwrap();
        assert_eq!(updated.status, ScheduleStatus::Active);
        assert_eq!(updated.version, 2);

        // Second CAS against the same expected status loses
        let err = store
            .compare_and_set_status(id, ScheduleStatus::Scheduled, ScheduleStatus::Active)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::PreconditionFailed {
                actual: ScheduleStatus::Active
            }
        ));
    }

    #[tokio::test]
    async fn test_cas_on_missing_schedule() {
        let store = InMemoryScheduleStore::new();

        let err = store
            .compare_and_set_status(
                ScheduleId::new(),
                ScheduleStatus::Scheduled,
                ScheduleStatus::Active,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_ticket_batch_rejects_duplicate_seat_atomically() {
        let store = InMemoryTicketStore::new();
        let schedule = scheduled();

        store
            .insert_batch(vec![Ticket::issue(&schedule, Seat::new("A", 1))])
            .await
            .unwrap();

        // Second batch repeats seat A-1, so the whole batch is rejected
        let err = store
            .insert_batch(vec![
                Ticket::issue(&schedule, Seat::new("B", 1)),
                Ticket::issue(&schedule, Seat::new("A", 1)),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));

        let count = store.count_for_schedule(schedule.id).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_batch_repeating_a_seat_within_itself_is_rejected() {
        let store = InMemoryTicketStore::new();
        let schedule = scheduled();

        let err = store
            .insert_batch(vec![
                Ticket::issue(&schedule, Seat::new("A", 1)),
                Ticket::issue(&schedule, Seat::new("A", 1)),
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(store.count_for_schedule(schedule.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_same_seat_in_different_schedules_is_fine() {
        let store = InMemoryTicketStore::new();
        let s1 = scheduled();
        let s2 = scheduled();

        store
            .insert_batch(vec![Ticket::issue(&s1, Seat::new("A", 1))])
            .await
            .unwrap();
        store
            .insert_batch(vec![Ticket::issue(&s2, Seat::new("A", 1))])
            .await
            .unwrap();

        assert_eq!(store.count_for_schedule(s1.id).await.unwrap(), 1);
        assert_eq!(store.count_for_schedule(s2.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_injected_batch_failure_writes_nothing() {
        let store = InMemoryTicketStore::new();
        let schedule = scheduled();

        store.fail_next_batch();
        let err = store
            .insert_batch(vec![Ticket::issue(&schedule, Seat::new("A", 1))])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(store.count_for_schedule(schedule.id).await.unwrap(), 0);

        // The switch resets after one failure
        store
            .insert_batch(vec![Ticket::issue(&schedule, Seat::new("A", 1))])
            .await
            .unwrap();
        assert_eq!(store.count_for_schedule(schedule.id).await.unwrap(), 1);
    }
}
