//! Ticket entity
//!
//! A ticket is one purchasable inventory unit: one seat for one schedule.
//! Tickets are created in bulk by the activation coordinator and logically
//! owned by their schedule; a ticket never outlives it.

use crate::entity::{ScheduleId, TicketId};
use crate::schedule::Schedule;
use crate::seat::Seat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sale status of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    /// On sale; set at creation
    Available,
    /// Purchased by a customer (booking flow is a collaborator concern)
    Sold,
    /// Withdrawn, e.g. when the schedule is cancelled
    Cancelled,
}

/// A purchasable seat for a specific schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Generated identity
    pub id: TicketId,
    /// The schedule this ticket belongs to
    pub schedule_id: ScheduleId,
    /// Snapshot of the seat at activation time, copied not referenced
    pub seat: Seat,
    /// Sale price, copied from the schedule's base price
    pub price: Decimal,
    /// Current sale status
    pub status: TicketStatus,
}

impl Ticket {
    /// Issue a ticket for one seat of a schedule.
    ///
    /// The price is the schedule's configured base price; pricing
    /// variability (discounts, tiers) is a collaborator concern.
    pub fn issue(schedule: &Schedule, seat: Seat) -> Self {
        Self {
            id: TicketId::new(),
            schedule_id: schedule.id,
            seat,
            price: schedule.base_price,
            status: TicketStatus::Available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{HallId, VenueId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn schedule() -> Schedule {
        Schedule::new("Metropolis", VenueId(1), HallId(1), Utc::now(), dec!(40.00)).unwrap()
    }

    #[test]
    fn test_issue_copies_price_and_links_schedule() {
        let schedule = schedule();
        let ticket = Ticket::issue(&schedule, Seat::new("A", 1));

        assert_eq!(ticket.schedule_id, schedule.id);
        assert_eq!(ticket.price, dec!(40.00));
        assert_eq!(ticket.status, TicketStatus::Available);
        assert_eq!(ticket.seat, Seat::new("A", 1));
    }

    #[test]
    fn test_issued_tickets_have_unique_ids() {
        let schedule = schedule();
        let t1 = Ticket::issue(&schedule, Seat::new("A", 1));
        let t2 = Ticket::issue(&schedule, Seat::new("A", 2));

        assert_ne!(t1.id, t2.id);
    }

    #[test]
    fn test_seat_snapshot_is_independent_of_directory() {
        // Mutating the source seat after issue must not affect the ticket
        let schedule = schedule();
        let mut seat = Seat::new("B", 3);
        let ticket = Ticket::issue(&schedule, seat.clone());

        seat.row = "Z".to_string();

        assert_eq!(ticket.seat.row, "B");
    }
}
