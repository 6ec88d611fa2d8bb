//! Seat directory client contract
//!
//! The seat directory is the external authority for the current seat layout
//! of a hall. It is untrusted and unreliable: requests may time out, fail in
//! transport, or come back malformed. A well-formed empty list is a valid
//! answer (a hall with zero configured seats).
//!
//! No retry policy lives at this layer; bounded retry is the activation
//! coordinator's responsibility.

use crate::entity::{HallId, VenueId};
use crate::seat::Seat;
use async_trait::async_trait;
use thiserror::Error;

/// Errors the seat directory boundary can produce
#[derive(Debug, Clone, Error)]
pub enum SeatDirectoryError {
    /// The request did not complete within the configured timeout
    #[error("seat directory request timed out")]
    Timeout,

    /// The request could not be delivered or the connection failed
    #[error("seat directory transport error: {0}")]
    Transport(String),

    /// The response arrived but could not be decoded
    #[error("malformed seat directory response: {0}")]
    MalformedResponse(String),
}

/// Queries the external venue service for the seat layout of a hall
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeatDirectory: Send + Sync {
    /// List the current seats of `(venue_id, hall_id)`.
    ///
    /// The returned order is the directory's; callers must not assume any
    /// particular ordering, only that seat ids are unique within the hall.
    async fn list_seats(
        &self,
        venue_id: VenueId,
        hall_id: HallId,
    ) -> Result<Vec<Seat>, SeatDirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_directory_returns_configured_seats() {
        let mut directory = MockSeatDirectory::new();
        directory
            .expect_list_seats()
            .returning(|_, _| Ok(vec![Seat::new("A", 1), Seat::new("A", 2)]));

        let seats = directory
            .list_seats(VenueId(1), HallId(1))
            .await
            .unwrap();

        assert_eq!(seats.len(), 2);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            SeatDirectoryError::Timeout.to_string(),
            "seat directory request timed out"
        );
        assert_eq!(
            SeatDirectoryError::Transport("connection refused".into()).to_string(),
            "seat directory transport error: connection refused"
        );
    }
}
