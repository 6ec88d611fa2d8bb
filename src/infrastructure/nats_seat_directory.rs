//! NATS-backed seat directory client
//!
//! Queries the external venue service over request/reply. The client holds
//! one long-lived connection established at startup; it is never
//! constructed per request. Every request carries an explicit timeout from
//! configuration.

use crate::entity::{HallId, VenueId};
use crate::seat::Seat;
use crate::seat_directory::{SeatDirectory, SeatDirectoryError};
use async_nats::{Client, ConnectOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Configuration for the NATS seat directory client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatsSeatDirectoryConfig {
    /// NATS server URL (e.g. "nats://localhost:4222")
    pub url: String,

    /// Subject prefix the venue service listens on
    pub subject_prefix: String,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for NatsSeatDirectoryConfig {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".to_string(),
            subject_prefix: "venue".to_string(),
            connection_timeout_secs: 10,
            request_timeout_secs: 5,
        }
    }
}

/// Request payload sent to the venue service
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SeatQuery {
    venue_id: VenueId,
    hall_id: HallId,
}

/// Long-lived seat directory client over NATS request/reply
pub struct NatsSeatDirectory {
    client: Client,
    config: NatsSeatDirectoryConfig,
}

impl NatsSeatDirectory {
    /// Connect to NATS with the provided configuration
    pub async fn connect(config: NatsSeatDirectoryConfig) -> Result<Self, SeatDirectoryError> {
        let client = ConnectOptions::new()
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| {
                SeatDirectoryError::Transport(format!("failed to connect to {}: {e}", config.url))
            })?;

        Ok(Self { client, config })
    }

    /// Wrap an already-connected client, e.g. one shared with other
    /// subsystems of the surrounding service.
    pub fn with_client(client: Client, config: NatsSeatDirectoryConfig) -> Self {
        Self { client, config }
    }

    fn subject(&self, venue_id: VenueId, hall_id: HallId) -> String {
        subject_for(&self.config.subject_prefix, venue_id, hall_id)
    }
}

fn subject_for(prefix: &str, venue_id: VenueId, hall_id: HallId) -> String {
    format!("{prefix}.{venue_id}.hall.{hall_id}.seats")
}

#[async_trait]
impl SeatDirectory for NatsSeatDirectory {
    async fn list_seats(
        &self,
        venue_id: VenueId,
        hall_id: HallId,
    ) -> Result<Vec<Seat>, SeatDirectoryError> {
        let subject = self.subject(venue_id, hall_id);
        let payload = serde_json::to_vec(&SeatQuery { venue_id, hall_id })
            .map_err(|e| SeatDirectoryError::Transport(e.to_string()))?;

        debug!(%subject, "requesting seat layout");

        let response = tokio::time::timeout(
            Duration::from_secs(self.config.request_timeout_secs),
            self.client.request(subject, payload.into()),
        )
        .await
        .map_err(|_| SeatDirectoryError::Timeout)?
        .map_err(|e| SeatDirectoryError::Transport(e.to_string()))?;

        let seats: Vec<Seat> = serde_json::from_slice(&response.payload)
            .map_err(|e| SeatDirectoryError::MalformedResponse(e.to_string()))?;

        debug!(seat_count = seats.len(), "seat layout received");
        Ok(seats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NatsSeatDirectoryConfig::default();

        assert_eq!(config.url, "nats://localhost:4222");
        assert_eq!(config.subject_prefix, "venue");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_subject_layout() {
        assert_eq!(
            subject_for("cinema.venue", VenueId(3), HallId(7)),
            "cinema.venue.3.hall.7.seats"
        );
    }

    #[test]
    fn test_seat_query_serializes() {
        let query = SeatQuery {
            venue_id: VenueId(1),
            hall_id: HallId(2),
        };
        let json = serde_json::to_string(&query).unwrap();
        assert_eq!(json, r#"{"venue_id":1,"hall_id":2}"#);
    }
}
