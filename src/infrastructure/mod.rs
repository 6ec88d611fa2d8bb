//! Infrastructure layer
//!
//! Adapters behind the domain's store and client contracts:
//! - In-memory schedule/ticket stores for tests and single-process use
//! - NATS request/reply client for the external seat directory

pub mod memory;
pub mod nats_seat_directory;

pub use memory::{InMemoryScheduleStore, InMemoryTicketStore};
pub use nats_seat_directory::{NatsSeatDirectory, NatsSeatDirectoryConfig};
