//! Seat value object
//!
//! Seats are produced by the external seat directory and are not owned by
//! this domain. They are immutable values read at activation time; tickets
//! embed a copy so later layout changes never alter issued inventory.

use serde::{Deserialize, Serialize};

/// A single seat in a hall, as reported by the seat directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seat {
    /// Unique within a hall (e.g. "A-1")
    pub seat_id: String,
    /// Row label
    pub row: String,
    /// Seat number within the row
    pub number: u32,
    /// Optional section or tier label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl Seat {
    /// Create a seat with the conventional `row-number` identity
    pub fn new(row: impl Into<String>, number: u32) -> Self {
        let row = row.into();
        Self {
            seat_id: format!("{row}-{number}"),
            row,
            number,
            section: None,
        }
    }

    /// Attach a section/tier label
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.section {
            Some(section) => write!(f, "{} {}{}", section, self.row, self.number),
            None => write!(f, "{}{}", self.row, self.number),
        }
    }
}
