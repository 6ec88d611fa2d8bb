//! Schedule status graph
//!
//! Schedule statuses form a small Moore-style state machine: transitions are
//! restricted to the edges below, and the ticket-materializing transition
//! (Scheduled -> Active) is singled out so the coordinator can route it
//! through inventory generation while every other edge stays a plain status
//! write.
//!
//! ```text
//! Draft -> Scheduled -> Active -> Completed
//!            |            |
//!            v            v
//!        Cancelled    Cancelled
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for types that can be used as states in a state machine
pub trait State: Debug + Clone + PartialEq + Eq + Send + Sync {
    /// Get the name of this state for logging/debugging
    fn name(&self) -> &'static str;

    /// Check if this is a terminal state
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Valid-transition queries for a state graph
pub trait StateTransitions: State {
    /// Check if a transition to the target state is valid
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Get all valid target states from this state
    fn valid_transitions(&self) -> Vec<Self>;
}

/// Lifecycle status of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleStatus {
    /// Being assembled by the upstream scheduling workflow
    Draft,
    /// Published and awaiting activation
    Scheduled,
    /// On sale; ticket inventory has been materialized
    Active,
    /// Terminal: called off before or after activation
    Cancelled,
    /// Terminal: the screening has taken place
    Completed,
}

impl State for ScheduleStatus {
    fn name(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::Active => "Active",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl StateTransitions for ScheduleStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ScheduleStatus::*;

        match self {
            Draft => vec![Scheduled],
            Scheduled => vec![Active, Cancelled],
            Active => vec![Completed, Cancelled],
            Cancelled => vec![],
            Completed => vec![],
        }
    }
}

impl ScheduleStatus {
    /// Whether moving from `self` to `target` is the edge that materializes
    /// ticket inventory. Fires on Scheduled -> Active only.
    pub fn is_activation_edge(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (ScheduleStatus::Scheduled, ScheduleStatus::Active)
        )
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_edges() {
        use ScheduleStatus::*;

        assert!(Draft.can_transition_to(&Scheduled));
        assert!(Scheduled.can_transition_to(&Active));
        assert!(Active.can_transition_to(&Completed));
    }

    #[test]
    fn test_cancellation_edges() {
        use ScheduleStatus::*;

        assert!(Scheduled.can_transition_to(&Cancelled));
        assert!(Active.can_transition_to(&Cancelled));
        // Drafts are discarded upstream, not cancelled
        assert!(!Draft.can_transition_to(&Cancelled));
    }

    #[test]
    fn test_illegal_edges() {
        use ScheduleStatus::*;

        assert!(!Draft.can_transition_to(&Active));
        assert!(!Active.can_transition_to(&Scheduled));
        assert!(!Active.can_transition_to(&Active));
        assert!(!Completed.can_transition_to(&Active));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        use ScheduleStatus::*;

        assert!(Cancelled.is_terminal());
        assert!(Completed.is_terminal());
        assert!(Cancelled.valid_transitions().is_empty());
        assert!(Completed.valid_transitions().is_empty());
        assert!(!Scheduled.is_terminal());
    }

    #[test]
    fn test_activation_edge_is_unique() {
        use ScheduleStatus::*;

        assert!(Scheduled.is_activation_edge(&Active));

        assert!(!Draft.is_activation_edge(&Scheduled));
        assert!(!Active.is_activation_edge(&Completed));
        assert!(!Scheduled.is_activation_edge(&Cancelled));
        assert!(!Active.is_activation_edge(&Cancelled));
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&ScheduleStatus::Scheduled).unwrap();
        assert_eq!(json, "\"Scheduled\"");

        let status: ScheduleStatus = serde_json::from_str("\"Active\"").unwrap();
        assert_eq!(status, ScheduleStatus::Active);
    }
}
