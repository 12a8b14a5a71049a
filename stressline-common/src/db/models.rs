//! Experiment vocabulary shared by the content catalog and the ledger
//!
//! Conditions and phases are closed sets; everything arriving over HTTP is
//! parsed into these enums at the boundary and invalid strings are rejected
//! (or degraded, for read-only content lookups) there.

use serde::{Deserialize, Serialize};

/// Record status value for a run still accumulating scores.
pub const STATUS_IN_PROGRESS: &str = "in_progress";
/// Record status value for a finished run.
pub const STATUS_COMPLETED: &str = "completed";

/// Stress-induction arm of the experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Weak,
    Mid,
    Strong,
}

impl Condition {
    /// All conditions, in presentation order.
    pub const ALL: [Condition; 3] = [Condition::Weak, Condition::Mid, Condition::Strong];

    /// Parse a condition string; returns None for anything outside the set.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "weak" => Some(Condition::Weak),
            "mid" => Some(Condition::Mid),
            "strong" => Some(Condition::Strong),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Weak => "weak",
            Condition::Mid => "mid",
            Condition::Strong => "strong",
        }
    }

    /// Dense index for table lookup (matches `ALL` order).
    pub fn index(&self) -> usize {
        match self {
            Condition::Weak => 0,
            Condition::Mid => 1,
            Condition::Strong => 2,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five-minute slice of the scripted timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindow {
    /// Minutes 0-5
    Early,
    /// Minutes 5-10
    Mid,
    /// Minutes 10-15
    Late,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [TimeWindow::Early, TimeWindow::Mid, TimeWindow::Late];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "0-5" => Some(TimeWindow::Early),
            "5-10" => Some(TimeWindow::Mid),
            "10-15" => Some(TimeWindow::Late),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Early => "0-5",
            TimeWindow::Mid => "5-10",
            TimeWindow::Late => "10-15",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TimeWindow::Early => 0,
            TimeWindow::Mid => 1,
            TimeWindow::Late => 2,
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring checkpoint within a session
///
/// The order of `ORDER` is the only phase progression the ledger accepts:
/// a run starts at `pre` and completes at the last timeline window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Pre,
    Warmup,
    Window(TimeWindow),
}

impl Phase {
    /// Fixed phase order for a session.
    pub const ORDER: [Phase; 5] = [
        Phase::Pre,
        Phase::Warmup,
        Phase::Window(TimeWindow::Early),
        Phase::Window(TimeWindow::Mid),
        Phase::Window(TimeWindow::Late),
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pre" => Some(Phase::Pre),
            "warmup" => Some(Phase::Warmup),
            _ => TimeWindow::from_str(s).map(Phase::Window),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pre => "pre",
            Phase::Warmup => "warmup",
            Phase::Window(w) => w.as_str(),
        }
    }

    /// Position within `ORDER`.
    pub fn index(&self) -> usize {
        match self {
            Phase::Pre => 0,
            Phase::Warmup => 1,
            Phase::Window(w) => 2 + w.index(),
        }
    }

    /// The phase immediately before this one, if any.
    pub fn previous(&self) -> Option<Phase> {
        self.index().checked_sub(1).map(|i| Phase::ORDER[i])
    }

    /// Whether recording this phase completes the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Window(TimeWindow::Late))
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_round_trip() {
        for cond in Condition::ALL {
            assert_eq!(Condition::from_str(cond.as_str()), Some(cond));
        }
        assert_eq!(Condition::from_str("WEAK"), None);
        assert_eq!(Condition::from_str(""), None);
        assert_eq!(Condition::from_str("none"), None);
    }

    #[test]
    fn test_phase_round_trip() {
        for phase in Phase::ORDER {
            assert_eq!(Phase::from_str(phase.as_str()), Some(phase));
        }
        assert_eq!(Phase::from_str("post"), None);
        assert_eq!(Phase::from_str("0-10"), None);
    }

    #[test]
    fn test_phase_order_and_previous() {
        assert_eq!(Phase::Pre.previous(), None);
        assert_eq!(Phase::Warmup.previous(), Some(Phase::Pre));
        assert_eq!(
            Phase::Window(TimeWindow::Early).previous(),
            Some(Phase::Warmup)
        );
        assert_eq!(
            Phase::Window(TimeWindow::Late).previous(),
            Some(Phase::Window(TimeWindow::Mid))
        );

        for (i, phase) in Phase::ORDER.iter().enumerate() {
            assert_eq!(phase.index(), i);
        }
    }

    #[test]
    fn test_terminal_phase() {
        assert!(Phase::Window(TimeWindow::Late).is_terminal());
        assert!(!Phase::Window(TimeWindow::Early).is_terminal());
        assert!(!Phase::Pre.is_terminal());
        assert!(!Phase::Warmup.is_terminal());
    }
}
