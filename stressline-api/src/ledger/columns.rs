//! Schema resolution for score columns
//!
//! Application logic names phases; the deployed table names columns, and
//! deployments have used more than one spelling. Resolution starts from
//! the canonical map, probes one existing row to learn the live column
//! set, and keeps the first known spelling that is actually present.
//! Everything here is best-effort: an unreachable or empty store leaves
//! the canonical map in force. The map is recomputed per write because the
//! schema may change between deployments, and the probe is one cheap row.

use sqlx::{Column, Row, SqlitePool};
use tracing::warn;

use stressline_common::db::{Phase, TimeWindow, EXPERIMENT_TABLE};

/// Canonical column per phase, in `Phase::ORDER` order.
const CANONICAL_COLUMNS: [&str; 5] = [
    "vas_pre",
    "vas_warmup",
    "vas_phase1",
    "vas_phase2",
    "vas_phase3",
];

/// Known spellings per phase, canonical first. The first one present in
/// the live schema wins.
pub fn known_spellings(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::Pre => &["vas_pre"],
        Phase::Warmup => &["vas_warmup", "vas_war"],
        Phase::Window(TimeWindow::Early) => &["vas_phase1", "vas_phase_0_5", "vas_pha1"],
        Phase::Window(TimeWindow::Mid) => &["vas_phase2", "vas_phase_5_10", "vas_pha2"],
        Phase::Window(TimeWindow::Late) => &["vas_phase3", "vas_phase_10_15", "vas_pha3"],
    }
}

/// Mapping from logical phase to physical column name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseColumnMap {
    columns: [&'static str; 5],
}

impl PhaseColumnMap {
    /// The canonical convention, used whenever the live schema cannot be
    /// inspected.
    pub fn canonical() -> Self {
        Self {
            columns: CANONICAL_COLUMNS,
        }
    }

    /// Physical column for a logical phase.
    pub fn column(&self, phase: Phase) -> &'static str {
        self.columns[phase.index()]
    }

    fn set(&mut self, phase: Phase, column: &'static str) {
        self.columns[phase.index()] = column;
    }
}

/// Resolve the phase-to-column map against the live schema.
pub async fn resolve_phase_columns(db: &SqlitePool) -> PhaseColumnMap {
    let mut map = PhaseColumnMap::canonical();

    let Some(live) = live_columns(db).await else {
        return map;
    };

    for phase in Phase::ORDER {
        for &candidate in known_spellings(phase) {
            if live.iter().any(|c| c == candidate) {
                map.set(phase, candidate);
                break;
            }
        }
    }

    map
}

/// Column names of the experiment table, learned from one arbitrary row.
///
/// Returns None when the store is unreachable or the table has no rows;
/// both cases fall back to the canonical map.
pub async fn live_columns(db: &SqlitePool) -> Option<Vec<String>> {
    let query = format!("SELECT * FROM {EXPERIMENT_TABLE} LIMIT 1");
    match sqlx::query(&query).fetch_optional(db).await {
        Ok(Some(row)) => Some(
            row.columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        ),
        Ok(None) => None,
        Err(err) => {
            warn!("could not inspect {} schema: {}", EXPERIMENT_TABLE, err);
            None
        }
    }
}
