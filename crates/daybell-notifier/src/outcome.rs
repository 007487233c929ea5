//! Terminal states of a check and the per-tick report.

use daybell_core::types::NotificationKind;

/// Why a check ended without sending anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NothingToReport,
    /// The previous run of the same use case had not finished.
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Delivered,
    Skipped(SkipReason),
    Failed(String),
}

impl CheckOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, CheckOutcome::Failed(_))
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::Delivered => f.write_str("delivered"),
            CheckOutcome::Skipped(SkipReason::NothingToReport) => f.write_str("skipped (nothing to report)"),
            CheckOutcome::Skipped(SkipReason::InFlight) => f.write_str("skipped (previous run in flight)"),
            CheckOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcomes of one tick, in the order the checks were reported.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub outcomes: Vec<(NotificationKind, CheckOutcome)>,
}

impl TickReport {
    pub fn push(&mut self, kind: NotificationKind, outcome: CheckOutcome) {
        self.outcomes.push((kind, outcome));
    }

    pub fn outcome(&self, kind: NotificationKind) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|(k, _)| *k == kind).map(|(_, o)| o)
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|(_, o)| o.is_failed())
    }

    pub fn delivered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == CheckOutcome::Delivered)
            .count()
    }
}
