//! Per-item outcomes of batch membership sync.
//!
//! A batch never aborts: every item is attempted and the report records
//! what happened to each one. The report replaces the original flow's
//! last-item-wins aggregate, which masked earlier failures.

use serde::{Deserialize, Serialize};

/// What a sync item tried to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncAction {
    /// Add a membership.
    Grant,
    /// Remove a membership.
    Revoke,
    /// Toggle the account's enabled flag.
    SetEnabled,
}

/// What happened to a sync item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    /// The change was applied.
    Applied,
    /// The referenced id did not resolve; the item was skipped.
    Skipped,
    /// The store rejected the change.
    Failed,
}

/// One item of a sync batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    /// The attempted action.
    pub action: SyncAction,
    /// The id or name the item referenced.
    pub subject: String,
    /// What happened.
    pub status: SyncStatus,
    /// Error description for failed items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The aggregated result of a sync batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Per-item outcomes, in processing order.
    pub outcomes: Vec<SyncOutcome>,
}

impl SyncReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an applied change.
    pub fn record_applied(&mut self, action: SyncAction, subject: impl Into<String>) {
        self.outcomes.push(SyncOutcome {
            action,
            subject: subject.into(),
            status: SyncStatus::Applied,
            error: None,
        });
    }

    /// Records an item whose referenced id did not resolve.
    pub fn record_skipped(&mut self, action: SyncAction, subject: impl Into<String>) {
        self.outcomes.push(SyncOutcome {
            action,
            subject: subject.into(),
            status: SyncStatus::Skipped,
            error: None,
        });
    }

    /// Records a change the store rejected.
    pub fn record_failure(
        &mut self,
        action: SyncAction,
        subject: impl Into<String>,
        error: impl Into<String>,
    ) {
        self.outcomes.push(SyncOutcome {
            action,
            subject: subject.into(),
            status: SyncStatus::Failed,
            error: Some(error.into()),
        });
    }

    /// Number of applied changes.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.count(SyncStatus::Applied)
    }

    /// Number of skipped items.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(SyncStatus::Skipped)
    }

    /// Number of failed items.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(SyncStatus::Failed)
    }

    /// Whether no item failed. Skipped items do not count as failures.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, status: SyncStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_by_status() {
        let mut report = SyncReport::new();
        report.record_applied(SyncAction::Grant, "u1");
        report.record_applied(SyncAction::Revoke, "u2");
        report.record_skipped(SyncAction::Grant, "ghost");
        report.record_failure(SyncAction::Grant, "u3", "store unavailable");

        assert_eq!(report.applied(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.succeeded());
    }

    #[test]
    fn earlier_failures_are_not_masked_by_later_successes() {
        let mut report = SyncReport::new();
        report.record_failure(SyncAction::Grant, "u1", "store unavailable");
        report.record_applied(SyncAction::Grant, "u2");

        assert!(!report.succeeded());
        assert_eq!(report.outcomes.len(), 2);
    }

    #[test]
    fn skips_do_not_fail_the_batch() {
        let mut report = SyncReport::new();
        report.record_skipped(SyncAction::Revoke, "ghost");

        assert!(report.succeeded());
        assert_eq!(report.applied(), 0);
    }
}
