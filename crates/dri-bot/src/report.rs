//! Per-run summary

use std::fmt;

/// Counts of what one run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Open pull requests seen
    pub open: usize,
    /// Eligible pull requests processed
    pub candidates: usize,
    pub labeled: usize,
    pub review_requests: usize,
    pub conflicts: usize,
    pub unresolved: usize,
    pub assigned: usize,
    pub reminders: usize,
    pub board_updates: usize,
    pub escalation_failures: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} open, {} eligible, {} labeled, {} review requests ({} conflicts, {} unresolved), \
             {} assigned, {} reminders, {} board updates, {} escalation failures",
            self.open,
            self.candidates,
            self.labeled,
            self.review_requests,
            self.conflicts,
            self.unresolved,
            self.assigned,
            self.reminders,
            self.board_updates,
            self.escalation_failures
        )
    }
}
