//! DRI assignment and escalation for bot-authored dependency updates
//!
//! Each run handles the open pull requests of one repository:
//!
//! ```text
//! open PRs ──► eligibility ──► stale label ──► team review ──► DRI assignment
//!                                                                    │
//!                                   board "Delayed" ◄── reminder ◄───┘
//! ```
//!
//! Every mutation goes through [`gh_client::GitHubClient`], and all timing
//! goes through [`clock::Clock`].

pub mod assignment;
pub mod clock;
pub mod dispatcher;
pub mod eligibility;
pub mod escalation;
pub mod logger;
pub mod markers;
pub mod report;
pub mod retry;
pub mod stale;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use clock::{Clock, SystemClock};
pub use report::RunReport;
pub use workflow::Workflow;
