//! GitHub API client with dry-run support
//!
//! This crate provides a trait-based GitHub API client covering the REST and
//! GraphQL calls the DRI bot needs. The design follows the decorator pattern,
//! allowing write suppression to be composed with the base client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  reads:  pull requests, reviewers, teams,        │
//! │          comments, project items                 │
//! │  writes: labels, review requests, assignees,     │
//! │          comments, project item status           │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabClient  │         │ DryRunClient        │
//! │ (direct API)    │◄────────│ (decorator)         │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, TokenResolver, WriteMode};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let token = TokenResolver::new().get_token("github.com").await?;
//! let client = gh_client::build_client("github.com", token, WriteMode::DryRun)?;
//!
//! // Reads hit the API, writes are only logged
//! let prs = client.fetch_open_pull_requests("owner", "repo").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod dry_run_client;
pub mod octocrab_client;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use auth::{build_client, TokenResolver};
pub use client::{GitHubClient, WriteMode};
pub use dry_run_client::DryRunClient;
pub use octocrab_client::OctocrabClient;
pub use types::{Comment, ProjectItem, PullRequest, RequestedReviewers, ReviewRequestOutcome};
