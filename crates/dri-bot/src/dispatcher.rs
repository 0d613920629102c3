//! Team review dispatch
//!
//! Picks the owning team from the category labels, asks GitHub for that
//! team's review, and waits (bounded) until GitHub's team review assignment
//! resolves the request to one member. That member becomes the DRI.

use crate::clock::Clock;
use crate::retry::retry_until;
use dri_config::{CategoryTeam, DriConfig};
use gh_client::{GitHubClient, PullRequest, ReviewRequestOutcome};
use log::{debug, info, warn};

/// What happened when dispatching one pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No configured category label is present
    NoCategory,

    /// Reviewers and an assignee are already present
    AlreadyHandled,

    /// GitHub refused the team review; no other category is tried
    Conflict { team: String, reason: String },

    /// Writes are disabled, so no reviewer can be discovered
    DryRun { team: String },

    /// The review was requested but no team member showed up before the ceiling
    Unresolved { team: String },

    /// A member of the team was picked as reviewer
    Discovered { team: String, login: String },
}

/// First configured category whose label is on the pull request
///
/// Configuration order decides; label order on the pull request does not.
pub fn select_category<'a>(pr: &PullRequest, config: &'a DriConfig) -> Option<&'a CategoryTeam> {
    config.categories.iter().find(|c| pr.has_label(&c.label))
}

/// A pull request with any review request and any assignee counts as handled
///
/// Which reviewer or assignee is present is not checked, so an unrelated
/// reviewer plus assignee also skips the dispatch.
pub fn is_already_handled(pr: &PullRequest) -> bool {
    pr.has_review_requests() && pr.has_assignees()
}

/// Request the owning team's review and discover the assigned member
pub async fn dispatch(
    client: &dyn GitHubClient,
    config: &DriConfig,
    clock: &dyn Clock,
    pr: &PullRequest,
) -> anyhow::Result<DispatchOutcome> {
    let Some(category) = select_category(pr, config) else {
        debug!("PR #{} has no category label, skipping", pr.number);
        return Ok(DispatchOutcome::NoCategory);
    };

    if is_already_handled(pr) {
        debug!(
            "PR #{} already has reviewers and assignees, skipping team {}",
            pr.number, category.team
        );
        return Ok(DispatchOutcome::AlreadyHandled);
    }

    let team = category.team.clone();
    info!(
        "Requesting review from team {} on PR #{} ({})",
        team, pr.number, category.label
    );

    match client
        .request_team_review(&config.owner, &config.repo, pr.number, &team)
        .await?
    {
        ReviewRequestOutcome::Requested => {}
        ReviewRequestOutcome::Conflict(reason) => {
            warn!(
                "Team {} cannot review PR #{}: {}",
                team, pr.number, reason
            );
            return Ok(DispatchOutcome::Conflict { team, reason });
        }
        ReviewRequestOutcome::DryRun => {
            return Ok(DispatchOutcome::DryRun { team });
        }
    }

    match discover_reviewer(client, config, clock, pr.number, &team).await? {
        Some(login) => {
            info!("Team {} assigned {} to PR #{}", team, login, pr.number);
            Ok(DispatchOutcome::Discovered { team, login })
        }
        None => {
            warn!(
                "No member of team {} was assigned to PR #{} within {}s, retrying next run",
                team, pr.number, config.poll_ceiling_secs
            );
            Ok(DispatchOutcome::Unresolved { team })
        }
    }
}

/// Poll the requested reviewers until one of them is a member of `team`
pub async fn discover_reviewer(
    client: &dyn GitHubClient,
    config: &DriConfig,
    clock: &dyn Clock,
    pr_number: u64,
    team: &str,
) -> anyhow::Result<Option<String>> {
    let members = client.fetch_team_members(config.org(), team).await?;
    let members = &members;
    let (owner, repo) = (config.owner.as_str(), config.repo.as_str());

    retry_until(
        clock,
        config.poll_interval(),
        config.poll_ceiling(),
        move || async move {
            let requested = client
                .fetch_requested_reviewers(owner, repo, pr_number)
                .await?;
            debug!(
                "PR #{} requested reviewers: {:?}",
                pr_number, requested.users
            );
            Ok(first_member(&requested.users, members))
        },
    )
    .await
}

/// First login that belongs to `members` (logins compare case-insensitively)
fn first_member(logins: &[String], members: &[String]) -> Option<String> {
    logins
        .iter()
        .find(|login| members.iter().any(|m| m.eq_ignore_ascii_case(login)))
        .cloned()
}
