//! Escalation of overdue assignments
//!
//! Once the DRI has held a pull request for `reminder_days_threshold` days,
//! a single reminder comment is posted and the pull request's project board
//! item is moved to the "Delayed" status.

use crate::clock::Clock;
use crate::markers::{assignment_started_at, has_marker, whole_days_between};
use dri_config::{render_template, DriConfig};
use gh_client::{GitHubClient, PullRequest};
use log::{debug, info};

/// Result of the board update that accompanies a reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardUpdate {
    /// No project board is configured
    NotConfigured,
    /// The pull request is not on the board
    NotOnBoard,
    /// The item's status was set to the delayed option
    Updated { item_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationOutcome {
    /// Nobody is assigned, nothing to escalate
    NotAssigned,
    /// A reminder was posted before
    AlreadyReminded { dri: String },
    /// The assignment is younger than the threshold
    WithinThreshold { dri: String, age_days: i64 },
    /// A reminder was posted now
    Reminded {
        dri: String,
        age_days: i64,
        board: BoardUpdate,
    },
}

/// Text of the reminder comment for `login`
pub fn reminder_comment(config: &DriConfig, login: &str, age_days: i64) -> String {
    let policy_url = config.policy_url();
    let days = age_days.to_string();
    render_template(
        &config.reminder_template,
        &[
            ("marker", config.reminder_marker.as_str()),
            ("dri", login),
            ("days", &days),
            ("policy_url", &*policy_url),
        ],
    )
}

/// Remind the DRI of `pr` if the assignment is overdue
///
/// The first assignee is the DRI of record. The assignment start comes from
/// the first assignment comment, or the creation time when there is none.
pub async fn escalate(
    client: &dyn GitHubClient,
    config: &DriConfig,
    clock: &dyn Clock,
    pr: &PullRequest,
) -> anyhow::Result<EscalationOutcome> {
    let Some(dri) = pr.assignees.first().cloned() else {
        return Ok(EscalationOutcome::NotAssigned);
    };

    let comments = client
        .fetch_comments(&config.owner, &config.repo, pr.number)
        .await?;

    if has_marker(&comments, &config.reminder_marker) {
        debug!("PR #{} already has a reminder for {}", pr.number, dri);
        return Ok(EscalationOutcome::AlreadyReminded { dri });
    }

    let started_at = assignment_started_at(&comments, &config.assignment_marker, pr.created_at);
    let age_days = whole_days_between(started_at, clock.now());
    if age_days < config.reminder_days_threshold {
        debug!(
            "PR #{} assigned to {} for {} days, below {}",
            pr.number, dri, age_days, config.reminder_days_threshold
        );
        return Ok(EscalationOutcome::WithinThreshold { dri, age_days });
    }

    info!(
        "PR #{} assigned to {} for {} days, sending reminder",
        pr.number, dri, age_days
    );
    client
        .create_comment(
            &config.owner,
            &config.repo,
            pr.number,
            &reminder_comment(config, &dri, age_days),
        )
        .await?;

    let board = mark_delayed(client, config, pr).await?;

    Ok(EscalationOutcome::Reminded {
        dri,
        age_days,
        board,
    })
}

/// Move the pull request's board item to the delayed status
async fn mark_delayed(
    client: &dyn GitHubClient,
    config: &DriConfig,
    pr: &PullRequest,
) -> anyhow::Result<BoardUpdate> {
    let Some(project) = &config.project else {
        return Ok(BoardUpdate::NotConfigured);
    };

    let Some(item) = client
        .find_project_item(&project.project_id, &pr.node_id, pr.number)
        .await?
    else {
        debug!("PR #{} is not on project {}", pr.number, project.project_id);
        return Ok(BoardUpdate::NotOnBoard);
    };

    client
        .set_project_item_status(
            &project.project_id,
            &item.id,
            &project.status_field_id,
            &project.delayed_option_id,
        )
        .await?;
    info!("Marked PR #{} as delayed on the project board", pr.number);

    Ok(BoardUpdate::Updated { item_id: item.id })
}
