//! DRI assignment

use dri_config::{render_template, DriConfig};
use gh_client::{Comment, GitHubClient, PullRequest};
use log::info;

/// Text of the comment naming `login` the DRI
pub fn assignment_comment(config: &DriConfig, login: &str) -> String {
    let policy_url = config.policy_url();
    render_template(
        &config.assignment_template,
        &[
            ("marker", config.assignment_marker.as_str()),
            ("dri", login),
            ("policy_url", &*policy_url),
        ],
    )
}

/// Assign `login` and post the assignment comment
///
/// The comment's timestamp is the assignment start used for escalation.
pub async fn assign_dri(
    client: &dyn GitHubClient,
    config: &DriConfig,
    pr: &mut PullRequest,
    login: &str,
) -> anyhow::Result<Comment> {
    info!("Assigning {} as DRI of PR #{}", login, pr.number);

    client
        .add_assignees(&config.owner, &config.repo, pr.number, &[login.to_string()])
        .await?;
    if !pr.assignees.iter().any(|a| a == login) {
        pr.assignees.push(login.to_string());
    }

    let comment = client
        .create_comment(
            &config.owner,
            &config.repo,
            pr.number,
            &assignment_comment(config, login),
        )
        .await?;

    Ok(comment)
}
