//! Stale labeling

use dri_config::DriConfig;
use gh_client::{GitHubClient, PullRequest};
use log::{debug, info};

/// Add the stale label unless the pull request already carries it
///
/// The label is also recorded on `pr` so later steps of this run see it.
/// Returns whether a label was added.
pub async fn ensure_stale_label(
    client: &dyn GitHubClient,
    config: &DriConfig,
    pr: &mut PullRequest,
) -> anyhow::Result<bool> {
    if pr.has_label(&config.stale_label) {
        debug!("PR #{} already labeled {}", pr.number, config.stale_label);
        return Ok(false);
    }

    info!("Labeling PR #{} as {}", pr.number, config.stale_label);
    client
        .add_labels(
            &config.owner,
            &config.repo,
            pr.number,
            std::slice::from_ref(&config.stale_label),
        )
        .await?;
    pr.labels.push(config.stale_label.clone());

    Ok(true)
}
