//! Token resolution and client construction
//!
//! Builds the octocrab-backed client for a GitHub host, wrapped in the
//! write-gating decorator.

use crate::{DryRunClient, OctocrabClient, WriteMode, DEFAULT_HOST};
use anyhow::{Context, Result};
use log::{debug, info};
use octocrab::Octocrab;
use std::sync::Arc;

/// Resolves GitHub tokens for different hosts
///
/// Tries multiple sources in order:
/// 1. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 2. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
/// 3. `gh auth token --hostname {host}` command
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// Cached default token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok()
            .filter(|t| !t.trim().is_empty());

        Self { default_token }
    }

    /// Get a token for the given host
    ///
    /// Fails when no source yields a token; callers treat this as fatal.
    pub async fn get_token(&self, host: &str) -> Result<String> {
        let env_key = host_env_key(host);
        if let Ok(token) = std::env::var(&env_key) {
            if !token.trim().is_empty() {
                debug!("Using token from env var {} for host {}", env_key, host);
                return Ok(token);
            }
        }

        // Fallback to default token (for github.com only)
        if host == DEFAULT_HOST {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Ok(token.clone());
            }
        }

        debug!("Trying gh auth token for host {}", host);
        if let Ok(output) = tokio::process::Command::new("gh")
            .args(["auth", "token", "--hostname", host])
            .output()
            .await
        {
            if output.status.success() {
                let token = String::from_utf8(output.stdout)
                    .context("Invalid UTF-8 in gh auth token output")?
                    .trim()
                    .to_string();
                if !token.is_empty() {
                    debug!("Using token from gh CLI for host {}", host);
                    return Ok(token);
                }
            }
        }

        Err(anyhow::anyhow!(
            "No token found for host '{}'. Set GITHUB_TOKEN or {}",
            host,
            env_key
        ))
    }
}

/// Environment variable holding a host-specific token
fn host_env_key(host: &str) -> String {
    format!(
        "GITHUB_TOKEN_{}",
        host.replace(['.', '-'], "_").to_uppercase()
    )
}

/// REST base URI for a host; `None` means octocrab's default (api.github.com)
fn base_uri(host: &str) -> Option<String> {
    (host != DEFAULT_HOST).then(|| format!("https://{}/api/v3", host))
}

/// Build a client for the given host
///
/// # Arguments
///
/// * `host` - The GitHub host (e.g. "github.com" or an Enterprise host)
/// * `token` - Personal access or installation token
/// * `mode` - Whether writes reach GitHub
pub fn build_client(
    host: &str,
    token: String,
    mode: WriteMode,
) -> Result<DryRunClient<OctocrabClient>> {
    info!("Creating GitHub client for host: {} ({:?})", host, mode);

    let mut builder = Octocrab::builder().personal_token(token);
    if let Some(uri) = base_uri(host) {
        builder = builder.base_uri(&uri).context("Failed to set base URI")?;
    }

    let octocrab = builder.build().context("Failed to build Octocrab client")?;
    Ok(DryRunClient::new(
        OctocrabClient::new(Arc::new(octocrab)),
        mode,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_env_key_generation() {
        let hosts = [
            ("github.com", "GITHUB_TOKEN_GITHUB_COM"),
            ("ghe.example.com", "GITHUB_TOKEN_GHE_EXAMPLE_COM"),
            (
                "github-enterprise.corp.com",
                "GITHUB_TOKEN_GITHUB_ENTERPRISE_CORP_COM",
            ),
        ];

        for (host, expected_key) in hosts {
            assert_eq!(
                host_env_key(host),
                expected_key,
                "Host '{}' should produce key '{}'",
                host,
                expected_key
            );
        }
    }

    #[test]
    fn test_base_uri() {
        assert_eq!(base_uri(DEFAULT_HOST), None);
        assert_eq!(
            base_uri("ghe.example.com").as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
    }
}
