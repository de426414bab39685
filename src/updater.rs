use serde::Deserialize;
use std::time::Duration;

use crate::error::{Result, TreemarkError};

pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const UPDATE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    tag_name: String,
}

/// Outcome of a successful release lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    pub available: bool,
    pub latest: String,
}

/// Compare a release tag against the running version, ignoring `v` prefixes
pub fn compare_versions(current: &str, latest_tag: &str) -> UpdateInfo {
    let latest = latest_tag.trim().trim_start_matches('v').to_string();
    let current = current.trim().trim_start_matches('v');
    UpdateInfo {
        available: !latest.is_empty() && latest != current,
        latest,
    }
}

/// Ask the releases endpoint for the latest tag
pub async fn check_for_update(url: &str, current: &str) -> Result<UpdateInfo> {
    let client = reqwest::Client::builder()
        .timeout(UPDATE_TIMEOUT)
        .user_agent(concat!("treemark/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(TreemarkError::Generic(format!(
            "update check returned {}",
            response.status()
        )));
    }
    let release: Release = response.json().await?;
    Ok(compare_versions(current, &release.tag_name))
}
