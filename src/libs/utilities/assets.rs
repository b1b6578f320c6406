// Everything that talks to GitHub over the network lives here: the latest-release
// query, asset downloads, and the rule for picking which asset fits this platform.

use crate::libs::errors::InstallError;
use crate::libs::utilities::platform::Platform;
use crate::schemas::common::{Release, ReleaseAsset};
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;

const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("cli-provisioner/", env!("CARGO_PKG_VERSION"));

/// Source of GitHub release metadata and asset bytes.
pub trait ReleaseClient: Send + Sync {
    /// Fetches the latest published release of `repo` (`owner/name`).
    fn latest_release(&self, repo: &str) -> Result<Release, InstallError>;

    /// Downloads `url` into the file at `dest`.
    fn download(&self, url: &str, dest: &Path) -> Result<(), InstallError>;
}

/// `ureq`-backed client. Every request is bounded by the agent timeout and
/// restricted to HTTPS, including redirects.
pub struct GithubClient {
    agent: ureq::Agent,
    token: Option<String>,
}

impl GithubClient {
    /// # Arguments
    /// * `timeout`: Upper bound for each request, connect through body.
    /// * `token`: Optional GitHub token, sent as a bearer token to raise API rate limits.
    pub fn new(timeout: Duration, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .https_only(true)
            .user_agent(USER_AGENT)
            .build();
        GithubClient { agent, token }
    }

    fn get(&self, url: &str) -> Result<ureq::Response, InstallError> {
        ensure_https(url)?;
        let mut request = self.agent.get(url);
        if url.starts_with(GITHUB_API) {
            request = request.set("Accept", "application/vnd.github+json");
            if let Some(token) = &self.token {
                request = request.set("Authorization", &format!("Bearer {token}"));
            }
        }
        request.call().map_err(|err| InstallError::Http {
            url: url.to_string(),
            reason: describe_ureq_error(err),
        })
    }
}

impl ReleaseClient for GithubClient {
    fn latest_release(&self, repo: &str) -> Result<Release, InstallError> {
        let api_url = format!("{GITHUB_API}/repos/{repo}/releases/latest");
        log_debug!("[GitHub] Fetching release information from {}", api_url.blue());

        let response = self.get(&api_url)?;
        response.into_json::<Release>().map_err(|err| InstallError::Http {
            url: api_url,
            reason: format!("invalid release JSON: {err}"),
        })
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), InstallError> {
        log_debug!("[GitHub] Starting download from {}", url.blue());
        let response = self.get(url)?;

        let mut file = File::create(dest)?;
        let mut reader = response.into_reader();
        io::copy(&mut reader, &mut file)?;

        log_debug!("[GitHub] Downloaded to {}", dest.display().to_string().green());
        Ok(())
    }
}

/// Rejects anything but `https://` URLs before a request is made.
pub fn ensure_https(url: &str) -> Result<(), InstallError> {
    if url.to_ascii_lowercase().starts_with("https://") {
        Ok(())
    } else {
        Err(InstallError::InsecureUrl(url.to_string()))
    }
}

fn describe_ureq_error(err: ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, response) => {
            format!("HTTP {code} {}", response.status_text())
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}

/// Picks the asset to install: the first one, in API order, whose download URL
/// contains both the OS and the architecture token and ends in `.tar.gz`.
/// Matching is case-insensitive, so `k9s_Linux_amd64.tar.gz` matches `linux`.
pub fn select_asset<'a>(release: &'a Release, platform: &Platform) -> Option<&'a ReleaseAsset> {
    let os = platform.os.to_lowercase();
    let arch = platform.arch.to_lowercase();

    let selected = release.assets.iter().find(|asset| {
        let url = asset.browser_download_url.to_lowercase();
        url.contains(&os) && url.contains(&arch) && url.ends_with(".tar.gz")
    });

    if let Some(asset) = selected {
        log_info!("[GitHub] Found matching asset: {}", asset.name.bold());
    } else {
        let available = release
            .assets
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        log_debug!(
            "[GitHub] No asset matches {}/{}. Available: {}",
            os,
            arch,
            available.yellow()
        );
    }
    selected
}
