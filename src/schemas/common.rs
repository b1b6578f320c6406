// Data structures for the parts of the GitHub Releases API the provisioner reads.
// Serde traits for deserialization.
use serde::Deserialize;

/// A downloadable asset attached to a GitHub release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// The filename of the asset as it appears on GitHub.
    ///
    /// # Example
    /// ```text
    /// "fzf-0.55.0-linux_amd64.tar.gz"
    /// ```
    pub(crate) name: String,

    /// The direct download URL of the asset. Asset selection matches against this URL.
    ///
    /// # Example
    /// ```text
    /// "https://github.com/junegunn/fzf/releases/download/v0.55.0/fzf-0.55.0-linux_amd64.tar.gz"
    /// ```
    pub(crate) browser_download_url: String,
}

/// A GitHub release, as returned by `GET /repos/{owner}/{repo}/releases/latest`.
///
/// Only the tag and the asset list are decoded; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// The git tag the release was cut from, e.g. `v0.55.0`.
    #[serde(default)]
    pub(crate) tag_name: String,

    /// All files attached to the release, in the order the API returns them.
    /// May be empty.
    #[serde(default)]
    pub(crate) assets: Vec<ReleaseAsset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_latest_release_payload() {
        let body = r#"{
            "tag_name": "v1.2.3",
            "name": "Release 1.2.3",
            "draft": false,
            "assets": [
                {
                    "name": "tool-linux-amd64.tar.gz",
                    "size": 1024,
                    "browser_download_url": "https://github.com/o/r/releases/download/v1.2.3/tool-linux-amd64.tar.gz"
                }
            ]
        }"#;
        let release: Release = serde_json::from_str(body).unwrap();
        assert_eq!(release.tag_name, "v1.2.3");
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "tool-linux-amd64.tar.gz");
    }
}
