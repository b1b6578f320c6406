// This module installs tools distributed as GitHub release tarballs.
// It resolves the platform, asks the GitHub API for the latest release, picks the
// `.tar.gz` asset built for this OS and architecture, downloads and unpacks it in a
// scratch directory, and copies the named binary into the install directory.

use crate::installers::Installer;
use crate::libs::errors::InstallError;
use crate::libs::utilities::assets::{ReleaseClient, select_asset};
use crate::libs::utilities::binary::{find_binary, install_binary};
use crate::libs::utilities::compression::extract_tar_gz;
use crate::libs::utilities::platform::PlatformResolver;
use crate::{log_debug, log_error, log_info};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

pub struct GithubReleaseStrategy {
    client: Arc<dyn ReleaseClient>,
    platform: PlatformResolver,
    bin_dir: PathBuf,
}

impl GithubReleaseStrategy {
    pub fn new(client: Arc<dyn ReleaseClient>, platform: PlatformResolver, bin_dir: PathBuf) -> Self {
        GithubReleaseStrategy {
            client,
            platform,
            bin_dir,
        }
    }
}

impl Installer for GithubReleaseStrategy {
    /// Installs `binary` from the latest release of `repo` (`owner/name`).
    ///
    /// An unsupported architecture escalates as [`InstallError::Fatal`]; every other
    /// failure only affects this tool.
    fn install(&self, repo: &str, binary: &str) -> Result<(), InstallError> {
        log_debug!("[GitHub] Initiating installation of {} from {}", binary.bold(), repo.cyan());

        // 1. Platform tokens for asset matching.
        let platform = self.platform.resolve()?;
        log_info!(
            "[GitHub] Detected platform for {}: {}-{}",
            binary.bold(),
            platform.os.cyan(),
            platform.arch.cyan()
        );

        // 2. Latest release metadata.
        let release = self.client.latest_release(repo)?;
        log_debug!("[GitHub] Latest release of {} is {}", repo, release.tag_name.green());

        // 3-4. First `.tar.gz` asset for this platform.
        let Some(asset) = select_asset(&release, &platform) else {
            log_error!(
                "[GitHub] No suitable release asset for {}-{} in {} {}",
                platform.os.red(),
                platform.arch.red(),
                repo.red(),
                release.tag_name
            );
            return Err(InstallError::NoMatchingAsset {
                repo: repo.to_string(),
                os: platform.os,
                arch: platform.arch,
            });
        };

        // 5. Download and unpack in a scratch directory. The guard removes it on every
        // path out of this function, unwinding included.
        let scratch = tempfile::Builder::new().prefix("cli-provisioner-").tempdir()?;
        let archive_path = scratch.path().join(&asset.name);
        log_info!("[GitHub] Downloading {} for {}", asset.name.bold(), binary.bold());
        self.client.download(&asset.browser_download_url, &archive_path)?;

        let extracted = extract_tar_gz(&archive_path, scratch.path())?;

        // 6. Copy the binary out of the extraction.
        let Some(found) = find_binary(&extracted, binary) else {
            log_error!("[GitHub] {} not found in {}", binary.red(), asset.name);
            return Err(InstallError::BinaryNotInArchive(binary.to_string()));
        };
        let install_path = self.bin_dir.join(binary);
        install_binary(&found, &install_path)?;

        log_info!(
            "[GitHub] Installed {} {} at {}",
            binary.bold(),
            release.tag_name,
            install_path.display().to_string().green()
        );
        Ok(())
    }
}
