// This module makes sure the baseline tools every strategy relies on are present.
// It detects the host's package manager, works out which required binaries are
// missing, and installs them all in one non-interactive call.

use crate::libs::errors::FatalError;
use crate::libs::host::Host;
use crate::{log_debug, log_error, log_info, log_warn};
use colored::Colorize;

/// Binaries that must be on PATH before any tool is provisioned.
pub const REQUIRED_BINARIES: [&str; 5] = ["tar", "unzip", "curl", "jq", "pipx"];

/// A supported system package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    AptGet,
    Dnf,
    Yum,
    Pacman,
    Zypper,
    Apk,
}

impl PackageManager {
    /// Detection order. The first one found on PATH wins.
    pub const PROBE_ORDER: [PackageManager; 6] = [
        PackageManager::AptGet,
        PackageManager::Dnf,
        PackageManager::Yum,
        PackageManager::Pacman,
        PackageManager::Zypper,
        PackageManager::Apk,
    ];

    pub fn program(self) -> &'static str {
        match self {
            PackageManager::AptGet => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
            PackageManager::Zypper => "zypper",
            PackageManager::Apk => "apk",
        }
    }

    /// Arguments preceding the package list in a non-interactive install.
    fn install_args(self) -> &'static [&'static str] {
        match self {
            PackageManager::AptGet | PackageManager::Dnf | PackageManager::Yum => &["install", "-y"],
            PackageManager::Pacman => &["-S", "--noconfirm", "--needed"],
            PackageManager::Zypper => &["--non-interactive", "install"],
            PackageManager::Apk => &["add", "--no-cache"],
        }
    }

    /// The package providing `binary` under this manager.
    pub fn package_for(self, binary: &str) -> &str {
        match (self, binary) {
            (PackageManager::Pacman, "pipx") => "python-pipx",
            _ => binary,
        }
    }
}

/// Installs missing baseline binaries through the system package manager.
pub struct PrerequisiteInstaller<'a> {
    host: &'a dyn Host,
}

impl<'a> PrerequisiteInstaller<'a> {
    pub fn new(host: &'a dyn Host) -> Self {
        PrerequisiteInstaller { host }
    }

    /// First supported package manager on PATH.
    pub fn detect(&self) -> Result<PackageManager, FatalError> {
        PackageManager::PROBE_ORDER
            .into_iter()
            .find(|pm| self.host.is_available(pm.program()))
            .ok_or_else(|| FatalError::NoPackageManager {
                tried: PackageManager::PROBE_ORDER
                    .iter()
                    .map(|pm| pm.program())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Installs every binary in `required` that is not on PATH yet.
    ///
    /// # Errors
    /// * `NoPackageManager` if none of the supported managers is present.
    /// * `PrerequisiteInstall` if the batch install fails.
    pub fn ensure(&self, required: &[&str]) -> Result<(), FatalError> {
        let manager = self.detect()?;
        log_debug!("[Prerequisites] Using package manager {}", manager.program().cyan());

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|binary| !self.host.is_available(binary))
            .collect();
        if missing.is_empty() {
            log_info!("[Prerequisites] All baseline tools present");
            return Ok(());
        }

        let packages: Vec<&str> = missing.iter().map(|b| manager.package_for(b)).collect();
        log_info!(
            "[Prerequisites] Installing {} with {}",
            packages.join(" ").bold(),
            manager.program().cyan()
        );

        let use_sudo = self.needs_sudo();
        if manager == PackageManager::AptGet {
            self.refresh_apt(use_sudo);
        }

        let mut args: Vec<&str> = manager.install_args().to_vec();
        args.extend(&packages);
        let failure = |reason: String| FatalError::PrerequisiteInstall {
            manager: manager.program().to_string(),
            packages: packages.join(" "),
            reason,
        };

        let output = self
            .run_privileged(use_sudo, manager.program(), &args)
            .map_err(|e| failure(e.to_string()))?;
        if !output.success {
            log_error!("[Prerequisites] {} failed: {}", manager.program().red(), output.stderr.trim());
            return Err(failure(format!("{}: {}", output.status_text(), output.stderr.trim())));
        }

        log_info!("[Prerequisites] Installed {}", packages.join(" ").green());
        Ok(())
    }

    fn refresh_apt(&self, use_sudo: bool) {
        match self.run_privileged(use_sudo, "apt-get", &["update"]) {
            Ok(output) if output.success => log_debug!("[Prerequisites] Package index refreshed"),
            Ok(output) => log_warn!(
                "[Prerequisites] apt-get update failed ({}), continuing",
                output.status_text()
            ),
            Err(err) => log_warn!("[Prerequisites] apt-get update failed ({}), continuing", err),
        }
    }

    /// `sudo` is used when not running as root and it is available.
    fn needs_sudo(&self) -> bool {
        let is_root = matches!(
            self.host.execute("id", &["-u"], &[]),
            Ok(output) if output.success && output.stdout.trim() == "0"
        );
        !is_root && self.host.is_available("sudo")
    }

    fn run_privileged(
        &self,
        use_sudo: bool,
        program: &str,
        args: &[&str],
    ) -> std::io::Result<crate::libs::host::CommandOutput> {
        if use_sudo {
            let mut sudo_args = vec![program];
            sudo_args.extend_from_slice(args);
            self.host.execute("sudo", &sudo_args, &[])
        } else {
            self.host.execute(program, args, &[])
        }
    }
}
