// This module installs Python command-line applications with `pipx`.
// Each application gets its own virtual environment; `PIPX_BIN_DIR` points the
// generated entry points at the provisioner's install directory.

use crate::installers::Installer;
use crate::libs::errors::InstallError;
use crate::libs::host::Host;
use crate::{log_debug, log_error, log_info, log_warn};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

pub struct PythonAppStrategy {
    host: Arc<dyn Host>,
    bin_dir: PathBuf,
}

impl PythonAppStrategy {
    pub fn new(host: Arc<dyn Host>, bin_dir: PathBuf) -> Self {
        PythonAppStrategy { host, bin_dir }
    }
}

impl Installer for PythonAppStrategy {
    fn install(&self, package: &str, binary: &str) -> Result<(), InstallError> {
        log_debug!("[PythonApp] Attempting to install {} for {}", package.bold(), binary.bold());

        if !self.host.is_available("pipx") {
            log_error!("[PythonApp] 'pipx' not found. Prerequisites should have installed it.");
            return Err(InstallError::MissingTool("pipx".to_string()));
        }

        let args = ["install", package];
        let envs = [("PIPX_BIN_DIR", self.bin_dir.as_os_str())];
        log_info!("[PythonApp] Executing: {} {}", "pipx".cyan().bold(), args.join(" ").cyan());

        let output = self.host.execute("pipx", &args, &envs)?;
        if output.success {
            log_info!("[PythonApp] Successfully installed {}", package.bold().green());
            if !output.stderr.trim().is_empty() {
                log_debug!("[PythonApp] Stderr (might contain warnings): {}", output.stderr.trim());
            }
            if !self.host.is_available(binary) {
                log_warn!(
                    "[PythonApp] {} installed but {} is not on PATH yet",
                    package,
                    binary.yellow()
                );
            }
            Ok(())
        } else {
            log_error!(
                "[PythonApp] Failed to install '{}'. {}. Error: {}",
                package.bold().red(),
                output.status_text(),
                output.stderr.trim().red()
            );
            Err(InstallError::Subprocess {
                program: "pipx install".to_string(),
                status: output.status_text(),
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::host::fake::{self, FakeHost};

    #[test]
    fn installs_into_bin_dir() {
        let host = Arc::new(FakeHost::new(&["pipx"]));
        PythonAppStrategy::new(host.clone(), PathBuf::from("/opt/tools/bin"))
            .install("httpie", "http")
            .unwrap();

        assert_eq!(host.calls(), vec!["pipx install httpie"]);
        let envs = host.envs.lock().unwrap();
        assert_eq!(
            envs["pipx install httpie"],
            vec![("PIPX_BIN_DIR".to_string(), "/opt/tools/bin".to_string())]
        );
    }

    #[test]
    fn nonzero_exit_is_a_tool_failure() {
        let host = Arc::new(FakeHost::with_responder(&["pipx"], |_, _| {
            fake::failed(1, "No matching distribution found")
        }));
        let err = PythonAppStrategy::new(host, PathBuf::from("/bin"))
            .install("nope", "nope")
            .unwrap_err();
        assert!(err.to_string().contains("No matching distribution found"));
    }

    #[test]
    fn missing_pipx_is_a_tool_failure() {
        let host = Arc::new(FakeHost::new(&[]));
        let err = PythonAppStrategy::new(host, PathBuf::from("/bin"))
            .install("httpie", "http")
            .unwrap_err();
        assert!(matches!(err, InstallError::MissingTool(ref t) if t == "pipx"));
    }
}
