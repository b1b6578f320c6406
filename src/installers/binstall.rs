//! # Binary Install Strategy
//!
//! Installs pre-built binaries through the `cargo binstall` helper, which resolves a
//! crate to a released binary for this host without compiling anything.
//!
//! The helper always runs non-interactively (`--no-confirm`) and installs into the
//! provisioner's install directory (`--install-path`), so every provisioned tool ends
//! up in the same place regardless of the helper's own defaults.
//!
//! After a successful install, any advisory note registered for the binary is printed
//! as a `[NOTE]` line together with the binary's resolved location.

use crate::installers::Installer;
use crate::libs::errors::InstallError;
use crate::libs::host::Host;
use crate::libs::reporter::{self, Event};
use crate::{log_debug, log_error, log_info};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Name of the helper executable. `cargo binstall` dispatches to it.
const HELPER: &str = "cargo-binstall";

pub struct BinaryInstallStrategy {
    host: Arc<dyn Host>,
    bin_dir: PathBuf,
    notes: BTreeMap<String, String>,
}

impl BinaryInstallStrategy {
    /// # Arguments
    /// * `host`: PATH lookup and subprocess execution.
    /// * `bin_dir`: Where the helper should place binaries.
    /// * `notes`: Post-install advisories keyed by binary name.
    pub fn new(host: Arc<dyn Host>, bin_dir: PathBuf, notes: BTreeMap<String, String>) -> Self {
        BinaryInstallStrategy {
            host,
            bin_dir,
            notes,
        }
    }

    /// Builds the helper's argument vector.
    fn command_args<'a>(&'a self, bin_dir: &'a str, crate_id: &'a str) -> Vec<&'a str> {
        vec!["binstall", "--no-confirm", "--install-path", bin_dir, crate_id]
    }

    /// The `[NOTE]` line for `binary`, if a note is registered for it.
    fn note_line(&self, binary: &str) -> Option<String> {
        let note = self.notes.get(binary)?;
        let path = self
            .host
            .locate(binary)
            .unwrap_or_else(|| self.bin_dir.join(binary));
        Some(
            Event::Note {
                binary,
                note,
                path: &path,
            }
            .to_string(),
        )
    }
}

impl Installer for BinaryInstallStrategy {
    fn install(&self, crate_id: &str, binary: &str) -> Result<(), InstallError> {
        log_info!(
            "[BinaryInstall] Installing {} from crate {}",
            binary.bold(),
            crate_id.cyan()
        );

        if !self.host.is_available(HELPER) {
            log_error!("[BinaryInstall] {} is not on PATH", HELPER.red());
            return Err(InstallError::MissingTool(HELPER.to_string()));
        }

        let bin_dir = self.bin_dir.to_string_lossy();
        let args = self.command_args(&bin_dir, crate_id);
        log_debug!("[BinaryInstall] Executing: cargo {}", args.join(" ").cyan());

        let output = self.host.execute("cargo", &args, &[])?;
        if !output.success {
            log_error!(
                "[BinaryInstall] Failed to install {} ({})",
                binary.red(),
                output.status_text()
            );
            return Err(InstallError::Subprocess {
                program: "cargo binstall".to_string(),
                status: output.status_text(),
                stderr: output.stderr.trim().to_string(),
            });
        }

        log_info!("[BinaryInstall] Successfully installed {}", binary.green());
        if let Some(line) = self.note_line(binary) {
            reporter::emit_line(&line);
        }
        Ok(())
    }
}
