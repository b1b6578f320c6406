// This module keeps the install directory reachable.
// For the current run it builds the PATH value that every lookup and child process uses,
// and for future shells it appends a single export line to the user's profile,
// never duplicating it no matter how many times the provisioner runs.

use crate::libs::utilities::file_operations::{append_to_rc_file, read_rc_file};
use crate::{log_debug, log_info};
use colored::Colorize;
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Owns the install directory and the profile file it is exported from.
#[derive(Debug, Clone)]
pub struct PathManager {
    bin_dir: PathBuf,
    profile: PathBuf,
}

impl PathManager {
    pub fn new(bin_dir: PathBuf, profile: PathBuf) -> Self {
        PathManager { bin_dir, profile }
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn profile(&self) -> &Path {
        &self.profile
    }

    /// Creates the install directory if it doesn't exist yet.
    pub fn ensure_bin_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.bin_dir)?;
        log_debug!("[PATH] Install directory ready: {}", self.bin_dir.display().to_string().cyan());
        Ok(())
    }

    /// Whether the install directory is one of the entries of `path`.
    pub fn is_on_path(&self, path: Option<&OsStr>) -> bool {
        path.is_some_and(|p| env::split_paths(p).any(|entry| entry == self.bin_dir))
    }

    /// Returns `current` with the install directory prepended, unless it is already one
    /// of the entries. The process environment itself is left alone.
    pub fn search_path(&self, current: Option<OsString>) -> OsString {
        let mut entries: Vec<PathBuf> = current
            .as_deref()
            .map(|p| env::split_paths(p).collect())
            .unwrap_or_default();

        if entries.iter().any(|entry| entry == &self.bin_dir) {
            log_debug!("[PATH] {} already on PATH", self.bin_dir.display());
        } else {
            log_debug!("[PATH] Prepending {} to PATH for this run", self.bin_dir.display());
            entries.insert(0, self.bin_dir.clone());
        }

        // Only fails when an entry contains ':'.
        env::join_paths(&entries).unwrap_or_else(|_| self.bin_dir.as_os_str().to_owned())
    }

    /// The line persisted into the profile.
    pub fn export_line(&self) -> String {
        format!("export PATH=\"{}:$PATH\"", self.bin_dir.display())
    }

    /// Appends the export line to the profile unless the install directory is already
    /// on the inherited PATH or the profile already holds the line.
    ///
    /// # Arguments
    /// * `inherited`: PATH as the process received it, before `search_path` ran.
    ///
    /// # Returns
    /// * `Ok(true)` if the line was written, `Ok(false)` otherwise.
    pub fn ensure_on_profile(&self, inherited: Option<&OsStr>) -> io::Result<bool> {
        if self.is_on_path(inherited) {
            log_debug!(
                "[PATH] {} is already on PATH, leaving {} alone",
                self.bin_dir.display(),
                self.profile.display()
            );
            return Ok(false);
        }

        let line = self.export_line();
        let existing = read_rc_file(&self.profile);
        if existing.iter().any(|l| l.trim() == line) {
            log_debug!(
                "[PATH] {} already exports the install directory",
                self.profile.display()
            );
            return Ok(false);
        }

        append_to_rc_file(&self.profile, &[line])?;
        log_info!(
            "[PATH] Added {} to PATH in {}",
            self.bin_dir.display().to_string().green(),
            self.profile.display().to_string().cyan()
        );
        Ok(true)
    }
}
