//! Error types for the provisioner.
//!
//! Errors come in two tiers:
//!
//! - [`FatalError`]: the run cannot continue. `main` prints `[FATAL] <message>` on stderr
//!   and exits with status 1 straight away.
//! - [`InstallError`]: a single tool failed to install. The tool is recorded as failed
//!   and provisioning moves on to the next one.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Unrecoverable errors that abort the whole run.
#[derive(Debug, Error)]
pub enum FatalError {
    /// None of the supported package managers is available on this host.
    #[error("no supported package manager found (tried: {tried})")]
    NoPackageManager { tried: String },

    /// The batch install of baseline prerequisites failed.
    #[error("{manager} failed to install prerequisites [{packages}]: {reason}")]
    PrerequisiteInstall {
        manager: String,
        packages: String,
        reason: String,
    },

    /// The CPU architecture has no entry in the release-asset architecture map.
    #[error("unsupported CPU architecture '{0}'")]
    UnsupportedArchitecture(String),

    /// Only Linux hosts are provisioned.
    #[error("unsupported operating system '{0}' (only linux is supported)")]
    UnsupportedOs(String),

    /// A strategy name outside the closed set was requested.
    #[error("unknown strategy '{name}' for tool '{binary}'")]
    UnknownStrategy { binary: String, name: String },

    /// The same binary name appears twice in a registry file.
    #[error("tool '{0}' is listed more than once in the registry")]
    DuplicateTool(String),

    /// The registry override file could not be read or parsed.
    #[error("invalid registry file {path}: {reason}")]
    Registry { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Per-tool failures. They are recorded in the run result and never stop the pass,
/// except for [`InstallError::Fatal`], which lets a strategy escalate.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The external helper a strategy delegates to is not on PATH.
    #[error("required helper '{0}' is not on PATH")]
    MissingTool(String),

    /// An external installer ran but exited unsuccessfully.
    #[error("`{program}` exited with {status}: {stderr}")]
    Subprocess {
        program: String,
        status: String,
        stderr: String,
    },

    /// A request to GitHub failed (transport error or HTTP error status).
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// Plain HTTP is refused; every remote URL must be HTTPS.
    #[error("refusing non-HTTPS URL {0}")]
    InsecureUrl(String),

    /// The latest release has no `.tar.gz` asset for this platform.
    #[error("no matching asset for {os}/{arch} in latest release of {repo}")]
    NoMatchingAsset {
        repo: String,
        os: String,
        arch: String,
    },

    /// The release archive was extracted but holds no file with the binary's name.
    #[error("binary '{0}' not found in release archive")]
    BinaryNotInArchive(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}
