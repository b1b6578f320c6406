// Resolves the run configuration from command-line flags (or their `PROVISION_*`
// environment fallbacks, handled by clap) and the defaults for anything left unset.

use crate::libs::utilities::path_helpers::{default_bin_dir, expand_tilde, profile_for_shell};
use crate::log_debug;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Seconds allowed for each GitHub request when `--http-timeout` is not given.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Raw option values as they come from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub registry: Option<String>,
    pub bin_dir: Option<String>,
    pub profile: Option<String>,
    pub jobs: Option<usize>,
    pub http_timeout: Option<u64>,
    pub skip_verify: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Registry override file. `None` means the built-in registry.
    pub registry: Option<PathBuf>,
    pub bin_dir: PathBuf,
    pub profile: PathBuf,
    pub jobs: usize,
    pub http_timeout: Duration,
    pub skip_verify: bool,
    pub github_token: Option<String>,
}

impl Settings {
    /// Resolves `options` against the process environment (`$SHELL`, `$GITHUB_TOKEN`).
    pub fn resolve(options: RunOptions) -> Settings {
        let shell = std::env::var("SHELL").ok();
        let token = std::env::var("GITHUB_TOKEN").ok();
        Self::resolve_with(options, shell.as_deref(), token)
    }

    fn resolve_with(options: RunOptions, shell: Option<&str>, github_token: Option<String>) -> Settings {
        let bin_dir = options
            .bin_dir
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(default_bin_dir);
        let profile = options
            .profile
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| profile_for_shell(shell));
        let jobs = options
            .jobs
            .filter(|j| *j > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(NonZeroUsize::get)
                    .unwrap_or(1)
            });

        let settings = Settings {
            registry: options.registry.as_deref().map(expand_tilde),
            bin_dir,
            profile,
            jobs,
            http_timeout: Duration::from_secs(
                options.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
            skip_verify: options.skip_verify,
            github_token: github_token.filter(|t| !t.trim().is_empty()),
        };
        log_debug!("[Settings] Resolved: {:?}", settings.redacted());
        settings
    }

    /// Copy safe to log.
    fn redacted(&self) -> Settings {
        Settings {
            github_token: self.github_token.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        }
    }
}
