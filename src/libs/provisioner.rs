//! # Provisioner
//!
//! Walks the registry and brings every tool to a terminal state:
//!
//! ```text
//! Unchecked --on PATH--> AlreadyPresent            [SKIP]
//! Unchecked --missing--> NeedsInstall --ok-------> Installed   [INSTALL]
//!                                     --error----> Failed      [INSTALL] + [FAIL]
//! ```
//!
//! A per-tool failure never stops the pass. A [`FatalError`] escalated by a strategy
//! does: when running sequentially nothing after it is attempted, and in parallel no
//! further install is started once one worker has hit it.
//!
//! Workers never share the result. Each one returns `(binary, ToolOutcome)` and the
//! values are folded into a [`RunResult`] afterwards.

use crate::installers::StrategyDispatcher;
use crate::libs::errors::{FatalError, InstallError};
use crate::libs::host::Host;
use crate::libs::reporter::{self, Event};
use crate::schemas::run_result::{RunResult, ToolOutcome};
use crate::schemas::tools::ToolSpec;
use crate::{log_debug, log_error, log_info, log_warn};
use colored::Colorize;
use rayon::prelude::*;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct Provisioner {
    host: Arc<dyn Host>,
    dispatcher: StrategyDispatcher,
    jobs: usize,
}

impl Provisioner {
    /// # Arguments
    /// * `host`: PATH lookups use the run's PATH, install directory included.
    /// * `dispatcher`: Routes each tool to its strategy.
    /// * `jobs`: Worker count. `1` (or `0`) runs sequentially.
    pub fn new(host: Arc<dyn Host>, dispatcher: StrategyDispatcher, jobs: usize) -> Self {
        Provisioner {
            host,
            dispatcher,
            jobs: jobs.max(1),
        }
    }

    /// Processes `tools` in order and returns the classified result.
    pub fn run(&self, tools: &[ToolSpec]) -> Result<RunResult, FatalError> {
        log_info!(
            "[Provision] Processing {} tools with {} worker(s)",
            tools.len().to_string().bold(),
            self.jobs
        );
        let result = if self.jobs == 1 {
            self.run_sequential(tools)?
        } else {
            self.run_parallel(tools)?
        };
        debug_assert_eq!(result.total(), tools.len());
        log_info!(
            "[Provision] Done: {} installed, {} skipped, {} failed",
            result.installed.len().to_string().green(),
            result.skipped.len(),
            result.failed.len().to_string().red()
        );
        Ok(result)
    }

    fn run_sequential(&self, tools: &[ToolSpec]) -> Result<RunResult, FatalError> {
        let mut result = RunResult::new();
        for tool in tools {
            let outcome = self.provision_one(tool)?;
            result.record(&tool.binary_name, outcome);
        }
        Ok(result)
    }

    fn run_parallel(&self, tools: &[ToolSpec]) -> Result<RunResult, FatalError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("provision-{i}"))
            .build()
            .map_err(|e| FatalError::Io(io::Error::other(e)))?;

        let abort = AtomicBool::new(false);
        let outcomes: Vec<Option<Result<(String, ToolOutcome), FatalError>>> = pool.install(|| {
            tools
                .par_iter()
                .map(|tool| {
                    if abort.load(Ordering::SeqCst) {
                        log_debug!("[Provision] Not starting {} after fatal error", tool.binary_name);
                        return None;
                    }
                    let outcome = self.provision_one(tool);
                    if outcome.is_err() {
                        abort.store(true, Ordering::SeqCst);
                    }
                    Some(outcome.map(|o| (tool.binary_name.clone(), o)))
                })
                .collect()
        });

        let mut collected = Vec::with_capacity(outcomes.len());
        for outcome in outcomes.into_iter().flatten() {
            collected.push(outcome?);
        }
        Ok(RunResult::from_outcomes(collected))
    }

    /// Drives one tool to a terminal state and prints its protocol lines.
    fn provision_one(&self, tool: &ToolSpec) -> Result<ToolOutcome, FatalError> {
        let binary = tool.binary_name.as_str();

        if let Some(path) = self.host.locate(binary) {
            log_debug!("[Provision] {} found at {}", binary, path.display());
            reporter::emit(&Event::Skip { binary });
            return Ok(ToolOutcome::Skipped);
        }

        reporter::emit(&Event::Install { tool });
        match self
            .dispatcher
            .dispatch(tool.strategy, &tool.install_target, binary)
        {
            Ok(()) => {
                if !self.host.is_available(binary) {
                    log_warn!("[Provision] {} installed but not found on PATH", binary.yellow());
                }
                Ok(ToolOutcome::Installed)
            }
            Err(InstallError::Fatal(fatal)) => {
                log_error!("[Provision] Fatal error while installing {}: {}", binary.red(), fatal);
                Err(fatal)
            }
            Err(err) => {
                reporter::emit(&Event::Fail {
                    binary,
                    cause: &err.to_string(),
                });
                Ok(ToolOutcome::Failed(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installers::fake::{self, FakeInstaller};
    use crate::installers::github::GithubReleaseStrategy;
    use crate::installers::github::tests::FakeReleases;
    use crate::libs::host::fake::FakeHost;
    use crate::libs::utilities::platform::PlatformResolver;
    use crate::schemas::tools::StrategyName;
    use std::path::PathBuf;
    use std::sync::Mutex;

    type Calls = Arc<Mutex<Vec<String>>>;

    fn tools(entries: &[(&str, &str, StrategyName)]) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = entries
            .iter()
            .map(|(b, t, s)| ToolSpec::new(b, t, *s))
            .collect();
        specs.sort_by(|a, b| a.binary_name.cmp(&b.binary_name));
        specs
    }

    fn fake_installer(host: &Arc<FakeHost>, calls: &Calls) -> Box<FakeInstaller> {
        Box::new(FakeInstaller {
            host: host.clone(),
            calls: calls.clone(),
            fail: Vec::new(),
        })
    }

    /// Dispatcher with fake binstall/pipx and a real GitHub strategy over `releases`.
    fn with_github(host: &Arc<FakeHost>, calls: &Calls, releases: FakeReleases, arch: &str) -> StrategyDispatcher {
        StrategyDispatcher::new(
            fake_installer(host, calls),
            Box::new(GithubReleaseStrategy::new(
                Arc::new(releases),
                PlatformResolver::new("linux", arch),
                PathBuf::from("/nonexistent/bin"),
            )),
            fake_installer(host, calls),
        )
    }

    #[test]
    fn present_tools_are_skipped_and_missing_ones_installed() {
        let host = Arc::new(FakeHost::new(&["git"]));
        let calls = Calls::default();
        let provisioner = Provisioner::new(host.clone(), fake::dispatcher(host.clone(), calls.clone(), &[]), 1);

        let result = provisioner
            .run(&tools(&[
                ("git", "git", StrategyName::BinaryInstall),
                ("rg", "ripgrep", StrategyName::BinaryInstall),
            ]))
            .unwrap();

        assert_eq!(result.skipped.iter().collect::<Vec<_>>(), vec!["git"]);
        assert_eq!(result.installed.iter().collect::<Vec<_>>(), vec!["rg"]);
        assert!(result.failed.is_empty());
        assert_eq!(reporter::exit_status(&result), 0);
        assert_eq!(*calls.lock().unwrap(), vec!["rg<-ripgrep"]);
    }

    #[test]
    fn every_tool_lands_in_exactly_one_set() {
        let host = Arc::new(FakeHost::new(&["bat"]));
        let calls = Calls::default();
        let provisioner = Provisioner::new(
            host.clone(),
            fake::dispatcher(host.clone(), calls.clone(), &["http"]),
            1,
        );
        let specs = tools(&[
            ("bat", "bat", StrategyName::BinaryInstall),
            ("gh", "cli/cli", StrategyName::GithubRelease),
            ("http", "httpie", StrategyName::PythonApp),
            ("rg", "ripgrep", StrategyName::BinaryInstall),
        ]);

        let result = provisioner.run(&specs).unwrap();

        assert_eq!(result.total(), specs.len());
        for spec in &specs {
            let memberships = [
                result.installed.contains(&spec.binary_name),
                result.skipped.contains(&spec.binary_name),
                result.failed.contains(&spec.binary_name),
            ];
            assert_eq!(memberships.iter().filter(|m| **m).count(), 1, "{}", spec.binary_name);
        }
        assert!(result.causes["http"].contains("cannot install httpie"));
        assert_eq!(reporter::exit_status(&result), 1);
    }

    #[test]
    fn second_run_skips_everything() {
        let host = Arc::new(FakeHost::new(&[]));
        let calls = Calls::default();
        let provisioner = Provisioner::new(host.clone(), fake::dispatcher(host.clone(), calls.clone(), &[]), 1);
        let specs = tools(&[
            ("fd", "fd-find", StrategyName::BinaryInstall),
            ("tldr", "tldr", StrategyName::PythonApp),
        ]);

        let first = provisioner.run(&specs).unwrap();
        assert_eq!(first.installed.len(), 2);

        let second = provisioner.run(&specs).unwrap();
        assert!(second.installed.is_empty());
        assert_eq!(second.skipped.len(), 2);
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn missing_release_asset_fails_only_that_tool() {
        let host = Arc::new(FakeHost::new(&[]));
        let calls = Calls::default();
        let releases = FakeReleases::with_assets(vec!["fzf-0.1-darwin_amd64.tar.gz"]);
        let provisioner = Provisioner::new(host.clone(), with_github(&host, &calls, releases, "x86_64"), 1);

        let result = provisioner
            .run(&tools(&[
                ("fzf", "junegunn/fzf", StrategyName::GithubRelease),
                ("rg", "ripgrep", StrategyName::BinaryInstall),
                ("tldr", "tldr", StrategyName::PythonApp),
            ]))
            .unwrap();

        assert_eq!(result.failed.iter().collect::<Vec<_>>(), vec!["fzf"]);
        assert!(result.causes["fzf"].contains("no matching asset for linux/amd64"));
        assert_eq!(result.installed.len(), 2);
        assert_eq!(reporter::exit_status(&result), 1);
    }

    #[test]
    fn unsupported_architecture_aborts_the_pass() {
        let host = Arc::new(FakeHost::new(&[]));
        let calls = Calls::default();
        let releases = FakeReleases::with_assets(vec!["fzf-linux-mips.tar.gz"]);
        let provisioner = Provisioner::new(host.clone(), with_github(&host, &calls, releases, "mips"), 1);

        let err = provisioner
            .run(&tools(&[
                ("fzf", "junegunn/fzf", StrategyName::GithubRelease),
                ("rg", "ripgrep", StrategyName::BinaryInstall),
            ]))
            .unwrap_err();

        assert!(matches!(err, FatalError::UnsupportedArchitecture(ref a) if a == "mips"));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn parallel_run_matches_sequential_classification() {
        let host = Arc::new(FakeHost::new(&["eza"]));
        let calls = Calls::default();
        let provisioner = Provisioner::new(
            host.clone(),
            fake::dispatcher(host.clone(), calls.clone(), &["k9s"]),
            4,
        );
        let specs = tools(&[
            ("bat", "bat", StrategyName::BinaryInstall),
            ("delta", "git-delta", StrategyName::BinaryInstall),
            ("dust", "du-dust", StrategyName::BinaryInstall),
            ("eza", "eza", StrategyName::BinaryInstall),
            ("k9s", "derailed/k9s", StrategyName::GithubRelease),
            ("pre-commit", "pre-commit", StrategyName::PythonApp),
        ]);

        let result = provisioner.run(&specs).unwrap();

        assert_eq!(result.total(), 6);
        assert_eq!(result.skipped.iter().collect::<Vec<_>>(), vec!["eza"]);
        assert_eq!(result.failed.iter().collect::<Vec<_>>(), vec!["k9s"]);
        assert_eq!(result.installed.len(), 4);
        assert_eq!(calls.lock().unwrap().len(), 5);
    }

    #[test]
    fn parallel_run_surfaces_fatal_error() {
        let host = Arc::new(FakeHost::new(&[]));
        let calls = Calls::default();
        let releases = FakeReleases::with_assets(vec![]);
        let provisioner = Provisioner::new(host.clone(), with_github(&host, &calls, releases, "riscv64"), 3);

        let err = provisioner
            .run(&tools(&[
                ("gh", "cli/cli", StrategyName::GithubRelease),
                ("task", "go-task/task", StrategyName::GithubRelease),
                ("rg", "ripgrep", StrategyName::BinaryInstall),
            ]))
            .unwrap_err();

        assert!(matches!(err, FatalError::UnsupportedArchitecture(_)));
    }
}
