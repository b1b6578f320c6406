// cli-provisioner: brings a Linux host to a known set of developer CLI tools.
//
// One run goes through:
//   1. baseline prerequisites via the system package manager,
//   2. the install directory on PATH (this run and the shell profile),
//   3. every registry tool, skipped if present or installed with its strategy,
//   4. a liveness check of every present tool,
//   5. the `[REPORT]` line and exit status.
//
// Re-running is safe: present tools are skipped and the profile line is never duplicated.

mod installers;
mod libs;
mod logger;
mod schemas;

use crate::installers::StrategyDispatcher;
use crate::installers::binstall::BinaryInstallStrategy;
use crate::installers::github::GithubReleaseStrategy;
use crate::installers::pipx::PythonAppStrategy;
use crate::libs::errors::FatalError;
use crate::libs::host::{Host, SystemHost};
use crate::libs::path_manager::PathManager;
use crate::libs::prerequisites::{PrerequisiteInstaller, REQUIRED_BINARIES};
use crate::libs::provisioner::Provisioner;
use crate::libs::registry::ToolRegistry;
use crate::libs::reporter::{self, Event};
use crate::libs::settings::{RunOptions, Settings};
use crate::libs::utilities::assets::GithubClient;
use crate::libs::utilities::platform::{PlatformResolver, ensure_linux};
use crate::libs::verifier;
use crate::schemas::tools::ToolSpec;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cli-provisioner", version)]
#[command(about = "Install a curated set of developer CLI tools, idempotently")]
#[command(long_about = "Install a curated set of developer CLI tools, idempotently.\n\n\
Run it with no arguments: every option below is optional and only overrides a default, \
either as a flag or through its PROVISION_* environment variable.")]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, env = "PROVISION_DEBUG")]
    debug: bool,

    /// YAML file replacing the built-in tool registry
    #[arg(long, env = "PROVISION_REGISTRY", value_name = "FILE")]
    registry: Option<String>,

    /// Install directory for provisioned binaries [default: ~/.local/bin]
    #[arg(long, env = "PROVISION_BIN_DIR", value_name = "DIR")]
    bin_dir: Option<String>,

    /// Shell profile that receives the PATH export [default: chosen from $SHELL]
    #[arg(long, env = "PROVISION_PROFILE", value_name = "FILE")]
    profile: Option<String>,

    /// Number of tools provisioned concurrently [default: available CPUs]
    #[arg(short, long, env = "PROVISION_JOBS")]
    jobs: Option<usize>,

    /// Timeout in seconds for each GitHub request [default: 60]
    #[arg(long, env = "PROVISION_HTTP_TIMEOUT", value_name = "SECS")]
    http_timeout: Option<u64>,

    /// Skip the post-install `--version` / `--help` checks
    #[arg(long)]
    skip_verify: bool,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        RunOptions {
            registry: cli.registry,
            bin_dir: cli.bin_dir,
            profile: cli.profile,
            jobs: cli.jobs,
            http_timeout: cli.http_timeout,
            skip_verify: cli.skip_verify,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.debug);
    let settings = Settings::resolve(cli.into());

    match run(&settings) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {}", "[FATAL]".red().bold(), err);
            ExitCode::from(1)
        }
    }
}

/// One full provisioning pass. Only fatal errors come back as `Err`.
fn run(settings: &Settings) -> Result<ExitCode, FatalError> {
    ensure_linux(std::env::consts::OS)?;

    let path_manager = PathManager::new(settings.bin_dir.clone(), settings.profile.clone());
    path_manager.ensure_bin_dir()?;
    let inherited_path = std::env::var_os("PATH");
    let search_path = path_manager.search_path(inherited_path.clone());
    let host: Arc<dyn Host> = Arc::new(SystemHost::new(search_path));

    PrerequisiteInstaller::new(host.as_ref()).ensure(&REQUIRED_BINARIES)?;

    if let Err(err) = path_manager.ensure_on_profile(inherited_path.as_deref()) {
        log_warn!(
            "[PATH] Could not update {}: {}",
            path_manager.profile().display().to_string().yellow(),
            err
        );
    }

    let registry = match &settings.registry {
        Some(path) => ToolRegistry::load(path)?,
        None => ToolRegistry::builtin(),
    };
    if registry.is_empty() {
        log_warn!("[Registry] No tools to provision");
    }

    let bin_dir = path_manager.bin_dir().to_path_buf();
    let client = Arc::new(GithubClient::new(
        settings.http_timeout,
        settings.github_token.clone(),
    ));
    let dispatcher = StrategyDispatcher::new(
        Box::new(BinaryInstallStrategy::new(
            host.clone(),
            bin_dir.clone(),
            registry.notes().clone(),
        )),
        Box::new(GithubReleaseStrategy::new(
            client,
            PlatformResolver::from_host(),
            bin_dir.clone(),
        )),
        Box::new(PythonAppStrategy::new(host.clone(), bin_dir)),
    );

    let tools: Vec<ToolSpec> = registry.tools().cloned().collect();
    let result = Provisioner::new(host.clone(), dispatcher, settings.jobs).run(&tools)?;

    if settings.skip_verify {
        log_debug!("[Verify] Skipped on request");
    } else {
        for warning in verifier::verify(host.as_ref(), &result.present()) {
            reporter::emit(&Event::Warn {
                binary: &warning.binary,
                message: &warning.message,
            });
        }
    }

    Ok(reporter::report(&result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn zero_arguments_is_a_complete_invocation() {
        let cli = Cli::try_parse_from(["cli-provisioner"]).unwrap();
        let options = RunOptions::from(cli);
        assert!(options.registry.is_none());
        assert!(options.bin_dir.is_none());
        assert!(options.jobs.is_none());
        assert!(!options.skip_verify);
    }

    #[test]
    fn every_option_is_optional() {
        let required: Vec<String> = Cli::command()
            .get_arguments()
            .filter(|arg| arg.is_required_set())
            .map(|arg| arg.get_id().as_str().to_string())
            .collect();
        assert!(required.is_empty(), "required options: {required:?}");
    }
}
