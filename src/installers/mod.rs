// This module is the hub for the installation strategies. Each submodule wraps one
// external installation method, and `StrategyDispatcher` routes a tool to the right one.
//
// Routing is an exhaustive `match` on `StrategyName`, so adding a strategy without a
// handler is a compile error rather than a runtime "unknown strategy".

use crate::libs::errors::InstallError;
use crate::schemas::tools::StrategyName;

/// Installs pre-built binaries through `cargo binstall`.
pub(crate) mod binstall;

/// Installs tools from the latest GitHub release tarball for this platform.
pub(crate) mod github;

/// Installs Python applications through `pipx`.
pub(crate) mod pipx;

/// One installation method.
///
/// `target` is the strategy-specific identifier (crate, `owner/repo`, PyPI package)
/// and `binary` the executable the install must produce.
pub trait Installer: Send + Sync {
    fn install(&self, target: &str, binary: &str) -> Result<(), InstallError>;
}

/// Holds one implementation per strategy and routes installs to them.
pub struct StrategyDispatcher {
    binary_install: Box<dyn Installer>,
    github_release: Box<dyn Installer>,
    python_app: Box<dyn Installer>,
}

impl StrategyDispatcher {
    pub fn new(
        binary_install: Box<dyn Installer>,
        github_release: Box<dyn Installer>,
        python_app: Box<dyn Installer>,
    ) -> Self {
        StrategyDispatcher {
            binary_install,
            github_release,
            python_app,
        }
    }

    /// Runs the install for `binary` with the implementation registered for `strategy`.
    pub fn dispatch(
        &self,
        strategy: StrategyName,
        target: &str,
        binary: &str,
    ) -> Result<(), InstallError> {
        let installer = match strategy {
            StrategyName::BinaryInstall => &self.binary_install,
            StrategyName::GithubRelease => &self.github_release,
            StrategyName::PythonApp => &self.python_app,
        };
        installer.install(target, binary)
    }
}
