//! # Tool Registry Schema
//!
//! Data structures describing the tools the provisioner manages:
//!
//! - **StrategyName**: the closed set of installation strategies
//! - **ToolSpec**: one registry entry (binary name, install target, strategy)
//! - **RegistryFile** / **RegistryEntry**: the on-disk shape of a registry override file
//!
//! ## Registry file example
//!
//! ```yaml
//! tools:
//!   - binary: rg
//!     target: ripgrep
//!     strategy: binary-install
//!   - binary: gh
//!     target: cli/cli
//!     strategy: github-release
//!   - binary: http
//!     target: httpie
//!     strategy: python-app
//! ```

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The installation methods a tool can be provisioned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyName {
    BinaryInstall, // pre-built binary through `cargo binstall`
    GithubRelease, // latest GitHub release tarball
    PythonApp,     // isolated Python application through `pipx`
}

impl StrategyName {
    /// Every strategy, in display order.
    pub const ALL: [StrategyName; 3] = [
        StrategyName::BinaryInstall,
        StrategyName::GithubRelease,
        StrategyName::PythonApp,
    ];
}

/// Parses a strategy name, case-insensitively.
///
/// Accepts the kebab-case display form (`binary-install`), the CamelCase variant name
/// (`BinaryInstall`) and the helper-tool alias (`binstall`, `github`, `pipx`).
impl FromStr for StrategyName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binary-install" | "binaryinstall" | "binstall" => Ok(StrategyName::BinaryInstall),
            "github-release" | "githubrelease" | "github" => Ok(StrategyName::GithubRelease),
            "python-app" | "pythonapp" | "pipx" => Ok(StrategyName::PythonApp),
            _ => {
                let valid = StrategyName::ALL
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(format!("Invalid strategy '{s}'. Must be one of: {valid}"))
            }
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StrategyName::BinaryInstall => write!(f, "binary-install"),
            StrategyName::GithubRelease => write!(f, "github-release"),
            StrategyName::PythonApp => write!(f, "python-app"),
        }
    }
}

/// A single tool the provisioner is responsible for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Name of the executable that ends up on PATH (e.g. `rg`).
    pub binary_name: String,
    /// Strategy-specific identifier: crate name, `owner/repo`, or PyPI package.
    pub install_target: String,
    pub strategy: StrategyName,
}

impl ToolSpec {
    pub fn new(binary_name: &str, install_target: &str, strategy: StrategyName) -> Self {
        ToolSpec {
            binary_name: binary_name.to_string(),
            install_target: install_target.to_string(),
            strategy,
        }
    }
}

/// Top level of a registry override file.
#[derive(Debug, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub tools: Vec<RegistryEntry>,
}

/// One tool as written in a registry file. `strategy` stays a plain string here so an
/// unknown value surfaces as a dedicated fatal error rather than a generic YAML error.
#[derive(Debug, Deserialize)]
pub struct RegistryEntry {
    pub binary: String,
    pub target: String,
    pub strategy: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_display_names_and_aliases() {
        for strategy in StrategyName::ALL {
            assert_eq!(strategy.to_string().parse::<StrategyName>(), Ok(strategy));
        }
        assert_eq!("BinaryInstall".parse::<StrategyName>(), Ok(StrategyName::BinaryInstall));
        assert_eq!("GITHUB".parse::<StrategyName>(), Ok(StrategyName::GithubRelease));
        assert_eq!(" pipx ".parse::<StrategyName>(), Ok(StrategyName::PythonApp));
    }

    #[test]
    fn rejects_unknown_strategy() {
        let err = "snap".parse::<StrategyName>().unwrap_err();
        assert!(err.contains("'snap'"));
        assert!(err.contains("binary-install, github-release, python-app"));
    }

    #[test]
    fn registry_file_note_is_optional() {
        let yaml = "tools:\n  - binary: rg\n    target: ripgrep\n    strategy: binstall\n";
        let file: RegistryFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.tools.len(), 1);
        assert_eq!(file.tools[0].binary, "rg");
        assert!(file.tools[0].note.is_none());
    }
}
