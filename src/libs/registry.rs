//! # Tool Registry
//!
//! The fixed set of tools the provisioner manages, keyed by binary name, plus the
//! advisory notes shown after some installs.
//!
//! The built-in registry can be replaced by a YAML file (see
//! [`crate::schemas::tools::RegistryFile`]). Parsing that file is where unknown
//! strategy names are caught: they abort the run before any tool is processed.

use crate::libs::errors::FatalError;
use crate::schemas::tools::{RegistryFile, StrategyName, ToolSpec};
use crate::{log_debug, log_info};
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use StrategyName::{BinaryInstall, GithubRelease, PythonApp};

/// (binary, install target, strategy)
const BUILTIN_TOOLS: &[(&str, &str, StrategyName)] = &[
    ("bandwhich", "bandwhich", BinaryInstall),
    ("bat", "bat", BinaryInstall),
    ("delta", "git-delta", BinaryInstall),
    ("dust", "du-dust", BinaryInstall),
    ("eza", "eza", BinaryInstall),
    ("fd", "fd-find", BinaryInstall),
    ("hyperfine", "hyperfine", BinaryInstall),
    ("rg", "ripgrep", BinaryInstall),
    ("zoxide", "zoxide", BinaryInstall),
    ("fzf", "junegunn/fzf", GithubRelease),
    ("gh", "cli/cli", GithubRelease),
    ("k9s", "derailed/k9s", GithubRelease),
    ("task", "go-task/task", GithubRelease),
    ("http", "httpie", PythonApp),
    ("pre-commit", "pre-commit", PythonApp),
    ("tldr", "tldr", PythonApp),
];

const BUILTIN_NOTES: &[(&str, &str)] = &[
    (
        "bandwhich",
        "requires elevated network capability grant: sudo setcap cap_sys_ptrace,cap_dac_read_search,cap_net_raw,cap_net_admin+ep",
    ),
    ("zoxide", "add `eval \"$(zoxide init bash)\"` to your shell profile"),
];

/// Tools keyed by binary name. Iteration is lexicographic by binary name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolSpec>,
    notes: BTreeMap<String, String>,
}

impl ToolRegistry {
    /// The registry compiled into the binary.
    pub fn builtin() -> Self {
        let tools = BUILTIN_TOOLS
            .iter()
            .map(|(binary, target, strategy)| {
                (binary.to_string(), ToolSpec::new(binary, target, *strategy))
            })
            .collect();
        let notes = BUILTIN_NOTES
            .iter()
            .map(|(binary, note)| (binary.to_string(), note.to_string()))
            .collect();
        ToolRegistry { tools, notes }
    }

    /// Loads a registry override file.
    ///
    /// # Errors
    /// * `Registry` for unreadable files, malformed YAML, or empty fields.
    /// * `UnknownStrategy` for a strategy outside the closed set.
    /// * `DuplicateTool` for a binary listed twice.
    pub fn load(path: &Path) -> Result<Self, FatalError> {
        log_info!("[Registry] Loading tools from {}", path.display().to_string().cyan());
        let invalid = |reason: String| FatalError::Registry {
            path: path.to_path_buf(),
            reason,
        };

        let contents = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let file: RegistryFile = serde_yaml::from_str(&contents).map_err(|e| invalid(e.to_string()))?;

        let mut registry = ToolRegistry::default();
        for entry in file.tools {
            if entry.binary.trim().is_empty() || entry.target.trim().is_empty() {
                return Err(invalid(format!(
                    "entry with binary '{}' and target '{}' has an empty field",
                    entry.binary, entry.target
                )));
            }
            let strategy: StrategyName =
                entry
                    .strategy
                    .parse()
                    .map_err(|_| FatalError::UnknownStrategy {
                        binary: entry.binary.clone(),
                        name: entry.strategy.clone(),
                    })?;
            if let Some(note) = entry.note {
                registry.notes.insert(entry.binary.clone(), note);
            }
            registry.insert(ToolSpec::new(entry.binary.trim(), entry.target.trim(), strategy))?;
        }

        log_debug!("[Registry] Loaded {} tools", registry.len());
        Ok(registry)
    }

    fn insert(&mut self, spec: ToolSpec) -> Result<(), FatalError> {
        if self.tools.contains_key(&spec.binary_name) {
            return Err(FatalError::DuplicateTool(spec.binary_name));
        }
        self.tools.insert(spec.binary_name.clone(), spec);
        Ok(())
    }

    /// Tools in lexicographic binary-name order.
    pub fn tools(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.values()
    }

    pub fn notes(&self) -> &BTreeMap<String, String> {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl ToolRegistry {
        fn get(&self, binary: &str) -> Option<&ToolSpec> {
            self.tools.get(binary)
        }

        fn binary_names(&self) -> Vec<String> {
            self.tools.keys().cloned().collect()
        }
    }

    fn write_registry(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.yaml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn builtin_registry_is_sorted_and_unique() {
        let registry = ToolRegistry::builtin();
        let names = registry.binary_names();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), BUILTIN_TOOLS.len());
        assert_eq!(registry.get("rg").unwrap().install_target, "ripgrep");
        assert!(registry.notes().contains_key("bandwhich"));
    }

    #[test]
    fn loads_yaml_registry() {
        let (_dir, path) = write_registry(
            "tools:\n\
             \x20 - binary: rg\n\
             \x20   target: ripgrep\n\
             \x20   strategy: binary-install\n\
             \x20   note: fast grep\n\
             \x20 - binary: gh\n\
             \x20   target: cli/cli\n\
             \x20   strategy: GithubRelease\n",
        );
        let registry = ToolRegistry::load(&path).unwrap();

        assert_eq!(registry.binary_names(), vec!["gh", "rg"]);
        assert_eq!(registry.get("gh").unwrap().strategy, StrategyName::GithubRelease);
        assert_eq!(registry.notes()["rg"], "fast grep");
    }

    #[test]
    fn unknown_strategy_is_fatal() {
        let (_dir, path) = write_registry(
            "tools:\n  - binary: rg\n    target: ripgrep\n    strategy: binstall\n  - binary: code\n    target: code\n    strategy: snap\n",
        );
        let err = ToolRegistry::load(&path).unwrap_err();
        assert!(matches!(err, FatalError::UnknownStrategy { ref name, ref binary } if name == "snap" && binary == "code"));
    }

    #[test]
    fn duplicate_binary_is_fatal() {
        let (_dir, path) = write_registry(
            "tools:\n  - binary: rg\n    target: ripgrep\n    strategy: binstall\n  - binary: rg\n    target: rg\n    strategy: pipx\n",
        );
        assert!(matches!(ToolRegistry::load(&path), Err(FatalError::DuplicateTool(ref b)) if b == "rg"));
    }

    #[test]
    fn malformed_or_missing_file_is_fatal() {
        let (_dir, path) = write_registry("tools: [oops");
        assert!(matches!(ToolRegistry::load(&path), Err(FatalError::Registry { .. })));

        let (_dir, path) = write_registry("tools:\n  - binary: ''\n    target: x\n    strategy: pipx\n");
        assert!(matches!(ToolRegistry::load(&path), Err(FatalError::Registry { .. })));

        let missing = std::path::Path::new("/definitely/not/here.yaml");
        assert!(matches!(ToolRegistry::load(missing), Err(FatalError::Registry { .. })));
    }
}
