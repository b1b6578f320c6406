// Core of the provisioner: everything between parsing the command line and
// printing the final report.

pub mod errors;
// PATH lookup and subprocess execution.
pub mod host;
pub mod path_manager;
// Baseline tools installed through the system package manager.
pub mod prerequisites;
pub mod provisioner;
// Built-in tool list and the YAML override loader.
pub mod registry;
// Stdout protocol lines and the exit code.
pub mod reporter;
pub mod settings;
pub mod utilities;
pub mod verifier;
