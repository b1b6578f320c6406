// Helpers shared by the installers and the orchestration code.

// GitHub API client, downloads, and release asset selection.
pub mod assets;
// Placing binaries in the install directory.
pub mod binary;
// `.tar.gz` extraction.
pub mod compression;
// Profile file reading and appending.
pub mod file_operations;
// Home directory, default install directory, profile selection.
pub mod path_helpers;
// OS/architecture normalization.
pub mod platform;
