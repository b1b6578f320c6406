// Our custom logging macros for nicely formatted output.
use crate::log_warn;
use std::path::PathBuf;

/// Resolves paths that start with a tilde `~` into the user's home directory.
///
/// # Arguments
/// * `path`: A path string that may start with `~`, e.g. `~/.local/bin`.
///
/// # Returns
/// * `PathBuf`: The expanded path. If the home directory cannot be determined the
///   input is returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// The user's home directory. Falls back to `/root` with a warning, since the
/// provisioner typically runs on a fresh host as root when `$HOME` is unset.
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| {
        log_warn!("[Paths] Could not determine home directory, assuming /root");
        PathBuf::from("/root")
    })
}

/// Default install location for provisioned binaries: `~/.local/bin`.
pub fn default_bin_dir() -> PathBuf {
    home_dir().join(".local").join("bin")
}

/// Picks the shell profile file to persist the PATH export into.
///
/// # Arguments
/// * `shell`: The value of `$SHELL`, if set (e.g. `/usr/bin/zsh`).
///
/// # Supported Shells
/// - zsh -> `~/.zshrc`
/// - bash -> `~/.bashrc`
/// - anything else, or unset -> `~/.profile`
pub fn profile_for_shell(shell: Option<&str>) -> PathBuf {
    let shell_name = shell
        .and_then(|s| s.rsplit('/').next())
        .unwrap_or_default()
        .to_lowercase();
    let file = match shell_name.as_str() {
        "zsh" => ".zshrc",
        "bash" => ".bashrc",
        _ => ".profile",
    };
    home_dir().join(file)
}
