// Locating a binary inside an extracted release and placing it in the install directory.
use crate::{log_debug, log_warn};
use colored::Colorize;
use std::fs;
use std::io;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Recursively searches `dir` for a regular file named exactly `binary_name`.
/// Release archives often nest the binary (`gh_2.60.0_linux_amd64/bin/gh`), so the
/// whole tree is walked; the shallowest match wins.
///
/// # Returns
/// * `Some(PathBuf)` with the first match, `None` if no file has that name.
pub fn find_binary(dir: &Path, binary_name: &str) -> Option<PathBuf> {
    log_debug!(
        "[Binary] Searching for {} in {}",
        binary_name.bold(),
        dir.display().to_string().yellow()
    );

    let found = walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == binary_name)
        .min_by_key(|e| e.depth())
        .map(|e| e.into_path());

    if found.is_none() {
        log_warn!(
            "[Binary] No file named {} within {}",
            binary_name.red(),
            dir.display()
        );
    }
    found
}

/// Copies `from` to `to`, creating parent directories as needed, and marks the
/// copy executable (`0o755`). An existing file at `to` is replaced.
pub fn install_binary(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    log_debug!(
        "[Binary] Copying {} to {}",
        from.display().to_string().yellow(),
        to.display().to_string().cyan()
    );
    fs::copy(from, to)?;
    make_executable(to)
}

/// Sets the permissions of `path` to `rwxr-xr-x`.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_shallowest_exact_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join("a/b/c/gh"), "deep").unwrap();
        fs::write(dir.path().join("bin/gh"), "shallow").unwrap();
        fs::write(dir.path().join("bin/gh-extension"), "other").unwrap();

        let found = find_binary(dir.path(), "gh").unwrap();
        assert_eq!(found, dir.path().join("bin/gh"));
        assert!(find_binary(dir.path(), "fzf").is_none());
    }

    #[test]
    fn installed_copy_is_executable() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("tool");
        fs::write(&src, "#!/bin/sh\n").unwrap();
        let dest = dir.path().join("out/bin/tool");

        install_binary(&src, &dest).unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert!(src.exists());
    }
}
