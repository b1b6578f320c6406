use crate::log_warn;
use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Reads profile lines, preserving comments and empty lines.
///
/// # Returns
/// * `Vec<String>` - The lines of the file, or an empty vector if the file doesn't
///   exist (treated as a new file) or can't be read (logged as a warning).
pub fn read_rc_file(rc_path: &Path) -> Vec<String> {
    if !rc_path.exists() {
        return vec![];
    }

    match fs::File::open(rc_path) {
        Ok(file) => BufReader::new(file).lines().map_while(Result::ok).collect(),
        Err(err) => {
            log_warn!(
                "[Profile] Could not read {}: {}. Treating it as empty.",
                rc_path.display().to_string().red(),
                err.to_string().red()
            );
            vec![]
        }
    }
}

/// Appends lines to the end of a profile file, creating the file (and its parent
/// directory) if needed. A newline is inserted first when the existing content
/// doesn't end with one, so the appended line never merges into the last line.
pub fn append_to_rc_file(rc_path: &Path, lines: &[String]) -> io::Result<()> {
    if let Some(parent) = rc_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let needs_leading_newline = match fs::read(rc_path) {
        Ok(bytes) => !bytes.is_empty() && !bytes.ends_with(b"\n"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => false,
        Err(err) => return Err(err),
    };

    let mut file = OpenOptions::new().create(true).append(true).open(rc_path)?;
    if needs_leading_newline {
        writeln!(file)?;
    }
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_creates_file_and_keeps_line_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join("nested").join(".bashrc");

        append_to_rc_file(&rc, &["alias ll='ls -l'".to_string()]).unwrap();
        assert_eq!(read_rc_file(&rc), vec!["alias ll='ls -l'"]);

        fs::write(&rc, "no trailing newline").unwrap();
        append_to_rc_file(&rc, &["export A=1".to_string()]).unwrap();
        assert_eq!(read_rc_file(&rc), vec!["no trailing newline", "export A=1"]);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_rc_file(&dir.path().join("absent")).is_empty());
    }
}
