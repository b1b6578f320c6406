//! The line-oriented stdout protocol.
//!
//! Every line starts with a bracketed tag so callers can parse progress without
//! scraping log output:
//!
//! ```text
//! [SKIP] git already present
//! [INSTALL] rg via binary-install (ripgrep)
//! [FAIL] fzf: no matching asset for linux/amd64 in latest release of junegunn/fzf
//! [NOTE] bandwhich: requires elevated network capability grant (/root/.local/bin/bandwhich)
//! [WARN] http: `http --version` and `http --help` failed: exit code 1
//! [REPORT] installed=1 skipped=1 failed=1
//! ```
//!
//! Lines are plain text. Diagnostic logging goes to stderr instead.

use crate::schemas::run_result::RunResult;
use crate::schemas::tools::ToolSpec;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

/// One protocol line.
#[derive(Debug)]
pub enum Event<'a> {
    Install { tool: &'a ToolSpec },
    Skip { binary: &'a str },
    Fail { binary: &'a str, cause: &'a str },
    Note { binary: &'a str, note: &'a str, path: &'a Path },
    Warn { binary: &'a str, message: &'a str },
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Event::Install { tool } => write!(
                f,
                "[INSTALL] {} via {} ({})",
                tool.binary_name, tool.strategy, tool.install_target
            ),
            Event::Skip { binary } => write!(f, "[SKIP] {binary} already present"),
            Event::Fail { binary, cause } => write!(f, "[FAIL] {binary}: {cause}"),
            Event::Note { binary, note, path } => {
                write!(f, "[NOTE] {binary}: {note} ({})", path.display())
            }
            Event::Warn { binary, message } => write!(f, "[WARN] {binary}: {message}"),
        }
    }
}

/// Prints one protocol event to stdout.
pub fn emit(event: &Event) {
    emit_line(&event.to_string());
}

/// Prints an already formatted protocol line. Each line is written under the stdout
/// lock, so lines from parallel workers never interleave.
pub fn emit_line(line: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // A closed stdout must not take the run down with it.
    let _ = writeln!(handle, "{line}").and_then(|_| handle.flush());
}

/// The final `[REPORT]` line.
pub fn summary_line(result: &RunResult) -> String {
    format!(
        "[REPORT] installed={} skipped={} failed={}",
        result.installed.len(),
        result.skipped.len(),
        result.failed.len()
    )
}

/// 1 if anything failed, 0 otherwise.
pub fn exit_status(result: &RunResult) -> u8 {
    if result.has_failures() { 1 } else { 0 }
}

/// Prints the summary as the last stdout line and returns the process exit code.
pub fn report(result: &RunResult) -> ExitCode {
    emit_line(&summary_line(result));
    ExitCode::from(exit_status(result))
}
