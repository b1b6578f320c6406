// The boundary between the provisioner and the machine it runs on.
// Everything that looks up a binary on PATH or spawns an external program
// (package managers, `cargo binstall`, `pipx`, `id`, the verified tools themselves)
// goes through the `Host` trait, so the orchestration logic can be exercised
// against a fake host in tests.

use crate::log_debug;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::PathBuf;
use std::process::Command;

/// Captured result of an external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// `true` when the process exited with status 0.
    pub success: bool,
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Human readable exit status, e.g. `exit code 2` or `signal`.
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {code}"),
            None => "termination by signal".to_string(),
        }
    }
}

/// Access to PATH lookup and subprocess execution.
pub trait Host: Send + Sync {
    /// Resolves `binary` against the PATH of this run.
    fn locate(&self, binary: &str) -> Option<PathBuf>;

    /// Runs `program` with an argument vector (never through a shell) and
    /// extra environment variables, waiting for it to finish.
    fn execute(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &OsStr)],
    ) -> io::Result<CommandOutput>;

    fn is_available(&self, binary: &str) -> bool {
        self.locate(binary).is_some()
    }
}

/// The real host. Lookups and children use `search_path` as PATH, which already
/// contains the install directory, so tools installed earlier in the run are visible
/// without touching the process environment.
#[derive(Debug, Clone)]
pub struct SystemHost {
    search_path: OsString,
    cwd: PathBuf,
}

impl SystemHost {
    pub fn new(search_path: OsString) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        SystemHost { search_path, cwd }
    }
}

impl Host for SystemHost {
    fn locate(&self, binary: &str) -> Option<PathBuf> {
        which::which_in(binary, Some(&self.search_path), &self.cwd).ok()
    }

    fn execute(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &OsStr)],
    ) -> io::Result<CommandOutput> {
        // Resolve through our own PATH so freshly installed helpers are found.
        let resolved = self
            .locate(program)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("'{program}' not found on PATH")))?;
        log_debug!("[Host] Running {} {}", resolved.display(), args.join(" "));

        let mut command = Command::new(&resolved);
        command.args(args).env("PATH", &self.search_path);
        for (key, value) in envs {
            command.env(key, value);
        }
        let output = command.output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Fake host shared by the unit tests across modules.
#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    type Responder = Box<dyn Fn(&str, &[&str]) -> CommandOutput + Send + Sync>;

    /// A host whose PATH is a set of names and whose commands are answered by a closure.
    /// Every call is recorded as `program arg1 arg2 ...`.
    pub struct FakeHost {
        pub present: Mutex<HashSet<String>>,
        pub calls: Mutex<Vec<String>>,
        pub envs: Mutex<HashMap<String, Vec<(String, String)>>>,
        responder: Responder,
    }

    impl FakeHost {
        pub fn new(present: &[&str]) -> Self {
            Self::with_responder(present, |_, _| ok(""))
        }

        pub fn with_responder<F>(present: &[&str], responder: F) -> Self
        where
            F: Fn(&str, &[&str]) -> CommandOutput + Send + Sync + 'static,
        {
            FakeHost {
                present: Mutex::new(present.iter().map(|s| s.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
                envs: Mutex::new(HashMap::new()),
                responder: Box::new(responder),
            }
        }

        pub fn add(&self, binary: &str) {
            self.present.lock().unwrap().insert(binary.to_string());
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Host for FakeHost {
        fn locate(&self, binary: &str) -> Option<PathBuf> {
            self.present
                .lock()
                .unwrap()
                .contains(binary)
                .then(|| PathBuf::from("/fake/bin").join(binary))
        }

        fn execute(
            &self,
            program: &str,
            args: &[&str],
            envs: &[(&str, &OsStr)],
        ) -> io::Result<CommandOutput> {
            let line = std::iter::once(program)
                .chain(args.iter().copied())
                .collect::<Vec<_>>()
                .join(" ");
            self.calls.lock().unwrap().push(line.clone());
            self.envs.lock().unwrap().insert(
                line,
                envs.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string_lossy().into_owned()))
                    .collect(),
            );
            if !self.is_available(program) {
                return Err(io::Error::new(io::ErrorKind::NotFound, program.to_string()));
            }
            Ok((self.responder)(program, args))
        }
    }

    pub fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            success: true,
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}
