// Post-run liveness checks. Every binary that should now be present is invoked with
// `--version` (falling back to `--help`). A binary that answers neither produces a
// warning; its classification in the run result is left as it is.

use crate::libs::host::Host;
use crate::{log_debug, log_info};
use colored::Colorize;

/// A binary that is on PATH but did not respond to `--version` or `--help`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub binary: String,
    pub message: String,
}

const PROBE_FLAGS: [&str; 2] = ["--version", "--help"];

/// Checks each binary in `names` that resolves on PATH.
///
/// # Returns
/// * `Vec<Warning>`: One entry per binary that failed both probes, in input order.
pub fn verify(host: &dyn Host, names: &[String]) -> Vec<Warning> {
    log_info!("[Verify] Checking {} binaries", names.len().to_string().bold());
    let mut warnings = Vec::new();

    for binary in names {
        if host.locate(binary).is_none() {
            log_debug!("[Verify] {} is not on PATH, nothing to check", binary);
            continue;
        }

        let mut last_error = String::new();
        let responded = PROBE_FLAGS.iter().any(|flag| {
            match host.execute(binary, &[*flag], &[]) {
                Ok(output) if output.success => {
                    log_debug!(
                        "[Verify] {} {} -> {}",
                        binary,
                        flag,
                        output.stdout.lines().next().unwrap_or("").dimmed()
                    );
                    true
                }
                Ok(output) => {
                    last_error = output.status_text();
                    false
                }
                Err(err) => {
                    last_error = err.to_string();
                    false
                }
            }
        });

        if !responded {
            warnings.push(Warning {
                binary: binary.clone(),
                message: format!(
                    "`{binary} --version` and `{binary} --help` failed: {last_error}"
                ),
            });
        }
    }
    warnings
}
