// Data structures shared across the provisioner: the tool registry model,
// the GitHub release payload, and the accumulated run result.
pub mod common;
pub mod run_result;
pub mod tools;
