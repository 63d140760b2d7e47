//! Downstream process execution.

use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::LaunchError;
use crate::plan::LaunchPlan;

/// Result of running the evaluation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    /// Exit code of the child (0 = success). On Unix a signal-terminated
    /// child reports `128 + signal`; `-1` when no code is available.
    pub exit_code: i32,

    /// Whether the child exited successfully.
    pub success: bool,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl LaunchOutcome {
    /// Exit code to terminate the launcher with.
    pub fn process_exit_code(&self) -> i32 {
        if self.success {
            0
        } else if self.exit_code > 0 {
            self.exit_code
        } else {
            1
        }
    }
}

/// Run the plan's child process to completion.
///
/// Stdio is inherited so the pipeline's output reaches the user unmodified.
/// The child's exit status is reported as-is: no retry, no timeout.
pub async fn execute(plan: &LaunchPlan) -> Result<LaunchOutcome, LaunchError> {
    let start = Instant::now();

    info!(
        program = %plan.program,
        digest = %plan.short_digest(),
        "Launching evaluation pipeline"
    );
    debug!(args = ?plan.args, env = ?plan.env, "Child invocation");

    let mut child = Command::new(&plan.program)
        .args(&plan.args)
        .envs(&plan.env)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            program: plan.program.clone(),
            source,
        })?;

    let status = child.wait().await.map_err(|source| LaunchError::Wait {
        program: plan.program.clone(),
        source,
    })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    let exit_code = exit_code_of(status);
    let success = status.success();

    if success {
        info!(duration_ms, "Evaluation pipeline completed");
    } else {
        warn!(exit_code, duration_ms, "Evaluation pipeline failed");
    }

    Ok(LaunchOutcome {
        exit_code,
        success,
        duration_ms,
    })
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
