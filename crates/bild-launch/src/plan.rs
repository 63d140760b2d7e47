//! Launch plan: the fully-resolved downstream invocation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::args::build_arguments;
use crate::params::RunConfiguration;

/// Default interpreter for the evaluation pipeline.
pub const DEFAULT_INTERPRETER: &str = "python";

/// Default evaluation entry point, relative to the working directory.
pub const DEFAULT_ENTRY_SCRIPT: &str = "translation/run_translation.py";

/// Environment variable that turns off the pipeline's Weights & Biases
/// integration.
pub const TRACKING_DISABLED_VAR: &str = "WANDB_DISABLED";

/// Interpreter and script of the evaluation pipeline.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntryPoint {
    pub interpreter: String,
    pub script: PathBuf,
}

impl EntryPoint {
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
        }
    }
}

impl Default for EntryPoint {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPRETER, DEFAULT_ENTRY_SCRIPT)
    }
}

/// A single, ready-to-run invocation of the evaluation pipeline.
///
/// The environment map is applied to the child process only; the launcher's
/// own environment is left untouched.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Executable to spawn.
    pub program: String,

    /// Arguments, starting with the entry-point script.
    pub args: Vec<String>,

    /// Extra environment for the child.
    pub env: BTreeMap<String, String>,

    /// SHA-256 over program, ordered args and env (deterministic).
    pub digest: String,
}

impl LaunchPlan {
    /// Build the plan for a validated configuration.
    pub fn from_config(entry: &EntryPoint, config: &RunConfiguration) -> Self {
        Self::new(entry, build_arguments(config))
    }

    /// Build a plan from an entry point and pipeline arguments.
    pub fn new(entry: &EntryPoint, pipeline_args: Vec<String>) -> Self {
        let mut args = Vec::with_capacity(pipeline_args.len() + 1);
        args.push(entry.script.to_string_lossy().into_owned());
        args.extend(pipeline_args);

        let mut env = BTreeMap::new();
        env.insert(TRACKING_DISABLED_VAR.to_string(), "true".to_string());

        let program = entry.interpreter.clone();
        let digest = compute_plan_digest(&program, &args, &env);

        Self {
            program,
            args,
            env,
            digest,
        }
    }

    /// Short digest (first 12 characters).
    pub fn short_digest(&self) -> &str {
        &self.digest[..12.min(self.digest.len())]
    }

    /// Full command line, program first.
    pub fn command_line(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

fn compute_plan_digest(program: &str, args: &[String], env: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(program.as_bytes());
    hasher.update(b"\0");
    for arg in args {
        hasher.update(arg.as_bytes());
        hasher.update(b"\0");
    }
    for (key, value) in env {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b"\0");
    }
    hex::encode(hasher.finalize())
}
