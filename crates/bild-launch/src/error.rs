//! Error taxonomy for the launcher.

/// Which companion model of the two-model strategy is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionRole {
    Large,
    Small,
}

impl std::fmt::Display for CompanionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompanionRole::Large => write!(f, "large"),
            CompanionRole::Small => write!(f, "small"),
        }
    }
}

/// Errors produced by run parameter validation.
///
/// All variants are fatal: no child process is launched once one is raised.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(
        "model '{model}' is a {marker} model and requires --source_lang {expected_source} \
         --target_lang {expected_target}, got {source_lang} -> {target_lang}"
    )]
    DirectionMismatch {
        model: String,
        marker: &'static str,
        expected_source: &'static str,
        expected_target: &'static str,
        source_lang: String,
        target_lang: String,
    },

    #[error("--model bild requires --{role} to name a model")]
    MissingCompanionModel { role: CompanionRole },

    #[error("{name} must be a finite number, got {value}")]
    NonFiniteThreshold { name: &'static str, value: f64 },
}

/// Errors raised while running the downstream evaluation process.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for parameter validation.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
