//! Run parameter validation.
//!
//! Pretrained translation models carry their language direction in their
//! name (`...-en-de`, `...-de-en`). A run that evaluates such a model in the
//! other direction produces meaningless BLEU scores, so it is rejected up
//! front. The `bild` tag additionally needs both of its companion models.

use tracing::{debug, warn};

use crate::error::{CompanionRole, ConfigurationError, Result};
use crate::params::{RunConfiguration, RunParameters};

/// Direction markers and the (source, target) pair each one requires.
///
/// Every marker is checked independently; a model naming both markers can
/// never satisfy both and is always rejected.
pub const DIRECTION_MARKERS: &[(&str, &str, &str)] =
    &[("en-de", "en", "de"), ("de-en", "de", "en")];

/// Validate run parameters.
///
/// Checks, in order:
/// 1. Direction markers in the model name match the language pair.
/// 2. `bild` runs name both a large and a small model.
/// 3. Supplied thresholds are finite.
///
/// # Errors
///
/// - `ConfigurationError::DirectionMismatch`: the model's direction marker
///   disagrees with `source_lang`/`target_lang`.
/// - `ConfigurationError::MissingCompanionModel`: `bild` without a
///   non-empty large or small model.
/// - `ConfigurationError::NonFiniteThreshold`: a threshold is NaN or infinite.
pub fn validate(params: RunParameters) -> Result<RunConfiguration> {
    check_direction(&params)?;
    check_companions(&params)?;
    check_threshold("--bild_fallback_threshold", params.fallback_threshold)?;
    check_threshold("--bild_rollback_threshold", params.rollback_threshold)?;

    if !params.is_bild() && (params.large_model.is_some() || params.small_model.is_some()) {
        warn!(
            model = %params.model,
            "--large/--small only apply to --model bild; ignoring them"
        );
    }

    debug!(model = %params.model, dataset = %params.dataset_name, "Run parameters validated");
    Ok(RunConfiguration::from_validated(params))
}

fn check_direction(params: &RunParameters) -> Result<()> {
    for &(marker, expected_source, expected_target) in DIRECTION_MARKERS {
        if !params.model.contains(marker) {
            continue;
        }
        if params.source_lang != expected_source || params.target_lang != expected_target {
            return Err(ConfigurationError::DirectionMismatch {
                model: params.model.clone(),
                marker,
                expected_source,
                expected_target,
                source_lang: params.source_lang.clone(),
                target_lang: params.target_lang.clone(),
            });
        }
    }
    Ok(())
}

fn check_companions(params: &RunParameters) -> Result<()> {
    if !params.is_bild() {
        return Ok(());
    }

    let named = |model: &Option<String>| model.as_deref().is_some_and(|m| !m.is_empty());

    if !named(&params.large_model) {
        return Err(ConfigurationError::MissingCompanionModel {
            role: CompanionRole::Large,
        });
    }
    if !named(&params.small_model) {
        return Err(ConfigurationError::MissingCompanionModel {
            role: CompanionRole::Small,
        });
    }
    Ok(())
}

fn check_threshold(name: &'static str, threshold: Option<f64>) -> Result<()> {
    match threshold {
        Some(value) if !value.is_finite() => {
            Err(ConfigurationError::NonFiniteThreshold { name, value })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DatasetName;

    fn params(model: &str, source: &str, target: &str) -> RunParameters {
        RunParameters::new(model, DatasetName::Wmt14, "de-en", source, target)
    }

    #[test]
    fn test_en_de_model_with_matching_direction_passes() {
        assert!(validate(params("Helsinki-NLP/opus-mt-en-de", "en", "de")).is_ok());
    }

    #[test]
    fn test_en_de_model_with_reverse_direction_fails() {
        let err = validate(params("Helsinki-NLP/opus-mt-en-de", "de", "en")).unwrap_err();
        match err {
            ConfigurationError::DirectionMismatch {
                marker,
                source_lang,
                target_lang,
                ..
            } => {
                assert_eq!(marker, "en-de");
                assert_eq!(source_lang, "de");
                assert_eq!(target_lang, "en");
            }
            other => panic!("Expected DirectionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_en_de_model_requires_both_languages() {
        assert!(validate(params("opus-mt-en-de", "en", "fr")).is_err());
        assert!(validate(params("opus-mt-en-de", "fr", "de")).is_err());
    }

    #[test]
    fn test_de_en_model_direction() {
        assert!(validate(params("opus-mt-de-en", "de", "en")).is_ok());
        let err = validate(params("opus-mt-de-en", "en", "de")).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::DirectionMismatch { marker: "de-en", .. }
        ));
    }

    #[test]
    fn test_model_without_marker_is_unconstrained() {
        assert!(validate(params("t5-small", "fr", "en")).is_ok());
        assert!(validate(params("t5-small", "en", "fr")).is_ok());
    }

    #[test]
    fn test_model_with_both_markers_always_fails() {
        let model = "ckpt-en-de-from-de-en";
        assert!(validate(params(model, "en", "de")).is_err());
        assert!(validate(params(model, "de", "en")).is_err());
    }

    #[test]
    fn test_bild_requires_large() {
        let err = validate(params("bild", "de", "en").with_small_model("t5-small")).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingCompanionModel {
                role: CompanionRole::Large
            }
        ));
    }

    #[test]
    fn test_bild_requires_small() {
        let err = validate(params("bild", "de", "en").with_large_model("t5-large")).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingCompanionModel {
                role: CompanionRole::Small
            }
        ));
    }

    #[test]
    fn test_bild_rejects_empty_companion() {
        let p = params("bild", "de", "en")
            .with_large_model("")
            .with_small_model("t5-small");
        assert!(validate(p).is_err());
    }

    #[test]
    fn test_bild_with_both_companions_passes() {
        let p = params("bild", "de", "en")
            .with_large_model("t5-large")
            .with_small_model("t5-small");
        let config = validate(p).expect("validate failed");
        assert_eq!(config.companions(), Some(("t5-large", "t5-small")));
    }

    #[test]
    fn test_bild_prefixed_model_is_single_model() {
        let config = validate(params("bild-en-de", "en", "de")).expect("validate failed");
        assert!(!config.is_bild());
        assert!(validate(params("bild-en-de", "de", "en")).is_err());
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let err = validate(params("t5-small", "de", "en").with_fallback_threshold(f64::NAN))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::NonFiniteThreshold {
                name: "--bild_fallback_threshold",
                ..
            }
        ));

        let err = validate(params("t5-small", "de", "en").with_rollback_threshold(f64::INFINITY))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::NonFiniteThreshold {
                name: "--bild_rollback_threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_validation_does_not_transform_values() {
        let p = params("bild", "de", "en")
            .with_large_model("t5-large")
            .with_small_model("t5-small")
            .with_decoder_init_source("t5-small-decoder")
            .with_fallback_threshold(0.6)
            .with_rollback_threshold(5.0);
        let config = validate(p.clone()).expect("validate failed");
        assert_eq!(config.params(), &p);
    }
}
