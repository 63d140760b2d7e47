//! Run parameters before and after validation.

use serde::{Deserialize, Serialize};

/// Model tag selecting the two-model (big-little) decoding strategy.
pub const BILD_MODEL_TAG: &str = "bild";

/// Supported evaluation corpora.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DatasetName {
    /// WMT 2014 news translation.
    Wmt14,

    /// IWSLT 2017 TED talk translation.
    Iwslt2017,
}

impl DatasetName {
    /// Name understood by the evaluation pipeline's dataset loader.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetName::Wmt14 => "wmt14",
            DatasetName::Iwslt2017 => "iwslt2017",
        }
    }
}

impl std::fmt::Display for DatasetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw parameters for one evaluation run, as received from the caller.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunParameters {
    /// Model name or path, or [`BILD_MODEL_TAG`].
    pub model: String,

    /// Large model of the two-model strategy.
    pub large_model: Option<String>,

    /// Small model of the two-model strategy.
    pub small_model: Option<String>,

    /// Model used to initialize the small model's decoder.
    pub decoder_init_source: Option<String>,

    pub dataset_name: DatasetName,

    pub dataset_config: String,

    /// Two-letter source language code.
    pub source_lang: String,

    /// Two-letter target language code.
    pub target_lang: String,

    /// BiLD fallback threshold.
    pub fallback_threshold: Option<f64>,

    /// BiLD rollback threshold.
    pub rollback_threshold: Option<f64>,
}

impl RunParameters {
    /// Create parameters for a single-model run with no optional values.
    pub fn new(
        model: impl Into<String>,
        dataset_name: DatasetName,
        dataset_config: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            large_model: None,
            small_model: None,
            decoder_init_source: None,
            dataset_name,
            dataset_config: dataset_config.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            fallback_threshold: None,
            rollback_threshold: None,
        }
    }

    /// Set the large model.
    pub fn with_large_model(mut self, large: impl Into<String>) -> Self {
        self.large_model = Some(large.into());
        self
    }

    /// Set the small model.
    pub fn with_small_model(mut self, small: impl Into<String>) -> Self {
        self.small_model = Some(small.into());
        self
    }

    pub fn with_decoder_init_source(mut self, source: impl Into<String>) -> Self {
        self.decoder_init_source = Some(source.into());
        self
    }

    pub fn with_fallback_threshold(mut self, threshold: f64) -> Self {
        self.fallback_threshold = Some(threshold);
        self
    }

    pub fn with_rollback_threshold(mut self, threshold: f64) -> Self {
        self.rollback_threshold = Some(threshold);
        self
    }

    /// Whether the model selects the two-model strategy.
    pub fn is_bild(&self) -> bool {
        self.model == BILD_MODEL_TAG
    }
}

/// Validated run parameters.
///
/// Only produced by [`crate::validate`], so holding one means every
/// direction and companion-model invariant was checked.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunConfiguration {
    params: RunParameters,
}

impl RunConfiguration {
    pub(crate) fn from_validated(params: RunParameters) -> Self {
        Self { params }
    }

    pub fn model(&self) -> &str {
        &self.params.model
    }

    /// Companion models, present only for the two-model strategy.
    pub fn companions(&self) -> Option<(&str, &str)> {
        if !self.is_bild() {
            return None;
        }
        match (&self.params.large_model, &self.params.small_model) {
            (Some(large), Some(small)) => Some((large, small)),
            _ => None,
        }
    }

    pub fn decoder_init_source(&self) -> Option<&str> {
        self.params.decoder_init_source.as_deref()
    }

    pub fn dataset_name(&self) -> DatasetName {
        self.params.dataset_name
    }

    pub fn dataset_config(&self) -> &str {
        &self.params.dataset_config
    }

    pub fn source_lang(&self) -> &str {
        &self.params.source_lang
    }

    pub fn target_lang(&self) -> &str {
        &self.params.target_lang
    }

    pub fn fallback_threshold(&self) -> Option<f64> {
        self.params.fallback_threshold
    }

    pub fn rollback_threshold(&self) -> Option<f64> {
        self.params.rollback_threshold
    }

    pub fn is_bild(&self) -> bool {
        self.params.is_bild()
    }

    /// The parameters this configuration was validated from.
    pub fn params(&self) -> &RunParameters {
        &self.params
    }
}
