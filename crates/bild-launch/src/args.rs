//! Downstream argument list construction.

use tracing::debug;

use crate::params::RunConfiguration;

/// Checkpoint directory handed to the evaluation pipeline.
pub const OUTPUT_DIR: &str = "./temp";

/// Maximum number of checkpoints the pipeline keeps in [`OUTPUT_DIR`].
pub const SAVE_TOTAL_LIMIT: u32 = 5;

/// Logging interval of the pipeline, in steps.
pub const LOGGING_STEPS: u32 = 500;

pub const FALLBACK_THRESHOLD_FLAG: &str = "--fallback_threshold";
pub const ROLLBACK_THRESHOLD_FLAG: &str = "--rollback_threshold";
pub const LARGE_MODEL_FLAG: &str = "--large";
pub const SMALL_MODEL_FLAG: &str = "--small";

/// Build the ordered argument list for the evaluation pipeline.
///
/// Groups, in order: evaluation flags, checkpoint flags, dataset/model
/// flags, then the optional fallback threshold, rollback threshold and
/// (for `bild` only) the large/small model pair. A flag is only emitted
/// for a value that is present.
pub fn build_arguments(config: &RunConfiguration) -> Vec<String> {
    let mut args: Vec<String> = Vec::with_capacity(48);

    // evaluation
    push_all(
        &mut args,
        [
            "--metric_for_best_model",
            "bleu",
            "--greater_is_better",
            "True",
            "--predict_with_generate",
            "--num_beam",
            "1",
        ],
    );

    // checkpoints
    args.push("--save_total_limit".to_string());
    args.push(SAVE_TOTAL_LIMIT.to_string());
    args.push("--load_best_model_at_end".to_string());
    args.push("--logging_steps".to_string());
    args.push(LOGGING_STEPS.to_string());
    args.push("--output_dir".to_string());
    args.push(OUTPUT_DIR.to_string());

    // dataset, model and direction
    push_all(
        &mut args,
        [
            "--dataset_name",
            config.dataset_name().as_str(),
            "--dataset_config",
            config.dataset_config(),
            "--source_lang",
            config.source_lang(),
            "--target_lang",
            config.target_lang(),
            "--model_name_or_path",
            config.model(),
            "--evaluation_strategy",
            "epoch",
            "--save_strategy",
            "epoch",
            "--do_eval",
            "--per_device_eval_batch_size",
            "1",
        ],
    );

    if let Some(threshold) = config.fallback_threshold() {
        args.push(FALLBACK_THRESHOLD_FLAG.to_string());
        args.push(format_threshold(threshold));
    }

    if let Some(threshold) = config.rollback_threshold() {
        args.push(ROLLBACK_THRESHOLD_FLAG.to_string());
        args.push(format_threshold(threshold));
    }

    if let Some((large, small)) = config.companions() {
        push_all(&mut args, [LARGE_MODEL_FLAG, large, SMALL_MODEL_FLAG, small]);
    }

    if let Some(source) = config.decoder_init_source() {
        debug!(decoder_init_source = %source, "Decoder init source is not forwarded");
    }

    args
}

fn push_all<const N: usize>(args: &mut Vec<String>, values: [&str; N]) {
    args.extend(values.iter().map(|v| (*v).to_string()));
}

/// Render a threshold so it always reads as a float (`1.0`, not `1`).
///
/// Values below `1e-4` or from `1e16` up use exponent form (`1e-7`).
fn format_threshold(value: f64) -> String {
    format!("{value:?}")
}
