use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use news_engine::{Classifier, NewsClassifier};
use serde_json::json;
use tracing::warn;

use crate::config::ModelConfig;
use crate::preprocess::{InputArgs, RawInput};
use crate::service::{self, API_PREVIEW_CHARS};

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Model directory (overrides config)
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Force CPU inference
    #[arg(long)]
    pub cpu: bool,

    /// Print one JSON object per input instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PredictArgs, mut model_cfg: ModelConfig) -> Result<()> {
    if let Some(model) = &args.model {
        model_cfg.model_path = model.clone();
    }
    if args.cpu {
        model_cfg.use_gpu = false;
    }

    // Read inputs before paying for the model load.
    let inputs = args.input.read_inputs()?;

    eprintln!("Loading model from: {:?}", model_cfg.model_path);
    let classifier = NewsClassifier::load_dir(&model_cfg.model_path, &model_cfg.classifier_options())
        .with_context(|| {
            format!(
                "Failed to load model from {:?}. Ensure the directory contains config.json and model.safetensors",
                model_cfg.model_path
            )
        })?;

    let total = inputs.len();
    let stdout = std::io::stdout();
    let failed = classify_all(&classifier, inputs, args.json, &mut stdout.lock())?;
    if failed > 0 {
        anyhow::bail!("{} of {} inputs could not be classified", failed, total);
    }
    Ok(())
}

/// Classify every input, writing one line per input to `out`. A failing input
/// gets an error line in its place; the rest still run. Returns the failure count.
pub fn classify_all<W: Write>(
    classifier: &dyn Classifier,
    inputs: Vec<RawInput>,
    json: bool,
    out: &mut W,
) -> Result<usize> {
    let mut failed = 0;
    for (i, input) in inputs.into_iter().enumerate() {
        let analysis = match service::analyze(classifier, input) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Input #{}: {}", i + 1, e);
                failed += 1;
                if json {
                    writeln!(out, "{}", json!({ "detail": e.to_string() }))?;
                } else {
                    writeln!(out, "error\t{}", e)?;
                }
                continue;
            }
        };

        if json {
            let line = json!({
                "prediction": analysis.prediction.label,
                "confidence": analysis.prediction.confidence,
                "processed_text": service::preview(&analysis.processed_text, API_PREVIEW_CHARS),
            });
            writeln!(out, "{}", line)?;
        } else {
            writeln!(
                out,
                "{}\t{:.2}%\t{}",
                analysis.prediction.label,
                analysis.prediction.confidence * 100.0,
                service::preview(&analysis.processed_text, 80)
            )?;
        }
    }
    Ok(failed)
}
