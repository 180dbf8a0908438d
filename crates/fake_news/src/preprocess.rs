//! Input normalization
//!
//! Reduces any supported input shape (plain text, JSON text, field mappings,
//! tabular rows, mixed lists) to one cleaned string for the classifier.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

pub mod clean;
pub mod extract;
pub mod input;

pub use clean::clean_text;
pub use input::{FieldMap, RawInput};

/// Normalized text must be longer than this (trimmed, in characters).
pub const MIN_TEXT_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreprocessError {
    #[error("Failed to preprocess input: {0}")]
    InvalidInput(String),

    #[error("No meaningful text content found in the input ({len} characters)")]
    InsufficientText { len: usize },
}

/// Extract and clean text from any input shape.
///
/// An empty result is not an error here; use [`validate`] for that.
pub fn normalize<I: Into<RawInput>>(input: I) -> Result<String, PreprocessError> {
    let input = input.into();
    let text = extract::extract_text(&input).map_err(|e| {
        error!("Error preprocessing input: {}", e);
        e
    })?;
    Ok(clean_text(&text))
}

pub fn is_meaningful(text: &str) -> bool {
    text.trim().chars().count() > MIN_TEXT_LEN
}

/// Reject text too short to classify.
pub fn validate(text: &str) -> Result<&str, PreprocessError> {
    if is_meaningful(text) {
        Ok(text)
    } else {
        Err(PreprocessError::InsufficientText {
            len: text.trim().chars().count(),
        })
    }
}

/// Normalize then validate; any failure reads as "not usable".
pub fn validate_input<I: Into<RawInput>>(input: I) -> bool {
    normalize(input).map_or(false, |text| is_meaningful(&text))
}

// --- CLI ---

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Text to process (plain text or JSON)
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read input from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Treat the file as a tab-separated table with a header row (one input per row)
    #[arg(long, requires = "file")]
    pub tsv: bool,
}

impl InputArgs {
    pub fn read_inputs(&self) -> Result<Vec<RawInput>> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(vec![RawInput::Text(text.clone())]),
            (None, Some(path)) => {
                let bytes =
                    std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
                if self.tsv {
                    let content = String::from_utf8(bytes)
                        .with_context(|| format!("{:?} is not valid UTF-8", path))?;
                    Ok(parse_tsv(&content))
                } else {
                    Ok(vec![RawInput::Bytes(bytes)])
                }
            }
            (None, None) => anyhow::bail!("Provide --text or --file"),
        }
    }
}

/// Split a header + rows table into one [`RawInput::Row`] per non-blank line.
pub fn parse_tsv(content: &str) -> Vec<RawInput> {
    let mut lines = content.lines();
    let headers: Vec<String> = match lines.next() {
        Some(header) => header.split('\t').map(|h| h.trim().to_string()).collect(),
        None => return Vec::new(),
    };

    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| RawInput::Row {
            headers: headers.clone(),
            values: line
                .split('\t')
                .map(|v| Value::String(v.to_string()))
                .collect(),
        })
        .collect()
}

#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: NormalizeArgs) -> Result<()> {
    for (i, input) in args.input.read_inputs()?.into_iter().enumerate() {
        let text = normalize(input).with_context(|| format!("Input #{}", i + 1))?;
        if !is_meaningful(&text) {
            tracing::warn!("Input #{} has insufficient text ({:?})", i + 1, text);
        }
        println!("{}", text);
    }
    Ok(())
}
