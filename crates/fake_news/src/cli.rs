use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::predict::PredictArgs;
use crate::preprocess::NormalizeArgs;

#[derive(Parser)]
#[command(author, version, about = "Fake News Detector", long_about = None)]
pub struct Cli {
    /// JSON config file (environment variables still apply on top)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the GUI (Default)
    Gui,

    /// Run the HTTP API
    Serve(ServeArgs),

    /// Classify text or a file
    Predict(PredictArgs),

    /// Print normalized text without loading a model
    Normalize(NormalizeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Model directory
    #[arg(short, long)]
    pub model: Option<PathBuf>,
}

impl ServeArgs {
    /// CLI flags win over file and environment.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.api.host = host.clone();
        }
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(model) = &self.model {
            config.model.model_path = model.clone();
        }
    }
}
