//! Application Configuration
//!
//! Defaults, then an optional JSON file, then environment variables.
//! CLI flags are applied last by the caller.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use news_engine::ClassifierOptions;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub body_limit_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 60,
            body_limit_bytes: 2 * 1024 * 1024,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory with config.json, model.safetensors and (optionally) tokenizer.json
    pub model_path: PathBuf,
    /// Hub tokenizer used when the model directory has none
    pub tokenizer_name: String,
    /// Max token length for input
    pub max_length: usize,
    pub use_gpu: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./fake_news_model"),
            tokenizer_name: "roberta-base".to_string(),
            max_length: 512,
            use_gpu: true,
        }
    }
}

impl ModelConfig {
    pub fn classifier_options(&self) -> ClassifierOptions {
        ClassifierOptions {
            tokenizer_name: self.tokenizer_name.clone(),
            max_length: self.max_length,
            use_gpu: self.use_gpu,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub model: ModelConfig,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            model: ModelConfig::default(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        serde_json::from_str(&data).with_context(|| format!("Invalid config {:?}", path))
    }

    /// Defaults (or `path`), overlaid with the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("API_HOST") {
            self.api.host = v;
        }
        if let Some(v) = lookup("API_PORT") {
            self.api.port = parse_var("API_PORT", &v)?;
        }
        if let Some(v) = lookup("MODEL_PATH") {
            self.model.model_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("MODEL_NAME") {
            self.model.tokenizer_name = v;
        }
        if let Some(v) = lookup("MAX_LENGTH") {
            self.model.max_length = parse_var("MAX_LENGTH", &v)?;
        }
        if let Some(v) = lookup("USE_GPU") {
            self.model.use_gpu = parse_var("USE_GPU", &v)?;
        }
        if let Some(v) = lookup("LOG_DIR") {
            self.log_dir = PathBuf::from(v);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
        assert_eq!(cfg.model.model_path, PathBuf::from("./fake_news_model"));
        assert_eq!(cfg.model.max_length, 512);
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9090"),
            ("MODEL_PATH", "/models/fnd"),
            ("MAX_LENGTH", "256"),
            ("USE_GPU", "false"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9090");
        assert_eq!(cfg.model.model_path, PathBuf::from("/models/fnd"));
        assert_eq!(cfg.model.max_length, 256);
        assert!(!cfg.model.use_gpu);
    }

    #[test]
    fn test_invalid_env_names_variable() {
        let mut cfg = AppConfig::default();
        let err = cfg.apply_env(env(&[("API_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("API_PORT"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api": {"port": 8080}, "log_dir": "/var/log/fnd"}"#).unwrap();

        let cfg = AppConfig::from_file(&path).unwrap();
        assert_eq!(cfg.api.port, 8080);
        assert_eq!(cfg.api.host, "0.0.0.0");
        assert_eq!(cfg.model, ModelConfig::default());
        assert_eq!(cfg.log_dir, PathBuf::from("/var/log/fnd"));
    }
}
