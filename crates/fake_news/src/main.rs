use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fake_news::api::{self, AppState};
use fake_news::cli::{Cli, Commands, ServeArgs};
use fake_news::config::AppConfig;
use fake_news::{gui, predict, preprocess};
use news_engine::NewsClassifier;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    // 1. Setup File Logging
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "fake_news.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // 2. Setup Console Logging
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // 3. Combine Subscribers
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    // 4. Setup Panic Hook
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info.payload();
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "Unknown panic"
        };

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(target: "panic", "CRASH detected at {}: {}", location, msg);
        eprintln!("CRASH detected at {}: {}", location, msg);
    }));

    tracing::info!("Fake News Detector started.");

    match cli.command {
        Some(Commands::Gui) | None => {
            gui::run(&config).map_err(|e| anyhow::anyhow!("GUI error: {}", e))?
        }
        Some(Commands::Serve(args)) => serve(args, &mut config)?,
        Some(Commands::Predict(args)) => predict::run(args, config.model)?,
        Some(Commands::Normalize(args)) => preprocess::run(args)?,
    }

    Ok(())
}

fn serve(args: ServeArgs, config: &mut AppConfig) -> Result<()> {
    args.apply(config);

    tracing::info!("Loading model from {:?}", config.model.model_path);
    let classifier = NewsClassifier::load_dir(&config.model.model_path, &config.model.classifier_options())
        .with_context(|| format!("Failed to load model from {:?}", config.model.model_path))?;
    tracing::info!("Model loaded successfully");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(api::serve(AppState::new(Arc::new(classifier)), &config.api))
}
