//! `simon`: run the assistant against the terminal.

use anyhow::Context;
use clap::Parser;
use log::{debug, info, warn};
use simon_rs::console::{ConsoleSpeaker, StdinListener, banner};
use simon_rs::init_logging;
use simon_rs_config::{LayeredConfigOptions, SimonConfig};
use simon_rs_core::{Assistant, Dispatcher, OllamaClient};
use simon_rs_executor::{DesktopHost, SystemHost};
use simon_rs_protocol::Speaker;
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line options for the assistant.
#[derive(Parser)]
#[command(name = "simon", version, about = "Personal desktop voice assistant")]
struct Cli {
    /// Language model to use, overriding `llm.model` from the config
    model: Option<String>,
    /// Extra simon.json5 applied on top of the system, user and cwd layers
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    info!(
        "starting simon (config_set={}, model_set={})",
        cli.config.is_some(),
        cli.model.is_some()
    );
    let config = load_config(&cli)?;

    let llm = Arc::new(OllamaClient::new(&config.llm).context("failed to build LLM client")?);
    check_llm(&llm, &config.llm.model).await;

    let speaker: Arc<dyn Speaker> = Arc::new(ConsoleSpeaker::new());
    let host: Arc<dyn DesktopHost> = Arc::new(SystemHost::new());
    let dispatcher = Dispatcher::from_config(&config, llm, host, Some(speaker.clone()))
        .context("failed to build dispatcher")?;
    let skills = dispatcher.skills().list();
    let assistant = Assistant::new(
        dispatcher,
        speaker,
        Box::new(StdinListener::new()),
        config.assistant.clone(),
    );

    println!("{}", banner(&config, &skills));
    assistant.start().context("failed to start assistant")?;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("interrupted, shutting down"),
        _ = assistant.wait_stopped() => info!("input closed, shutting down"),
    }
    assistant.wait_idle().await;
    if let Err(err) = assistant.stop().await {
        warn!("shutdown incomplete: {err}");
    }
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<SimonConfig> {
    let cwd = std::env::current_dir().context("cwd")?;
    info!("loading layered config from cwd: {}", cwd.display());
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = &cli.config {
        info!("adding runtime config layer: {}", path.display());
        options = options.with_runtime_path(path);
    }
    let layered =
        SimonConfig::load_layered_with_options(options).context("failed to load config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    let mut config = layered.config;
    if let Some(model) = &cli.model {
        info!("using model from command line (model={model})");
        config.llm.model = model.clone();
    }
    config.validate().context("invalid config")?;
    Ok(config)
}

/// Warn early when the model service is down or does not have the model.
async fn check_llm(llm: &OllamaClient, model: &str) {
    match llm.health().await {
        Ok(models) => {
            let tagged = format!("{model}:");
            if models
                .iter()
                .any(|name| name == model || name.starts_with(&tagged))
            {
                info!("model available (endpoint={}, model={model})", llm.endpoint());
            } else {
                warn!(
                    "model not found on service (endpoint={}, model={model}, available={})",
                    llm.endpoint(),
                    models.join(", ")
                );
            }
        }
        Err(err) => warn!(
            "language model service unreachable (endpoint={}): {err}",
            llm.endpoint()
        ),
    }
}
