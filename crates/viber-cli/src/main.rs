use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use viber_cli::config::{Cli, Command, ProviderArgs, SettingsAction};
use viber_cli::export;
use viber_core::{GenerationStatus, OutputMode, ProjectSpecs};
use viber_provider::{client_for, ProviderId};
use viber_session::{extract_specs, GenerationSession};
use viber_settings::SettingsStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract {
            input,
            json_out,
            provider,
        } => run_extract(&input, json_out, provider).await,
        Command::Generate {
            specs,
            output_mode,
            out,
            zip,
            provider,
        } => run_generate(&specs, &output_mode, &out, zip, provider).await,
        Command::Settings { action } => run_settings(action),
    }
}

async fn run_extract(
    input: &str,
    json_out: Option<PathBuf>,
    provider: ProviderArgs,
) -> Result<()> {
    let store = SettingsStore::open_default()?;
    let config = provider.resolve(&store.get())?;

    let free_text = if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read stdin")?;
        text
    } else {
        std::fs::read_to_string(input).with_context(|| format!("read {input}"))?
    };

    let client = client_for(&config);
    info!(provider = client.name(), model = %config.model, "extracting specs");
    let specs = extract_specs(client.as_ref(), &free_text).await?;

    let json = serde_json::to_string_pretty(&specs)?;
    match json_out {
        Some(path) => {
            std::fs::write(&path, &json).with_context(|| format!("write {}", path.display()))?;
            info!("specs written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn run_generate(
    specs_path: &PathBuf,
    output_mode: &str,
    out_dir: &PathBuf,
    zip: Option<PathBuf>,
    provider: ProviderArgs,
) -> Result<()> {
    let store = SettingsStore::open_default()?;
    let config = provider.resolve(&store.get())?;

    let specs: ProjectSpecs = serde_json::from_str(
        &std::fs::read_to_string(specs_path)
            .with_context(|| format!("read {}", specs_path.display()))?,
    )
    .context("parse specs JSON")?;

    let Some(mode) = OutputMode::parse_str(output_mode) else {
        bail!("unknown output mode: {output_mode} (expected claude-md or full-scaffold)");
    };

    let session = GenerationSession::with_default_clients();
    let runner = session.clone();
    let run_specs = specs.clone();
    let run_config = config.clone();
    let handle =
        tokio::spawn(async move { runner.generate(&run_specs, mode, &run_config).await });

    // Announce files as their separators stream in; ctrl-c aborts cleanly.
    let mut announced = 0usize;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                session.abort();
                break;
            }
            _ = tokio::time::sleep(Duration::from_millis(150)) => {}
        }
        let state = session.snapshot();
        for file in state.files.iter().skip(announced) {
            info!("streaming {}", file.filename);
        }
        announced = announced.max(state.files.len());
        if state.status != GenerationStatus::Generating {
            break;
        }
    }
    handle.await.context("generation task")?;

    let state = session.snapshot();
    match state.status {
        GenerationStatus::Complete => {
            if state.files.is_empty() {
                warn!("generation completed but produced no files");
                return Ok(());
            }
            let written = export::write_files(out_dir, &state.files)?;
            for path in &written {
                info!("wrote {}", path.display());
            }
            if let Some(zip_path) = zip {
                export::write_zip(&zip_path, &state.files)?;
                info!("bundled {}", zip_path.display());
            }
            Ok(())
        }
        GenerationStatus::Error => {
            bail!(state.error.unwrap_or_else(|| "Generation failed".into()))
        }
        GenerationStatus::Idle => {
            info!("generation cancelled");
            Ok(())
        }
        GenerationStatus::Generating => unreachable!("generation task has exited"),
    }
}

fn run_settings(action: SettingsAction) -> Result<()> {
    let store = SettingsStore::open_default()?;
    match action {
        SettingsAction::SetKey { key } => {
            store.set_api_key(key)?;
            eprintln!("API key stored");
        }
        SettingsAction::ClearKey => {
            store.clear_api_key()?;
            eprintln!("API key cleared");
        }
        SettingsAction::SetModel { model } => {
            store.set_model(model)?;
            eprintln!("default model stored");
        }
        SettingsAction::SetProvider { provider } => {
            let Some(provider) = ProviderId::parse_str(&provider) else {
                bail!("unknown provider: {provider}");
            };
            store.set_provider(provider)?;
            eprintln!("default provider stored");
        }
        SettingsAction::Show => {
            let settings = store.get();
            let key = if settings.api_key.is_empty() {
                "(not set)".to_string()
            } else if settings.api_key.len() > 12 {
                let prefix: String = settings.api_key.chars().take(10).collect();
                format!("{prefix}…")
            } else {
                "(set)".to_string()
            };
            println!("provider: {}", settings.provider);
            println!("model:    {}", settings.model);
            println!("api key:  {key}");
            if let Some(path) = store.path() {
                println!("file:     {}", path.display());
            }
        }
    }
    Ok(())
}
