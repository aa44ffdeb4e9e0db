use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use viber_provider::{ProviderConfig, ProviderId};
use viber_settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "viber", about = "Generate AI-ready project documentation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract structured project specs from a free-text description
    Extract {
        /// Input file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,

        /// Write the specs JSON here instead of stdout
        #[arg(long)]
        json_out: Option<PathBuf>,

        #[command(flatten)]
        provider: ProviderArgs,
    },
    /// Generate documentation from a specs JSON file
    Generate {
        /// Path to the specs JSON (as produced by `viber extract`)
        #[arg(long)]
        specs: PathBuf,

        /// claude-md (context doc + phase prompts) or full-scaffold
        #[arg(long, default_value = "claude-md")]
        output_mode: String,

        /// Directory the generated files are written to
        #[arg(long, default_value = "viber-output")]
        out: PathBuf,

        /// Also bundle the generated files into this zip archive
        #[arg(long)]
        zip: Option<PathBuf>,

        #[command(flatten)]
        provider: ProviderArgs,
    },
    /// Manage stored credentials and defaults
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Store the API key
    SetKey { key: String },
    /// Forget the stored API key
    ClearKey,
    /// Store the default model
    SetModel { model: String },
    /// Store the default provider (anthropic, openai, gemini, grok)
    SetProvider { provider: String },
    /// Print the stored settings (key masked)
    Show,
}

/// Credential/model flags shared by the network commands. Flags win over
/// env vars, env vars over the settings store.
#[derive(Debug, Args)]
pub struct ProviderArgs {
    #[arg(long, env = "VIBER_API_KEY")]
    pub api_key: Option<String>,

    #[arg(long, env = "VIBER_MODEL")]
    pub model: Option<String>,

    #[arg(long, env = "VIBER_PROVIDER")]
    pub provider: Option<String>,
}

impl ProviderArgs {
    pub fn resolve(&self, stored: &Settings) -> Result<ProviderConfig> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| stored.api_key.clone());
        if api_key.trim().is_empty() {
            bail!("API key is required (pass --api-key, set VIBER_API_KEY, or run `viber settings set-key`)");
        }

        let provider = match &self.provider {
            Some(name) => match ProviderId::parse_str(name) {
                Some(p) => p,
                None => bail!("unknown provider: {name}"),
            },
            None => stored.provider,
        };

        let model = self
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| stored.model.clone());

        Ok(ProviderConfig::new(provider, api_key, model))
    }
}

#[cfg(test)]
mod tests {
    use viber_core::options::DEFAULT_MODEL;

    use super::*;

    fn args(api_key: Option<&str>, model: Option<&str>, provider: Option<&str>) -> ProviderArgs {
        ProviderArgs {
            api_key: api_key.map(String::from),
            model: model.map(String::from),
            provider: provider.map(String::from),
        }
    }

    #[test]
    fn flags_win_over_stored_settings() {
        let stored = Settings {
            api_key: "sk-stored".into(),
            model: "stored-model".into(),
            provider: ProviderId::Anthropic,
        };
        let config = args(Some("sk-flag"), Some("flag-model"), Some("grok"))
            .resolve(&stored)
            .unwrap();
        assert_eq!(config.api_key, "sk-flag");
        assert_eq!(config.model, "flag-model");
        assert_eq!(config.provider, ProviderId::Grok);
    }

    #[test]
    fn stored_settings_fill_missing_flags() {
        let stored = Settings {
            api_key: "sk-stored".into(),
            ..Settings::default()
        };
        let config = args(None, None, None).resolve(&stored).unwrap();
        assert_eq!(config.api_key, "sk-stored");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.provider, ProviderId::Anthropic);
    }

    #[test]
    fn missing_api_key_everywhere_is_an_error() {
        let err = args(None, None, None)
            .resolve(&Settings::default())
            .unwrap_err();
        assert!(err.to_string().contains("API key is required"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let stored = Settings {
            api_key: "sk".into(),
            ..Settings::default()
        };
        assert!(args(Some("sk"), None, Some("mistral"))
            .resolve(&stored)
            .is_err());
    }
}
