use thiserror::Error;
use viber_core::ProjectSpecs;
use viber_prompts::{extract::build_extract_specs_prompt, EXTRACT_MAX_TOKENS};
use viber_provider::{CompletionClient, CompletionRequest, ProviderError};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Project description is required")]
    EmptyInput,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Failed to extract specs from response")]
    NoJsonFound,

    #[error("invalid specs JSON: {0}")]
    InvalidJson(String),
}

/// Turn a free-text project description into structured [`ProjectSpecs`]
/// via one non-streaming completion.
///
/// The model is asked for bare JSON but routinely wraps it in markdown
/// fences or prose, so the parse takes the widest `{…}` window of the
/// response. Feature lists arriving as comma-separated strings are
/// normalized by the `ProjectSpecs` deserializer.
pub async fn extract_specs(
    client: &dyn CompletionClient,
    free_text: &str,
) -> Result<ProjectSpecs, ExtractError> {
    if free_text.trim().is_empty() {
        return Err(ExtractError::EmptyInput);
    }

    let request = CompletionRequest {
        system: None,
        prompt: build_extract_specs_prompt(free_text),
        max_tokens: EXTRACT_MAX_TOKENS,
    };
    let text = client.complete(request).await?;

    let start = text.find('{').ok_or(ExtractError::NoJsonFound)?;
    let end = text.rfind('}').ok_or(ExtractError::NoJsonFound)?;
    if end < start {
        return Err(ExtractError::NoJsonFound);
    }

    serde_json::from_str(&text[start..=end]).map_err(|e| ExtractError::InvalidJson(e.to_string()))
}
