use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use viber_core::{GeneratedFile, GenerationState, GenerationStatus, OutputMode, ProjectSpecs};
use viber_prompts::{assemble_generation_prompt, max_tokens_for, SYSTEM_PROMPT};
use viber_provider::{client_for, CompletionClient, CompletionRequest, ProviderConfig};

use crate::splitter::parse_files;

/// Builds a provider client for a config. Injected so tests can substitute
/// a scripted client.
pub type ClientFactory = Arc<dyn Fn(&ProviderConfig) -> Arc<dyn CompletionClient> + Send + Sync>;

/// Owns the lifecycle of one "generate documentation" request: issues the
/// request, consumes the chunk stream, cancels on demand, and exposes a
/// state snapshot to the presentation layer.
///
/// At most one generation is active per session; starting a new one always
/// supersedes the previous. Clones share the same session.
#[derive(Clone)]
pub struct GenerationSession {
    inner: Arc<Inner>,
}

struct Inner {
    factory: ClientFactory,
    state: Mutex<GenerationState>,
    cancel: Mutex<Option<CancellationToken>>,
    /// Bumped on every generate/abort/reset. State publishes carry the epoch
    /// they were started under and no-op once superseded, so a stale
    /// session's late chunks can never mutate state.
    epoch: AtomicU64,
}

impl GenerationSession {
    pub fn new(factory: ClientFactory) -> Self {
        Self {
            inner: Arc::new(Inner {
                factory,
                state: Mutex::new(GenerationState::initial()),
                cancel: Mutex::new(None),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// A session wired to the real provider clients.
    pub fn with_default_clients() -> Self {
        Self::new(Arc::new(|config: &ProviderConfig| client_for(config)))
    }

    /// Read the current state.
    pub fn snapshot(&self) -> GenerationState {
        self.inner.state.lock().expect("state lock").clone()
    }

    /// Run one generation to a terminal state (or until cancelled).
    ///
    /// Supersedes any in-flight generation first. The returned future drives
    /// the whole consumption loop; callers that need `abort()` concurrently
    /// spawn it.
    pub async fn generate(
        &self,
        specs: &ProjectSpecs,
        mode: OutputMode,
        config: &ProviderConfig,
    ) {
        let (epoch, cancel) = self.begin();

        // Business rules are validated upstream; these two guard the wire
        // contract itself and fail before any network call.
        if config.api_key.trim().is_empty() {
            self.fail(epoch, "API key is required");
            return;
        }
        if specs.project_name.trim().is_empty() {
            self.fail(epoch, "Project name is required");
            return;
        }

        let client = (self.inner.factory)(config);
        let request = CompletionRequest {
            system: Some(SYSTEM_PROMPT.to_string()),
            prompt: assemble_generation_prompt(specs, mode),
            max_tokens: max_tokens_for(mode),
        };

        debug!(provider = client.name(), mode = %mode, "opening generation stream");
        let mut stream = match client.stream(request, cancel.clone()).await {
            Ok(stream) => stream,
            Err(err) => {
                self.fail(epoch, &err.to_string());
                return;
            }
        };

        let mut buffer = String::new();
        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => {
                    // abort() or a superseding generate() already settled
                    // the state under a newer epoch.
                    debug!("generation cancelled");
                    return;
                }
                next = stream.next() => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    buffer.push_str(&chunk);
                    let (files, current_file_index, streaming_content) = project(&buffer);
                    self.publish(epoch, |state| {
                        state.files = files;
                        state.current_file_index = current_file_index;
                        state.streaming_content = streaming_content;
                    });
                }
                Some(Err(err)) => {
                    self.fail(epoch, &err.to_string());
                    return;
                }
                None => break,
            }
        }

        let files = displayable(parse_files(&buffer));
        self.publish(epoch, |state| {
            *state = GenerationState {
                status: GenerationStatus::Complete,
                current_file_index: if files.is_empty() { None } else { Some(0) },
                files,
                streaming_content: String::new(),
                error: None,
            };
        });
    }

    /// Cancel the in-flight generation (idempotent when idle) and force the
    /// status back to idle. Already-published files survive until the next
    /// `generate` or `reset`.
    pub fn abort(&self) {
        self.supersede();
        let mut state = self.inner.state.lock().expect("state lock");
        state.status = GenerationStatus::Idle;
        state.streaming_content.clear();
    }

    /// Abort and restore the full initial state.
    pub fn reset(&self) {
        self.supersede();
        *self.inner.state.lock().expect("state lock") = GenerationState::initial();
    }

    /// Start a new session epoch: cancel the previous token, install a fresh
    /// one, and reset the state to `generating`.
    fn begin(&self) -> (u64, CancellationToken) {
        let mut slot = self.inner.cancel.lock().expect("cancel lock");
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let mut state = self.inner.state.lock().expect("state lock");
        *state = GenerationState::initial();
        state.status = GenerationStatus::Generating;
        (epoch, token)
    }

    /// Cancel the in-flight token and bump the epoch so the loop it belongs
    /// to can no longer publish (even a clean stream end after cancellation
    /// must not land as `complete`).
    fn supersede(&self) {
        let mut slot = self.inner.cancel.lock().expect("cancel lock");
        if let Some(token) = slot.take() {
            token.cancel();
        }
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Apply a state mutation if `epoch` is still the current session.
    fn publish<F: FnOnce(&mut GenerationState)>(&self, epoch: u64, apply: F) {
        let mut state = self.inner.state.lock().expect("state lock");
        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            return;
        }
        apply(&mut state);
    }

    fn fail(&self, epoch: u64, message: &str) {
        let message = message.to_string();
        self.publish(epoch, |state| {
            *state = GenerationState {
                status: GenerationStatus::Error,
                error: Some(message),
                ..GenerationState::initial()
            };
        });
    }
}

/// Derive the per-chunk state update from the accumulated buffer: the
/// displayable files, the index of the growing file, and the live content
/// shown before its boundary is final.
fn project(buffer: &str) -> (Vec<GeneratedFile>, Option<usize>, String) {
    let parsed = parse_files(buffer);
    let streaming_content = match parsed.last() {
        Some(last) if !last.content.is_empty() => last.content.clone(),
        _ => buffer.to_string(),
    };
    let files = displayable(parsed);
    let current_file_index = files.len().checked_sub(1);
    (files, current_file_index, streaming_content)
}

/// A separator can arrive before its body; such files are parse artifacts,
/// not displayable output.
fn displayable(files: Vec<GeneratedFile>) -> Vec<GeneratedFile> {
    files.into_iter().filter(|f| !f.content.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use viber_provider::{MockClient, ProviderError, ProviderId};

    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig::new(ProviderId::Anthropic, "sk-test", "claude-sonnet-4-5-20250929")
    }

    fn specs() -> ProjectSpecs {
        ProjectSpecs {
            project_name: "demo".into(),
            ..Default::default()
        }
    }

    fn session_with(client: MockClient) -> GenerationSession {
        let client: Arc<dyn CompletionClient> = Arc::new(client);
        GenerationSession::new(Arc::new(move |_config: &ProviderConfig| client.clone()))
    }

    /// Factory that hands out queued clients, one per generate call.
    fn session_with_queue(clients: Vec<MockClient>) -> GenerationSession {
        let queue = Mutex::new(
            clients
                .into_iter()
                .map(|c| Arc::new(c) as Arc<dyn CompletionClient>)
                .collect::<VecDeque<_>>(),
        );
        GenerationSession::new(Arc::new(move |_config: &ProviderConfig| {
            queue.lock().unwrap().pop_front().expect("client queued")
        }))
    }

    #[tokio::test]
    async fn generate_splits_multi_file_stream() {
        let session = session_with(MockClient::success(&[
            "---FILE: a.",
            "md---\nfoo\n",
            "---FILE: b.md---\nbar\n",
            "---END---",
        ]));
        session
            .generate(&specs(), OutputMode::ClaudeMd, &config())
            .await;

        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Complete);
        assert_eq!(state.files.len(), 2);
        assert_eq!(state.files[0], GeneratedFile::new("a.md", "foo"));
        assert_eq!(state.files[1], GeneratedFile::new("b.md", "bar"));
        assert_eq!(state.current_file_index, Some(0));
        assert!(state.streaming_content.is_empty());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn generate_without_separator_uses_default_filename() {
        let session = session_with(MockClient::success(&["plain ", "answer"]));
        session
            .generate(&specs(), OutputMode::ClaudeMd, &config())
            .await;

        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Complete);
        assert_eq!(state.files.len(), 1);
        assert_eq!(state.files[0].filename, "output.md");
        assert_eq!(state.files[0].content, "plain answer");
    }

    #[tokio::test]
    async fn empty_stream_completes_with_no_files() {
        let session = session_with(MockClient::success(&[]));
        session
            .generate(&specs(), OutputMode::ClaudeMd, &config())
            .await;

        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Complete);
        assert!(state.files.is_empty());
        assert_eq!(state.current_file_index, None);
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_opening_stream() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = calls.clone();
        let session = GenerationSession::new(Arc::new(move |_config: &ProviderConfig| {
            counting.fetch_add(1, Ordering::SeqCst);
            Arc::new(MockClient::success(&[])) as Arc<dyn CompletionClient>
        }));

        let mut config = config();
        config.api_key = String::new();
        session
            .generate(&specs(), OutputMode::ClaudeMd, &config)
            .await;

        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Error);
        assert_eq!(state.error.as_deref(), Some("API key is required"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_project_name_is_rejected() {
        let session = session_with(MockClient::success(&[]));
        session
            .generate(&ProjectSpecs::default(), OutputMode::ClaudeMd, &config())
            .await;

        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Error);
        assert_eq!(state.error.as_deref(), Some("Project name is required"));
    }

    #[tokio::test]
    async fn open_failure_surfaces_provider_message() {
        let session = session_with(MockClient::failure(ProviderError::InvalidCredentials));
        session
            .generate(&specs(), OutputMode::ClaudeMd, &config())
            .await;

        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Error);
        assert_eq!(state.error.as_deref(), Some("Invalid API key"));
        assert!(state.files.is_empty());
    }

    #[tokio::test]
    async fn mid_stream_failure_discards_partial_files() {
        let session = session_with(MockClient::mid_stream_failure(
            &["---FILE: a.md---\nsome partial"],
            ProviderError::Transport("connection reset".into()),
        ));
        session
            .generate(&specs(), OutputMode::ClaudeMd, &config())
            .await;

        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Error);
        assert!(state.error.as_deref().unwrap().contains("connection reset"));
        assert!(state.files.is_empty());
    }

    #[tokio::test]
    async fn abort_before_first_chunk_returns_to_idle() {
        let session = session_with(MockClient::success(&[]).stalling());

        let runner = session.clone();
        let run_specs = specs();
        let run_config = config();
        let handle = tokio::spawn(async move {
            runner
                .generate(&run_specs, OutputMode::ClaudeMd, &run_config)
                .await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(session.snapshot().status, GenerationStatus::Generating);

        session.abort();
        handle.await.unwrap();

        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Idle);
        assert!(state.files.is_empty());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn abort_is_idempotent_when_idle() {
        let session = session_with(MockClient::success(&[]));
        session.abort();
        session.abort();
        assert_eq!(session.snapshot().status, GenerationStatus::Idle);
    }

    #[tokio::test]
    async fn second_generate_supersedes_first() {
        let first = MockClient::success(&["---FILE: first.md---\nfrom the first call\n"])
            .with_chunk_delay(Duration::from_millis(40))
            .ignoring_cancel()
            .stalling();
        let second = MockClient::success(&["---FILE: second.md---\nsecond\n---END---"]);
        let session = session_with_queue(vec![first, second]);

        let runner = session.clone();
        let run_specs = specs();
        let run_config = config();
        let first_handle = tokio::spawn(async move {
            runner
                .generate(&run_specs, OutputMode::ClaudeMd, &run_config)
                .await;
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        session
            .generate(&specs(), OutputMode::ClaudeMd, &config())
            .await;

        // Let the first session's delayed chunk arrive after supersession.
        tokio::time::sleep(Duration::from_millis(60)).await;
        first_handle.await.unwrap();

        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Complete);
        assert_eq!(state.files.len(), 1);
        assert_eq!(state.files[0].filename, "second.md");
        assert_eq!(state.files[0].content, "second");
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn reset_restores_initial_state() {
        let session = session_with(MockClient::failure(ProviderError::InvalidCredentials));
        session
            .generate(&specs(), OutputMode::ClaudeMd, &config())
            .await;
        assert_eq!(session.snapshot().status, GenerationStatus::Error);

        session.reset();
        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Idle);
        assert!(state.files.is_empty());
        assert!(state.error.is_none());
        assert_eq!(state.current_file_index, None);
    }

    #[tokio::test]
    async fn error_state_recovers_on_next_generate() {
        let session = session_with_queue(vec![
            MockClient::failure(ProviderError::RateLimited("429".into())),
            MockClient::success(&["---FILE: a.md---\nok\n---END---"]),
        ]);

        session
            .generate(&specs(), OutputMode::ClaudeMd, &config())
            .await;
        assert_eq!(session.snapshot().status, GenerationStatus::Error);

        session
            .generate(&specs(), OutputMode::ClaudeMd, &config())
            .await;
        let state = session.snapshot();
        assert_eq!(state.status, GenerationStatus::Complete);
        assert_eq!(state.files[0].content, "ok");
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn streaming_state_is_published_per_chunk() {
        let session = session_with(
            MockClient::success(&[
                "---FILE: a.md---\nalpha",
                " body\n---FILE: b.md---\nbeta",
            ])
            .with_chunk_delay(Duration::from_millis(30))
            .stalling(),
        );

        let runner = session.clone();
        let run_specs = specs();
        let run_config = config();
        let handle = tokio::spawn(async move {
            runner
                .generate(&run_specs, OutputMode::ClaudeMd, &run_config)
                .await;
        });

        tokio::time::sleep(Duration::from_millis(45)).await;
        let mid = session.snapshot();
        assert_eq!(mid.status, GenerationStatus::Generating);
        assert_eq!(mid.files.len(), 1);
        assert_eq!(mid.files[0].filename, "a.md");
        assert_eq!(mid.streaming_content, "alpha");

        tokio::time::sleep(Duration::from_millis(40)).await;
        let later = session.snapshot();
        assert_eq!(later.files.len(), 2);
        assert_eq!(later.current_file_index, Some(1));
        assert_eq!(later.streaming_content, "beta");

        session.abort();
        handle.await.unwrap();
    }
}
