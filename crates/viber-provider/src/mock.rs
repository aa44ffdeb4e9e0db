use std::time::Duration;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::{ChunkStream, CompletionClient, CompletionRequest, ProviderError};

/// A scripted provider for tests: plays back configured chunks, fails on
/// open or mid-stream, and can stall to exercise cancellation.
pub struct MockClient {
    open_error: Option<ProviderError>,
    steps: Vec<Result<String, ProviderError>>,
    chunk_delay: Option<Duration>,
    /// After the scripted steps, keep the stream open until cancelled
    /// instead of ending it.
    stall_after: bool,
    /// Keep sending even after cancellation, to simulate late-arriving
    /// chunks from a superseded stream.
    ignore_cancel: bool,
}

impl MockClient {
    /// A stream that yields the given chunks and ends cleanly.
    pub fn success(chunks: &[&str]) -> Self {
        Self {
            open_error: None,
            steps: chunks.iter().map(|c| Ok(c.to_string())).collect(),
            chunk_delay: None,
            stall_after: false,
            ignore_cancel: false,
        }
    }

    /// A client whose open call fails outright, before any chunk.
    pub fn failure(error: ProviderError) -> Self {
        Self {
            open_error: Some(error),
            steps: Vec::new(),
            chunk_delay: None,
            stall_after: false,
            ignore_cancel: false,
        }
    }

    /// A stream that yields the given chunks, then surfaces an error.
    pub fn mid_stream_failure(chunks: &[&str], error: ProviderError) -> Self {
        let mut mock = Self::success(chunks);
        mock.steps.push(Err(error));
        mock
    }

    /// Pause between chunks.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    /// Keep the stream open after the scripted chunks until cancelled.
    pub fn stalling(mut self) -> Self {
        self.stall_after = true;
        self
    }

    /// Keep delivering chunks even after the token is cancelled.
    pub fn ignoring_cancel(mut self) -> Self {
        self.ignore_cancel = true;
        self
    }
}

#[async_trait::async_trait]
impl CompletionClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn stream(
        &self,
        _request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<ChunkStream, ProviderError> {
        if let Some(err) = &self.open_error {
            return Err(err.clone());
        }

        let steps = self.steps.clone();
        let delay = self.chunk_delay;
        let stall_after = self.stall_after;
        let ignore_cancel = self.ignore_cancel;

        let (tx, rx) = mpsc::channel::<Result<String, ProviderError>>(16);
        tokio::spawn(async move {
            for step in steps {
                if let Some(delay) = delay {
                    if ignore_cancel {
                        tokio::time::sleep(delay).await;
                    } else {
                        tokio::select! {
                            _ = cancel.cancelled() => return,
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                } else if !ignore_cancel && cancel.is_cancelled() {
                    return;
                }
                let stop = step.is_err();
                if tx.send(step).await.is_err() {
                    return;
                }
                if stop {
                    return;
                }
            }
            if stall_after {
                cancel.cancelled().await;
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
        if let Some(err) = &self.open_error {
            return Err(err.clone());
        }
        let mut text = String::new();
        for step in &self.steps {
            match step {
                Ok(chunk) => text.push_str(chunk),
                Err(err) => return Err(err.clone()),
            }
        }
        Ok(text)
    }
}
