//! Request executor use case.
//!
//! Drives one prompt through the model session, preferring the incremental
//! stream and falling back to a single blocking call. At most one request is
//! in flight at a time; a second attempt fails immediately. Cancellation is
//! cooperative: the host observes the token and surfaces a
//! cancellation-flavored error, which comes back as an aborted outcome
//! carrying whatever partial text existed — never as a hard failure.
//!
//! When the host reports the session destroyed or quota-exceeded, the
//! executor recreates the session and retries the request once, as an
//! explicit bounded loop.

use crate::ports::chat_events::{ChatEventSink, Completion};
use crate::ports::model_provider::{ModelSession, ProviderError, SessionEvent};
use crate::use_cases::session_manager::SessionManager;
use nanochat_domain::{truncate_str, ChatError, PromptRequest, StreamChunk};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How many times an expired session is recreated and the request retried.
const MAX_EXPIRED_RETRIES: u32 = 1;

/// Timing diagnostics for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestMetrics {
    pub total_ms: u64,
    /// Elapsed time until the first streamed chunk, when streaming occurred.
    pub first_chunk_ms: Option<u64>,
}

/// Result of [`RequestExecutor::process_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Full response text, or the accumulated partial text when aborted.
    pub text: String,
    pub action: String,
    pub aborted: bool,
    pub metrics: RequestMetrics,
}

impl ProcessOutcome {
    fn success(text: String, request: &PromptRequest, metrics: RequestMetrics) -> Self {
        Self {
            text,
            action: request.action.clone(),
            aborted: false,
            metrics,
        }
    }

    fn aborted(partial: String, request: &PromptRequest, metrics: RequestMetrics) -> Self {
        Self {
            text: partial,
            action: request.action.clone(),
            aborted: true,
            metrics,
        }
    }
}

/// Why the streaming path stopped short of a normal completion.
enum StreamFailure {
    /// Cancellation-flavored; carries the partial text accumulated so far.
    Aborted(String),
    /// Anything else; triggers the blocking fallback.
    Other(ProviderError),
}

/// Executor for prompt requests against the managed session.
pub struct RequestExecutor {
    sessions: Arc<Mutex<SessionManager>>,
    processing: AtomicBool,
    active_cancel: StdMutex<Option<CancellationToken>>,
}

impl RequestExecutor {
    pub fn new(sessions: Arc<Mutex<SessionManager>>) -> Self {
        Self {
            sessions,
            processing: AtomicBool::new(false),
            active_cancel: StdMutex::new(None),
        }
    }

    pub fn sessions(&self) -> &Arc<Mutex<SessionManager>> {
        &self.sessions
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Cancel the in-flight request, if any.
    ///
    /// Returns `false` when nothing is being processed.
    pub fn stop_processing(&self) -> bool {
        let token = self
            .active_cancel
            .lock()
            .ok()
            .and_then(|mut slot| slot.take());
        match token {
            Some(token) => {
                info!("cancelling in-flight request");
                token.cancel();
                self.processing.store(false, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Drive one prompt through the session.
    ///
    /// Emits a start notification, then streamed chunks in arrival order,
    /// then at most one completion. Errors other than session expiry are
    /// routed through `on_error` before being returned. The busy flag and
    /// cancellation token are cleared on every exit path.
    pub async fn process_text(
        &self,
        request: PromptRequest,
        events: &dyn ChatEventSink,
    ) -> Result<ProcessOutcome, ChatError> {
        // Admission: the busy flag is checked before touching the session
        // lock so a second caller fails fast instead of queueing behind the
        // in-flight request.
        if self
            .processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ChatError::RequestAlreadyActive);
        }

        if !self.sessions.lock().await.has_session() {
            self.processing.store(false, Ordering::SeqCst);
            return Err(ChatError::SessionUnavailable);
        }

        let cancel = CancellationToken::new();
        if let Ok(mut slot) = self.active_cancel.lock() {
            *slot = Some(cancel.clone());
        }

        debug!(
            action = %request.action,
            "processing: {}",
            truncate_str(&request.text, 80)
        );
        let result = self.execute_with_retry(&request, &cancel, events).await;

        // Guaranteed cleanup on every exit path
        self.processing.store(false, Ordering::SeqCst);
        if let Ok(mut slot) = self.active_cancel.lock() {
            slot.take();
        }

        match result {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                events.on_error(&e.to_string(), &request.action, &request.metadata);
                Err(e)
            }
        }
    }

    /// Run the request, recreating the session and retrying once when the
    /// host reports it expired.
    async fn execute_with_retry(
        &self,
        request: &PromptRequest,
        cancel: &CancellationToken,
        events: &dyn ChatEventSink,
    ) -> Result<ProcessOutcome, ChatError> {
        let mut attempts = 0;
        loop {
            match self.attempt(request, cancel, events).await {
                Err(ChatError::SessionExpired(reason)) if attempts < MAX_EXPIRED_RETRIES => {
                    attempts += 1;
                    warn!("session expired ({reason}); recreating and retrying");
                    // Recreated sessions are not seeded with prior turns.
                    self.sessions
                        .lock()
                        .await
                        .create_session(Vec::new())
                        .await
                        .map_err(|e| ChatError::SessionCreationFailed(e.to_string()))?;
                }
                other => return other,
            }
        }
    }

    /// One full pass over the request: start notification, streaming (or
    /// blocking fallback), completion.
    async fn attempt(
        &self,
        request: &PromptRequest,
        cancel: &CancellationToken,
        events: &dyn ChatEventSink,
    ) -> Result<ProcessOutcome, ChatError> {
        let started = Instant::now();
        events.on_streaming(StreamChunk::start_of(request));

        let sessions = self.sessions.lock().await;
        let session = sessions.session().ok_or(ChatError::SessionUnavailable)?;

        let mut first_chunk_ms = None;
        let text_result = if session.supports_streaming() {
            match self
                .run_streaming(session, request, cancel, events, started, &mut first_chunk_ms)
                .await
            {
                Ok(text) => Ok(text),
                Err(StreamFailure::Aborted(partial)) => {
                    debug!("request aborted with {} bytes of partial text", partial.len());
                    let metrics = RequestMetrics {
                        total_ms: started.elapsed().as_millis() as u64,
                        first_chunk_ms,
                    };
                    return Ok(ProcessOutcome::aborted(partial, request, metrics));
                }
                Err(StreamFailure::Other(e)) => {
                    warn!("streaming failed ({e}); falling back to blocking prompt");
                    self.run_blocking(session, request, cancel, events).await
                }
            }
        } else {
            self.run_blocking(session, request, cancel, events).await
        };

        let text = match text_result {
            Ok(text) => text,
            // Cancellation outside the stream carries no partial text
            Err(ChatError::Aborted) => {
                let metrics = RequestMetrics {
                    total_ms: started.elapsed().as_millis() as u64,
                    first_chunk_ms,
                };
                return Ok(ProcessOutcome::aborted(String::new(), request, metrics));
            }
            Err(e) => return Err(e),
        };

        let metrics = RequestMetrics {
            total_ms: started.elapsed().as_millis() as u64,
            first_chunk_ms,
        };
        debug!(
            total_ms = metrics.total_ms,
            first_chunk_ms = metrics.first_chunk_ms,
            "request completed"
        );
        events.on_complete(Completion {
            text: text.clone(),
            action: request.action.clone(),
            metadata: request.metadata.clone(),
            input: request.text.clone(),
        });
        Ok(ProcessOutcome::success(text, request, metrics))
    }

    /// Consume the incremental stream, forwarding each non-empty chunk.
    async fn run_streaming(
        &self,
        session: &dyn ModelSession,
        request: &PromptRequest,
        cancel: &CancellationToken,
        events: &dyn ChatEventSink,
        started: Instant,
        first_chunk_ms: &mut Option<u64>,
    ) -> Result<String, StreamFailure> {
        let mut handle = match session.prompt_streaming(&request.text, cancel).await {
            Ok(handle) => handle,
            Err(e) if e.is_cancelled() => return Err(StreamFailure::Aborted(String::new())),
            Err(e) => return Err(StreamFailure::Other(e)),
        };

        let mut accumulated = String::new();
        while let Some(event) = handle.receiver.recv().await {
            match event {
                SessionEvent::Chunk(chunk) => {
                    if first_chunk_ms.is_none() {
                        let elapsed = started.elapsed().as_millis() as u64;
                        debug!(elapsed_ms = elapsed, "first chunk arrived");
                        *first_chunk_ms = Some(elapsed);
                    }
                    if !chunk.is_empty() {
                        events.on_streaming(StreamChunk::delta_of(request, chunk.clone()));
                    }
                    accumulated.push_str(&chunk);
                }
                SessionEvent::Done => return Ok(accumulated),
                SessionEvent::Failed(e) if e.is_cancelled() => {
                    return Err(StreamFailure::Aborted(accumulated));
                }
                SessionEvent::Failed(e) => return Err(StreamFailure::Other(e)),
            }
        }
        // Channel closed without a terminal event: treat as complete
        Ok(accumulated)
    }

    /// Single blocking prompt call; the full result is forwarded as one chunk.
    async fn run_blocking(
        &self,
        session: &dyn ModelSession,
        request: &PromptRequest,
        cancel: &CancellationToken,
        events: &dyn ChatEventSink,
    ) -> Result<String, ChatError> {
        match session.prompt(&request.text, cancel).await {
            Ok(text) => {
                events.on_streaming(StreamChunk::delta_of(request, text.clone()));
                Ok(text)
            }
            Err(e) => Err(map_provider_error(e)),
        }
    }
}

fn map_provider_error(e: ProviderError) -> ChatError {
    if e.is_cancelled() {
        ChatError::Aborted
    } else if e.is_session_expired() {
        ChatError::SessionExpired(e.to_string())
    } else {
        ChatError::Unknown(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationParams;
    use crate::ports::model_provider::{ModelProvider, StreamHandle};
    use async_trait::async_trait;
    use nanochat_domain::{AvailabilityReport, RequestMetadata, SessionParams};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::mpsc;

    // ==================== Test Mocks ====================

    #[derive(Debug)]
    enum ScriptedCall {
        /// Reply to `prompt_streaming` with these events, then close.
        Stream(Vec<SessionEvent>),
        /// Fail `prompt_streaming` outright.
        StreamFail(ProviderError),
        /// Reply to the blocking `prompt`.
        Blocking(Result<String, ProviderError>),
        /// Block in `prompt` until the token is cancelled.
        HangUntilCancelled,
    }

    struct MockSession {
        streaming: bool,
        script: StdMutex<VecDeque<ScriptedCall>>,
        prompt_calls: Arc<AtomicUsize>,
    }

    impl MockSession {
        fn streaming(script: Vec<ScriptedCall>) -> Self {
            Self {
                streaming: true,
                script: StdMutex::new(VecDeque::from(script)),
                prompt_calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn blocking(script: Vec<ScriptedCall>) -> Self {
            Self {
                streaming: false,
                script: StdMutex::new(VecDeque::from(script)),
                prompt_calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ModelSession for MockSession {
        fn supports_streaming(&self) -> bool {
            self.streaming
        }

        async fn prompt(
            &self,
            _text: &str,
            cancel: &CancellationToken,
        ) -> Result<String, ProviderError> {
            self.prompt_calls.fetch_add(1, Ordering::SeqCst);
            let call = self.script.lock().unwrap().pop_front();
            match call {
                Some(ScriptedCall::Blocking(result)) => result,
                Some(ScriptedCall::HangUntilCancelled) => {
                    cancel.cancelled().await;
                    Err(ProviderError::Cancelled)
                }
                other => panic!("unexpected blocking prompt, script had: {other:?}"),
            }
        }

        async fn prompt_streaming(
            &self,
            _text: &str,
            _cancel: &CancellationToken,
        ) -> Result<StreamHandle, ProviderError> {
            let call = self.script.lock().unwrap().pop_front();
            match call {
                Some(ScriptedCall::Stream(script)) => {
                    let (tx, rx) = mpsc::channel(64);
                    for event in script {
                        tx.try_send(event).expect("test script too long");
                    }
                    Ok(StreamHandle::new(rx))
                }
                Some(ScriptedCall::StreamFail(e)) => Err(e),
                other => panic!("unexpected streaming prompt, script had: {other:?}"),
            }
        }
    }

    struct MockProvider {
        sessions: StdMutex<VecDeque<MockSession>>,
        creates: AtomicUsize,
    }

    impl MockProvider {
        fn with_sessions(sessions: Vec<MockSession>) -> Arc<Self> {
            Arc::new(Self {
                sessions: StdMutex::new(VecDeque::from(sessions)),
                creates: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ModelProvider for MockProvider {
        async fn check_availability(&self) -> AvailabilityReport {
            AvailabilityReport::ready()
        }

        async fn create_session(
            &self,
            _params: &SessionParams,
        ) -> Result<Box<dyn ModelSession>, ProviderError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            let session = self.sessions.lock().unwrap().pop_front();
            session
                .map(|s| Box::new(s) as Box<dyn ModelSession>)
                .ok_or_else(|| ProviderError::RequestFailed("no more sessions".into()))
        }
    }

    #[derive(Debug)]
    enum SinkEvent {
        Stream(StreamChunk),
        Complete(Completion),
        Error(String),
    }

    #[derive(Default)]
    struct RecordingSink {
        events: StdMutex<Vec<SinkEvent>>,
    }

    impl RecordingSink {
        fn streamed_text(&self) -> String {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| match e {
                    SinkEvent::Stream(chunk) if !chunk.start => Some(chunk.text.clone()),
                    _ => None,
                })
                .collect()
        }

        fn completions(&self) -> Vec<Completion> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| match e {
                    SinkEvent::Complete(c) => Some(c.clone()),
                    _ => None,
                })
                .collect()
        }

        fn errors(&self) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| matches!(e, SinkEvent::Error(_)))
                .count()
        }
    }

    impl ChatEventSink for RecordingSink {
        fn on_streaming(&self, chunk: StreamChunk) {
            self.events.lock().unwrap().push(SinkEvent::Stream(chunk));
        }

        fn on_complete(&self, completion: Completion) {
            self.events
                .lock()
                .unwrap()
                .push(SinkEvent::Complete(completion));
        }

        fn on_error(&self, message: &str, _action: &str, _metadata: &RequestMetadata) {
            self.events
                .lock()
                .unwrap()
                .push(SinkEvent::Error(message.to_string()));
        }

        fn on_status(&self, _message: &str) {}
    }

    async fn executor_with(sessions: Vec<MockSession>) -> (Arc<RequestExecutor>, Arc<MockProvider>) {
        let provider = MockProvider::with_sessions(sessions);
        let mut manager = SessionManager::new(provider.clone(), GenerationParams::default());
        manager.initialize().await;
        assert!(manager.has_session());
        let executor = Arc::new(RequestExecutor::new(Arc::new(Mutex::new(manager))));
        (executor, provider)
    }

    fn chunk(text: &str) -> SessionEvent {
        SessionEvent::Chunk(text.to_string())
    }

    fn request() -> PromptRequest {
        PromptRequest::new("tell me about rust", "ask")
            .with_metadata(RequestMetadata::for_conversation("conv-1"))
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn streamed_request_emits_start_chunks_completion_in_order() {
        let session = MockSession::streaming(vec![ScriptedCall::Stream(vec![
            chunk("Rust "),
            chunk("is "),
            chunk("fast."),
            SessionEvent::Done,
        ])]);
        let (executor, _) = executor_with(vec![session]).await;
        let sink = RecordingSink::default();

        let outcome = executor.process_text(request(), &sink).await.unwrap();

        assert!(!outcome.aborted);
        assert_eq!(outcome.text, "Rust is fast.");
        assert!(outcome.metrics.first_chunk_ms.is_some());

        let events = sink.events.lock().unwrap();
        // Exactly one start, first; completion last; chunks in between
        assert!(matches!(&events[0], SinkEvent::Stream(c) if c.start && c.is_empty()));
        assert!(matches!(events.last().unwrap(), SinkEvent::Complete(_)));
        let starts = events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Stream(c) if c.start))
            .count();
        assert_eq!(starts, 1);
        drop(events);

        // Concatenated chunk text equals the completion text
        assert_eq!(sink.streamed_text(), "Rust is fast.");
        let completions = sink.completions();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].text, "Rust is fast.");
        assert_eq!(completions[0].input, "tell me about rust");
    }

    #[tokio::test]
    async fn second_request_while_processing_is_rejected() {
        let session = MockSession::blocking(vec![ScriptedCall::HangUntilCancelled]);
        let (executor, _) = executor_with(vec![session]).await;
        let sink = Arc::new(RecordingSink::default());

        let background = {
            let executor = executor.clone();
            let sink = sink.clone();
            tokio::spawn(async move { executor.process_text(request(), &*sink).await })
        };
        // Let the first request reach the hanging prompt
        while !executor.is_processing() {
            tokio::task::yield_now().await;
        }

        let second = executor.process_text(request(), &*sink).await;
        assert!(matches!(second, Err(ChatError::RequestAlreadyActive)));

        // Cancel the first; it resolves as aborted with empty text
        assert!(executor.stop_processing());
        let first = background.await.unwrap().unwrap();
        assert!(first.aborted);
        assert_eq!(first.text, "");
        assert!(sink.completions().is_empty());

        // Nothing in flight anymore
        assert!(!executor.stop_processing());
    }

    #[tokio::test]
    async fn cancellation_mid_stream_yields_partial_text_and_no_completion() {
        let session = MockSession::streaming(vec![ScriptedCall::Stream(vec![
            chunk("Once "),
            chunk("upon "),
            SessionEvent::Failed(ProviderError::Cancelled),
        ])]);
        let (executor, _) = executor_with(vec![session]).await;
        let sink = RecordingSink::default();

        let outcome = executor.process_text(request(), &sink).await.unwrap();

        assert!(outcome.aborted);
        assert_eq!(outcome.text, "Once upon ");
        assert!(sink.completions().is_empty());
        assert_eq!(sink.errors(), 0);
        assert_eq!(sink.streamed_text(), "Once upon ");
    }

    #[tokio::test]
    async fn stream_error_falls_back_to_blocking_call() {
        // Stream yields "Hello" then dies; fallback returns the full answer.
        // The completion must carry the blocking result only.
        let session = MockSession::streaming(vec![
            ScriptedCall::Stream(vec![
                chunk("Hello"),
                SessionEvent::Failed(ProviderError::Transport("connection reset".into())),
            ]),
            ScriptedCall::Blocking(Ok("Hello there, how can I help?".to_string())),
        ]);
        let (executor, _) = executor_with(vec![session]).await;
        let sink = RecordingSink::default();

        let outcome = executor.process_text(request(), &sink).await.unwrap();

        assert!(!outcome.aborted);
        assert_eq!(outcome.text, "Hello there, how can I help?");
        let completions = sink.completions();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].text, "Hello there, how can I help?");
        assert!(!completions[0].text.starts_with("HelloHello"));
    }

    #[tokio::test]
    async fn non_streaming_session_uses_blocking_call_directly() {
        let session = MockSession::blocking(vec![ScriptedCall::Blocking(Ok(
            "blocking answer".to_string()
        ))]);
        let (executor, _) = executor_with(vec![session]).await;
        let sink = RecordingSink::default();

        let outcome = executor.process_text(request(), &sink).await.unwrap();

        assert_eq!(outcome.text, "blocking answer");
        assert!(outcome.metrics.first_chunk_ms.is_none());
        // Full result forwarded as one chunk
        assert_eq!(sink.streamed_text(), "blocking answer");
    }

    #[tokio::test]
    async fn expired_session_is_recreated_and_retried_exactly_once() {
        let failing = MockSession::blocking(vec![ScriptedCall::Blocking(Err(
            ProviderError::SessionDestroyed("session handle is gone".into()),
        ))]);
        let replacement =
            MockSession::blocking(vec![ScriptedCall::Blocking(Ok("recovered".to_string()))]);
        let (executor, provider) = executor_with(vec![failing, replacement]).await;
        let sink = RecordingSink::default();

        let outcome = executor.process_text(request(), &sink).await.unwrap();

        assert_eq!(outcome.text, "recovered");
        // Initial session + one recreation
        assert_eq!(provider.creates.load(Ordering::SeqCst), 2);
        assert_eq!(sink.errors(), 0);
        assert_eq!(sink.completions().len(), 1);
    }

    #[tokio::test]
    async fn second_expiry_propagates_instead_of_retrying_again() {
        let failing = |msg: &str| {
            MockSession::blocking(vec![ScriptedCall::Blocking(Err(
                ProviderError::SessionDestroyed(msg.into()),
            ))])
        };
        let (executor, provider) =
            executor_with(vec![failing("first"), failing("second"), failing("third")]).await;
        let sink = RecordingSink::default();

        let result = executor.process_text(request(), &sink).await;

        assert!(matches!(result, Err(ChatError::SessionExpired(_))));
        // Initial session + exactly one recreation, not two
        assert_eq!(provider.creates.load(Ordering::SeqCst), 2);
        assert_eq!(sink.errors(), 1);
    }

    #[tokio::test]
    async fn quota_exceeded_also_triggers_recreation() {
        let failing = MockSession::streaming(vec![ScriptedCall::StreamFail(
            ProviderError::QuotaExceeded("token budget exhausted".into()),
        ), ScriptedCall::Blocking(Err(ProviderError::QuotaExceeded(
            "token budget exhausted".into(),
        )))]);
        let replacement = MockSession::streaming(vec![ScriptedCall::Stream(vec![
            chunk("fresh session"),
            SessionEvent::Done,
        ])]);
        let (executor, provider) = executor_with(vec![failing, replacement]).await;
        let sink = RecordingSink::default();

        let outcome = executor.process_text(request(), &sink).await.unwrap();

        assert_eq!(outcome.text, "fresh session");
        assert_eq!(provider.creates.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unexpected_error_routes_through_error_sink_then_propagates() {
        let session = MockSession::blocking(vec![ScriptedCall::Blocking(Err(
            ProviderError::RequestFailed("model crashed".into()),
        ))]);
        let (executor, _) = executor_with(vec![session]).await;
        let sink = RecordingSink::default();

        let result = executor.process_text(request(), &sink).await;

        assert!(matches!(result, Err(ChatError::Unknown(_))));
        assert_eq!(sink.errors(), 1);
        assert!(sink.completions().is_empty());
        // Busy flag released even on failure
        assert!(!executor.is_processing());
    }

    #[tokio::test]
    async fn no_session_fails_without_notifications() {
        let provider = MockProvider::with_sessions(vec![]);
        let manager = SessionManager::new(provider, GenerationParams::default());
        let executor = RequestExecutor::new(Arc::new(Mutex::new(manager)));
        let sink = RecordingSink::default();

        let result = executor.process_text(request(), &sink).await;

        assert!(matches!(result, Err(ChatError::SessionUnavailable)));
        assert!(sink.events.lock().unwrap().is_empty());
        assert!(!executor.is_processing());
    }

    #[tokio::test]
    async fn executor_accepts_new_request_after_completion() {
        let session = MockSession::blocking(vec![
            ScriptedCall::Blocking(Ok("first".to_string())),
            ScriptedCall::Blocking(Ok("second".to_string())),
        ]);
        let (executor, _) = executor_with(vec![session]).await;
        let sink = RecordingSink::default();

        let first = executor.process_text(request(), &sink).await.unwrap();
        let second = executor.process_text(request(), &sink).await.unwrap();

        assert_eq!(first.text, "first");
        assert_eq!(second.text, "second");
        assert_eq!(sink.completions().len(), 2);
    }

    #[tokio::test]
    async fn empty_stream_chunks_are_not_forwarded() {
        let session = MockSession::streaming(vec![ScriptedCall::Stream(vec![
            chunk(""),
            chunk("text"),
            SessionEvent::Done,
        ])]);
        let (executor, _) = executor_with(vec![session]).await;
        let sink = RecordingSink::default();

        executor.process_text(request(), &sink).await.unwrap();

        let events = sink.events.lock().unwrap();
        let empty_deltas = events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Stream(c) if !c.start && c.is_empty()))
            .count();
        assert_eq!(empty_deltas, 0);
    }
}
