//! Scripted in-process providers
//!
//! `FakeChatClient` and `FakeEmbeddingClient` stand in for a real provider when no
//! credentials are configured (`fake-llm`) and in tests. Replies are scripted,
//! failures can be injected and every request is recorded for inspection.

use crate::streaming::StreamEvent;
use crate::traits::{ChatClient, ChatRequest, ChatResponse, EmbeddingClient, TokenStream};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

const DEFAULT_STREAM_REPLY: &str = "This is a fake response.";
const DEFAULT_INVOKE_REPLY: &str = "- The conversation so far has been summarized.";

/// Chat client with scripted replies
///
/// `chat` (single-shot) and `chat_stream` pop from separate queues and fall back
/// to a fixed reply once their queue is empty.
pub struct FakeChatClient {
    invoke_replies: Mutex<VecDeque<String>>,
    stream_replies: Mutex<VecDeque<String>>,
    invoke_requests: Mutex<Vec<ChatRequest>>,
    stream_requests: Mutex<Vec<ChatRequest>>,
    fail_invoke: AtomicBool,
    fail_stream_start: AtomicBool,
    fail_stream_after: Option<usize>,
    token_delay: Option<Duration>,
}

impl FakeChatClient {
    pub fn new() -> Self {
        Self {
            invoke_replies: Mutex::new(VecDeque::new()),
            stream_replies: Mutex::new(VecDeque::new()),
            invoke_requests: Mutex::new(Vec::new()),
            stream_requests: Mutex::new(Vec::new()),
            fail_invoke: AtomicBool::new(false),
            fail_stream_start: AtomicBool::new(false),
            fail_stream_after: None,
            token_delay: None,
        }
    }

    /// Queue a reply for the next streaming call
    pub fn with_stream_reply(mut self, reply: impl Into<String>) -> Self {
        self.stream_replies.get_mut().push_back(reply.into());
        self
    }

    /// Queue a reply for the next single-shot call
    pub fn with_invoke_reply(mut self, reply: impl Into<String>) -> Self {
        self.invoke_replies.get_mut().push_back(reply.into());
        self
    }

    /// Every streamed reply errors after `tokens` tokens have been yielded
    pub fn fail_stream_after(mut self, tokens: usize) -> Self {
        self.fail_stream_after = Some(tokens);
        self
    }

    /// Sleep between streamed tokens
    pub fn with_token_delay(mut self, delay: Duration) -> Self {
        self.token_delay = Some(delay);
        self
    }

    pub fn set_fail_invoke(&self, fail: bool) {
        self.fail_invoke.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_stream_start(&self, fail: bool) {
        self.fail_stream_start.store(fail, Ordering::SeqCst);
    }

    /// Requests received by `chat`, oldest first
    pub async fn invoke_requests(&self) -> Vec<ChatRequest> {
        self.invoke_requests.lock().await.clone()
    }

    /// Requests received by `chat_stream`, oldest first
    pub async fn stream_requests(&self) -> Vec<ChatRequest> {
        self.stream_requests.lock().await.clone()
    }

    /// Split a reply into word tokens, keeping whitespace attached
    pub fn tokenize(reply: &str) -> Vec<String> {
        reply.split_inclusive(' ').map(str::to_string).collect()
    }
}

impl Default for FakeChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for FakeChatClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.invoke_requests.lock().await.push(request);

        if self.fail_invoke.load(Ordering::SeqCst) {
            anyhow::bail!("Fake provider refused the request");
        }

        let reply = self
            .invoke_replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| DEFAULT_INVOKE_REPLY.to_string());

        Ok(ChatResponse {
            content: Some(reply.clone()),
            usage: None,
            finish_reason: Some("stop".to_string()),
            raw: serde_json::json!({ "content": reply }),
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<TokenStream> {
        self.stream_requests.lock().await.push(request);

        if self.fail_stream_start.load(Ordering::SeqCst) {
            anyhow::bail!("Fake provider refused the stream");
        }

        let reply = self
            .stream_replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| DEFAULT_STREAM_REPLY.to_string());

        let tokens = Self::tokenize(&reply);
        let fail_after = self.fail_stream_after;
        let delay = self.token_delay;

        Ok(Box::pin(async_stream::stream! {
            for (i, token) in tokens.into_iter().enumerate() {
                if fail_after == Some(i) {
                    yield Err(anyhow::anyhow!("Fake stream interrupted after {} tokens", i));
                    return;
                }
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(StreamEvent::Message { content: token });
            }
            yield Ok(StreamEvent::Done { finish_reason: Some("stop".to_string()) });
        }))
    }
}

/// Deterministic bag-of-words embeddings
///
/// Each lowercase word is hashed into one of `dimensions` buckets and the
/// vector is L2-normalized, so texts sharing words score higher under cosine.
pub struct FakeEmbeddingClient {
    dimensions: usize,
    available: AtomicBool,
}

impl FakeEmbeddingClient {
    pub fn new() -> Self {
        Self::with_dimensions(64)
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an unreachable embedding endpoint
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = (fnv1a(&word.to_lowercase()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }

    fn check_available(&self) -> Result<()> {
        if !self.available.load(Ordering::SeqCst) {
            anyhow::bail!("Fake embedding endpoint unreachable");
        }
        Ok(())
    }
}

impl Default for FakeEmbeddingClient {
    fn default() -> Self {
        Self::new()
    }
}

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf29ce484222325u64, |hash, b| {
        (hash ^ b as u64).wrapping_mul(0x100000001b3)
    })
}

#[async_trait]
impl EmbeddingClient for FakeEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.check_available()?;
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.check_available()?;
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }
}
