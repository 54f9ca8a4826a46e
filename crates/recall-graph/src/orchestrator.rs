use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use futures::{Stream, StreamExt};
use recall_context::{format_history, HistoryWindow, MemoryController, MemoryTransition};
use recall_llm::Message as LLMMessage;
use recall_persist::{ConversationThread, MessageAccumulator, ThreadStore};
use recall_prompt::{PromptAssembler, CONVERSATIONAL, GROUNDED_CHAT};
use recall_rag::{RagError, Retriever};
use recall_types::{
    AssistantConfig, InputMessage, MessageRole, PromptContext, StreamEvent, TurnOptions,
    TurnRequest,
};

use crate::builder::OrchestratorBuilder;
use crate::error::{Result, TurnError};
use crate::generation::Generator;
use crate::turns::TurnGate;

/// Finite, non-restartable sequence of turn events
///
/// Dropping it cancels the turn: the model request is dropped, nothing is
/// recorded for the assistant and the thread's turn slot is released.
pub type TurnStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Everything resolved about a turn before it starts running
struct Turn {
    run_id: String,
    thread_id: String,
    question: String,
    seed: Vec<InputMessage>,
    model: String,
    template: String,
    grounding: bool,
    top_k: usize,
}

pub(crate) struct Inner {
    pub(crate) store: Arc<dyn ThreadStore>,
    pub(crate) memory: MemoryController,
    pub(crate) retriever: Option<Arc<Retriever>>,
    pub(crate) assembler: PromptAssembler,
    pub(crate) window: HistoryWindow,
    pub(crate) generator: Generator,
    pub(crate) config: AssistantConfig,
    pub(crate) gate: TurnGate,
}

/// Runs conversational turns against a thread
///
/// Cheap to clone; all clones share the same store, retriever and turn gate.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl Orchestrator {
    pub(crate) fn from_parts(inner: Inner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.inner.config
    }

    pub fn store(&self) -> Arc<dyn ThreadStore> {
        Arc::clone(&self.inner.store)
    }

    pub fn retriever(&self) -> Option<Arc<Retriever>> {
        self.inner.retriever.clone()
    }

    pub fn assembler(&self) -> &PromptAssembler {
        &self.inner.assembler
    }

    pub async fn thread(&self, thread_id: &str) -> Result<ConversationThread> {
        Ok(self.inner.store.get(thread_id).await?)
    }

    /// Delete a thread once any running turn on it has finished
    pub async fn reset_thread(&self, thread_id: &str) -> Result<bool> {
        let _slot = self.inner.gate.acquire(thread_id).await;
        Ok(self.inner.store.delete(thread_id).await?)
    }

    /// Start a turn for `user_text` on `thread_id`
    ///
    /// Parameter and template errors are returned here, before anything is
    /// recorded or any model is called. Later failures arrive as `Err` items.
    /// The thread's turn slot is taken on the first poll, so same-thread turns
    /// run in the order their streams are first polled.
    pub fn handle_turn(
        &self,
        thread_id: &str,
        user_text: &str,
        options: TurnOptions,
    ) -> Result<TurnStream> {
        let turn = self.plan(thread_id, user_text, Vec::new(), options)?;
        Ok(self.run(turn))
    }

    /// Start a turn from a role-tagged message sequence
    ///
    /// The last message is the question. Earlier messages only seed a thread
    /// that is still empty; an existing thread keeps its own history.
    pub fn handle_request(&self, request: TurnRequest, mut options: TurnOptions) -> Result<TurnStream> {
        let (earlier, question) = request.split_question().ok_or_else(|| {
            TurnError::InvalidParameter(
                "a turn needs a trailing user message".to_string(),
            )
        })?;

        if options.model.is_none() {
            options.model = request.model.clone();
        }
        let turn = self.plan(&request.thread_id, question, earlier.to_vec(), options)?;
        Ok(self.run(turn))
    }

    fn plan(
        &self,
        thread_id: &str,
        user_text: &str,
        seed: Vec<InputMessage>,
        options: TurnOptions,
    ) -> Result<Turn> {
        let config = &self.inner.config;

        if thread_id.trim().is_empty() {
            return Err(TurnError::InvalidParameter(
                "thread id must not be empty".to_string(),
            ));
        }
        if user_text.trim().is_empty() {
            return Err(TurnError::InvalidParameter(
                "user message must not be empty".to_string(),
            ));
        }
        let top_k = options.top_k.unwrap_or(config.retrieval.top_k);
        if top_k == 0 {
            return Err(TurnError::InvalidParameter(
                "top_k must be at least 1".to_string(),
            ));
        }

        let mut grounding = options.grounding.unwrap_or(config.retrieval.enabled);
        if grounding && self.inner.retriever.is_none() {
            tracing::debug!(thread_id = %thread_id, "No retriever configured; answering ungrounded");
            grounding = false;
        }

        let template = options
            .template
            .or_else(|| config.default_template.clone())
            .unwrap_or_else(|| {
                (if grounding { GROUNDED_CHAT } else { CONVERSATIONAL }).to_string()
            });
        self.inner.assembler.resolve(&template)?;

        Ok(Turn {
            run_id: uuid::Uuid::new_v4().to_string(),
            thread_id: thread_id.to_string(),
            question: user_text.to_string(),
            seed,
            model: options.model.unwrap_or_else(|| config.llm.model.clone()),
            template,
            grounding,
            top_k,
        })
    }

    fn run(&self, turn: Turn) -> TurnStream {
        let inner = Arc::clone(&self.inner);

        Box::pin(async_stream::stream! {
            let started = Instant::now();

            // Same-thread turns run one at a time, in arrival order
            let _slot = inner.gate.acquire(&turn.thread_id).await;

            tracing::info!(
                run_id = %turn.run_id,
                thread_id = %turn.thread_id,
                model = %turn.model,
                template = %turn.template,
                grounding = turn.grounding,
                "Turn started"
            );
            yield Ok(StreamEvent::InitStream {
                run_id: turn.run_id.clone(),
                thread_id: turn.thread_id.clone(),
                timestamp: chrono::Utc::now().timestamp_millis(),
            });

            // 1. Record the user message
            if let Err(e) = inner.record_user_message(&turn).await {
                tracing::error!(run_id = %turn.run_id, thread_id = %turn.thread_id, error = %e, "Turn failed");
                yield Err(e);
                return;
            }

            // 2. Memory transition
            if let Some(retained) = inner.compact(&turn).await {
                yield Ok(StreamEvent::Compacted { retained_messages: retained });
            }

            // 3. Grounding
            let context = match inner.ground(&turn).await {
                Ok(context) => context,
                Err(e) => {
                    tracing::error!(run_id = %turn.run_id, thread_id = %turn.thread_id, error = %e, "Turn failed");
                    yield Err(e);
                    return;
                }
            };
            if let Some(chunks) = &context {
                yield Ok(StreamEvent::Grounded { chunks: chunks.len() });
            }

            // 4. Prompt
            let prompt = match inner.build_prompt(&turn, context.unwrap_or_default()).await {
                Ok(prompt) => prompt,
                Err(e) => {
                    tracing::error!(run_id = %turn.run_id, thread_id = %turn.thread_id, error = %e, "Turn failed");
                    yield Err(e);
                    return;
                }
            };

            // 5. Stream the answer
            let mut tokens = match inner.generator.stream(&turn.model, prompt).await {
                Ok(tokens) => tokens,
                Err(e) => {
                    tracing::error!(run_id = %turn.run_id, thread_id = %turn.thread_id, error = %e, "Turn failed");
                    yield Err(e);
                    return;
                }
            };

            let mut accumulator = MessageAccumulator::new();
            while let Some(item) = tokens.next().await {
                match item {
                    Ok(event) => {
                        let event: StreamEvent = event.into();
                        accumulator.push(&event);
                        let done = matches!(event, StreamEvent::Done { .. });
                        yield Ok(event);
                        if done {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            run_id = %turn.run_id,
                            thread_id = %turn.thread_id,
                            tokens = accumulator.token_count(),
                            error = %e,
                            "Model stream failed; discarding partial reply"
                        );
                        yield Err(TurnError::GenerationFailure(e.to_string()));
                        return;
                    }
                }
            }
            drop(tokens);

            // 6. Record the reply only for a completed stream
            let token_count = accumulator.token_count();
            let Some(reply) = accumulator.finalize() else {
                tracing::error!(run_id = %turn.run_id, thread_id = %turn.thread_id, "Model stream ended before completion");
                yield Err(TurnError::GenerationFailure(
                    "model stream ended before completion".to_string(),
                ));
                return;
            };
            if reply.trim().is_empty() {
                tracing::error!(run_id = %turn.run_id, thread_id = %turn.thread_id, "Model stream completed without content");
                yield Err(TurnError::GenerationFailure(
                    "model stream completed without content".to_string(),
                ));
                return;
            }
            if let Err(e) = inner.store.append(&turn.thread_id, MessageRole::Assistant, reply).await {
                tracing::error!(run_id = %turn.run_id, thread_id = %turn.thread_id, error = %e, "Failed to record reply");
                yield Err(e.into());
                return;
            }

            let total_duration_ms = started.elapsed().as_millis() as u64;
            tracing::info!(
                run_id = %turn.run_id,
                thread_id = %turn.thread_id,
                tokens = token_count,
                duration_ms = total_duration_ms,
                "Turn completed"
            );
            yield Ok(StreamEvent::EndStream {
                status: "success".to_string(),
                total_duration_ms,
            });
        })
    }
}

impl Inner {
    async fn record_user_message(&self, turn: &Turn) -> Result<()> {
        if !turn.seed.is_empty() {
            let thread = self.store.get(&turn.thread_id).await?;
            if thread.is_empty() {
                for message in &turn.seed {
                    self.store
                        .append(&turn.thread_id, message.role, message.content.clone())
                        .await?;
                }
                tracing::debug!(
                    thread_id = %turn.thread_id,
                    seeded = turn.seed.len(),
                    "Seeded thread from client history"
                );
            } else {
                tracing::debug!(
                    thread_id = %turn.thread_id,
                    "Thread already has history; ignoring client-supplied messages"
                );
            }
        }

        self.store
            .append(&turn.thread_id, MessageRole::User, turn.question.clone())
            .await?;
        Ok(())
    }

    /// Returns the retained count when the thread was compacted
    async fn compact(&self, turn: &Turn) -> Option<usize> {
        match self.memory.on_turn(&turn.thread_id, &turn.model).await {
            Ok(MemoryTransition::Summarized { retained, .. }) => Some(retained),
            Ok(MemoryTransition::Continued) => None,
            Err(e) => {
                tracing::warn!(
                    thread_id = %turn.thread_id,
                    error = %e,
                    "Summarization failed; continuing with full history"
                );
                None
            }
        }
    }

    /// `None` when the turn is ungrounded or the index could not be reached
    async fn ground(&self, turn: &Turn) -> Result<Option<Vec<String>>> {
        let Some(retriever) = self.retriever.as_ref().filter(|_| turn.grounding) else {
            return Ok(None);
        };

        match retriever.query(&turn.question, turn.top_k).await {
            Ok(results) => Ok(Some(
                results.into_iter().map(|result| result.chunk_text).collect(),
            )),
            Err(RagError::InvalidParameter(reason)) => Err(TurnError::InvalidParameter(reason)),
            Err(e) => {
                tracing::warn!(
                    thread_id = %turn.thread_id,
                    error = %e,
                    "Retrieval unavailable; answering ungrounded"
                );
                Ok(None)
            }
        }
    }

    async fn build_prompt(&self, turn: &Turn, context: Vec<String>) -> Result<Vec<LLMMessage>> {
        let thread = self.store.get(&turn.thread_id).await?;

        // The newest message is the question itself
        let earlier = &thread.messages[..thread.len().saturating_sub(1)];
        let history = format_history(self.window.select(earlier));

        let prompt_context = PromptContext::new(turn.question.clone())
            .with_history(history)
            .with_summary(thread.summary.clone())
            .with_retrieved_context(context);

        Ok(self.assembler.assemble(&turn.template, &prompt_context)?)
    }
}
