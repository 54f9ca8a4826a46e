use futures::StreamExt;
use recall_graph::{StreamEvent, TurnError, TurnStream};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// What a rendered turn produced
#[derive(Debug, Default)]
pub struct TurnOutcome {
    pub answer: String,
    pub compacted: Option<usize>,
    pub grounded: Option<usize>,
    pub duration_ms: Option<u64>,
    pub error: Option<TurnError>,
}

/// Write a turn to `out` as it streams: tokens inline, lifecycle events as notes
///
/// Turn failures are reported in the outcome; only write errors are returned.
pub async fn render_turn<W>(mut stream: TurnStream, out: &mut W) -> std::io::Result<TurnOutcome>
where
    W: AsyncWrite + Unpin,
{
    let mut outcome = TurnOutcome::default();

    while let Some(event) = stream.next().await {
        match event {
            Ok(StreamEvent::Message { content }) => {
                out.write_all(content.as_bytes()).await?;
                out.flush().await?;
                outcome.answer.push_str(&content);
            }
            Ok(StreamEvent::Compacted { retained_messages }) => {
                out.write_all(
                    format!("[earlier messages summarized, {} kept]\n", retained_messages).as_bytes(),
                )
                .await?;
                outcome.compacted = Some(retained_messages);
            }
            Ok(StreamEvent::Grounded { chunks }) => {
                outcome.grounded = Some(chunks);
            }
            Ok(StreamEvent::EndStream { total_duration_ms, .. }) => {
                outcome.duration_ms = Some(total_duration_ms);
            }
            Ok(StreamEvent::InitStream { run_id, .. }) => {
                tracing::debug!(run_id = %run_id, "Rendering turn");
            }
            Ok(StreamEvent::Done { .. }) => {}
            Err(e) => {
                out.write_all(format!("\n[error: {}]", e).as_bytes()).await?;
                outcome.error = Some(e);
                break;
            }
        }
    }

    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use recall_graph::{Orchestrator, TurnOptions};
    use recall_llm::FakeChatClient;
    use recall_types::{AssistantConfig, RetrievalPolicy};

    fn orchestrator(chat: FakeChatClient) -> Orchestrator {
        Orchestrator::builder()
            .chat_client(Arc::new(chat))
            .config(AssistantConfig {
                retrieval: RetrievalPolicy::disabled(),
                ..AssistantConfig::default()
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_renders_tokens_inline() {
        let orchestrator = orchestrator(FakeChatClient::new().with_stream_reply("Kato is in Hyogo."));
        let stream = orchestrator
            .handle_turn("t1", "Where is Kato?", TurnOptions::new())
            .unwrap();

        let mut out = Vec::new();
        let outcome = render_turn(stream, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Kato is in Hyogo.\n");
        assert_eq!(outcome.answer, "Kato is in Hyogo.");
        assert!(outcome.error.is_none());
        assert!(outcome.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_reports_generation_failure() {
        let orchestrator = orchestrator(
            FakeChatClient::new()
                .with_stream_reply("never finished")
                .fail_stream_after(1),
        );
        let stream = orchestrator.handle_turn("t1", "hi", TurnOptions::new()).unwrap();

        let mut out = Vec::new();
        let outcome = render_turn(stream, &mut out).await.unwrap();

        assert!(matches!(outcome.error, Some(TurnError::GenerationFailure(_))));
        assert!(String::from_utf8(out).unwrap().starts_with("never \n[error: Generation failed"));
    }
}
