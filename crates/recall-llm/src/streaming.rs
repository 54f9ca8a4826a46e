use anyhow::Result;
use reqwest::Response;
use std::collections::VecDeque;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::traits::TokenStream;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Message {
        content: String,
    },

    Done {
        #[serde(skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChoice {
    pub index: u32,
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delta {
    pub role: Option<String>,
    pub content: Option<String>,
}

impl ChatStreamChunk {
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }

    pub fn is_done(&self) -> bool {
        self.choices
            .first()
            .and_then(|c| c.finish_reason.as_ref())
            .is_some()
    }

    pub(crate) fn to_stream_events(&self) -> Vec<StreamEvent> {
        let mut events = Vec::new();

        if let Some(choice) = self.choices.first() {
            if let Some(content) = &choice.delta.content {
                if !content.is_empty() {
                    events.push(StreamEvent::Message {
                        content: content.clone(),
                    });
                }
            }

            if let Some(finish_reason) = &choice.finish_reason {
                events.push(StreamEvent::Done {
                    finish_reason: Some(finish_reason.clone()),
                });
            }
        }

        events
    }
}

/// Parse one SSE line. `None` means the line carries nothing for us,
/// `Some(Ok(vec![]))` with `done = true` marks the `[DONE]` sentinel.
pub(crate) fn parse_sse_line(line: &str) -> Option<(bool, Result<Vec<StreamEvent>>)> {
    let line = line.trim();

    if line.is_empty() {
        return None;
    }

    let data = line.strip_prefix("data:")?.trim_start();

    if data == "[DONE]" {
        return Some((true, Ok(Vec::new())));
    }

    let parsed = serde_json::from_str::<ChatStreamChunk>(data)
        .map(|chunk| chunk.to_stream_events())
        .map_err(|e| anyhow::anyhow!("Failed to parse chat chunk: {}", e));

    Some((false, parsed))
}

pub fn parse_chat_sse_stream(response: Response) -> TokenStream {
    let stream = response.bytes_stream();

    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(stream);
        let mut buffer = VecDeque::with_capacity(8192);
        let mut finished = false;

        while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(bytes);

                    while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                        let line_bytes: Vec<u8> = buffer.drain(..=newline_pos).collect();

                        let Ok(line_str) = std::str::from_utf8(&line_bytes) else {
                            continue;
                        };

                        match parse_sse_line(line_str) {
                            Some((true, _)) => {
                                finished = true;
                                yield Ok(StreamEvent::Done { finish_reason: None });
                                break;
                            }
                            Some((false, Ok(events))) => {
                                for event in events {
                                    yield Ok(event);
                                }
                            }
                            Some((false, Err(e))) => yield Err(e),
                            None => {}
                        }
                    }

                    if finished {
                        break;
                    }
                }
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {}", e));
                    break;
                }
            }
        }
    })
}
