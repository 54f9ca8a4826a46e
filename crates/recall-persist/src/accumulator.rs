use recall_types::StreamEvent;

/// Collects streamed tokens into the assistant reply
///
/// The reply is only released once the stream reported `Done`; an interrupted
/// stream yields nothing, so truncated text never reaches the thread.
pub struct MessageAccumulator {
    buffer: String,
    tokens: usize,
    completed: bool,
}

impl MessageAccumulator {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            tokens: 0,
            completed: false,
        }
    }

    pub fn push(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::Message { content } => {
                self.buffer.push_str(content);
                self.tokens += 1;
            }
            StreamEvent::Done { .. } => self.completed = true,
            _ => {}
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn token_count(&self) -> usize {
        self.tokens
    }

    /// Called at end of stream; `Some` only for a completed stream
    pub fn finalize(self) -> Option<String> {
        if self.completed {
            Some(self.buffer)
        } else {
            None
        }
    }
}

impl Default for MessageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> StreamEvent {
        StreamEvent::Message { content: s.to_string() }
    }

    #[test]
    fn test_completed_stream_yields_reply() {
        let mut acc = MessageAccumulator::new();
        acc.push(&token("Hello "));
        acc.push(&token("world"));
        acc.push(&StreamEvent::Done { finish_reason: Some("stop".to_string()) });

        assert_eq!(acc.token_count(), 2);
        assert_eq!(acc.finalize().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_interrupted_stream_yields_nothing() {
        let mut acc = MessageAccumulator::new();
        acc.push(&token("Hello "));

        assert!(!acc.is_completed());
        assert_eq!(acc.finalize(), None);
    }

    #[test]
    fn test_ignores_lifecycle_events() {
        let mut acc = MessageAccumulator::new();
        acc.push(&StreamEvent::Grounded { chunks: 2 });
        acc.push(&StreamEvent::Done { finish_reason: None });

        assert_eq!(acc.finalize().as_deref(), Some(""));
    }
}
