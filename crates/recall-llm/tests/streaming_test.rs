use futures::StreamExt;
use recall_llm::{ChatClient, ChatRequest, FakeChatClient, Message, StreamEvent};

#[test]
fn test_stream_event_message() {
    let event = StreamEvent::Message {
        content: "Hello".to_string(),
    };

    match event {
        StreamEvent::Message { content } => assert_eq!(content, "Hello"),
        _ => panic!("Expected Message variant"),
    }
}

#[test]
fn test_stream_event_serialization_message() {
    let event = StreamEvent::Message {
        content: "Test".to_string(),
    };

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"message\""));
    assert!(json.contains("Test"));
}

#[test]
fn test_stream_event_done_no_reason_skips_field() {
    let event = StreamEvent::Done { finish_reason: None };
    let json = serde_json::to_string(&event).unwrap();
    assert_eq!(json, r#"{"type":"done"}"#);
}

#[test]
fn test_stream_event_deserialization_done() {
    let json = r#"{"type":"done","finish_reason":"stop"}"#;
    let event: StreamEvent = serde_json::from_str(json).unwrap();
    assert_eq!(
        event,
        StreamEvent::Done {
            finish_reason: Some("stop".to_string())
        }
    );
}

#[tokio::test]
async fn test_fake_stream_concatenates_to_reply() {
    let client = FakeChatClient::new().with_stream_reply("Paris is the capital of France.");
    let mut stream = client
        .chat_stream(ChatRequest::new("fake-llm", vec![Message::human("capital?")]))
        .await
        .unwrap();

    let mut text = String::new();
    let mut saw_done = false;
    while let Some(event) = stream.next().await {
        match event.unwrap() {
            StreamEvent::Message { content } => text.push_str(&content),
            StreamEvent::Done { .. } => saw_done = true,
        }
    }

    assert_eq!(text, "Paris is the capital of France.");
    assert!(saw_done);
}

#[tokio::test]
async fn test_fake_stream_failure_after_tokens() {
    let client = FakeChatClient::new()
        .with_stream_reply("one two three four")
        .fail_stream_after(2);
    let stream = client
        .chat_stream(ChatRequest::new("fake-llm", vec![Message::human("count")]))
        .await
        .unwrap();

    let events: Vec<_> = stream.collect().await;
    assert_eq!(events.len(), 3);
    assert!(events[0].is_ok());
    assert!(events[1].is_ok());
    assert!(events[2].is_err());
}

#[tokio::test]
async fn test_fake_stream_start_failure() {
    let client = FakeChatClient::new();
    client.set_fail_stream_start(true);

    let result = client
        .chat_stream(ChatRequest::new("fake-llm", vec![Message::human("hi")]))
        .await;
    assert!(result.is_err());
    assert_eq!(client.stream_requests().await.len(), 1);
}
