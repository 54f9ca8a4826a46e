use std::sync::Arc;

use recall_context::{MemoryController, MemoryError, MemoryTransition, SUMMARY_CREATE_PROMPT};
use recall_llm::{FakeChatClient, Message as LLMMessage};
use recall_persist::{InMemoryThreadStore, MessageRole, ThreadStore};
use recall_types::MemoryPolicy;
use tokio_test::{assert_err, assert_ok};

async fn seed(store: &InMemoryThreadStore, thread_id: &str, count: usize) {
    for i in 0..count {
        let role = if i % 2 == 0 { MessageRole::User } else { MessageRole::Assistant };
        store
            .append(thread_id, role, format!("message {}", i))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_below_threshold_continues() {
    let store = Arc::new(InMemoryThreadStore::new());
    let llm = Arc::new(FakeChatClient::new());
    seed(&store, "t1", 6).await;

    let controller =
        MemoryController::new(llm.clone(), store.clone(), MemoryPolicy::default()).unwrap();
    let transition = assert_ok!(controller.on_turn("t1", "fake-llm").await);

    assert_eq!(transition, MemoryTransition::Continued);
    assert!(llm.invoke_requests().await.is_empty());
    assert_eq!(store.get("t1").await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_crossing_threshold_compacts_to_two() {
    let store = Arc::new(InMemoryThreadStore::new());
    let llm = Arc::new(FakeChatClient::new().with_invoke_reply("- user greeted\n- asked about Kato"));
    seed(&store, "t1", 7).await;
    let before = store.get("t1").await.unwrap();

    let controller =
        MemoryController::new(llm.clone(), store.clone(), MemoryPolicy::default()).unwrap();
    let transition = controller.on_turn("t1", "fake-llm").await.unwrap();

    assert_eq!(
        transition,
        MemoryTransition::Summarized {
            summary: "- user greeted\n- asked about Kato".to_string(),
            retained: 2,
        }
    );

    let after = store.get("t1").await.unwrap();
    assert_eq!(after.messages, before.messages[5..].to_vec());
    assert_eq!(after.summary.as_deref(), Some("- user greeted\n- asked about Kato"));

    // Conversation first, instruction last
    let requests = llm.invoke_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages.len(), 8);
    assert_eq!(requests[0].messages[7], LLMMessage::system(SUMMARY_CREATE_PROMPT));
}

#[tokio::test]
async fn test_existing_summary_is_extended() {
    let store = Arc::new(InMemoryThreadStore::new());
    let llm = Arc::new(
        FakeChatClient::new()
            .with_invoke_reply("- first summary")
            .with_invoke_reply("- extended summary"),
    );
    let controller =
        MemoryController::new(llm.clone(), store.clone(), MemoryPolicy::default()).unwrap();

    seed(&store, "t1", 7).await;
    controller.on_turn("t1", "fake-llm").await.unwrap();
    seed(&store, "t1", 5).await;
    controller.on_turn("t1", "fake-llm").await.unwrap();

    let requests = llm.invoke_requests().await;
    let instruction = requests[1].messages.last().unwrap().text();
    assert!(instruction.contains("- first summary"));
    assert!(instruction.contains("Extend the summary"));

    let thread = store.get("t1").await.unwrap();
    assert_eq!(thread.summary.as_deref(), Some("- extended summary"));
    assert_eq!(thread.len(), 2);
}

#[tokio::test]
async fn test_failed_summary_leaves_thread_intact() {
    let store = Arc::new(InMemoryThreadStore::new());
    let llm = Arc::new(FakeChatClient::new());
    llm.set_fail_invoke(true);
    seed(&store, "t1", 8).await;
    let before = store.get("t1").await.unwrap();

    let controller =
        MemoryController::new(llm.clone(), store.clone(), MemoryPolicy::default()).unwrap();
    let err = assert_err!(controller.on_turn("t1", "fake-llm").await);

    assert!(matches!(err, MemoryError::SummarizationFailure(_)));
    assert_eq!(store.get("t1").await.unwrap(), before);
}

#[tokio::test]
async fn test_summarization_model_override() {
    let store = Arc::new(InMemoryThreadStore::new());
    let llm = Arc::new(FakeChatClient::new());
    seed(&store, "t1", 7).await;

    let policy = MemoryPolicy::default().with_summarization_model("gpt-4o-mini");
    let controller = MemoryController::new(llm.clone(), store.clone(), policy).unwrap();
    controller.on_turn("t1", "gpt-4o").await.unwrap();

    assert_eq!(llm.invoke_requests().await[0].model, "gpt-4o-mini");
}

#[test]
fn test_invalid_policy_rejected() {
    let store = Arc::new(InMemoryThreadStore::new());
    let llm = Arc::new(FakeChatClient::new());
    let policy = MemoryPolicy::default().with_retain(0);

    let result = MemoryController::new(llm, store, policy);
    assert!(matches!(result, Err(MemoryError::InvalidPolicy(_))));
}
