use std::sync::Arc;

use recall_llm::Message;
use recall_prompt::{
    PromptAssembler, PromptError, TemplateRegistry, CONVERSATIONAL, GROUNDED_CHAT, SUMMARY_PREFIX,
};
use recall_types::PromptContext;

#[test]
fn test_grounded_chat_includes_context_history_and_question() {
    let assembler = PromptAssembler::default();
    let context = PromptContext::new("What is the mayor's name?")
        .with_history("user: Tell me about Nishiwaki\nassistant: It is a city in Hyogo.")
        .with_retrieved_context(vec![
            "city: Nishiwaki\nmayor: Naohiro Katayama".to_string(),
            "city: Kato".to_string(),
        ]);

    let messages = assembler.assemble(GROUNDED_CHAT, &context).unwrap();
    assert_eq!(messages.len(), 1);

    let Message::Human { content, .. } = &messages[0] else {
        panic!("expected a user message, got {:?}", messages[0]);
    };
    let text = content.to_text();
    assert!(text.contains("Reference data: city: Nishiwaki\nmayor: Naohiro Katayama\n\ncity: Kato"));
    assert!(text.contains("assistant: It is a city in Hyogo."));
    assert!(text.contains("user: What is the mayor's name?"));
}

#[test]
fn test_summary_becomes_leading_system_message() {
    let assembler = PromptAssembler::default();
    let context = PromptContext::new("And the population?")
        .with_summary(Some("- The user asked about Kato city".to_string()));

    let messages = assembler.assemble(CONVERSATIONAL, &context).unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role(), "system");
    assert_eq!(
        messages[0].text(),
        format!("{}- The user asked about Kato city", SUMMARY_PREFIX)
    );
    assert_eq!(messages[1].role(), "user");
}

#[test]
fn test_summary_slot_is_rendered_inline() {
    let mut registry = TemplateRegistry::new();
    registry
        .insert("inline", "Earlier: {summary}\n{history}\nuser: {question}")
        .unwrap();
    let assembler = PromptAssembler::new(Arc::new(registry));

    let context = PromptContext::new("q").with_summary(Some("s".to_string()));
    let messages = assembler.assemble("inline", &context).unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), "Earlier: s\n\nuser: q");
}

#[test]
fn test_no_summary_no_system_message() {
    let assembler = PromptAssembler::default();
    let messages = assembler
        .assemble(CONVERSATIONAL, &PromptContext::new("hello"))
        .unwrap();
    assert_eq!(messages.len(), 1);
}

#[test]
fn test_unknown_template() {
    let assembler = PromptAssembler::default();
    assert_eq!(
        assembler
            .assemble("missing", &PromptContext::new("hello"))
            .unwrap_err(),
        PromptError::TemplateNotFound("missing".to_string())
    );
}

#[tokio::test]
async fn test_missing_file_is_load_error() {
    let result = TemplateRegistry::from_file("/nonexistent/prompt-templates.json").await;
    assert!(matches!(result, Err(PromptError::Load { .. })));
}
