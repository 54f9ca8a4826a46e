//! Two grounded turns against a small in-memory knowledge base
//!
//! Uses OpenAI when OPENAI_API_KEY is set, the scripted fake provider otherwise.
//!
//! ```bash
//! cargo run -p recall-graph --example grounded_chat
//! ```

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use recall_graph::{build_clients, AssistantConfig, LLMConfig, Orchestrator, StreamEvent, TurnOptions};
use recall_rag::{InMemoryVectorIndex, Retriever};
use recall_types::Provider;

const KNOWLEDGE: [(&str, &str); 2] = [
    ("nishiwaki", "city: Nishiwaki\nhan: Hyogo\nmayor: Naohiro Katayama\npopulation: 39120"),
    ("kato", "city: Kato\nhan: Hyogo\nmayor: Kazuo Yasuda\npopulation: 38000"),
];

#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("OPENAI_API_KEY").ok();
    let llm = match api_key {
        Some(_) => LLMConfig::new("gpt-4o-mini").with_provider(Provider::OpenAI),
        None => LLMConfig::default(),
    };

    let clients = build_clients(&llm, api_key.as_deref())?;
    let config = AssistantConfig {
        llm,
        ..AssistantConfig::default()
    };

    let retriever = Arc::new(Retriever::new(
        clients.embeddings,
        Arc::new(InMemoryVectorIndex::new()),
    ));
    for (source, text) in KNOWLEDGE {
        retriever.ingest(source, text, &config.chunking).await?;
    }

    let orchestrator = Orchestrator::builder()
        .chat_client(clients.chat)
        .retriever(retriever)
        .config(config)
        .build()?;

    for question in ["Who is the mayor of Nishiwaki?", "And how many people live there?"] {
        println!("user: {}", question);
        print!("assistant: ");

        let mut stream = orchestrator.handle_turn("demo", question, TurnOptions::new())?;
        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::Message { content } => {
                    print!("{}", content);
                    std::io::stdout().flush()?;
                }
                StreamEvent::Grounded { chunks } => eprintln!("[grounded on {} chunks]", chunks),
                StreamEvent::EndStream { total_duration_ms, .. } => {
                    println!("\n[{} ms]\n", total_duration_ms)
                }
                _ => {}
            }
        }
    }

    let thread = orchestrator.thread("demo").await?;
    println!("thread holds {} messages", thread.len());

    Ok(())
}
