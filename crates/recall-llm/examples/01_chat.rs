use anyhow::Result;
use futures::StreamExt;
use recall_llm::{ChatClient, ChatRequest, Message, OpenAIClient, StreamEvent};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("OPENAI_API_KEY")?;
    let client = OpenAIClient::new(api_key)?;

    let request = ChatRequest::new(
        "gpt-4o-mini",
        vec![Message::human("What is the capital of France?")],
    );

    let response = client.chat(request.clone()).await?;
    println!("Response: {}", response.content.unwrap_or_default());

    if let Some(usage) = response.usage {
        println!("Tokens used: {}", usage.total_tokens);
    }

    print!("Streamed: ");
    let mut stream = client.chat_stream(request).await?;
    while let Some(event) = stream.next().await {
        if let StreamEvent::Message { content } = event? {
            print!("{}", content);
            std::io::stdout().flush()?;
        }
    }
    println!();

    Ok(())
}
