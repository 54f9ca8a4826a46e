use anyhow::Result;
use recall_llm::{ChatRequest, ClientFactory, Message, ProviderConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Fall back to the scripted provider when no key is configured
    let (config, model) = match std::env::var("OPENAI_API_KEY") {
        Ok(api_key) => (ProviderConfig::openai(api_key), "gpt-4o-mini"),
        Err(_) => (ProviderConfig::fake(), "fake-llm"),
    };

    println!("Selected provider: {:?}", config.provider_type());

    let chat = ClientFactory::create_chat_client(config.clone())?;
    let embedder = ClientFactory::create_embedding_client(config)?;

    let request = ChatRequest::new(model, vec![Message::human("Say hello!")]);
    let response = chat.chat(request).await?;
    println!("Response: {}", response.content.unwrap_or_default());

    let vector = embedder.embed("hello").await?;
    println!("Embedding dimensions: {}", vector.len());

    Ok(())
}
