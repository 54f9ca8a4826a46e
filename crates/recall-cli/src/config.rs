use config::{Config as ConfigLoader, ConfigError, Environment, File};
use recall_types::{
    AssistantConfig, ChunkingConfig, ContextPolicy, LLMConfig, MemoryPolicy, RetrievalPolicy,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LLMConfig,
    pub memory: MemoryPolicy,
    pub retrieval: RetrievalPolicy,
    pub chunking: ChunkingConfig,
    pub context: ContextPolicy,
    pub prompts: PromptsConfig,
    pub knowledge: KnowledgeConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// JSON array of `{ "name", "template" }`; built-in templates when unset
    pub templates_path: Option<String>,
    pub default_template: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub json_files: Vec<String>,
    pub text_files: Vec<String>,
    /// JSON pointers extracted from each record; city fields when unset
    pub json_pointers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub thread_id: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            thread_id: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables `RECALL_<SECTION>__<KEY>`, e.g. `RECALL_LLM__MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // 3. Environment variables override everything
            .add_source(
                Environment::with_prefix("RECALL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Secrets come from ENV only (not in TOML)
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Library-facing part of the configuration
    pub fn assistant(&self) -> AssistantConfig {
        AssistantConfig {
            llm: self.llm.clone(),
            memory: self.memory.clone(),
            retrieval: self.retrieval.clone(),
            chunking: self.chunking,
            context: self.context.clone(),
            default_template: self.prompts.default_template.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_types::Provider;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [llm]
            model = "gpt-4o-mini"
            provider = "openai"
            temperature = 0.2

            [memory]
            summarize_threshold = 10
            retain_after_summary = 4

            [retrieval]
            enabled = true
            top_k = 3

            [chunking]
            chunk_size = 200
            chunk_overlap = 20

            [context]
            type = "last_k"
            k = 6

            [prompts]
            templates_path = "data/prompt-templates.json"
            default_template = "grounded-chat"

            [knowledge]
            json_files = ["data/cities.json"]

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.llm.provider, Provider::OpenAI);
        assert_eq!(config.llm.temperature, Some(0.2));
        assert_eq!(config.memory.summarize_threshold, 10);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.chunking.chunk_size, 200);
        assert_eq!(config.context, ContextPolicy::LastK { k: 6 });
        assert_eq!(config.knowledge.json_files, vec!["data/cities.json"]);
        assert_eq!(config.chat.thread_id, "default");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_empty_config_uses_design_defaults() {
        let config: Config = toml::from_str("").unwrap();
        let assistant = config.assistant();

        assert_eq!(assistant.llm.model, "fake-llm");
        assert_eq!(assistant.llm.provider, Provider::Fake);
        assert_eq!(assistant.memory.summarize_threshold, 6);
        assert_eq!(assistant.memory.retain_after_summary, 2);
        assert_eq!(assistant.retrieval.top_k, 2);
        assert_eq!(assistant.chunking.chunk_size, 100);
        assert_eq!(assistant.chunking.chunk_overlap, 50);
        assert!(assistant.default_template.is_none());
    }
}
