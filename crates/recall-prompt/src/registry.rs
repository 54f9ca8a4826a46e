use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::defaults::{CONVERSATIONAL, CONVERSATIONAL_TEMPLATE, GROUNDED_CHAT, GROUNDED_CHAT_TEMPLATE};
use crate::error::{PromptError, Result};
use crate::template::PromptTemplate;

/// One entry of a template file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub name: String,
    pub template: String,
}

/// Named templates, every one parsed and validated on insert
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, PromptTemplate>,
    order: Vec<String>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `grounded-chat` and `conversational`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, source) in [
            (GROUNDED_CHAT, GROUNDED_CHAT_TEMPLATE),
            (CONVERSATIONAL, CONVERSATIONAL_TEMPLATE),
        ] {
            if let Ok(template) = PromptTemplate::parse(name, source) {
                registry.order.push(name.to_string());
                registry.templates.insert(name.to_string(), template);
            }
        }
        registry
    }

    /// Parse a JSON array of `{ "name", "template" }` records
    pub fn from_json(raw: &str) -> Result<Self> {
        let records: Vec<TemplateRecord> = serde_json::from_str(raw).map_err(|e| {
            PromptError::InvalidParameter(format!("template file is not a JSON array of records: {}", e))
        })?;

        let mut registry = Self::new();
        for record in records {
            registry.insert(record.name, record.template)?;
        }
        Ok(registry)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PromptError::Load {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let registry = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            templates = registry.len(),
            "Loaded prompt templates"
        );
        Ok(registry)
    }

    /// Add a template; names must be non-empty and unique
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PromptError::InvalidParameter(
                "template name must not be empty".to_string(),
            ));
        }
        if self.templates.contains_key(&name) {
            return Err(PromptError::InvalidParameter(format!(
                "duplicate template name '{}'",
                name
            )));
        }

        let template = PromptTemplate::parse(name.clone(), source)?;
        self.order.push(name.clone());
        self.templates.insert(name, template);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&PromptTemplate> {
        self.templates
            .get(name)
            .ok_or_else(|| PromptError::TemplateNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Names in registration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = TemplateRegistry::with_defaults();
        assert_eq!(registry.names(), &[GROUNDED_CHAT.to_string(), CONVERSATIONAL.to_string()]);
        assert!(registry.get(GROUNDED_CHAT).is_ok());
        assert!(registry.get(CONVERSATIONAL).is_ok());
    }

    #[test]
    fn test_from_json() {
        let raw = r#"[
            {"name": "short", "template": "{history}\nuser: {question}"},
            {"name": "aikato", "template": "Current conversation:\n{chat_history}\nuser: {input}"}
        ]"#;
        let registry = TemplateRegistry::from_json(raw).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("aikato").unwrap().name(), "aikato");
    }

    #[test]
    fn test_unknown_name() {
        let registry = TemplateRegistry::with_defaults();
        assert_eq!(
            registry.get("missing").unwrap_err(),
            PromptError::TemplateNotFound("missing".to_string())
        );
    }

    #[test]
    fn test_rejects_duplicates_and_blank_names() {
        let duplicate = r#"[{"name": "a", "template": "{question}"}, {"name": "a", "template": "{question}"}]"#;
        assert!(matches!(
            TemplateRegistry::from_json(duplicate),
            Err(PromptError::InvalidParameter(_))
        ));

        let blank = r#"[{"name": " ", "template": "{question}"}]"#;
        assert!(matches!(
            TemplateRegistry::from_json(blank),
            Err(PromptError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_file() {
        assert!(matches!(
            TemplateRegistry::from_json(r#"{"name": "a"}"#),
            Err(PromptError::InvalidParameter(_))
        ));
        assert!(matches!(
            TemplateRegistry::from_json(r#"[{"name": "a", "template": "{oops}"}]"#),
            Err(PromptError::InvalidParameter(_))
        ));
    }
}
