use std::sync::Arc;

use recall_llm::Message;
use recall_types::PromptContext;
use tracing::debug;

use crate::error::Result;
use crate::registry::TemplateRegistry;
use crate::template::{Placeholder, PromptTemplate};

/// Prefix of the system message carrying the rolling summary
pub const SUMMARY_PREFIX: &str = "Summary of the earlier conversation: ";

/// Turns a template and a [`PromptContext`] into the model's message list
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    registry: Arc<TemplateRegistry>,
}

impl PromptAssembler {
    pub fn new(registry: Arc<TemplateRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn resolve(&self, name: &str) -> Result<&PromptTemplate> {
        self.registry.get(name)
    }

    /// Render `name` into a single user message.
    ///
    /// When a summary exists and the template has no `{summary}` slot,
    /// it is sent first as a system message instead.
    pub fn assemble(&self, name: &str, context: &PromptContext) -> Result<Vec<Message>> {
        let template = self.resolve(name)?;
        let rendered = template.render(context);

        let mut messages = Vec::with_capacity(2);
        if let Some(summary) = context.summary.as_deref() {
            if !template.uses(Placeholder::Summary) {
                messages.push(Message::system(format!("{}{}", SUMMARY_PREFIX, summary)));
            }
        }
        messages.push(Message::human(rendered));

        debug!(
            template = %name,
            messages = messages.len(),
            context_chunks = context.retrieved_context.len(),
            "Assembled prompt"
        );
        Ok(messages)
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(Arc::new(TemplateRegistry::with_defaults()))
    }
}
