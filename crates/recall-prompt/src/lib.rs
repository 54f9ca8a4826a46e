mod assembler;
mod defaults;
mod error;
mod registry;
mod template;

pub use assembler::{PromptAssembler, SUMMARY_PREFIX};
pub use defaults::{CONVERSATIONAL, CONVERSATIONAL_TEMPLATE, GROUNDED_CHAT, GROUNDED_CHAT_TEMPLATE};
pub use error::{PromptError, Result};
pub use registry::{TemplateRecord, TemplateRegistry};
pub use template::{Placeholder, PromptTemplate};
