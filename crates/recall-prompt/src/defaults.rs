//! Built-in templates registered by [`TemplateRegistry::with_defaults`](crate::TemplateRegistry::with_defaults)

pub const GROUNDED_CHAT: &str = "grounded-chat";

pub const GROUNDED_CHAT_TEMPLATE: &str = "Answer the user's question using the reference data below. \
If the answer is not contained in the reference data, say honestly that you do not have that information.
==============================
Reference data: {context}
==============================
Current conversation:
{history}

user: {question}
assistant:";

pub const CONVERSATIONAL: &str = "conversational";

pub const CONVERSATIONAL_TEMPLATE: &str = "The following is a friendly conversation between a user and an assistant. \
The assistant answers concisely and keeps track of what was said earlier.

Current conversation:
{history}

user: {question}
assistant:";
