mod controller;
mod error;
mod state;
mod templates;
mod window;

pub use controller::{MemoryController, MemoryTransition};
pub use error::{MemoryError, Result};
pub use state::MemoryState;
pub use templates::{summarization_instruction, SUMMARY_CREATE_PROMPT, SUMMARY_EXTEND_PROMPT};
pub use window::{format_history, HistoryWindow};
