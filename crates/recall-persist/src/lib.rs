pub mod models;
pub mod store;
pub mod memory;
pub mod accumulator;
pub mod error;

pub use models::{ConversationThread, Message, MessageRole};
pub use store::ThreadStore;
pub use memory::InMemoryThreadStore;
pub use accumulator::MessageAccumulator;
pub use error::{PersistError, Result};
