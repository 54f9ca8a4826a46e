//! Turn orchestration for the recall assistant
//!
//! A turn records the user message, lets the memory controller compact the
//! thread, optionally grounds the prompt with retrieved chunks, assembles the
//! prompt and streams the model's answer back as [`StreamEvent`]s. The reply is
//! recorded only once the model stream completes.

mod builder;
mod clients;
mod error;
mod generation;
mod orchestrator;
mod turns;

pub use builder::OrchestratorBuilder;
pub use clients::{build_clients, provider_config, ProviderClients};
pub use error::{Result, TurnError};
pub use generation::Generator;
pub use orchestrator::{Orchestrator, TurnStream};
pub use turns::TurnGate;

pub use recall_types::{AssistantConfig, LLMConfig, StreamEvent, TurnOptions, TurnRequest};
