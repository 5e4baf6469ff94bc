//! Themed chat agents
//!
//! Conversations about a selected track with themed agents served by the
//! backend chat service. Agent definitions and prompt assembly live
//! here; the network turn goes through the authenticated API client.

pub mod agents;
pub mod client;
pub mod prompts;
pub mod types;

pub use agents::{AgentKind, AgentProfile};
pub use client::ChatClient;
pub use prompts::PromptBuilder;
pub use types::{ChatMessage, ChatTurnReply, MessageRole};
