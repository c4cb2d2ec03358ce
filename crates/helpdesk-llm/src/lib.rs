pub mod types;
pub mod traits;
pub mod openai;
pub mod agent;

pub use traits::{ChatClient, ChatRequest, ChatResponse, ChatOptions, TokenUsage};

pub use openai::OpenAIClient;
pub use agent::{SupportAgent, SUPPORT_SYSTEM_PROMPT, FALLBACK_REPLY};
pub use types::Message;
