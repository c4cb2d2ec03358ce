//! Customer-support completion wrapper.
//!
//! [`SupportAgent`] pins the system prompt and sampling parameters so every
//! turn is answered under the same narrow support policy.

use std::sync::Arc;

use anyhow::Result;

use crate::traits::{ChatClient, ChatOptions, ChatRequest};
use crate::types::Message;

pub const SUPPORT_SYSTEM_PROMPT: &str = "\
You are a helpful customer support agent.

Only answer questions related to the product:
- Shipping
- Orders
- Returns & refunds
- Support hours

Policies:
- Shipping: Worldwide, 5–10 business days
- Returns: 30-day return policy
- Support hours: Mon–Fri, 9 AM – 6 PM IST

If a question is unrelated, politely redirect.
";

/// Reply used when the provider answers without any content.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't answer that.";

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

pub struct SupportAgent {
    client: Arc<dyn ChatClient>,
    model: String,
    options: ChatOptions,
    system_prompt: String,
}

impl SupportAgent {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>, options: ChatOptions) -> Self {
        Self {
            client,
            model: model.into(),
            options,
            system_prompt: SUPPORT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Agent with the default model and sampling parameters
    pub fn with_defaults(client: Arc<dyn ChatClient>) -> Self {
        Self::new(
            client,
            DEFAULT_MODEL,
            ChatOptions::new()
                .temperature(DEFAULT_TEMPERATURE)
                .max_tokens(DEFAULT_MAX_TOKENS),
        )
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Assemble `[system, ..history, user(new_message)]`.
    pub fn build_messages(&self, history: Vec<Message>, new_message: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(history);
        messages.push(Message::human(new_message));
        messages
    }

    /// Generate the assistant's reply for `new_message` given prior turns.
    ///
    /// Transport and provider errors are returned as-is. A successful
    /// response without usable text yields [`FALLBACK_REPLY`].
    pub async fn generate_reply(&self, history: Vec<Message>, new_message: &str) -> Result<String> {
        let messages = self.build_messages(history, new_message);
        let request = ChatRequest::new(self.model.clone(), messages).with_options(self.options.clone());

        let response = self.client.chat(request).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Completion usage"
            );
        }

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => {
                tracing::warn!(
                    finish_reason = ?response.finish_reason,
                    "Provider returned no content; using fallback reply"
                );
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }
}
