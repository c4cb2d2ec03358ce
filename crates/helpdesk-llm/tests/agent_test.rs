use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use helpdesk_llm::{
    ChatClient, ChatOptions, ChatRequest, ChatResponse, Message, SupportAgent, FALLBACK_REPLY,
    SUPPORT_SYSTEM_PROMPT,
};

/// Records every request and answers with a fixed response
struct RecordingClient {
    response: Option<ChatResponse>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl RecordingClient {
    fn answering(response: ChatResponse) -> Arc<Self> {
        Arc::new(Self {
            response: Some(response),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn last_request(&self) -> ChatRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl ChatClient for RecordingClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => anyhow::bail!("Completion API error (503 Service Unavailable): overloaded"),
        }
    }
}

#[tokio::test]
async fn test_system_prompt_prepended_and_message_appended() {
    let client = RecordingClient::answering(ChatResponse::text("Ships in 5-10 days."));
    let agent = SupportAgent::with_defaults(client.clone());

    let history = vec![Message::human("hi"), Message::ai("hello, how can I help?")];
    let reply = agent.generate_reply(history, "How long is shipping?").await.unwrap();

    assert_eq!(reply, "Ships in 5-10 days.");

    let request = client.last_request();
    assert_eq!(request.messages.len(), 4);
    assert_eq!(request.messages[0], Message::system(SUPPORT_SYSTEM_PROMPT));
    assert_eq!(request.messages[1], Message::human("hi"));
    assert_eq!(request.messages[2], Message::ai("hello, how can I help?"));
    assert_eq!(request.messages[3], Message::human("How long is shipping?"));
}

#[tokio::test]
async fn test_fixed_model_parameters() {
    let client = RecordingClient::answering(ChatResponse::text("ok"));
    let agent = SupportAgent::with_defaults(client.clone());

    agent.generate_reply(Vec::new(), "hello").await.unwrap();

    let request = client.last_request();
    assert_eq!(request.model, "llama-3.1-8b-instant");
    assert_eq!(request.options.max_tokens, Some(200));
    assert_eq!(request.options.temperature, Some(0.2));
}

#[tokio::test]
async fn test_system_prompt_covers_policies() {
    assert!(SUPPORT_SYSTEM_PROMPT.contains("Shipping"));
    assert!(SUPPORT_SYSTEM_PROMPT.contains("5–10 business days"));
    assert!(SUPPORT_SYSTEM_PROMPT.contains("30-day return policy"));
    assert!(SUPPORT_SYSTEM_PROMPT.contains("Support hours"));
    assert!(SUPPORT_SYSTEM_PROMPT.contains("politely redirect"));
}

#[tokio::test]
async fn test_missing_content_yields_fallback() {
    let client = RecordingClient::answering(ChatResponse::empty());
    let agent = SupportAgent::with_defaults(client);

    let reply = agent.generate_reply(Vec::new(), "hello").await.unwrap();
    assert_eq!(reply, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_blank_content_yields_fallback() {
    let client = RecordingClient::answering(ChatResponse::text("   "));
    let agent = SupportAgent::with_defaults(client);

    let reply = agent.generate_reply(Vec::new(), "hello").await.unwrap();
    assert_eq!(reply, "Sorry, I couldn't answer that.");
}

#[tokio::test]
async fn test_provider_error_propagates() {
    let client = RecordingClient::failing();
    let agent = SupportAgent::with_defaults(client);

    let err = agent.generate_reply(Vec::new(), "hello").await.unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_custom_prompt_and_options() {
    let client = RecordingClient::answering(ChatResponse::text("ok"));
    let agent = SupportAgent::new(client.clone(), "gpt-4o-mini", ChatOptions::new().max_tokens(50))
        .with_system_prompt("Only talk about invoices.");

    assert_eq!(agent.model(), "gpt-4o-mini");
    agent.generate_reply(Vec::new(), "hello").await.unwrap();

    let request = client.last_request();
    assert_eq!(request.messages[0], Message::system("Only talk about invoices."));
    assert_eq!(request.options.temperature, None);
    assert_eq!(request.options.max_tokens, Some(50));
}
