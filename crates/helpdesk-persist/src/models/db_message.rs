use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PersistError;

/// Database-agnostic message model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DBMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Who wrote a message. Stored as `"user"` / `"ai"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sender {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            other => Err(PersistError::InvalidSender(other.to_string())),
        }
    }
}

// Conversion: DBMessage → helpdesk_llm::Message
impl From<DBMessage> for helpdesk_llm::Message {
    fn from(msg: DBMessage) -> Self {
        match msg.sender {
            Sender::User => helpdesk_llm::Message::human(msg.text),
            Sender::Ai => helpdesk_llm::Message::ai(msg.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sender: Sender, text: &str) -> DBMessage {
        DBMessage {
            id: Uuid::new_v4(),
            conversation_id: Uuid::new_v4(),
            sender,
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sender_round_trips_through_str() {
        assert_eq!("user".parse::<Sender>().unwrap(), Sender::User);
        assert_eq!("ai".parse::<Sender>().unwrap(), Sender::Ai);
        assert_eq!(Sender::Ai.to_string(), "ai");
    }

    #[test]
    fn test_unknown_sender_rejected() {
        let err = "assistant".parse::<Sender>().unwrap_err();
        assert!(matches!(err, PersistError::InvalidSender(ref s) if s == "assistant"));
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Ai).unwrap(), "\"ai\"");
    }

    #[test]
    fn test_user_message_becomes_human_turn() {
        let llm: helpdesk_llm::Message = message(Sender::User, "Where is my order?").into();
        assert_eq!(llm, helpdesk_llm::Message::human("Where is my order?"));
    }

    #[test]
    fn test_ai_message_becomes_assistant_turn() {
        let llm: helpdesk_llm::Message = message(Sender::Ai, "On its way.").into();
        assert_eq!(llm.role(), "assistant");
        assert_eq!(llm.content(), "On its way.");
    }
}
