use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ConversationId, MessageId, MessageType, UserId};

pub const MAX_CONTENT_LENGTH: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub content: String,
    pub message_type: MessageType,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    pub fn new(
        conversation_id: ConversationId,
        user_id: UserId,
        content: String,
        message_type: MessageType,
        metadata: Option<MessageMetadata>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            user_id,
            content: content.trim().to_string(),
            message_type,
            timestamp: Utc::now(),
            metadata,
        }
    }
}

/// Open metadata bag attached to a message. Stored and returned exactly as
/// sent; the well-known keys are read through accessors that ignore values of
/// an unexpected type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageMetadata(Map<String, Value>);

impl MessageMetadata {
    pub fn new(entries: Map<String, Value>) -> Self {
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn ai_model(&self) -> Option<&str> {
        self.0.get("aiModel").and_then(Value::as_str)
    }

    pub fn processing_time(&self) -> Option<f64> {
        self.0.get("processingTime").and_then(Value::as_f64)
    }

    pub fn tokens(&self) -> Option<f64> {
        self.0.get("tokens").and_then(Value::as_f64)
    }

    pub fn temperature(&self) -> Option<f64> {
        self.0.get("temperature").and_then(Value::as_f64)
    }
}
