//! Chat Models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Intent label attached to booking requests
pub const SCHEDULE_INTENT: &str = "schedule";

/// Incoming chat payload
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    KnowledgeBase,
    Fallback,
}

/// Reply produced by the chat service
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub answer: String,
    pub should_speak: bool,
    pub intent: Option<String>,
    pub is_scheduling_intent: bool,
    pub source: ReplySource,
    pub metadata: Map<String, Value>,
}

impl ChatReply {
    pub fn new(answer: impl Into<String>, is_scheduling_intent: bool, source: ReplySource) -> Self {
        Self {
            answer: answer.into(),
            should_speak: true,
            intent: is_scheduling_intent.then(|| SCHEDULE_INTENT.to_string()),
            is_scheduling_intent,
            source,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Response body of the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
    pub should_speak: bool,
    pub intent: Option<String>,
    pub metadata: Map<String, Value>,
    #[serde(rename = "isSchedulingIntent")]
    pub is_scheduling_intent: bool,
    /// Same as `text`, read by older widgets
    pub answer: Option<String>,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            answer: Some(reply.answer.clone()),
            text: reply.answer,
            should_speak: reply.should_speak,
            intent: reply.intent,
            metadata: reply.metadata,
            is_scheduling_intent: reply.is_scheduling_intent,
        }
    }
}
