//! 对话服务
//!
//! 组合同一条消息的两个独立信号：知识库答案（如有）和预约意图标记。
//! 知识库无答案的消息交给 [`FallbackResponder`] 处理

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::intent::detect_scheduling_intent;
use crate::core::knowledge::KnowledgeBase;
use crate::core::matcher::DEFAULT_THRESHOLD;
use crate::domain::{ChatReply, ReplySource};

/// 通用兜底回答
pub const FALLBACK_ANSWER: &str = "Thanks for reaching out! Dobbs Tire & Auto Centers handles tires, brakes, alignments, \
oil changes, batteries, and more across 50+ St. Louis locations. Prices and availability \
vary by store, but I can help collect a few details and have our team follow up. Would you \
like to start an appointment request?";

/// 为知识库无法回答的消息生成回复
///
/// 实现不能失败：上游错误要转换成固定回答
#[async_trait]
pub trait FallbackResponder: Send + Sync {
    /// `scheduling_intent` 是已为 `message` 计算好的意图标记
    async fn respond(&self, message: &str, scheduling_intent: bool) -> String;

    /// 日志和回复元数据中使用的简短名称
    fn name(&self) -> &'static str;
}

/// 始终返回 [`FALLBACK_ANSWER`]
#[derive(Debug, Clone, Default)]
pub struct StaticFallback;

#[async_trait]
impl FallbackResponder for StaticFallback {
    async fn respond(&self, _message: &str, _scheduling_intent: bool) -> String {
        FALLBACK_ANSWER.to_string()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// 将用户消息解析为回复
#[derive(Clone)]
pub struct ChatService {
    knowledge: Arc<KnowledgeBase>,
    fallback: Arc<dyn FallbackResponder>,
    threshold: f64,
}

impl ChatService {
    pub fn new(knowledge: Arc<KnowledgeBase>, fallback: Arc<dyn FallbackResponder>) -> Self {
        Self {
            knowledge,
            fallback,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 回答一条原始用户消息
    pub async fn handle(&self, message: &str) -> ChatReply {
        let request_id = uuid::Uuid::new_v4().to_string();
        let matched = self.knowledge.best_match(message, self.threshold);
        let scheduling = detect_scheduling_intent(message);

        let reply = match matched {
            Some(result) => {
                debug!(question = %result.entry.question, score = result.score, "knowledge base match");
                ChatReply::new(result.entry.answer.clone(), scheduling, ReplySource::KnowledgeBase)
                    .with_metadata("source", "knowledge_base")
                    .with_metadata("question", result.entry.question.clone())
                    .with_metadata("score", result.score)
            }
            None => {
                let answer = self.fallback.respond(message, scheduling).await;
                ChatReply::new(answer, scheduling, ReplySource::Fallback)
                    .with_metadata("source", "fallback")
                    .with_metadata("responder", self.fallback.name())
            }
        };

        info!(
            request_id = %request_id,
            source = ?reply.source,
            scheduling_intent = scheduling,
            "chat message handled"
        );

        reply.with_metadata("request_id", request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge::Entry;

    fn service() -> ChatService {
        let kb = KnowledgeBase::new(vec![Entry::new("Hours?", "7 to 6", &["hours"])]).unwrap();
        ChatService::new(Arc::new(kb), Arc::new(StaticFallback))
    }

    #[tokio::test]
    async fn test_match_uses_entry_answer() {
        let reply = service().handle("hours").await;
        assert_eq!(reply.answer, "7 to 6");
        assert_eq!(reply.source, ReplySource::KnowledgeBase);
        assert_eq!(reply.metadata["question"], "Hours?");
        assert!(reply.metadata.contains_key("request_id"));
    }

    #[tokio::test]
    async fn test_no_match_uses_fallback() {
        let reply = service().handle("xyz").await;
        assert_eq!(reply.answer, FALLBACK_ANSWER);
        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(reply.metadata["responder"], "static");
    }
}
