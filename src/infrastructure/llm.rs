//! LLM 兜底回复
//!
//! 使用 async-openai 调用 OpenAI 兼容接口（默认 Groq），回答知识库未覆盖的问题

use anyhow::{Context, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::warn;

use crate::application::chat::FallbackResponder;

pub const SYSTEM_PROMPT: &str = "You are a friendly and helpful customer service assistant for Dobbs Tire & Auto Centers, a family-operated auto service company in St. Louis since 1976.

IMPORTANT GUIDELINES:
- Be concise and friendly, like a helpful service advisor
- Never invent specific prices - always say \"prices vary\" or \"contact your local store for pricing\"
- Never claim exact inventory - say \"I can help check availability\"
- For tire size questions, explain where to find it (sidewall, driver door jamb, owner's manual)
- Always funnel toward scheduling: offer to collect appointment information
- If you don't know something, say \"I don't have that specific information, but I can help connect you with our team\"

KNOWN FACTS ABOUT DOBBS:
- Over 50 locations in the St. Louis area
- Services: tires, brakes, alignments, oil changes, batteries, general auto repair
- Tire brands: Michelin, Goodyear, Bridgestone, Firestone, Continental, Pirelli, Cooper, BF Goodrich, and more
- Free tire inspections
- Price-match guarantee on tires
- Most locations open Mon-Sat roughly 7AM-6PM (hours vary by location)
- ASE-certified technicians
- Family-operated since 1976

Keep responses under 3 sentences when possible.";

/// 模型返回空内容时使用
pub const EMPTY_COMPLETION_ANSWER: &str =
    "I'm here to help! Could you please rephrase your question?";

/// 上游调用失败时使用
pub const UPSTREAM_ERROR_ANSWER: &str = "I'm having trouble connecting to my knowledge base right now. \
Dobbs Tire & Auto Centers offers tires, brakes, oil changes, alignments, and more at over 50 locations. \
Would you like to schedule an appointment so our team can help you directly?";

const TEMPERATURE: f32 = 0.7;
const MAX_COMPLETION_TOKENS: u32 = 200;

/// OpenAI 兼容对话客户端
#[derive(Clone)]
pub struct LlmFallback {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmFallback {
    pub fn new_with_base_url(api_key: String, model: String, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();

        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);

        let client = Client::with_config(config);

        Self { client, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// 请求模型回答顾客消息
    pub async fn complete(&self, message: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map(ChatCompletionRequestMessage::System)
                .context("failed to build system message")?,
            ChatCompletionRequestUserMessageArgs::default()
                .content(message)
                .build()
                .map(ChatCompletionRequestMessage::User)
                .context("failed to build user message")?,
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(TEMPERATURE)
            .max_completion_tokens(MAX_COMPLETION_TOKENS)
            .build()
            .context("failed to build completion request")?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .context("LLM API call failed")?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}

#[async_trait]
impl FallbackResponder for LlmFallback {
    async fn respond(&self, message: &str, _scheduling_intent: bool) -> String {
        match self.complete(message).await {
            Ok(answer) if !answer.trim().is_empty() => answer,
            Ok(_) => EMPTY_COMPLETION_ANSWER.to_string(),
            Err(e) => {
                warn!("LLM fallback failed: {:#}", e);
                UPSTREAM_ERROR_ANSWER.to_string()
            }
        }
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}
