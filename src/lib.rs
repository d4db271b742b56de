//! Dobbs 门店客服助手后端
//!
//! 基于固定 FAQ 知识库回答顾客消息，并标记预约意图：
//! - 知识库关键词匹配（纯词法，无状态）
//! - 预约意图识别
//! - 未命中时的兜底回答（静态文本或 LLM）
//! - 预约登记（SQLite）
//! - 助手回复的语音合成（ElevenLabs）
//!
//! # 分层
//!
//! - `core`: 知识库、匹配器、意图识别、配置、存储接口
//! - `domain`: 传输与存储模型
//! - `application`: 对话编排
//! - `infrastructure`: SQLite、LLM、TTS、日志、HTTP 服务

// 核心层
pub mod core;

// 领域模型
pub mod domain;

// 应用层
pub mod application;

// 基础设施层
pub mod infrastructure;

pub mod bootstrap;
pub mod errors;

pub use application::chat::{ChatService, FallbackResponder, StaticFallback};
pub use bootstrap::Launcher;
pub use crate::core::config::AppConfig;
pub use crate::core::intent::detect_scheduling_intent;
pub use crate::core::knowledge::{Entry, KnowledgeBase};
pub use crate::core::matcher::{MatchResult, DEFAULT_THRESHOLD};
pub use errors::{AssistantError, Result};

/// 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
