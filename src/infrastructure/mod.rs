//! 基础设施层：外部系统
//!
//! 存储、LLM 兜底、语音合成、日志和 HTTP 服务

pub mod llm;
pub mod logger;
pub mod store;
pub mod tts;
pub mod web;
