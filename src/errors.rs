//! 标准化错误处理
//!
//! 定义助手后端共用的错误类型

use thiserror::Error;

/// 助手主要错误类型
#[derive(Error, Debug)]
pub enum AssistantError {
    /// 知识库表格式错误或无法读取
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 输入校验错误
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<serde_yaml::Error> for AssistantError {
    fn from(err: serde_yaml::Error) -> Self {
        AssistantError::KnowledgeBase(err.to_string())
    }
}

/// 项目统一的 Result 类型
pub type Result<T> = std::result::Result<T, AssistantError>;
