//! 配置管理
//!
//! 从进程环境变量读取配置（`.env` 由 main 提前加载）

use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::matcher::DEFAULT_THRESHOLD;
use crate::errors::{AssistantError, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///./data/app.db";
pub const DEFAULT_APP_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_VOICE_ID: &str = "YOUR_DEFAULT_VOICE_ID_HERE";
pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_STATIC_DIR: &str = "dist/public";

/// 预约数据的存储位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// SQLite 数据库文件
    File(PathBuf),
    /// 内存 SQLite 数据库
    InMemory,
}

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub app_origin: String,
    pub database_url: String,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: String,
    pub elevenlabs_base_url: String,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub match_threshold: f64,
    pub knowledge_base_path: Option<PathBuf>,
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从给定的键值表读取配置（测试、嵌入使用）
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空值视为未设置
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AssistantError::Config(format!("invalid PORT {:?}: {}", raw, e)))?,
            None => 8000,
        };

        let match_threshold = match get("MATCH_THRESHOLD") {
            Some(raw) => raw.trim().parse::<f64>().map_err(|e| {
                AssistantError::Config(format!("invalid MATCH_THRESHOLD {:?}: {}", raw, e))
            })?,
            None => DEFAULT_THRESHOLD,
        };

        let config = Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            app_origin: get("APP_ORIGIN").unwrap_or_else(|| DEFAULT_APP_ORIGIN.to_string()),
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            elevenlabs_api_key: get("ELEVENLABS_API_KEY"),
            elevenlabs_voice_id: get("ELEVENLABS_VOICE_ID")
                .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            elevenlabs_base_url: get("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ELEVENLABS_BASE_URL.to_string()),
            llm_api_key: get("LLM_API_KEY").or_else(|| get("GROQ_API_KEY")),
            llm_base_url: get("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            match_threshold,
            knowledge_base_path: get("KNOWLEDGE_BASE_PATH").map(PathBuf::from),
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        };

        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if !self.match_threshold.is_finite() || self.match_threshold < 0.0 {
            return Err(AssistantError::Config(format!(
                "MATCH_THRESHOLD must be a non-negative number, got {}",
                self.match_threshold
            )));
        }

        self.database_target()?;
        Ok(())
    }

    /// HTTP 服务监听地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 允许跨域访问的来源
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![
            "http://localhost".to_string(),
            "http://localhost:5173".to_string(),
            "http://127.0.0.1:5173".to_string(),
        ];
        if !self.app_origin.is_empty() && !origins.contains(&self.app_origin) {
            origins.push(self.app_origin.clone());
        }
        origins
    }

    /// 解析 `DATABASE_URL`
    pub fn database_target(&self) -> Result<DatabaseTarget> {
        let url = self.database_url.trim();
        if url == "sqlite::memory:" || url == "sqlite://:memory:" {
            return Ok(DatabaseTarget::InMemory);
        }

        let path = url
            .strip_prefix("sqlite:///")
            .or_else(|| url.strip_prefix("sqlite://"))
            .or_else(|| url.strip_prefix("sqlite:"))
            .ok_or_else(|| {
                AssistantError::Config(format!(
                    "unsupported DATABASE_URL {:?}, only sqlite URLs are supported",
                    url
                ))
            })?;

        if path.is_empty() {
            return Err(AssistantError::Config("DATABASE_URL has no path".to_string()));
        }

        Ok(DatabaseTarget::File(PathBuf::from(path)))
    }
}
