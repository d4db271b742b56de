//! # Service Bootstrap Module
//!
//! Wires configuration, knowledge base, storage and collaborators together
//! and starts the HTTP server

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::application::chat::{ChatService, FallbackResponder, StaticFallback};
use crate::core::config::{AppConfig, DatabaseTarget};
use crate::core::knowledge::KnowledgeBase;
use crate::core::store::AppointmentStore;
use crate::infrastructure::llm::LlmFallback;
use crate::infrastructure::store::SqliteAppointmentStore;
use crate::infrastructure::tts::TtsClient;
use crate::infrastructure::web::{start_web_server, AppState};

/// Service launcher
pub struct Launcher {
    config: AppConfig,
}

impl Launcher {
    /// Create a launcher from the process environment
    pub fn from_env() -> Result<Self> {
        let config = AppConfig::from_env().context("invalid configuration")?;
        Ok(Self { config })
    }

    /// Create a launcher with an explicit configuration
    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build every component and serve until the process stops
    pub async fn launch(&self) -> Result<()> {
        info!("🚀 Launching Dobbs service assistant...");

        let state = self.build_state()?;
        start_web_server(&self.config.bind_addr(), Arc::new(state)).await
    }

    /// Build the shared application state
    ///
    /// Fails when the knowledge base is malformed or the database cannot
    /// be opened.
    pub fn build_state(&self) -> Result<AppState> {
        let knowledge = KnowledgeBase::load(self.config.knowledge_base_path.as_deref())
            .context("failed to load knowledge base")?;

        let chat = ChatService::new(Arc::new(knowledge), self.build_fallback())
            .with_threshold(self.config.match_threshold);

        let tts = TtsClient::new(
            self.config.elevenlabs_base_url.clone(),
            self.config.elevenlabs_api_key.clone(),
            self.config.elevenlabs_voice_id.clone(),
        );
        if !tts.is_configured() {
            warn!("⚠️  ELEVENLABS_API_KEY not set, /tts will answer with an error");
        }

        Ok(AppState::new(chat, self.build_store()?, tts)
            .with_static_dir(self.config.static_dir.clone())
            .with_allowed_origins(self.config.allowed_origins()))
    }

    fn build_store(&self) -> Result<Arc<dyn AppointmentStore>> {
        let store = match self.config.database_target()? {
            DatabaseTarget::File(path) => SqliteAppointmentStore::new(path)?,
            DatabaseTarget::InMemory => {
                info!("Using in-memory appointment database");
                SqliteAppointmentStore::new_in_memory()?
            }
        };
        Ok(Arc::new(store))
    }

    fn build_fallback(&self) -> Arc<dyn FallbackResponder> {
        match &self.config.llm_api_key {
            Some(api_key) => {
                info!("🤖 LLM fallback enabled ({})", self.config.llm_model);
                Arc::new(LlmFallback::new_with_base_url(
                    api_key.clone(),
                    self.config.llm_model.clone(),
                    self.config.llm_base_url.clone(),
                ))
            }
            None => {
                info!("No LLM API key configured, using the static fallback answer");
                Arc::new(StaticFallback)
            }
        }
    }
}
