//! ElevenLabs 语音合成客户端

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

const MODEL_ID: &str = "eleven_multilingual_v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 语音合成错误
#[derive(Error, Debug)]
pub enum TtsError {
    #[error("ELEVENLABS_API_KEY is not configured on the server.")]
    MissingApiKey,

    #[error("upstream TTS service returned {status}")]
    Upstream { status: u16, body: String },

    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("failed to build TTS HTTP client, requests will have no timeout: {}", e);
            reqwest::Client::new()
        })
}

/// 语音合成客户端
#[derive(Clone)]
pub struct TtsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    default_voice_id: String,
}

impl TtsClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        default_voice_id: impl Into<String>,
    ) -> Self {
        Self {
            http: http_client(REQUEST_TIMEOUT),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            default_voice_id: default_voice_id.into(),
        }
    }

    /// 设置单次请求超时（默认 30 秒）
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = http_client(timeout);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// 合成 `text` 并返回 MP3 数据
    ///
    /// 未指定 `voice_id` 时使用默认音色
    pub async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Result<Vec<u8>, TtsError> {
        let api_key = self.api_key.as_deref().ok_or(TtsError::MissingApiKey)?;

        let voice = voice_id
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(self.default_voice_id.as_str());
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, voice);

        let payload = SynthesisRequest {
            text,
            model_id: MODEL_ID,
            voice_settings: VoiceSettings {
                stability: 0.55,
                similarity_boost: 0.75,
            },
        };

        let response = self
            .http
            .post(&url)
            .header("xi-api-key", api_key)
            .header("Accept", "audio/mpeg")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!("ElevenLabs TTS failed ({}): {}", status, body);
            return Err(TtsError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
