//! Web 服务器模块
//!
//! 为聊天组件提供 HTTP API：对话、预约、语音合成、健康检查及前端静态文件

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{error, info, warn};

use crate::application::chat::ChatService;
use crate::core::config::DEFAULT_STATIC_DIR;
use crate::core::store::AppointmentStore;
use crate::domain::{AppointmentResponse, ChatRequest, ChatResponse, NewAppointment};
use crate::infrastructure::tts::{TtsClient, TtsError};

/// TTS 接口接受的最大字符数
pub const MAX_TTS_CHARS: usize = 2000;

// ==================== 错误响应 ====================

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// 请求体解析或校验失败
fn validation_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, message)
}

// ==================== 状态 ====================

pub struct AppState {
    pub chat: ChatService,
    pub store: Arc<dyn AppointmentStore>,
    pub tts: TtsClient,
    pub static_dir: PathBuf,
    pub allowed_origins: Vec<String>,
}

impl AppState {
    pub fn new(chat: ChatService, store: Arc<dyn AppointmentStore>, tts: TtsClient) -> Self {
        Self {
            chat,
            store,
            tts,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            allowed_origins: Vec::new(),
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }
}

// ==================== 请求类型 ====================

#[derive(Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(default)]
    pub voice_id: Option<String>,
}

// ==================== 处理器 ====================

/// 健康检查
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// 回答对话消息
async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return validation_error(rejection.body_text()),
    };

    if req.message.is_empty() {
        return validation_error("message must not be empty");
    }

    let reply = state.chat.handle(&req.message).await;
    Json(ChatResponse::from(reply)).into_response()
}

/// 创建预约
async fn create_appointment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewAppointment>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return validation_error(rejection.body_text()),
    };

    if let Err(e) = req.validate() {
        return validation_error(e.to_string());
    }

    match state.store.create(req).await {
        Ok(appointment) => {
            info!(id = appointment.id, "appointment request stored");
            (StatusCode::CREATED, Json(appointment.to_response())).into_response()
        }
        Err(e) => {
            error!("Appointment creation error: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create appointment")
        }
    }
}

/// 获取预约列表，最新的在前
async fn list_appointments(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list().await {
        Ok(appointments) => {
            let body: Vec<AppointmentResponse> =
                appointments.iter().map(|a| a.to_response()).collect();
            Json(body).into_response()
        }
        Err(e) => {
            error!("Appointments fetch error: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch appointments")
        }
    }
}

/// 获取单个预约
async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Response {
    let Ok(id) = appointment_id.parse::<i64>() else {
        return error_response(StatusCode::NOT_FOUND, "Appointment not found");
    };

    match state.store.get(id).await {
        Ok(Some(appointment)) => Json(appointment.to_response()).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Appointment not found"),
        Err(e) => {
            error!("Appointment fetch error: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch appointment")
        }
    }
}

/// 为助手消息合成语音
async fn synthesize_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return validation_error(rejection.body_text()),
    };

    if req.text.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Text must not be empty.");
    }

    if req.text.chars().count() > MAX_TTS_CHARS {
        return validation_error(format!("Text must be at most {} characters.", MAX_TTS_CHARS));
    }

    match state.tts.synthesize(&req.text, req.voice_id.as_deref()).await {
        Ok(audio) => (
            [
                (header::CONTENT_TYPE, "audio/mpeg"),
                (
                    header::CONTENT_DISPOSITION,
                    "inline; filename=\"dobbs_tts_response.mp3\"",
                ),
            ],
            audio,
        )
            .into_response(),
        Err(e @ TtsError::MissingApiKey) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(TtsError::Upstream { .. }) => {
            error_response(StatusCode::BAD_GATEWAY, "Upstream TTS service failed.")
        }
        Err(TtsError::Request(e)) => {
            warn!("TTS request failed: {}", e);
            error_response(
                StatusCode::BAD_GATEWAY,
                format!("TTS generation failed: {}", e),
            )
        }
    }
}

/// 没有前端构建产物时 `/` 返回的提示
async fn root_notice() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Client build not found. Run `npm run build` to generate dist/public or use Vite dev server on port 5173.",
    }))
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

// ==================== 路由 ====================

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// 同时挂载在 `/api` 和 `/api/v1` 下的路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(chat))
        .route(
            "/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route("/appointments/{id}", get(get_appointment))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/tts", post(synthesize_speech))
        .nest("/api", api_routes())
        .nest("/api/v1", api_routes().route("/tts", post(synthesize_speech)));

    let router = if state.static_dir.is_dir() {
        info!("Serving client build from {}", state.static_dir.display());
        let index = state.static_dir.join("index.html");
        router.fallback_service(ServeDir::new(&state.static_dir).fallback(ServeFile::new(index)))
    } else {
        router.route("/", get(root_notice)).fallback(not_found)
    };

    router.layer(cors).with_state(state)
}

// ==================== 服务器启动 ====================

pub async fn start_web_server(bind_addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Web server started on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
