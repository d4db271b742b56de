//! 测试通用工具

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Once};

use axum::Router;
use tokio::time::Duration;

use dobbs_assistant::core::knowledge::KnowledgeBase;
use dobbs_assistant::infrastructure::logger;

static INIT: Once = Once::new();

/// 初始化测试环境
pub fn setup() {
    INIT.call_once(|| {
        logger::try_init();
    });
}

/// 测试共用的内置知识库
pub fn builtin_kb() -> Arc<KnowledgeBase> {
    Arc::new(KnowledgeBase::builtin().expect("built-in knowledge base must load"))
}

/// 在本地随机端口启动 `app`
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // 等待服务器开始接受连接
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}
