// ==========================================
// 工厂员工技能矩阵管理系统 - HTTP 服务
// ==========================================
// 职责: 组装路由与中间件、监听端口、优雅停机
// ==========================================

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::app::AppState;
use crate::config::AppConfig;
use crate::http::routes::api_router;

/// 组装完整路由（含请求追踪）
pub fn build_router(state: Arc<AppState>) -> Router {
    api_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 启动 HTTP 服务，直到收到 Ctrl+C
pub async fn start_server(config: AppConfig) -> Result<()> {
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("无法创建数据库目录: {}", parent.display()))?;
    }

    let db_path = config.db_path.to_string_lossy().to_string();
    let state = AppState::new(&db_path)
        .map_err(anyhow::Error::msg)
        .context("AppState 初始化失败")?;

    let mut app = build_router(Arc::new(state));
    if config.cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("无法监听地址 {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!(%local_addr, db_path = %db_path, "技能矩阵服务已启动");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("无法监听 Ctrl+C 信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到停机信号，正在关闭...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let conn = crate::db::open_shared_connection(":memory:").unwrap();
        let state = AppState::from_connection(":memory:".to_string(), conn);
        build_router(Arc::new(state))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_健康检查() {
        let app = test_router();
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_创建部门返回201() {
        let app = test_router();
        let req = Request::builder()
            .method("POST")
            .uri("/api/departments")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({"name": "冲压车间"}).to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["name"], "冲压车间");
    }

    #[tokio::test]
    async fn test_请求体格式错误返回400() {
        let app = test_router();
        let req = Request::builder()
            .method("POST")
            .uri("/api/departments")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_员工不存在返回404() {
        let app = test_router();
        let req = Request::builder()
            .uri("/api/employees/missing")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_作业记录缺少ids返回400() {
        let app = test_router();
        let req = Request::builder()
            .uri("/api/all/workHistory")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
