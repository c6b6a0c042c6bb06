// ==========================================
// 工厂员工技能矩阵管理系统 - HTTP 响应信封
// ==========================================
// 格式: { "success": bool, "data"?: T, "message"?: string, "error"?: string }
// 错误: ApiError → 状态码 + 信封，4xx 记 warn，5xx 记 error
// 请求体与查询参数的提取失败同样走信封
// ==========================================

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }
}

impl ApiEnvelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(code: &str, message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            error: Some(code.to_string()),
        }
    }
}

/// 200 + 数据信封
pub fn ok<T: Serialize>(data: T) -> Json<ApiEnvelope<T>> {
    Json(ApiEnvelope::ok(data))
}

/// 201 + 数据信封
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiEnvelope<T>>) {
    (StatusCode::CREATED, Json(ApiEnvelope::ok(data)))
}

/// 200 + 仅消息
pub fn done(message: &str) -> Json<ApiEnvelope<()>> {
    Json(ApiEnvelope::message(message))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), code = self.code(), "请求失败: {}", self);
        } else {
            tracing::warn!(status = status.as_u16(), code = self.code(), "请求被拒绝: {}", self);
        }

        (status, Json(ApiEnvelope::failure(self.code(), self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(format!("请求体格式错误: {}", rejection.body_text()))
    }
}

/// 解包 JSON 请求体，格式错误统一为 400
pub fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value).map_err(ApiError::from)
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(format!("查询参数错误: {}", rejection.body_text()))
    }
}

/// 解包查询参数，缺失或格式错误统一为 400
pub fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query.map(|Query(value)| value).map_err(ApiError::from)
}

/// 在阻塞线程池执行同步 API 调用
pub async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("后台任务执行失败: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_序列化省略空字段() {
        let json = serde_json::to_value(ApiEnvelope::ok(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": [1, 2]}));

        let json = serde_json::to_value(ApiEnvelope::failure("NOT_FOUND", "x".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "x", "error": "NOT_FOUND"})
        );
    }

    #[test]
    fn test_api_error_状态码() {
        let resp = ApiError::Conflict("dup".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let resp = ApiError::InternalError("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
