// ==========================================
// HTTP 路由集成测试
// ==========================================
// 测试范围:
// 1. 信封格式与状态码（201/400/404/409），含查询参数提取失败
// 2. 作业记录批量查询路由
// 3. 矩阵向导全流程 + CSV 导出附件
// ==========================================


use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use skill_matrix::app::AppState;
use tempfile::NamedTempFile;
use test_helpers::create_test_db;
use skill_matrix::http::build_router;

struct TestServer {
    _temp_file: NamedTempFile,
    app: Router,
}

impl TestServer {
    fn new() -> Self {
        let (temp_file, db_path) = create_test_db().expect("无法创建测试数据库");
        let state = AppState::new(&db_path).expect("AppState 初始化失败");
        Self {
            app: build_router(Arc::new(state)),
            _temp_file: temp_file,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = self.app.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn test_部门路由_状态码() {
    let server = TestServer::new();

    let (status, body) = server
        .send("POST", "/api/departments", Some(json!({"name": "冲压车间"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["data"]["department_id"].as_str().unwrap().to_string();

    let (status, body) = server
        .send("POST", "/api/departments", Some(json!({"name": "冲压车间"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "CONFLICT");

    let (status, body) = server.send("GET", &format!("/api/departments/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["employee_count"], 0);

    let (status, _) = server
        .send(
            "POST",
            "/api/employees",
            Some(json!({
                "employee_code": "EMP-0001",
                "name": "张三",
                "gender": "Male",
                "department_id": "missing"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server.send("DELETE", &format!("/api/departments/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("data").is_none());

    let (status, _) = server.send("GET", &format!("/api/departments/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_查询参数错误_返回信封400() {
    let server = TestServer::new();
    let (_, dept) = server
        .send("POST", "/api/departments", Some(json!({"name": "冲压车间"})))
        .await;
    let id = dept["data"]["department_id"].as_str().unwrap().to_string();

    // 缺少必填的 month
    let (status, body) = server
        .send("POST", &format!("/api/departments/{}/performance/snapshot", id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("查询参数错误"));

    // 布尔参数无法解析
    let (status, body) = server
        .send("POST", "/api/seed-database?reset=maybe", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "INVALID_INPUT");

    let (status, body) = server
        .send("GET", "/api/dashboard/critical-stations?understaffed_only=1x", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_作业记录路由() {
    let server = TestServer::new();
    let (_, dept) = server
        .send("POST", "/api/departments", Some(json!({"name": "焊装车间"})))
        .await;
    let dept_id = dept["data"]["department_id"].as_str().unwrap();

    let (_, employee) = server
        .send(
            "POST",
            "/api/employees",
            Some(json!({
                "employee_code": "EMP-0001",
                "name": "张三",
                "gender": "Female",
                "department_id": dept_id,
                "experience_years": 3.5
            })),
        )
        .await;
    let employee_id = employee["data"]["employee_id"].as_str().unwrap().to_string();

    let (status, _) = server
        .send(
            "POST",
            "/api/work-history",
            Some(json!({"employee_id": employee_id, "work_date": "2026-09-01", "hours_worked": 8.0})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = server
        .send("GET", &format!("/api/all/workHistory?ids={}", employee_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["hours_worked"], 8.0);

    let (status, _) = server.send("GET", "/api/all/workHistory?ids=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_矩阵向导路由_导出csv() {
    let server = TestServer::new();
    let (_, dept) = server
        .send("POST", "/api/departments", Some(json!({"name": "涂装车间"})))
        .await;
    let dept_id = dept["data"]["department_id"].as_str().unwrap().to_string();
    let (_, machine) = server
        .send(
            "POST",
            "/api/machines",
            Some(json!({"name": "喷涂线", "department_id": dept_id, "is_critical_station": true})),
        )
        .await;
    let machine_id = machine["data"]["machine_id"].as_str().unwrap().to_string();
    assert_eq!(machine["data"]["female_eligible"], true);

    let (_, employee) = server
        .send(
            "POST",
            "/api/employees",
            Some(json!({
                "employee_code": "EMP-0001",
                "name": "李四",
                "gender": "Male",
                "department_id": dept_id
            })),
        )
        .await;
    let employee_id = employee["data"]["employee_id"].as_str().unwrap().to_string();

    let (status, draft) = server.send("POST", "/api/matrix-drafts", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(draft["data"]["step"], "DEPARTMENTS");
    let base = format!("/api/matrix-drafts/{}", draft["data"]["draft_id"].as_str().unwrap());

    let (status, _) = server.send("POST", &format!("{}/advance", base), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    server
        .send("PUT", &format!("{}/departments", base), Some(json!({"department_ids": [dept_id]})))
        .await;
    server.send("POST", &format!("{}/advance", base), None).await;
    let (status, _) = server
        .send(
            "POST",
            &format!("{}/columns", base),
            Some(json!({"kind": "MACHINE", "ref_id": machine_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    server.send("POST", &format!("{}/advance", base), None).await;
    server
        .send("POST", &format!("{}/employees", base), Some(json!({"employee_id": employee_id})))
        .await;
    let (status, body) = server
        .send(
            "PUT",
            &format!("{}/cells", base),
            Some(json!({"employee_id": employee_id, "column_label": "喷涂线", "level": "High"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rows"][0]["cells"]["喷涂线"], "High");

    let (_, body) = server.send("POST", &format!("{}/advance", base), None).await;
    assert_eq!(body["data"]["step"], "REVIEW");

    let (status, matrix) = server
        .send("POST", &format!("{}/finalize", base), Some(json!({"name": "涂装矩阵"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let matrix_id = matrix["data"]["matrix_id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri(format!("/api/matrices/{}/export", matrix_id))
        .body(Body::empty())
        .unwrap();
    let resp = server.app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment;"));
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("Employee Code,Employee Name,喷涂线,Average"));
    assert!(csv.contains("EMP-0001,李四,High,3.00"));

    let (_, logs) = server.send("GET", "/api/export-logs", None).await;
    assert_eq!(logs["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_驾驶舱与配置路由() {
    let server = TestServer::new();

    let (status, body) = server.send("POST", "/api/seed-database", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["departments"], 4);

    let (status, _) = server.send("POST", "/api/seed-database", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = server.send("GET", "/api/dashboard/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["department_count"], 4);

    let (status, body) = server
        .send("GET", "/api/dashboard/critical-stations?understaffed_only=false", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["data"].as_array().unwrap().is_empty());

    let (status, body) = server
        .send(
            "PUT",
            "/api/config/qualified_min_level",
            Some(json!({"value": "High"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], "High");

    let (status, _) = server
        .send("PUT", "/api/config/qualified_min_level", Some(json!({"value": "Guru"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.send("GET", "/api/config/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
