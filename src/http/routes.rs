// ==========================================
// 工厂员工技能矩阵管理系统 - HTTP 路由
// ==========================================
// 职责: 路由表 + 处理函数（参数提取 → 阻塞线程调用 API → 信封响应）
// 约定: 创建类 POST 返回 201；删除返回仅含消息的信封
// ==========================================

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::header,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::config_api::UpdateConfigRequest;
use crate::api::department_api::{
    CreateDepartmentRequest, CreateManagerRequest, UpdateDepartmentRequest,
};
use crate::api::employee_api::{
    CreateEmployeeRequest, UpdateEmployeeRequest, UpsertEmployeeSkillRequest,
};
use crate::api::error::ApiError;
use crate::api::matrix_api::{
    AddColumnRequest, AddEmployeeRequest, FinalizeRequest, SelectDepartmentsRequest,
    SetCellRequest,
};
use crate::api::skill_api::{CreateMachineRequest, CreateSkillRequest};
use crate::api::work_history_api::{parse_id_list, CreateWorkHistoryRequest};
use crate::app::AppState;
use crate::http::envelope::{blocking, created, done, ok, parse_body, parse_query};

pub type SharedState = Arc<AppState>;

type HandlerResult = Result<axum::response::Response, ApiError>;

// ==========================================
// 查询参数
// ==========================================

#[derive(Debug, Default, Deserialize)]
pub struct DepartmentFilter {
    pub department_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdsQuery {
    #[serde(default)]
    pub ids: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CriticalQuery {
    #[serde(default)]
    pub understaffed_only: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchQuery {
    #[serde(default)]
    pub columns: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub exported_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportLogQuery {
    pub matrix_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedQuery {
    #[serde(default)]
    pub reset: bool,
}

// ==========================================
// 路由表
// ==========================================

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health))
        // 部门 / 主管
        .route("/api/departments", get(list_departments).post(create_department))
        .route(
            "/api/departments/{id}",
            get(get_department).put(update_department).delete(delete_department),
        )
        .route("/api/departments/{id}/performance", get(list_performance))
        .route(
            "/api/departments/{id}/performance/snapshot",
            post(snapshot_performance),
        )
        .route("/api/managers", get(list_managers).post(create_manager))
        .route("/api/managers/{id}", delete(delete_manager))
        // 员工
        .route("/api/employees", get(list_employees).post(create_employee))
        .route(
            "/api/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route(
            "/api/employees/{id}/skills",
            get(get_skill_profile).put(upsert_employee_skill),
        )
        .route("/api/employee-skills/{id}", delete(delete_employee_skill))
        // 技能 / 机台
        .route("/api/skills", get(list_skills).post(create_skill))
        .route("/api/skills/{id}", delete(delete_skill))
        .route("/api/machines", get(list_machines).post(create_machine))
        .route("/api/machines/{id}", get(get_machine).delete(delete_machine))
        // 作业记录
        .route("/api/all/workHistory", get(list_work_history))
        .route("/api/work-history", post(create_work_history))
        // 驾驶舱
        .route("/api/dashboard/summary", get(dashboard_summary))
        .route("/api/dashboard/distribution", get(dashboard_distribution))
        .route(
            "/api/dashboard/departments/{id}/matrix",
            get(dashboard_department_matrix),
        )
        .route(
            "/api/dashboard/machines/{id}/coverage",
            get(dashboard_machine_coverage),
        )
        .route("/api/dashboard/critical-stations", get(dashboard_critical_stations))
        .route("/api/dashboard/employees/{id}/match", get(dashboard_employee_match))
        // 矩阵向导
        .route("/api/matrix-drafts", post(create_draft))
        .route("/api/matrix-drafts/{id}", get(get_draft).delete(discard_draft))
        .route("/api/matrix-drafts/{id}/departments", put(select_departments))
        .route("/api/matrix-drafts/{id}/columns", post(add_column))
        .route("/api/matrix-drafts/{id}/columns/{label}", delete(remove_column))
        .route("/api/matrix-drafts/{id}/employees", post(add_draft_employee))
        .route(
            "/api/matrix-drafts/{id}/employees/{employee_id}",
            delete(remove_draft_employee),
        )
        .route("/api/matrix-drafts/{id}/cells", put(set_cell))
        .route("/api/matrix-drafts/{id}/advance", post(advance_draft))
        .route("/api/matrix-drafts/{id}/back", post(back_draft))
        .route("/api/matrix-drafts/{id}/import", post(import_draft_file))
        .route("/api/matrix-drafts/{id}/finalize", post(finalize_draft))
        // 已保存矩阵 / 导出
        .route("/api/matrices", get(list_matrices))
        .route("/api/matrices/{id}", get(get_matrix).delete(delete_matrix))
        .route("/api/matrices/{id}/export", get(export_matrix))
        .route("/api/export-logs", get(list_export_logs))
        // 运维
        .route("/api/seed-database", post(seed_database))
        .route("/api/config", get(list_configs))
        .route("/api/config/{key}", get(get_config).put(update_config))
}

async fn health() -> impl IntoResponse {
    ok(json!({ "status": "ok", "version": crate::VERSION }))
}

// ==========================================
// 部门 / 主管
// ==========================================

async fn list_departments(State(state): State<SharedState>) -> HandlerResult {
    let api = state.department_api.clone();
    let data = blocking(move || api.list_departments()).await?;
    Ok(ok(data).into_response())
}

async fn get_department(State(state): State<SharedState>, Path(id): Path<String>) -> HandlerResult {
    let api = state.department_api.clone();
    let data = blocking(move || api.get_department(&id)).await?;
    Ok(ok(data).into_response())
}

async fn create_department(
    State(state): State<SharedState>,
    body: Result<Json<CreateDepartmentRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.department_api.clone();
    let data = blocking(move || api.create_department(request)).await?;
    Ok(created(data).into_response())
}

async fn update_department(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateDepartmentRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.department_api.clone();
    let data = blocking(move || api.update_department(&id, request)).await?;
    Ok(ok(data).into_response())
}

async fn delete_department(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let api = state.department_api.clone();
    blocking(move || api.delete_department(&id)).await?;
    Ok(done("部门已删除").into_response())
}

async fn list_performance(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let api = state.department_api.clone();
    let data = blocking(move || api.list_performance(&id)).await?;
    Ok(ok(data).into_response())
}

async fn snapshot_performance(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> HandlerResult {
    let query = parse_query(query)?;
    let api = state.department_api.clone();
    let data = blocking(move || api.snapshot_performance(&id, &query.month)).await?;
    Ok(created(data).into_response())
}

async fn list_managers(
    State(state): State<SharedState>,
    filter: Result<Query<DepartmentFilter>, QueryRejection>,
) -> HandlerResult {
    let filter = parse_query(filter)?;
    let api = state.manager_api.clone();
    let data = blocking(move || api.list_managers(filter.department_id.as_deref())).await?;
    Ok(ok(data).into_response())
}

async fn create_manager(
    State(state): State<SharedState>,
    body: Result<Json<CreateManagerRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.manager_api.clone();
    let data = blocking(move || api.create_manager(request)).await?;
    Ok(created(data).into_response())
}

async fn delete_manager(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let api = state.manager_api.clone();
    blocking(move || api.delete_manager(&id)).await?;
    Ok(done("主管已删除").into_response())
}

// ==========================================
// 员工
// ==========================================

async fn list_employees(
    State(state): State<SharedState>,
    filter: Result<Query<DepartmentFilter>, QueryRejection>,
) -> HandlerResult {
    let filter = parse_query(filter)?;
    let api = state.employee_api.clone();
    let data = blocking(move || api.list_employees(filter.department_id.as_deref())).await?;
    Ok(ok(data).into_response())
}

async fn get_employee(State(state): State<SharedState>, Path(id): Path<String>) -> HandlerResult {
    let api = state.employee_api.clone();
    let data = blocking(move || api.get_employee(&id)).await?;
    Ok(ok(data).into_response())
}

async fn create_employee(
    State(state): State<SharedState>,
    body: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.employee_api.clone();
    let data = blocking(move || api.create_employee(request)).await?;
    Ok(created(data).into_response())
}

async fn update_employee(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.employee_api.clone();
    let data = blocking(move || api.update_employee(&id, request)).await?;
    Ok(ok(data).into_response())
}

async fn delete_employee(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let api = state.employee_api.clone();
    blocking(move || api.delete_employee(&id)).await?;
    Ok(done("员工已删除").into_response())
}

async fn get_skill_profile(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let api = state.employee_api.clone();
    let data = blocking(move || api.get_skill_profile(&id)).await?;
    Ok(ok(data).into_response())
}

async fn upsert_employee_skill(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<UpsertEmployeeSkillRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.employee_api.clone();
    let data = blocking(move || api.upsert_skill(&id, request)).await?;
    Ok(ok(data).into_response())
}

async fn delete_employee_skill(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let api = state.employee_api.clone();
    blocking(move || api.delete_skill(&id)).await?;
    Ok(done("员工技能已删除").into_response())
}

// ==========================================
// 技能 / 机台
// ==========================================

async fn list_skills(
    State(state): State<SharedState>,
    filter: Result<Query<DepartmentFilter>, QueryRejection>,
) -> HandlerResult {
    let filter = parse_query(filter)?;
    let api = state.skill_api.clone();
    let data = blocking(move || api.list_skills(filter.department_id.as_deref())).await?;
    Ok(ok(data).into_response())
}

async fn create_skill(
    State(state): State<SharedState>,
    body: Result<Json<CreateSkillRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.skill_api.clone();
    let data = blocking(move || api.create_skill(request)).await?;
    Ok(created(data).into_response())
}

async fn delete_skill(State(state): State<SharedState>, Path(id): Path<String>) -> HandlerResult {
    let api = state.skill_api.clone();
    blocking(move || api.delete_skill(&id)).await?;
    Ok(done("技能已删除").into_response())
}

async fn list_machines(
    State(state): State<SharedState>,
    filter: Result<Query<DepartmentFilter>, QueryRejection>,
) -> HandlerResult {
    let filter = parse_query(filter)?;
    let api = state.skill_api.clone();
    let data = blocking(move || api.list_machines(filter.department_id.as_deref())).await?;
    Ok(ok(data).into_response())
}

async fn get_machine(State(state): State<SharedState>, Path(id): Path<String>) -> HandlerResult {
    let api = state.skill_api.clone();
    let data = blocking(move || api.get_machine(&id)).await?;
    Ok(ok(data).into_response())
}

async fn create_machine(
    State(state): State<SharedState>,
    body: Result<Json<CreateMachineRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.skill_api.clone();
    let data = blocking(move || api.create_machine(request)).await?;
    Ok(created(data).into_response())
}

async fn delete_machine(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let api = state.skill_api.clone();
    blocking(move || api.delete_machine(&id)).await?;
    Ok(done("机台已删除").into_response())
}

// ==========================================
// 作业记录
// ==========================================

async fn list_work_history(
    State(state): State<SharedState>,
    query: Result<Query<IdsQuery>, QueryRejection>,
) -> HandlerResult {
    let query = parse_query(query)?;
    let api = state.work_history_api.clone();
    let data = blocking(move || api.list_for_employees(&query.ids)).await?;
    Ok(ok(data).into_response())
}

async fn create_work_history(
    State(state): State<SharedState>,
    body: Result<Json<CreateWorkHistoryRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.work_history_api.clone();
    let data = blocking(move || api.create_entry(request)).await?;
    Ok(created(data).into_response())
}

// ==========================================
// 驾驶舱
// ==========================================

async fn dashboard_summary(State(state): State<SharedState>) -> HandlerResult {
    let api = state.dashboard_api.clone();
    let data = blocking(move || api.get_summary()).await?;
    Ok(ok(data).into_response())
}

async fn dashboard_distribution(State(state): State<SharedState>) -> HandlerResult {
    let api = state.dashboard_api.clone();
    let data = blocking(move || api.get_distribution()).await?;
    Ok(ok(data).into_response())
}

async fn dashboard_department_matrix(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let api = state.dashboard_api.clone();
    let data = blocking(move || api.get_department_matrix(&id)).await?;
    Ok(ok(data).into_response())
}

async fn dashboard_machine_coverage(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let api = state.dashboard_api.clone();
    let data = blocking(move || api.get_machine_coverage(&id)).await?;
    Ok(ok(data).into_response())
}

async fn dashboard_critical_stations(
    State(state): State<SharedState>,
    query: Result<Query<CriticalQuery>, QueryRejection>,
) -> HandlerResult {
    let query = parse_query(query)?;
    let api = state.dashboard_api.clone();
    let data = blocking(move || api.list_critical_coverage(query.understaffed_only)).await?;
    Ok(ok(data).into_response())
}

async fn dashboard_employee_match(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    query: Result<Query<MatchQuery>, QueryRejection>,
) -> HandlerResult {
    let query = parse_query(query)?;
    let api = state.dashboard_api.clone();
    let columns = parse_id_list(&query.columns);
    let data = blocking(move || api.get_employee_match(&id, &columns)).await?;
    Ok(ok(data).into_response())
}

// ==========================================
// 矩阵向导
// ==========================================

async fn create_draft(State(state): State<SharedState>) -> HandlerResult {
    let api = state.matrix_api.clone();
    let data = blocking(move || api.create_draft()).await?;
    Ok(created(data).into_response())
}

async fn get_draft(State(state): State<SharedState>, Path(id): Path<String>) -> HandlerResult {
    let api = state.matrix_api.clone();
    let data = blocking(move || api.get_draft(&id)).await?;
    Ok(ok(data).into_response())
}

async fn discard_draft(State(state): State<SharedState>, Path(id): Path<String>) -> HandlerResult {
    let api = state.matrix_api.clone();
    blocking(move || api.discard_draft(&id)).await?;
    Ok(done("矩阵草稿已丢弃").into_response())
}

async fn select_departments(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<SelectDepartmentsRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.matrix_api.clone();
    let data = blocking(move || api.select_departments(&id, request)).await?;
    Ok(ok(data).into_response())
}

async fn add_column(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<AddColumnRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.matrix_api.clone();
    let data = blocking(move || api.add_column(&id, request)).await?;
    Ok(ok(data).into_response())
}

async fn remove_column(
    State(state): State<SharedState>,
    Path((id, label)): Path<(String, String)>,
) -> HandlerResult {
    let api = state.matrix_api.clone();
    let data = blocking(move || api.remove_column(&id, &label)).await?;
    Ok(ok(data).into_response())
}

async fn add_draft_employee(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<AddEmployeeRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.matrix_api.clone();
    let data = blocking(move || api.add_employee(&id, request)).await?;
    Ok(ok(data).into_response())
}

async fn remove_draft_employee(
    State(state): State<SharedState>,
    Path((id, employee_id)): Path<(String, String)>,
) -> HandlerResult {
    let api = state.matrix_api.clone();
    let data = blocking(move || api.remove_employee(&id, &employee_id)).await?;
    Ok(ok(data).into_response())
}

async fn set_cell(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<SetCellRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.matrix_api.clone();
    let data = blocking(move || api.set_cell(&id, request)).await?;
    Ok(ok(data).into_response())
}

async fn advance_draft(State(state): State<SharedState>, Path(id): Path<String>) -> HandlerResult {
    let api = state.matrix_api.clone();
    let data = blocking(move || api.advance(&id)).await?;
    Ok(ok(data).into_response())
}

async fn back_draft(State(state): State<SharedState>, Path(id): Path<String>) -> HandlerResult {
    let api = state.matrix_api.clone();
    let data = blocking(move || api.back(&id)).await?;
    Ok(ok(data).into_response())
}

/// 请求体为原始文件内容，格式由 ?format=csv|xlsx 指定（缺省 csv）
async fn import_draft_file(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    query: Result<Query<ImportQuery>, QueryRejection>,
    body: Bytes,
) -> HandlerResult {
    let query = parse_query(query)?;
    let api = state.matrix_api.clone();
    let format = query.format.unwrap_or_else(|| "csv".to_string());
    let data = blocking(move || api.import_file(&id, &format, &body)).await?;
    Ok(ok(data).into_response())
}

async fn finalize_draft(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<FinalizeRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.matrix_api.clone();
    let data = blocking(move || api.finalize(&id, request)).await?;
    Ok(created(data).into_response())
}

// ==========================================
// 已保存矩阵 / 导出
// ==========================================

async fn list_matrices(State(state): State<SharedState>) -> HandlerResult {
    let api = state.matrix_api.clone();
    let data = blocking(move || api.list_matrices()).await?;
    Ok(ok(data).into_response())
}

async fn get_matrix(State(state): State<SharedState>, Path(id): Path<String>) -> HandlerResult {
    let api = state.matrix_api.clone();
    let data = blocking(move || api.get_matrix(&id)).await?;
    Ok(ok(data).into_response())
}

async fn delete_matrix(State(state): State<SharedState>, Path(id): Path<String>) -> HandlerResult {
    let api = state.matrix_api.clone();
    blocking(move || api.delete_matrix(&id)).await?;
    Ok(done("技能矩阵已删除").into_response())
}

/// 导出为 CSV 附件（非信封响应）
async fn export_matrix(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> HandlerResult {
    let query = parse_query(query)?;
    let api = state.matrix_api.clone();
    let file = blocking(move || api.export_matrix(&id, query.exported_by.as_deref())).await?;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

async fn list_export_logs(
    State(state): State<SharedState>,
    query: Result<Query<ExportLogQuery>, QueryRejection>,
) -> HandlerResult {
    let query = parse_query(query)?;
    let api = state.matrix_api.clone();
    let data =
        blocking(move || api.list_export_logs(query.matrix_id.as_deref(), query.limit)).await?;
    Ok(ok(data).into_response())
}

// ==========================================
// 运维
// ==========================================

async fn seed_database(
    State(state): State<SharedState>,
    query: Result<Query<SeedQuery>, QueryRejection>,
) -> HandlerResult {
    let query = parse_query(query)?;
    let api = state.seed_api.clone();
    let data = blocking(move || api.seed_database(query.reset)).await?;
    Ok(created(data).into_response())
}

async fn list_configs(State(state): State<SharedState>) -> HandlerResult {
    let api = state.config_api.clone();
    let data = blocking(move || api.list_configs()).await?;
    Ok(ok(data).into_response())
}

async fn get_config(State(state): State<SharedState>, Path(key): Path<String>) -> HandlerResult {
    let api = state.config_api.clone();
    let data = blocking(move || api.get_config(&key)).await?;
    Ok(ok(data).into_response())
}

async fn update_config(
    State(state): State<SharedState>,
    Path(key): Path<String>,
    body: Result<Json<UpdateConfigRequest>, JsonRejection>,
) -> HandlerResult {
    let request = parse_body(body)?;
    let api = state.config_api.clone();
    let data = blocking(move || api.update_config(&key, request)).await?;
    Ok(ok(data).into_response())
}
