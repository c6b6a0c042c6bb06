// ==========================================
// 工厂员工技能矩阵管理系统 - 作业记录 API
// ==========================================
// 约束: 0 < hours_worked ≤ 24
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::work_history::{EmployeeWorkHistory, MAX_HOURS_PER_DAY};
use crate::repository::{EmployeeRepository, MachineRepository, WorkHistoryRepository};

/// 新增作业记录请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkHistoryRequest {
    pub employee_id: String,
    pub work_date: NaiveDate,
    pub hours_worked: f64,
    #[serde(default)]
    pub machine_id: Option<String>,
    #[serde(default)]
    pub shift: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// 解析逗号分隔的 ID 列表（去空白、去重）
pub fn parse_id_list(raw: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

pub struct WorkHistoryApi {
    work_history_repo: Arc<WorkHistoryRepository>,
    employee_repo: Arc<EmployeeRepository>,
    machine_repo: Arc<MachineRepository>,
}

impl WorkHistoryApi {
    pub fn new(
        work_history_repo: Arc<WorkHistoryRepository>,
        employee_repo: Arc<EmployeeRepository>,
        machine_repo: Arc<MachineRepository>,
    ) -> Self {
        Self {
            work_history_repo,
            employee_repo,
            machine_repo,
        }
    }

    /// 批量查询员工作业记录
    ///
    /// # 参数
    /// - ids: 逗号分隔的员工ID
    pub fn list_for_employees(&self, ids: &str) -> ApiResult<Vec<EmployeeWorkHistory>> {
        let employee_ids = parse_id_list(ids);
        if employee_ids.is_empty() {
            return Err(ApiError::InvalidInput("ids 不能为空".to_string()));
        }
        Ok(self.work_history_repo.list_by_employees(&employee_ids)?)
    }

    pub fn create_entry(&self, request: CreateWorkHistoryRequest) -> ApiResult<EmployeeWorkHistory> {
        if !request.hours_worked.is_finite()
            || request.hours_worked <= 0.0
            || request.hours_worked > MAX_HOURS_PER_DAY
        {
            return Err(ApiError::InvalidInput(format!(
                "工时必须在 (0, {}] 范围内: {}",
                MAX_HOURS_PER_DAY, request.hours_worked
            )));
        }

        let employee = self
            .employee_repo
            .find_by_id(&request.employee_id)?
            .ok_or_else(|| {
                ApiError::ValidationError(format!("员工(id={})不存在", request.employee_id))
            })?;

        let machine_id = request.machine_id.filter(|m| !m.trim().is_empty());
        if let Some(id) = machine_id.as_deref() {
            if self.machine_repo.find_by_id(id)?.is_none() {
                return Err(ApiError::ValidationError(format!("机台(id={})不存在", id)));
            }
        }

        let mut entry = EmployeeWorkHistory::new(employee.employee_id, request.work_date, request.hours_worked);
        entry.department_id = Some(employee.department_id);
        entry.machine_id = machine_id;
        entry.shift = request.shift;
        entry.notes = request.notes;

        self.work_history_repo.insert(&entry)?;
        Ok(entry)
    }
}
