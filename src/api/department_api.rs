// ==========================================
// 工厂员工技能矩阵管理系统 - 部门/主管 API
// ==========================================
// 职责: 部门增删改查（附员工/主管计数）、主管管理、部门月度得分快照
// 约束: 未删除部门名称唯一（大小写不敏感）；仍有在职员工的部门不可删除
// ==========================================

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::department::{Department, DepartmentWithCounts, Manager};
use crate::domain::performance::{is_valid_month, DepartmentPerformance};
use crate::engine::skill_score::score_percentage;
use crate::repository::{
    DepartmentPerformanceRepository, DepartmentRepository, EmployeeRepository,
    EmployeeSkillRepository, ManagerRepository,
};

/// 创建部门请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// 更新部门请求（缺省字段保持不变）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDepartmentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// 创建主管请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateManagerRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub department_id: String,
}

fn normalize_name(raw: &str) -> ApiResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidInput("部门名称不能为空".to_string()));
    }
    Ok(name.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ==========================================
// DepartmentApi - 部门 API
// ==========================================
pub struct DepartmentApi {
    department_repo: Arc<DepartmentRepository>,
    manager_repo: Arc<ManagerRepository>,
    employee_repo: Arc<EmployeeRepository>,
    employee_skill_repo: Arc<EmployeeSkillRepository>,
    performance_repo: Arc<DepartmentPerformanceRepository>,
}

impl DepartmentApi {
    pub fn new(
        department_repo: Arc<DepartmentRepository>,
        manager_repo: Arc<ManagerRepository>,
        employee_repo: Arc<EmployeeRepository>,
        employee_skill_repo: Arc<EmployeeSkillRepository>,
        performance_repo: Arc<DepartmentPerformanceRepository>,
    ) -> Self {
        Self {
            department_repo,
            manager_repo,
            employee_repo,
            employee_skill_repo,
            performance_repo,
        }
    }

    /// 部门列表（附未删除员工/主管计数）
    pub fn list_departments(&self) -> ApiResult<Vec<DepartmentWithCounts>> {
        Ok(self.department_repo.list_with_counts()?)
    }

    pub fn get_department(&self, department_id: &str) -> ApiResult<DepartmentWithCounts> {
        let department = self.require_department(department_id)?;
        Ok(DepartmentWithCounts {
            employee_count: self.employee_repo.count_by_department(department_id)?,
            manager_count: self.manager_repo.count_by_department(department_id)?,
            department,
        })
    }

    /// 创建部门
    ///
    /// # 返回
    /// - Err(ApiError::Conflict): 已存在同名未删除部门（不写入）
    pub fn create_department(&self, request: CreateDepartmentRequest) -> ApiResult<Department> {
        let name = normalize_name(&request.name)?;

        if let Some(existing) = self.department_repo.find_by_name(&name)? {
            return Err(ApiError::Conflict(format!(
                "部门名称已存在: {} (id={})",
                existing.name, existing.department_id
            )));
        }

        let department = Department::new(name, non_blank(request.description));
        self.department_repo.insert(&department)?;

        info!(department_id = %department.department_id, name = %department.name, "部门已创建");
        Ok(department)
    }

    pub fn update_department(
        &self,
        department_id: &str,
        request: UpdateDepartmentRequest,
    ) -> ApiResult<Department> {
        let mut department = self.require_department(department_id)?;

        if let Some(raw) = request.name {
            let name = normalize_name(&raw)?;
            if let Some(other) = self.department_repo.find_by_name(&name)? {
                if other.department_id != department.department_id {
                    return Err(ApiError::Conflict(format!("部门名称已存在: {}", other.name)));
                }
            }
            department.name = name;
        }
        if request.description.is_some() {
            department.description = non_blank(request.description);
        }
        department.updated_at = chrono::Local::now().naive_local();

        self.department_repo.update(&department)?;
        Ok(department)
    }

    /// 软删除部门
    ///
    /// # 返回
    /// - Err(ApiError::Conflict): 部门仍有未删除员工
    pub fn delete_department(&self, department_id: &str) -> ApiResult<()> {
        self.require_department(department_id)?;

        let employee_count = self.employee_repo.count_by_department(department_id)?;
        if employee_count > 0 {
            return Err(ApiError::Conflict(format!(
                "部门仍有 {} 名在职员工，无法删除",
                employee_count
            )));
        }

        self.department_repo.soft_delete(department_id)?;
        info!(department_id, "部门已删除");
        Ok(())
    }

    // ==========================================
    // 部门月度得分
    // ==========================================

    pub fn list_performance(&self, department_id: &str) -> ApiResult<Vec<DepartmentPerformance>> {
        self.require_department(department_id)?;
        Ok(self.performance_repo.list_by_department(department_id)?)
    }

    /// 记录部门某月得分（= 当前部门技能百分比）
    pub fn snapshot_performance(
        &self,
        department_id: &str,
        month: &str,
    ) -> ApiResult<DepartmentPerformance> {
        if !is_valid_month(month) {
            return Err(ApiError::InvalidInput(format!(
                "月份格式错误: {}（期望 YYYY-MM）",
                month
            )));
        }
        self.require_department(department_id)?;

        let levels = self
            .employee_skill_repo
            .list_by_department(department_id)?
            .into_iter()
            .map(|s| s.level);
        let score = score_percentage(levels);

        let record = self.performance_repo.upsert(department_id, month, score)?;
        info!(department_id, month, score, "部门得分快照已记录");
        Ok(record)
    }

    fn require_department(&self, department_id: &str) -> ApiResult<Department> {
        self.department_repo
            .find_by_id(department_id)?
            .ok_or_else(|| ApiError::NotFound(format!("部门(id={})不存在", department_id)))
    }
}

// ==========================================
// ManagerApi - 主管 API
// ==========================================
pub struct ManagerApi {
    manager_repo: Arc<ManagerRepository>,
    department_repo: Arc<DepartmentRepository>,
}

impl ManagerApi {
    pub fn new(
        manager_repo: Arc<ManagerRepository>,
        department_repo: Arc<DepartmentRepository>,
    ) -> Self {
        Self {
            manager_repo,
            department_repo,
        }
    }

    pub fn list_managers(&self, department_id: Option<&str>) -> ApiResult<Vec<Manager>> {
        Ok(self.manager_repo.list(department_id)?)
    }

    pub fn create_manager(&self, request: CreateManagerRequest) -> ApiResult<Manager> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("主管姓名不能为空".to_string()));
        }
        if self.department_repo.find_by_id(&request.department_id)?.is_none() {
            return Err(ApiError::ValidationError(format!(
                "部门(id={})不存在",
                request.department_id
            )));
        }

        let manager = Manager::new(name.to_string(), non_blank(request.email), request.department_id);
        self.manager_repo.insert(&manager)?;
        Ok(manager)
    }

    pub fn delete_manager(&self, manager_id: &str) -> ApiResult<()> {
        self.manager_repo.soft_delete(manager_id)?;
        info!(manager_id, "主管已删除");
        Ok(())
    }
}
