// ==========================================
// 工厂员工技能矩阵管理系统 - 员工 API
// ==========================================
// 职责: 员工增删改查、员工技能画像、员工技能等级维护
// 约束: 未删除员工工号唯一；员工必须归属已存在的部门
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::employee::Employee;
use crate::domain::skill::EmployeeSkill;
use crate::domain::types::{Gender, SkillLevel};
use crate::engine::aggregation::{
    machine_name_index, skill_name_index, EmployeeSkillProfile, SkillAggregator,
};
use crate::repository::{
    DepartmentRepository, EmployeeRepository, EmployeeSkillRepository, MachineRepository,
    ManagerRepository, SkillRepository,
};

/// 创建员工请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployeeRequest {
    pub employee_code: String,
    pub name: String,
    pub gender: String,
    pub department_id: String,
    #[serde(default)]
    pub manager_id: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub experience_years: f64,
}

/// 更新员工请求（缺省字段保持不变）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub employee_code: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub department_id: Option<String>,
    pub manager_id: Option<String>,
    pub designation: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub experience_years: Option<f64>,
}

/// 员工技能等级写入请求
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertEmployeeSkillRequest {
    #[serde(default)]
    pub skill_id: Option<String>,
    #[serde(default)]
    pub machine_id: Option<String>,
    pub level: String,
}

fn parse_gender(raw: &str) -> ApiResult<Gender> {
    raw.parse()
        .map_err(|e: crate::domain::types::UnknownValueError| ApiError::InvalidInput(e.to_string()))
}

fn parse_level(raw: &str) -> ApiResult<SkillLevel> {
    raw.parse()
        .map_err(|e: crate::domain::types::UnknownValueError| ApiError::InvalidInput(e.to_string()))
}

fn validate_experience(years: f64) -> ApiResult<f64> {
    if !years.is_finite() || years < 0.0 {
        return Err(ApiError::InvalidInput(format!("工龄必须为非负数: {}", years)));
    }
    Ok(years)
}

fn required(field: &str, raw: &str) -> ApiResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    Ok(value.to_string())
}

// ==========================================
// EmployeeApi - 员工 API
// ==========================================
pub struct EmployeeApi {
    employee_repo: Arc<EmployeeRepository>,
    department_repo: Arc<DepartmentRepository>,
    manager_repo: Arc<ManagerRepository>,
    skill_repo: Arc<SkillRepository>,
    machine_repo: Arc<MachineRepository>,
    employee_skill_repo: Arc<EmployeeSkillRepository>,
    config_manager: Arc<ConfigManager>,
}

impl EmployeeApi {
    pub fn new(
        employee_repo: Arc<EmployeeRepository>,
        department_repo: Arc<DepartmentRepository>,
        manager_repo: Arc<ManagerRepository>,
        skill_repo: Arc<SkillRepository>,
        machine_repo: Arc<MachineRepository>,
        employee_skill_repo: Arc<EmployeeSkillRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            employee_repo,
            department_repo,
            manager_repo,
            skill_repo,
            machine_repo,
            employee_skill_repo,
            config_manager,
        }
    }

    pub fn list_employees(&self, department_id: Option<&str>) -> ApiResult<Vec<Employee>> {
        Ok(self.employee_repo.list(department_id)?)
    }

    pub fn get_employee(&self, employee_id: &str) -> ApiResult<Employee> {
        self.employee_repo
            .find_by_id(employee_id)?
            .ok_or_else(|| ApiError::NotFound(format!("员工(id={})不存在", employee_id)))
    }

    /// 创建员工
    ///
    /// # 返回
    /// - Err(ApiError::Conflict): 工号已被未删除员工占用
    /// - Err(ApiError::ValidationError): 部门/主管不存在
    pub fn create_employee(&self, request: CreateEmployeeRequest) -> ApiResult<Employee> {
        let code = required("员工工号", &request.employee_code)?;
        let name = required("员工姓名", &request.name)?;
        let gender = parse_gender(&request.gender)?;
        let years = validate_experience(request.experience_years)?;

        self.ensure_department(&request.department_id)?;
        if let Some(manager_id) = request.manager_id.as_deref() {
            self.ensure_manager(manager_id)?;
        }
        self.ensure_code_free(&code, None)?;

        let mut employee = Employee::new(code, name, gender, request.department_id, years);
        employee.manager_id = request.manager_id;
        employee.designation = request.designation.filter(|d| !d.trim().is_empty());
        employee.joining_date = request.joining_date;

        self.employee_repo.insert(&employee)?;
        info!(employee_id = %employee.employee_id, code = %employee.employee_code, "员工已创建");
        Ok(employee)
    }

    pub fn update_employee(
        &self,
        employee_id: &str,
        request: UpdateEmployeeRequest,
    ) -> ApiResult<Employee> {
        let mut employee = self.get_employee(employee_id)?;

        if let Some(raw) = request.employee_code {
            let code = required("员工工号", &raw)?;
            self.ensure_code_free(&code, Some(employee_id))?;
            employee.employee_code = code;
        }
        if let Some(raw) = request.name {
            employee.name = required("员工姓名", &raw)?;
        }
        if let Some(raw) = request.gender {
            employee.gender = parse_gender(&raw)?;
        }
        if let Some(department_id) = request.department_id {
            self.ensure_department(&department_id)?;
            employee.department_id = department_id;
        }
        if let Some(manager_id) = request.manager_id {
            self.ensure_manager(&manager_id)?;
            employee.manager_id = Some(manager_id);
        }
        if request.designation.is_some() {
            employee.designation = request.designation;
        }
        if request.joining_date.is_some() {
            employee.joining_date = request.joining_date;
        }
        if let Some(years) = request.experience_years {
            employee.experience_years = validate_experience(years)?;
        }
        employee.updated_at = chrono::Local::now().naive_local();

        self.employee_repo.update(&employee)?;
        Ok(employee)
    }

    pub fn delete_employee(&self, employee_id: &str) -> ApiResult<()> {
        self.employee_repo.soft_delete(employee_id)?;
        info!(employee_id, "员工已删除");
        Ok(())
    }

    // ==========================================
    // 员工技能
    // ==========================================

    /// 员工技能画像
    pub fn get_skill_profile(&self, employee_id: &str) -> ApiResult<EmployeeSkillProfile> {
        let employee = self.get_employee(employee_id)?;
        let skills = self.employee_skill_repo.list_by_employee(employee_id)?;
        let skill_names = skill_name_index(&self.skill_repo.list(None)?);
        let machine_names = machine_name_index(&self.machine_repo.list(None)?);

        let aggregator = SkillAggregator::new(
            self.config_manager.qualified_min_level()?,
            self.config_manager.min_qualified_per_critical_station()?,
        );
        Ok(aggregator.employee_profile(&employee, &skills, &skill_names, &machine_names))
    }

    /// 写入或更新员工某技能/机台的等级
    pub fn upsert_skill(
        &self,
        employee_id: &str,
        request: UpsertEmployeeSkillRequest,
    ) -> ApiResult<EmployeeSkill> {
        self.get_employee(employee_id)?;
        let level = parse_level(&request.level)?;

        let skill_id = request.skill_id.as_deref().filter(|s| !s.is_empty());
        let machine_id = request.machine_id.as_deref().filter(|s| !s.is_empty());
        if skill_id.is_none() && machine_id.is_none() {
            return Err(ApiError::InvalidInput(
                "skill_id 与 machine_id 至少提供一个".to_string(),
            ));
        }
        if let Some(id) = skill_id {
            if self.skill_repo.find_by_id(id)?.is_none() {
                return Err(ApiError::ValidationError(format!("技能(id={})不存在", id)));
            }
        }
        if let Some(id) = machine_id {
            if self.machine_repo.find_by_id(id)?.is_none() {
                return Err(ApiError::ValidationError(format!("机台(id={})不存在", id)));
            }
        }

        let record = self
            .employee_skill_repo
            .upsert(employee_id, skill_id, machine_id, level)?;
        debug!(employee_id, level = %level, "员工技能等级已更新");
        Ok(record)
    }

    pub fn delete_skill(&self, employee_skill_id: &str) -> ApiResult<()> {
        Ok(self.employee_skill_repo.soft_delete(employee_skill_id)?)
    }

    // ==========================================
    // 校验辅助
    // ==========================================

    fn ensure_department(&self, department_id: &str) -> ApiResult<()> {
        if self.department_repo.find_by_id(department_id)?.is_none() {
            return Err(ApiError::ValidationError(format!(
                "部门(id={})不存在",
                department_id
            )));
        }
        Ok(())
    }

    fn ensure_manager(&self, manager_id: &str) -> ApiResult<()> {
        if self.manager_repo.find_by_id(manager_id)?.is_none() {
            return Err(ApiError::ValidationError(format!("主管(id={})不存在", manager_id)));
        }
        Ok(())
    }

    fn ensure_code_free(&self, code: &str, except_employee_id: Option<&str>) -> ApiResult<()> {
        if let Some(existing) = self.employee_repo.find_by_code(code)? {
            if Some(existing.employee_id.as_str()) != except_employee_id {
                return Err(ApiError::Conflict(format!("员工工号已存在: {}", code)));
            }
        }
        Ok(())
    }
}
