// ==========================================
// 工厂员工技能矩阵管理系统 - 技能/机台 API
// ==========================================
// 职责: 技能与机台的查询、创建、软删除
// ==========================================

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::skill::{Machine, Skill};
use crate::repository::{DepartmentRepository, MachineRepository, SkillRepository};

/// 创建技能请求（department_id 为空表示通用技能）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

/// 创建机台请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMachineRequest {
    pub name: String,
    pub department_id: String,
    #[serde(default)]
    pub is_critical_station: bool,
    #[serde(default = "default_true")]
    pub female_eligible: bool,
}

pub struct SkillApi {
    skill_repo: Arc<SkillRepository>,
    machine_repo: Arc<MachineRepository>,
    department_repo: Arc<DepartmentRepository>,
}

impl SkillApi {
    pub fn new(
        skill_repo: Arc<SkillRepository>,
        machine_repo: Arc<MachineRepository>,
        department_repo: Arc<DepartmentRepository>,
    ) -> Self {
        Self {
            skill_repo,
            machine_repo,
            department_repo,
        }
    }

    // ===== 技能 =====

    pub fn list_skills(&self, department_id: Option<&str>) -> ApiResult<Vec<Skill>> {
        Ok(self.skill_repo.list(department_id)?)
    }

    /// 创建技能
    ///
    /// 同一部门内（含通用技能范围）名称重复返回 Conflict
    pub fn create_skill(&self, request: CreateSkillRequest) -> ApiResult<Skill> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("技能名称不能为空".to_string()));
        }
        let department_id = request.department_id.filter(|d| !d.trim().is_empty());
        if let Some(id) = department_id.as_deref() {
            self.ensure_department(id)?;
        }

        let skill = Skill::new(
            name.to_string(),
            department_id,
            request.description.filter(|d| !d.trim().is_empty()),
        );
        self.skill_repo.insert(&skill)?;
        info!(skill_id = %skill.skill_id, name = %skill.name, "技能已创建");
        Ok(skill)
    }

    pub fn delete_skill(&self, skill_id: &str) -> ApiResult<()> {
        Ok(self.skill_repo.soft_delete(skill_id)?)
    }

    // ===== 机台 =====

    pub fn list_machines(&self, department_id: Option<&str>) -> ApiResult<Vec<Machine>> {
        Ok(self.machine_repo.list(department_id)?)
    }

    pub fn get_machine(&self, machine_id: &str) -> ApiResult<Machine> {
        self.machine_repo
            .find_by_id(machine_id)?
            .ok_or_else(|| ApiError::NotFound(format!("机台(id={})不存在", machine_id)))
    }

    pub fn create_machine(&self, request: CreateMachineRequest) -> ApiResult<Machine> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("机台名称不能为空".to_string()));
        }
        self.ensure_department(&request.department_id)?;

        let machine = Machine::new(
            name.to_string(),
            request.department_id,
            request.is_critical_station,
            request.female_eligible,
        );
        self.machine_repo.insert(&machine)?;
        info!(machine_id = %machine.machine_id, name = %machine.name, "机台已创建");
        Ok(machine)
    }

    pub fn delete_machine(&self, machine_id: &str) -> ApiResult<()> {
        Ok(self.machine_repo.soft_delete(machine_id)?)
    }

    fn ensure_department(&self, department_id: &str) -> ApiResult<()> {
        if self.department_repo.find_by_id(department_id)?.is_none() {
            return Err(ApiError::ValidationError(format!(
                "部门(id={})不存在",
                department_id
            )));
        }
        Ok(())
    }
}
