// ==========================================
// 工厂员工技能矩阵管理系统 - 驾驶舱 API
// ==========================================
// 职责: 加载数据 → 调用 SkillAggregator 聚合
// 口径: 全部查询排除软删除记录；合格阈值取运行时配置
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::engine::aggregation::{
    DashboardSummary, DepartmentMatrixView, DistributionReport, MachineCoverage, MatchResult,
    SkillAggregator, SummaryCounts,
};
use crate::repository::{
    DepartmentRepository, EmployeeRepository, EmployeeSkillRepository, MachineRepository,
    ManagerRepository, SkillRepository,
};

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    department_repo: Arc<DepartmentRepository>,
    manager_repo: Arc<ManagerRepository>,
    employee_repo: Arc<EmployeeRepository>,
    skill_repo: Arc<SkillRepository>,
    machine_repo: Arc<MachineRepository>,
    employee_skill_repo: Arc<EmployeeSkillRepository>,
    config_manager: Arc<ConfigManager>,
}

impl DashboardApi {
    pub fn new(
        department_repo: Arc<DepartmentRepository>,
        manager_repo: Arc<ManagerRepository>,
        employee_repo: Arc<EmployeeRepository>,
        skill_repo: Arc<SkillRepository>,
        machine_repo: Arc<MachineRepository>,
        employee_skill_repo: Arc<EmployeeSkillRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            department_repo,
            manager_repo,
            employee_repo,
            skill_repo,
            machine_repo,
            employee_skill_repo,
            config_manager,
        }
    }

    fn aggregator(&self) -> ApiResult<SkillAggregator> {
        Ok(SkillAggregator::new(
            self.config_manager.qualified_min_level()?,
            self.config_manager.min_qualified_per_critical_station()?,
        ))
    }

    /// 驾驶舱概览
    pub fn get_summary(&self) -> ApiResult<DashboardSummary> {
        let departments = self.department_repo.list_all()?;
        let employees = self.employee_repo.list(None)?;
        let machines = self.machine_repo.list(None)?;
        let skills = self.employee_skill_repo.list_all()?;
        let counts = SummaryCounts {
            manager_count: self.manager_repo.list(None)?.len() as i64,
            skill_count: self.skill_repo.list(None)?.len() as i64,
        };

        Ok(self
            .aggregator()?
            .summary(&departments, &employees, &machines, &skills, counts))
    }

    /// 员工分布（部门/性别/工龄）
    pub fn get_distribution(&self) -> ApiResult<DistributionReport> {
        let departments = self.department_repo.list_all()?;
        let employees = self.employee_repo.list(None)?;
        Ok(self.aggregator()?.distribution(&employees, &departments))
    }

    /// 部门技能矩阵（员工 × 机台）
    pub fn get_department_matrix(&self, department_id: &str) -> ApiResult<DepartmentMatrixView> {
        let department = self
            .department_repo
            .find_by_id(department_id)?
            .ok_or_else(|| ApiError::NotFound(format!("部门(id={})不存在", department_id)))?;

        let employees = self.employee_repo.list(Some(department_id))?;
        let machines = self.machine_repo.list(Some(department_id))?;
        let skills = self.employee_skill_repo.list_by_department(department_id)?;

        Ok(self
            .aggregator()?
            .department_matrix(&department, &employees, &machines, &skills))
    }

    /// 机台覆盖度
    pub fn get_machine_coverage(&self, machine_id: &str) -> ApiResult<MachineCoverage> {
        let machine = self
            .machine_repo
            .find_by_id(machine_id)?
            .ok_or_else(|| ApiError::NotFound(format!("机台(id={})不存在", machine_id)))?;

        let employees = self.employee_repo.list(Some(&machine.department_id))?;
        let skills = self.employee_skill_repo.list_by_machine(machine_id)?;

        Ok(self.aggregator()?.machine_coverage(&machine, &employees, &skills))
    }

    /// 关键工位覆盖度（仅列出缺员工位时 understaffed_only = true）
    pub fn list_critical_coverage(&self, understaffed_only: bool) -> ApiResult<Vec<MachineCoverage>> {
        let aggregator = self.aggregator()?;
        let mut result = Vec::new();
        for machine in self
            .machine_repo
            .list(None)?
            .into_iter()
            .filter(|m| m.is_critical_station)
        {
            let employees = self.employee_repo.list(Some(&machine.department_id))?;
            let skills = self.employee_skill_repo.list_by_machine(&machine.machine_id)?;
            let coverage = aggregator.machine_coverage(&machine, &employees, &skills);
            if !understaffed_only || coverage.understaffed {
                result.push(coverage);
            }
        }
        Ok(result)
    }

    /// 员工技能匹配百分比
    pub fn get_employee_match(&self, employee_id: &str, columns: &[String]) -> ApiResult<MatchResult> {
        if self.employee_repo.find_by_id(employee_id)?.is_none() {
            return Err(ApiError::NotFound(format!("员工(id={})不存在", employee_id)));
        }
        let skills = self.employee_skill_repo.list_by_employee(employee_id)?;
        Ok(self.aggregator()?.employee_match(employee_id, &skills, columns))
    }
}
