// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 基于临时数据库装配 AppState，并提供常用数据准备函数
// ==========================================

use std::error::Error;
use std::ops::Deref;

use tempfile::NamedTempFile;

use skill_matrix::api::department_api::{CreateDepartmentRequest, CreateManagerRequest};
use skill_matrix::api::employee_api::{CreateEmployeeRequest, UpsertEmployeeSkillRequest};
use skill_matrix::api::skill_api::{CreateMachineRequest, CreateSkillRequest};
use skill_matrix::app::AppState;
use skill_matrix::domain::{Department, Employee, EmployeeSkill, Machine, Manager, Skill};

use crate::test_helpers::create_test_db;

/// API测试环境
///
/// 通过 Deref 直接访问 AppState 中的各 API
pub struct ApiTestEnv {
    pub state: AppState,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl Deref for ApiTestEnv {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.state
    }
}

impl ApiTestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        skill_matrix::logging::init_test();
        let (temp_file, db_path) = create_test_db()?;
        let state = AppState::new(&db_path)?;
        Ok(Self {
            state,
            _temp_file: temp_file,
        })
    }

    // ==========================================
    // 数据准备
    // ==========================================

    pub fn create_department(&self, name: &str) -> Department {
        self.department_api
            .create_department(CreateDepartmentRequest {
                name: name.to_string(),
                description: None,
            })
            .expect("创建部门失败")
    }

    pub fn create_manager(&self, department_id: &str, name: &str) -> Manager {
        self.manager_api
            .create_manager(CreateManagerRequest {
                name: name.to_string(),
                email: None,
                department_id: department_id.to_string(),
            })
            .expect("创建主管失败")
    }

    pub fn create_employee(&self, department_id: &str, code: &str, gender: &str) -> Employee {
        self.create_employee_with_experience(department_id, code, gender, 2.0)
    }

    pub fn create_employee_with_experience(
        &self,
        department_id: &str,
        code: &str,
        gender: &str,
        experience_years: f64,
    ) -> Employee {
        self.employee_api
            .create_employee(employee_request(department_id, code, gender, experience_years))
            .expect("创建员工失败")
    }

    pub fn create_skill(&self, name: &str) -> Skill {
        self.skill_api
            .create_skill(CreateSkillRequest {
                name: name.to_string(),
                department_id: None,
                description: None,
            })
            .expect("创建技能失败")
    }

    pub fn create_machine(&self, department_id: &str, name: &str, critical: bool) -> Machine {
        self.skill_api
            .create_machine(CreateMachineRequest {
                name: name.to_string(),
                department_id: department_id.to_string(),
                is_critical_station: critical,
                female_eligible: true,
            })
            .expect("创建机台失败")
    }

    pub fn rate_machine(&self, employee_id: &str, machine_id: &str, level: &str) -> EmployeeSkill {
        self.employee_api
            .upsert_skill(
                employee_id,
                UpsertEmployeeSkillRequest {
                    skill_id: None,
                    machine_id: Some(machine_id.to_string()),
                    level: level.to_string(),
                },
            )
            .expect("写入机台等级失败")
    }

    pub fn rate_skill(&self, employee_id: &str, skill_id: &str, level: &str) -> EmployeeSkill {
        self.employee_api
            .upsert_skill(
                employee_id,
                UpsertEmployeeSkillRequest {
                    skill_id: Some(skill_id.to_string()),
                    machine_id: None,
                    level: level.to_string(),
                },
            )
            .expect("写入技能等级失败")
    }
}

/// 构造创建员工请求
pub fn employee_request(
    department_id: &str,
    code: &str,
    gender: &str,
    experience_years: f64,
) -> CreateEmployeeRequest {
    CreateEmployeeRequest {
        employee_code: code.to_string(),
        name: format!("员工{}", code),
        gender: gender.to_string(),
        department_id: department_id.to_string(),
        manager_id: None,
        designation: None,
        joining_date: None,
        experience_years,
    }
}
