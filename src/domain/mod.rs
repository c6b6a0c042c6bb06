// ==========================================
// 工厂员工技能矩阵管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod department;
pub mod employee;
pub mod export_log;
pub mod performance;
pub mod skill;
pub mod skill_matrix;
pub mod types;
pub mod work_history;

// 重导出核心类型
pub use department::{Department, DepartmentWithCounts, Manager};
pub use employee::Employee;
pub use export_log::ExportLog;
pub use performance::DepartmentPerformance;
pub use skill::{EmployeeSkill, Machine, Skill};
pub use skill_matrix::{MatrixColumn, MatrixRow, SkillMatrix, SkillMatrixSummary};
pub use types::{
    ExperienceBand, ExportFormat, Gender, ImportFormat, MatrixColumnKind, SkillLevel,
    UnknownValueError, WizardStep,
};
pub use work_history::EmployeeWorkHistory;
