// ==========================================
// 工厂员工技能矩阵管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 默认查询排除软删除记录
// ==========================================

pub mod db_utils;
pub mod department_repo;
pub mod employee_repo;
pub mod employee_skill_repo;
pub mod error;
pub mod export_log_repo;
pub mod performance_repo;
pub mod skill_matrix_repo;
pub mod skill_repo;
pub mod work_history_repo;

// 重导出核心仓储
pub use department_repo::{DepartmentRepository, ManagerRepository};
pub use employee_repo::EmployeeRepository;
pub use employee_skill_repo::EmployeeSkillRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use export_log_repo::ExportLogRepository;
pub use performance_repo::DepartmentPerformanceRepository;
pub use skill_matrix_repo::SkillMatrixRepository;
pub use skill_repo::{MachineRepository, SkillRepository};
pub use work_history_repo::WorkHistoryRepository;
