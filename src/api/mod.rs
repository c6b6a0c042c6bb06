// ==========================================
// 工厂员工技能矩阵管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 HTTP 路由调用
// 红线: 参数校验在此层完成，Repository 只负责读写
// ==========================================

pub mod config_api;
pub mod dashboard_api;
pub mod department_api;
pub mod employee_api;
pub mod error;
pub mod matrix_api;
pub mod seed_api;
pub mod skill_api;
pub mod work_history_api;

// 重导出核心类型
pub use config_api::ConfigApi;
pub use dashboard_api::DashboardApi;
pub use department_api::{DepartmentApi, ManagerApi};
pub use employee_api::EmployeeApi;
pub use error::{ApiError, ApiResult};
pub use matrix_api::MatrixApi;
pub use seed_api::{seed_sample_data, SeedApi, SeedReport};
pub use skill_api::SkillApi;
pub use work_history_api::WorkHistoryApi;
