// ==========================================
// 工厂员工技能矩阵管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{
    ConfigApi, DashboardApi, DepartmentApi, EmployeeApi, ManagerApi, MatrixApi, SeedApi,
    SkillApi, WorkHistoryApi,
};
use crate::config::ConfigManager;
use crate::repository::{
    DepartmentPerformanceRepository, DepartmentRepository, EmployeeRepository,
    EmployeeSkillRepository, ExportLogRepository, MachineRepository, ManagerRepository,
    SkillMatrixRepository, SkillRepository, WorkHistoryRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源，作为 axum Router 的 State
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub department_api: Arc<DepartmentApi>,
    pub manager_api: Arc<ManagerApi>,
    pub employee_api: Arc<EmployeeApi>,
    pub skill_api: Arc<SkillApi>,
    pub work_history_api: Arc<WorkHistoryApi>,
    pub dashboard_api: Arc<DashboardApi>,
    pub matrix_api: Arc<MatrixApi>,
    pub seed_api: Arc<SeedApi>,
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 打开数据库（不存在时建表）并创建AppState
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = crate::db::open_shared_connection(db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        Ok(Self::from_connection(db_path.to_string(), conn))
    }

    /// 基于已打开的共享连接创建AppState
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Self {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let department_repo = Arc::new(DepartmentRepository::new(conn.clone()));
        let manager_repo = Arc::new(ManagerRepository::new(conn.clone()));
        let employee_repo = Arc::new(EmployeeRepository::new(conn.clone()));
        let skill_repo = Arc::new(SkillRepository::new(conn.clone()));
        let machine_repo = Arc::new(MachineRepository::new(conn.clone()));
        let employee_skill_repo = Arc::new(EmployeeSkillRepository::new(conn.clone()));
        let work_history_repo = Arc::new(WorkHistoryRepository::new(conn.clone()));
        let matrix_repo = Arc::new(SkillMatrixRepository::new(conn.clone()));
        let export_log_repo = Arc::new(ExportLogRepository::new(conn.clone()));
        let performance_repo = Arc::new(DepartmentPerformanceRepository::new(conn.clone()));

        // 运行期配置
        let config_manager = Arc::new(ConfigManager::new(conn.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let department_api = Arc::new(DepartmentApi::new(
            department_repo.clone(),
            manager_repo.clone(),
            employee_repo.clone(),
            employee_skill_repo.clone(),
            performance_repo,
        ));
        let manager_api = Arc::new(ManagerApi::new(manager_repo.clone(), department_repo.clone()));
        let employee_api = Arc::new(EmployeeApi::new(
            employee_repo.clone(),
            department_repo.clone(),
            manager_repo.clone(),
            skill_repo.clone(),
            machine_repo.clone(),
            employee_skill_repo.clone(),
            config_manager.clone(),
        ));
        let skill_api = Arc::new(SkillApi::new(
            skill_repo.clone(),
            machine_repo.clone(),
            department_repo.clone(),
        ));
        let work_history_api = Arc::new(WorkHistoryApi::new(
            work_history_repo,
            employee_repo.clone(),
            machine_repo.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            department_repo.clone(),
            manager_repo,
            employee_repo.clone(),
            skill_repo.clone(),
            machine_repo.clone(),
            employee_skill_repo,
            config_manager.clone(),
        ));
        let matrix_api = Arc::new(MatrixApi::new(
            matrix_repo,
            export_log_repo,
            department_repo,
            employee_repo,
            skill_repo,
            machine_repo,
        ));
        let seed_api = Arc::new(SeedApi::new(conn));
        let config_api = Arc::new(ConfigApi::new(config_manager));

        tracing::info!("AppState初始化完成");

        Self {
            db_path,
            department_api,
            manager_api,
            employee_api,
            skill_api,
            work_history_api,
            dashboard_api,
            matrix_api,
            seed_api,
            config_api,
        }
    }
}
