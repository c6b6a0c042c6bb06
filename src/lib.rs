// ==========================================
// 工厂员工技能矩阵管理系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 员工技能矩阵驾驶舱后端（部门/员工/技能/机台/矩阵向导）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 技能评分与聚合
pub mod engine;

// 导入导出层 - 矩阵文件
pub mod importer;

// 配置层 - 启动配置与运行期配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 依赖装配
pub mod app;

// HTTP 层 - 路由与服务
pub mod http;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Gender, MatrixColumnKind, SkillLevel, WizardStep};

// 领域实体
pub use domain::{
    Department, Employee, EmployeeSkill, EmployeeWorkHistory, Machine, Manager, Skill,
    SkillMatrix,
};

// 引擎
pub use engine::{MatrixDraft, SkillAggregator};

// API
pub use api::{DashboardApi, EmployeeApi, MatrixApi};

// 应用状态
pub use app::AppState;

// ==========================================
// 版本信息
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "工厂员工技能矩阵管理系统";
