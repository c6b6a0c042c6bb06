// ==========================================
// 工厂员工技能矩阵管理系统 - 配置层
// ==========================================
// 职责:
// - 启动配置（环境变量）: 监听地址、数据库路径、CORS
// - 运行期配置（config_kv 表）: 合格等级阈值、关键工位最少合格人数
// ==========================================

pub mod app_config;
pub mod config_manager;

pub use app_config::{get_default_db_path, AppConfig};
pub use config_manager::{config_keys, ConfigEntry, ConfigManager};
