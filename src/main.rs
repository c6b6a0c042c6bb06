// ==========================================
// 工厂员工技能矩阵管理系统 - 服务主入口
// ==========================================

use anyhow::Result;
use skill_matrix::config::AppConfig;
use skill_matrix::{http, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", skill_matrix::APP_NAME);
    tracing::info!("系统版本: {}", skill_matrix::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env()?;
    tracing::info!("使用数据库: {}", config.db_path.display());

    http::start_server(config).await
}
