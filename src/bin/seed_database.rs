// ==========================================
// 工厂员工技能矩阵管理系统 - 示例数据初始化工具
// ==========================================
// 用法: seed_database [db_path]
// - 已有数据库文件会先备份为 <db_path>.bak.<时间戳> 再重建
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use skill_matrix::api::seed_sample_data;
use skill_matrix::config::get_default_db_path;
use skill_matrix::db::{init_schema, open_sqlite_connection};
use skill_matrix::logging;

fn main() -> Result<()> {
    logging::init();

    let db_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(get_default_db_path);

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("无法创建数据库目录: {}", parent.display()))?;
    }
    backup_and_reset_db(&db_path)?;

    let db_path_str = db_path.to_string_lossy().to_string();
    let conn = open_sqlite_connection(&db_path_str)
        .with_context(|| format!("无法打开数据库: {}", db_path_str))?;
    init_schema(&conn).context("建表失败")?;

    let report = seed_sample_data(&conn, true)
        .context("写入示例数据失败")?
        .context("示例数据未写入")?;

    tracing::info!(
        departments = report.departments,
        managers = report.managers,
        machines = report.machines,
        skills = report.skills,
        employees = report.employees,
        employee_skills = report.employee_skills,
        work_history = report.work_history,
        "示例数据已写入 {}",
        db_path_str
    );
    Ok(())
}

fn backup_and_reset_db(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = PathBuf::from(format!("{}.bak.{}", path.display(), ts));
    fs::copy(path, &backup_path)
        .with_context(|| format!("备份数据库失败: {}", backup_path.display()))?;
    fs::remove_file(path)?;

    tracing::info!("已备份 {} -> {}", path.display(), backup_path.display());
    Ok(())
}
