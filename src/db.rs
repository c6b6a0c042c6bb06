// ==========================================
// 工厂员工技能矩阵管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键/busy_timeout）
// - 统一建表入口，服务启动、种子工具、测试共用同一份 schema
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version（与 `scripts/schema.sql` 对齐）
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建表脚本
pub const SCHEMA_SQL: &str = include_str!("../scripts/schema.sql");

/// 时间戳存储格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// 打开连接、建表，并包装为仓储层共享的连接句柄
pub fn open_shared_connection(db_path: &str) -> rusqlite::Result<Arc<Mutex<Connection>>> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;

    match read_schema_version(&conn)? {
        Some(v) if v != CURRENT_SCHEMA_VERSION => {
            tracing::warn!(
                "数据库 schema_version={} 与程序期望的 {} 不一致",
                v,
                CURRENT_SCHEMA_VERSION
            );
        }
        _ => {}
    }

    Ok(Arc::new(Mutex::new(conn)))
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 当前本地时间（存储格式）
pub fn now_timestamp() -> String {
    chrono::Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string()
}

/// 解析存储格式的时间戳，格式异常时退回 UNIX 纪元
pub fn parse_timestamp(raw: &str) -> chrono::NaiveDateTime {
    chrono::NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_幂等() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_唯一索引_忽略大小写且仅限未删除() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let ts = now_timestamp();

        conn.execute(
            "INSERT INTO departments (department_id, name, created_at, updated_at) VALUES ('D1', 'Assembly', ?1, ?1)",
            [&ts],
        )
        .unwrap();
        assert!(conn
            .execute(
                "INSERT INTO departments (department_id, name, created_at, updated_at) VALUES ('D2', 'ASSEMBLY', ?1, ?1)",
                [&ts],
            )
            .is_err());

        let insert_employee = |id: &str, code: &str| {
            conn.execute(
                "INSERT INTO employees (employee_id, employee_code, name, gender, department_id, created_at, updated_at) \
                 VALUES (?1, ?2, '张三', 'Male', 'D1', ?3, ?3)",
                [id, code, ts.as_str()],
            )
        };
        insert_employee("E1", "EMP-0001").unwrap();
        assert!(insert_employee("E2", "emp-0001").is_err());

        conn.execute("UPDATE employees SET is_deleted = 1 WHERE employee_id = 'E1'", [])
            .unwrap();
        insert_employee("E3", "emp-0001").unwrap();
    }

    #[test]
    fn test_parse_timestamp_往返() {
        let now = now_timestamp();
        let parsed = parse_timestamp(&now);
        assert_eq!(parsed.format(TIMESTAMP_FORMAT).to_string(), now);
    }
}
