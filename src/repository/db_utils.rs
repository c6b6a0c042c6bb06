// ==========================================
// 工厂员工技能矩阵管理系统 - 仓储公共工具
// ==========================================
// 职责: IN 子句构建、行字段解析（枚举/日期/时间戳/JSON）
// ==========================================

use crate::db::parse_timestamp;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::Row;
use std::str::FromStr;

/// 构建 IN 子句的占位符片段
///
/// 空列表返回永假条件，确保 SQL 语法正确
///
/// ```
/// use skill_matrix::repository::db_utils::build_in_clause;
///
/// let ids = vec!["E1".to_string(), "E2".to_string()];
/// assert_eq!(build_in_clause("employee_id", &ids), "employee_id IN (?, ?)");
///
/// let empty: Vec<String> = vec![];
/// assert_eq!(build_in_clause("employee_id", &empty), "1 = 0");
/// ```
pub fn build_in_clause<T: AsRef<str>>(column_name: &str, values: &[T]) -> String {
    if values.is_empty() {
        return "1 = 0".to_string();
    }

    let placeholders = values.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    format!("{} IN ({})", column_name, placeholders)
}

/// 读取枚举列（FromStr）
pub fn get_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// 读取时间戳列
pub fn get_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    Ok(parse_timestamp(&raw))
}

/// 读取日期列（YYYY-MM-DD）
pub fn get_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// 读取可空日期列（格式异常视为空）
pub fn get_opt_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    Ok(row
        .get::<_, Option<String>>(idx)?
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
}

/// 读取 JSON 列
pub fn get_json<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// 时间戳写入格式
pub fn fmt_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(crate::db::TIMESTAMP_FORMAT).to_string()
}
