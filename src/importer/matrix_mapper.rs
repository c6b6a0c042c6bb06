// ==========================================
// 工厂员工技能矩阵管理系统 - 矩阵字段映射器
// ==========================================
// 职责: 原始表格 → 矩阵导入记录
// 规则: "Employee Code"/"employee_code" 列标识员工
//       其余表头为矩阵列标题，单元格按技能等级解析（空白视为 None）
//       "Employee Name"/"Average" 为导出附带列，忽略
// ==========================================

use crate::domain::types::SkillLevel;
use crate::engine::matrix_builder::{MatrixImportRecord, SkippedRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawTable;

pub const EMPLOYEE_CODE_HEADERS: [&str; 2] = ["Employee Code", "employee_code"];
pub const IGNORED_HEADERS: [&str; 4] = ["Employee Name", "employee_name", "Average", "average"];

/// 映射结果
#[derive(Debug, Clone, Default)]
pub struct MappedMatrix {
    pub records: Vec<MatrixImportRecord>,
    pub skipped: Vec<SkippedRow>,
}

pub struct MatrixRecordMapper;

impl MatrixRecordMapper {
    /// 映射整张表
    ///
    /// # 错误
    /// 缺少员工工号列时返回 MissingColumn；单行问题记入 skipped
    pub fn map(&self, table: &RawTable) -> ImportResult<MappedMatrix> {
        let code_header = table
            .headers
            .iter()
            .find(|h| EMPLOYEE_CODE_HEADERS.contains(&h.as_str()))
            .ok_or_else(|| ImportError::MissingColumn(EMPLOYEE_CODE_HEADERS[0].to_string()))?;

        let level_headers: Vec<&String> = table
            .headers
            .iter()
            .filter(|h| {
                !h.is_empty()
                    && *h != code_header
                    && !IGNORED_HEADERS.contains(&h.as_str())
            })
            .collect();

        let mut mapped = MappedMatrix::default();
        for raw in &table.records {
            let employee_code = raw.get(code_header).unwrap_or("").to_string();
            if employee_code.is_empty() {
                mapped.skipped.push(SkippedRow {
                    row_number: raw.row_number,
                    reason: "员工工号为空".to_string(),
                });
                continue;
            }

            let mut cells = Vec::with_capacity(level_headers.len());
            for header in &level_headers {
                let value = raw.get(header).unwrap_or("");
                if value.is_empty() {
                    cells.push(((*header).clone(), SkillLevel::None));
                    continue;
                }
                match value.parse::<SkillLevel>() {
                    Ok(level) => cells.push(((*header).clone(), level)),
                    Err(e) => mapped.skipped.push(SkippedRow {
                        row_number: raw.row_number,
                        reason: format!("{}: {}", header, e),
                    }),
                }
            }

            mapped.records.push(MatrixImportRecord {
                row_number: raw.row_number,
                employee_code,
                cells,
            });
        }

        Ok(mapped)
    }
}
