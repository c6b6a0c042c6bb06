// ==========================================
// 工厂员工技能矩阵管理系统 - 矩阵 CSV 导出
// ==========================================
// 表头: Employee Code, Employee Name, <列标题...>, Average
// 单元格: 技能等级标签；Average 为行平均分（两位小数）
// ==========================================

use crate::domain::skill_matrix::SkillMatrix;
use crate::engine::skill_score::average_score;
use crate::importer::error::{ImportError, ImportResult};
use csv::WriterBuilder;

pub struct MatrixCsvExporter;

impl MatrixCsvExporter {
    pub fn header(matrix: &SkillMatrix) -> Vec<String> {
        let mut header = vec!["Employee Code".to_string(), "Employee Name".to_string()];
        header.extend(matrix.columns.iter().map(|c| c.label.clone()));
        header.push("Average".to_string());
        header
    }

    /// 导出为 CSV 字节
    pub fn export(&self, matrix: &SkillMatrix) -> ImportResult<Vec<u8>> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer
            .write_record(Self::header(matrix))
            .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

        for row in &matrix.rows {
            let levels: Vec<_> = matrix.columns.iter().map(|c| row.level(&c.label)).collect();
            let average = average_score(levels.iter().copied())
                .map(|avg| format!("{:.2}", avg))
                .unwrap_or_default();

            let mut record = vec![row.employee_code.clone(), row.employee_name.clone()];
            record.extend(levels.iter().map(|l| l.as_str().to_string()));
            record.push(average);

            writer
                .write_record(&record)
                .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| ImportError::CsvWriteError(e.to_string()))
    }

    /// 导出文件名: <矩阵名>_<日期>.csv
    pub fn file_name(matrix: &SkillMatrix) -> String {
        let safe_name: String = matrix
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!(
            "{}_{}.csv",
            safe_name,
            chrono::Local::now().format("%Y%m%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::skill_matrix::{MatrixColumn, MatrixRow};
    use crate::domain::types::{MatrixColumnKind, SkillLevel};
    use std::collections::BTreeMap;

    fn sample_matrix() -> SkillMatrix {
        let mut cells = BTreeMap::new();
        cells.insert("冲床".to_string(), SkillLevel::Expert);
        cells.insert("读图".to_string(), SkillLevel::Low);
        let now = chrono::Local::now().naive_local();
        SkillMatrix {
            matrix_id: "X1".into(),
            name: "一车间 矩阵".into(),
            department_ids: vec!["D1".into()],
            columns: vec![
                MatrixColumn {
                    kind: MatrixColumnKind::Machine,
                    ref_id: "M1".into(),
                    label: "冲床".into(),
                },
                MatrixColumn {
                    kind: MatrixColumnKind::Skill,
                    ref_id: "S1".into(),
                    label: "读图".into(),
                },
            ],
            rows: vec![MatrixRow {
                employee_id: "E1".into(),
                employee_code: "C001".into(),
                employee_name: "张三".into(),
                cells,
            }],
            created_by: "admin".into(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_export_表头与行() {
        let bytes = MatrixCsvExporter.export(&sample_matrix()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Employee Code,Employee Name,冲床,读图,Average");
        assert_eq!(lines[1], "C001,张三,Expert,Low,2.50");
    }

    #[test]
    fn test_file_name_替换特殊字符() {
        let name = MatrixCsvExporter::file_name(&sample_matrix());
        assert!(name.starts_with("一车间_矩阵_"));
        assert!(name.ends_with(".csv"));
    }
}
