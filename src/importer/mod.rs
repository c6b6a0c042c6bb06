// ==========================================
// 工厂员工技能矩阵管理系统 - 导入导出层
// ==========================================
// 职责: 矩阵文件导入（Excel/CSV）与 CSV 导出
// ==========================================

pub mod error;
pub mod file_parser;
pub mod matrix_exporter;
pub mod matrix_mapper;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{parse_file, parser_for, CsvParser, ExcelParser, FileParser, RawRecord, RawTable};
pub use matrix_exporter::MatrixCsvExporter;
pub use matrix_mapper::{MappedMatrix, MatrixRecordMapper};
