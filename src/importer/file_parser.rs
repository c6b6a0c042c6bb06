// ==========================================
// 工厂员工技能矩阵管理系统 - 文件解析器
// ==========================================
// 支持: Excel (.xlsx) / CSV (.csv)
// 输入: 文件路径或内存字节（HTTP 上传体）
// 输出: 保持列顺序的表头 + 行记录
// ==========================================

use crate::domain::types::ImportFormat;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;

/// 一行原始记录
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub row_number: usize, // 文件中的行号（表头为第 1 行）
    pub values: HashMap<String, String>,
}

impl RawRecord {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }
}

/// 解析结果（表头保持文件中的顺序）
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// 按行收集记录，跳过完全空白的行
fn collect_row<I>(headers: &[String], row_number: usize, cells: I) -> Option<RawRecord>
where
    I: Iterator<Item = String>,
{
    let mut values = HashMap::new();
    for (col_idx, value) in cells.enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if !header.is_empty() {
                values.insert(header.clone(), value.trim().to_string());
            }
        }
    }

    if values.values().all(|v| v.is_empty()) {
        return None;
    }
    Some(RawRecord { row_number, values })
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 从内存字节解析
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable>;

    /// 文件扩展名白名单
    fn extensions(&self) -> &'static [&'static str];

    /// 从文件路径解析（检查存在性与扩展名）
    fn parse_path(&self, file_path: &Path) -> ImportResult<RawTable> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !self.extensions().contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let bytes = std::fs::read(file_path)?;
        self.parse_bytes(&bytes)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    fn parse_slice(bytes: &[u8]) -> ImportResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyFile("CSV 缺少表头".to_string()));
        }

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            // 空行不产生记录，行号按记录在原始字节中的起始位置计算
            let row_number = record
                .position()
                .map(|pos| line_at(bytes, pos.byte() as usize))
                .unwrap_or(row_idx + 2);
            if let Some(raw) = collect_row(&headers, row_number, record.iter().map(str::to_string)) {
                records.push(raw);
            }
        }

        Ok(RawTable { headers, records })
    }
}

/// 从 scan_start 起跳过空行后的行号（1 起）
fn line_at(bytes: &[u8], scan_start: usize) -> usize {
    let start = bytes
        .iter()
        .skip(scan_start)
        .position(|b| *b != b'\n' && *b != b'\r')
        .map_or(bytes.len(), |offset| scan_start + offset);
    bytes[..start].iter().filter(|b| **b == b'\n').count() + 1
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        Self::parse_slice(bytes)
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["csv"]
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 仅读取第一个工作表，第一行为表头
pub struct ExcelParser;

impl ExcelParser {
    fn first_sheet<R: Read + std::io::Seek>(workbook: &mut Xlsx<R>) -> ImportResult<Range<Data>> {
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        Ok(workbook.worksheet_range(&sheet_name)?)
    }

    fn range_to_table(range: &Range<Data>) -> ImportResult<RawTable> {
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::EmptyFile("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (row_idx, data_row) in rows.enumerate() {
            if let Some(raw) = collect_row(&headers, row_idx + 2, data_row.iter().map(|c| c.to_string())) {
                records.push(raw);
            }
        }

        Ok(RawTable { headers, records })
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
        let range = Self::first_sheet(&mut workbook)?;
        Self::range_to_table(&range)
    }

    fn parse_path(&self, file_path: &Path) -> ImportResult<RawTable> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !self.extensions().contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)?;
        let range = Self::first_sheet(&mut workbook)?;
        Self::range_to_table(&range)
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["xlsx"]
    }
}

// ==========================================
// 按格式选择解析器
// ==========================================
pub fn parser_for(format: ImportFormat) -> Box<dyn FileParser> {
    match format {
        ImportFormat::Csv => Box::new(CsvParser),
        ImportFormat::Xlsx => Box::new(ExcelParser),
    }
}

/// 根据扩展名解析文件
pub fn parse_file<P: AsRef<Path>>(file_path: P) -> ImportResult<RawTable> {
    let path = file_path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let format: ImportFormat = ext
        .parse()
        .map_err(|_| ImportError::UnsupportedFormat(ext.clone()))?;
    parser_for(format).parse_path(path)
}
