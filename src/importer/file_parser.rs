// ==========================================
// 纺织厂库存报表系统 - 文件解析器
// ==========================================
// 职责: 上游导出文件 → 松散记录 (列名 → 值)
// 支持: Excel (.xlsx) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::RawRecord;
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 解析文件为松散记录，完全空白的行被跳过
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 表头 + 单元格 → 记录；空值不写入
fn build_record<I>(headers: &[String], cells: I) -> Option<RawRecord>
where
    I: IntoIterator<Item = String>,
{
    let mut record = RawRecord::new();
    for (header, value) in headers.iter().zip(cells) {
        let value = value.trim();
        if header.is_empty() || value.is_empty() {
            continue;
        }
        record.insert(header.clone(), value.to_string());
    }
    if record.is_empty() {
        None
    } else {
        Some(record)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;
        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            if let Some(record) = build_record(&headers, row.iter().map(String::from)) {
                records.push(record);
            }
        }

        tracing::debug!(path = %file_path.display(), rows = records.len(), "CSV 解析完成");
        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;
        let ext = extension_of(file_path);
        if ext != "xlsx" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::NoWorksheet(file_path.display().to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect(),
            None => return Ok(Vec::new()),
        };

        let records: Vec<RawRecord> = rows
            .filter_map(|row| build_record(&headers, row.iter().map(|cell| cell.to_string())))
            .collect();

        tracing::debug!(path = %file_path.display(), rows = records.len(), "Excel 解析完成");
        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" => ExcelParser.parse_to_raw_records(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
