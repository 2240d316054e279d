// ==========================================
// 纺织厂库存报表系统 - CSV 导出
// ==========================================
// 职责: 抬头信息 + 表格 → CSV
// 说明: 不做样式；列宽/合并单元格等由表格软件处理
// ==========================================

use crate::report::formatter::Table;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

// ==========================================
// ReportDocument - 待导出的报表
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReportDocument {
    pub title: String,
    /// 抬头键值对（企业名称、期间、票据类型等）
    pub meta: Vec<(String, String)>,
    pub table: Table,
}

// ==========================================
// CsvExporter
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter {
    /// 写入 UTF-8 BOM，便于 Excel 正确识别泰文
    pub with_bom: bool,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { with_bom: true }
    }

    /// 写入任意输出流
    pub fn write<W: Write>(&self, mut out: W, doc: &ReportDocument) -> ExportResult<()> {
        if self.with_bom {
            out.write_all("\u{feff}".as_bytes())?;
        }

        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);

        if !doc.title.is_empty() {
            writer.write_record([doc.title.as_str()])?;
        }
        for (key, value) in &doc.meta {
            writer.write_record([key.as_str(), value.as_str()])?;
        }
        if !doc.title.is_empty() || !doc.meta.is_empty() {
            writer.write_record([""])?;
        }

        writer.write_record(&doc.table.headers)?;
        for row in &doc.table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 写入文件（覆盖）
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P, doc: &ReportDocument) -> ExportResult<()> {
        let file = File::create(path.as_ref())?;
        self.write(file, doc)?;
        tracing::info!(path = %path.as_ref().display(), rows = doc.table.rows.len(), "报表已导出");
        Ok(())
    }
}
