// ==========================================
// 多工作簿列合并平台 - 合并结果导出
// ==========================================
// 格式: XLSX（默认，单个工作表 Sheet1）/ CSV
// 约定: 首行为表头，Null 写为空单元格
// 命名: merged_{Sheet 名，空格与路径分隔符替换为下划线}.{扩展名}，同名覆盖
// ==========================================

use crate::config::OutputFormat;
use crate::domain::{CellValue, MergedTable, SheetSelector};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::workbook_store::validate_file_name;
use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

// ==========================================
// TableExporter Trait
// ==========================================
pub trait TableExporter: Send + Sync {
    /// 写出合并结果，返回输出标识（文件名）
    fn export(&self, table: &MergedTable, sheet: &SheetSelector) -> ImportResult<String>;

    /// 输出标识 -> 可下载的文件路径（不存在返回 FileNotFound）
    fn resolve_output(&self, output_name: &str) -> ImportResult<PathBuf>;
}

/// 由 Sheet 名与输出格式生成输出文件名
pub fn output_file_name(sheet: &SheetSelector, format: OutputFormat) -> String {
    let safe_sheet: String = sheet
        .name()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("merged_{}.{}", safe_sheet, format.extension())
}

/// 按配置的格式创建导出器
pub fn exporter_for<P: AsRef<Path>>(format: OutputFormat, output_dir: P) -> Box<dyn TableExporter> {
    match format {
        OutputFormat::Xlsx => Box::new(XlsxTableExporter::new(output_dir)),
        OutputFormat::Csv => Box::new(CsvTableExporter::new(output_dir)),
    }
}

/// 在输出目录中查找已写出的结果文件
fn resolve_in(output_dir: &Path, output_name: &str) -> ImportResult<PathBuf> {
    validate_file_name(output_name)?;
    let path = output_dir.join(output_name);
    if !path.is_file() {
        return Err(ImportError::FileNotFound(output_name.to_string()));
    }
    Ok(path)
}

// ==========================================
// CsvTableExporter
// ==========================================
pub struct CsvTableExporter {
    output_dir: PathBuf,
}

impl CsvTableExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }
}

impl TableExporter for CsvTableExporter {
    fn export(&self, table: &MergedTable, sheet: &SheetSelector) -> ImportResult<String> {
        std::fs::create_dir_all(&self.output_dir)?;

        let out_name = output_file_name(sheet, OutputFormat::Csv);
        let out_path = self.output_dir.join(&out_name);

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(&out_path)
            .map_err(|e| ImportError::ExportError(e.to_string()))?;

        writer
            .write_record(table.columns())
            .map_err(|e| ImportError::ExportError(e.to_string()))?;
        for row in table.rows() {
            writer
                .write_record(row.iter().map(|v| v.to_display_string()))
                .map_err(|e| ImportError::ExportError(e.to_string()))?;
        }
        writer.flush()?;

        tracing::info!(
            output = %out_path.display(),
            rows = table.row_count(),
            "合并结果已写出"
        );
        Ok(out_name)
    }

    fn resolve_output(&self, output_name: &str) -> ImportResult<PathBuf> {
        resolve_in(&self.output_dir, output_name)
    }
}

// ==========================================
// XlsxTableExporter
// ==========================================
pub struct XlsxTableExporter {
    output_dir: PathBuf,
}

impl XlsxTableExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// 行列下标 -> xlsx 坐标（超出工作表上限时报错）
    fn position(row: usize, col: usize) -> ImportResult<(u32, u16)> {
        let row_num = u32::try_from(row)
            .map_err(|_| ImportError::ExportError(format!("行号超出工作表上限: {}", row)))?;
        let col_num = u16::try_from(col)
            .map_err(|_| ImportError::ExportError(format!("列号超出工作表上限: {}", col)))?;
        Ok((row_num, col_num))
    }
}

impl TableExporter for XlsxTableExporter {
    fn export(&self, table: &MergedTable, sheet: &SheetSelector) -> ImportResult<String> {
        std::fs::create_dir_all(&self.output_dir)?;

        let out_name = output_file_name(sheet, OutputFormat::Xlsx);
        let out_path = self.output_dir.join(&out_name);

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (col, name) in table.columns().iter().enumerate() {
            let (row_num, col_num) = Self::position(0, col)?;
            worksheet.write_string(row_num, col_num, name.as_str())?;
        }

        for (row_idx, row) in table.rows().iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                let (row_num, col_num) = Self::position(row_idx + 1, col)?;
                match value {
                    CellValue::Null => {}
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(row_num, col_num, *b)?;
                    }
                    CellValue::Int(i) => {
                        worksheet.write_number(row_num, col_num, *i as f64)?;
                    }
                    CellValue::Float(f) => {
                        worksheet.write_number(row_num, col_num, *f)?;
                    }
                    CellValue::String(s) => {
                        worksheet.write_string(row_num, col_num, s.as_str())?;
                    }
                }
            }
        }

        workbook.save(&out_path)?;

        tracing::info!(
            output = %out_path.display(),
            rows = table.row_count(),
            "合并结果已写出"
        );
        Ok(out_name)
    }

    fn resolve_output(&self, output_name: &str) -> ImportResult<PathBuf> {
        resolve_in(&self.output_dir, output_name)
    }
}
