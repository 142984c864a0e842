// ==========================================
// 多工作簿列合并平台 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls/.xlsm/.xlsb/.ods) / CSV (.csv)
// 约定: 第一行为表头；完全空白的数据行跳过
// ==========================================

use crate::domain::{CellValue, SourceTable};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// WorkbookParser Trait
// ==========================================
// 用途: 把单个文件解析为若干张命名 Sheet
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait WorkbookParser: Send + Sync {
    /// 列出文件内的 Sheet 名（保持文件内顺序）
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>>;

    /// 解析指定 Sheet
    ///
    /// # 返回
    /// - Ok(SourceTable): 表头 + 数据行
    /// - Err(SheetNotFound): 文件中没有该 Sheet
    /// - Err: 文件读取/格式错误
    fn parse_sheet(&self, file_path: &Path, sheet_name: &str) -> ImportResult<SourceTable>;

    /// 只读取表头（默认实现: 完整解析后取列名）
    fn parse_header(&self, file_path: &Path, sheet_name: &str) -> ImportResult<Vec<String>> {
        Ok(self.parse_sheet(file_path, sheet_name)?.columns().to_vec())
    }
}

/// 文件名（用于错误信息）
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// 小写扩展名
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// 规范化表头：去除首尾空白；空表头按列号命名
fn normalize_header(raw: &str, col_idx: usize) -> String {
    let name = raw.trim();
    if name.is_empty() {
        format!("Unnamed: {}", col_idx)
    } else {
        name.to_string()
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
// CSV 只有一张表，以 sheet_name 对外暴露
pub struct CsvParser {
    sheet_name: String,
}

impl CsvParser {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    fn check_file(&self, path: &Path) -> ImportResult<()> {
        ensure_exists(path)?;
        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        Ok(())
    }
}

impl WorkbookParser for CsvParser {
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        self.check_file(file_path)?;
        Ok(vec![self.sheet_name.clone()])
    }

    fn parse_sheet(&self, file_path: &Path, sheet_name: &str) -> ImportResult<SourceTable> {
        self.check_file(file_path)?;
        if sheet_name != self.sheet_name {
            return Err(ImportError::SheetNotFound {
                file: display_name(file_path),
                sheet: sheet_name.to_string(),
            });
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| normalize_header(h, idx))
            .collect();

        // 读取所有行
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record.iter().map(CellValue::infer_from_text).collect();

            // 跳过完全空白的行
            if row.iter().all(CellValue::is_null) {
                continue;
            }

            rows.push(row);
        }

        Ok(SourceTable::new(headers, rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    const EXTENSIONS: [&'static str; 5] = ["xlsx", "xls", "xlsm", "xlsb", "ods"];

    fn check_file(path: &Path) -> ImportResult<()> {
        ensure_exists(path)?;
        let ext = extension_of(path);
        if !Self::EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        Ok(())
    }

    /// calamine 单元格 -> 标量
    ///
    /// 空单元格与错误单元格视为缺失值
    fn cell_to_value(cell: &Data) -> CellValue {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Null,
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => Self::number_to_value(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::String(s) if s.trim().is_empty() => CellValue::Null,
            Data::String(s) => CellValue::String(s.clone()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        }
    }

    /// xlsx 数字统一以浮点存储；整数值按 Int 读取
    fn number_to_value(f: f64) -> CellValue {
        // 2^53，超出后浮点无法精确表示整数
        const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;
        if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT {
            CellValue::Int(f as i64)
        } else {
            CellValue::Float(f)
        }
    }
}

impl WorkbookParser for ExcelParser {
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        Self::check_file(file_path)?;
        let workbook = open_workbook_auto(file_path)?;
        Ok(workbook.sheet_names())
    }

    fn parse_sheet(&self, file_path: &Path, sheet_name: &str) -> ImportResult<SourceTable> {
        Self::check_file(file_path)?;
        let mut workbook = open_workbook_auto(file_path)?;

        if !workbook.sheet_names().iter().any(|s| s == sheet_name) {
            return Err(ImportError::SheetNotFound {
                file: display_name(file_path),
                sheet: sheet_name.to_string(),
            });
        }

        let range = workbook.worksheet_range(sheet_name)?;

        // 提取表头（第一行）；空 Sheet 视为无列无行
        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(idx, cell)| normalize_header(&cell.to_string(), idx))
                .collect(),
            None => return Ok(SourceTable::default()),
        };

        // 读取数据行
        let mut records = Vec::new();
        for data_row in rows {
            let row: Vec<CellValue> = data_row.iter().map(Self::cell_to_value).collect();

            // 跳过完全空白的行
            if row.iter().all(CellValue::is_null) {
                continue;
            }

            records.push(row);
        }

        Ok(SourceTable::new(headers, records))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    csv: CsvParser,
    excel: ExcelParser,
}

impl UniversalFileParser {
    pub fn new(csv_sheet_name: impl Into<String>) -> Self {
        Self {
            csv: CsvParser::new(csv_sheet_name),
            excel: ExcelParser,
        }
    }

    fn parser_for(&self, path: &Path) -> ImportResult<&dyn WorkbookParser> {
        let ext = extension_of(path);
        match ext.as_str() {
            "csv" => Ok(&self.csv),
            e if ExcelParser::EXTENSIONS.contains(&e) => Ok(&self.excel),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

impl WorkbookParser for UniversalFileParser {
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        self.parser_for(file_path)?.sheet_names(file_path)
    }

    fn parse_sheet(&self, file_path: &Path, sheet_name: &str) -> ImportResult<SourceTable> {
        self.parser_for(file_path)?.parse_sheet(file_path, sheet_name)
    }

    fn parse_header(&self, file_path: &Path, sheet_name: &str) -> ImportResult<Vec<String>> {
        self.parser_for(file_path)?.parse_header(file_path, sheet_name)
    }
}
