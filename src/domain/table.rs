// ==========================================
// 多工作簿列合并平台 - 表格数据模型
// ==========================================
// SourceTable: 外部加载器解析出的一张 Sheet（只读）
// MergedTable: 合并引擎的输出（列 = 目标列 + SourceFile）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 来源列（provenance column）名称，固定追加在合并结果最后一列
pub const SOURCE_FILE_COLUMN: &str = "SourceFile";

// ==========================================
// 单元格值 (Cell Value)
// ==========================================
// 序列化格式: untagged（null / bool / number / string）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// 按文本推断标量类型（CSV 读取使用）
    ///
    /// 空串 -> Null；整数 -> Int；浮点 -> Float；true/false -> Bool；其余保持字符串
    pub fn infer_from_text(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = text.parse::<i64>() {
            return CellValue::Int(i);
        }
        if let Ok(f) = text.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }
        match text.to_ascii_lowercase().as_str() {
            "true" => CellValue::Bool(true),
            "false" => CellValue::Bool(false),
            _ => CellValue::String(raw.to_string()),
        }
    }

    /// 转为展示文本（Null 显示为空串）
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

// ==========================================
// SourceTable - 已解析的单张 Sheet
// ==========================================
// 列名有序、不校验唯一性；按列名取值时命中第一列
// 每行与列一一对齐（构造时补齐/截断）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl SourceTable {
    /// 创建表格，行长度按列数对齐（不足补 Null，超出截断）
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// 仅有表头、无数据行的表
    pub fn header_only(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 列名 -> 列下标（重复列名取第一列）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// 读取单元格（列不存在或越界返回 None）
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// 取前 n 行，列保持不变
    pub fn head(&self, n: usize) -> SourceTable {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

// ==========================================
// MergedTable - 合并结果
// ==========================================
// 列顺序: 目标列顺序 + SourceFile
// 行顺序: 来源顺序，来源内保持原始行序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedTable {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<CellValue>>,
    /// 实际贡献了投影的来源（按合并顺序）
    pub(crate) sources: Vec<String>,
}

impl MergedTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// 整列取值（列不存在返回 None）
    pub fn column_values(&self, column: &str) -> Option<Vec<&CellValue>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }
}
