// ==========================================
// 多工作簿列合并平台 - 导入层
// ==========================================
// 职责: 列举源文件、解析 Sheet、写出合并结果
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod exporter;
pub mod file_parser;
pub mod workbook_store;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use exporter::{exporter_for, output_file_name, CsvTableExporter, TableExporter, XlsxTableExporter};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser, WorkbookParser};
pub use workbook_store::{validate_file_name, FsWorkbookStore, MemoryWorkbookStore, WorkbookStore};
