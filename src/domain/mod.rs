// ==========================================
// 多工作簿列合并平台 - 领域模型层
// ==========================================
// 职责: 定义表格数据、合并结果、流水线节点与状态
// 红线: 不含文件读取逻辑,不含合并/校验逻辑
// ==========================================

pub mod pipeline;
pub mod table;

// 重导出核心类型
pub use pipeline::{ColumnSet, FileSet, NodeType, PipelineState, SheetSelector, WorkflowNode};
pub use table::{CellValue, MergedTable, SourceTable, SOURCE_FILE_COLUMN};
