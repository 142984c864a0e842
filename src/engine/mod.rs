// ==========================================
// 多工作簿列合并平台 - 引擎层
// ==========================================
// 职责: 结构对齐合并、流水线状态执行、列结构发现
// 红线: 引擎不直接接触文件系统，只通过 WorkbookStore 读取
// ==========================================

pub mod error;
pub mod merger;
pub mod pipeline;
pub mod schema;

// 重导出核心引擎
pub use error::{EngineError, EngineResult, PrecedingStep};
pub use merger::SchemaMerger;
pub use pipeline::{PipelineExecutor, PipelineOutcome};
pub use schema::union_columns;
