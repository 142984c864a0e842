// ==========================================
// 多工作簿列合并平台 - 核心库
// ==========================================
// 技术栈: Rust + calamine + csv + rust_xlsxwriter
// 系统定位: 跨文件 Sheet/列结构对齐与合并
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表格与流水线类型
pub mod domain;

// 导入层 - 工作簿读取与结果导出
pub mod importer;

// 引擎层 - 结构对齐合并 + 流水线执行
pub mod engine;

// 配置层 - 目录与预览参数
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellValue, ColumnSet, FileSet, MergedTable, NodeType, PipelineState, SheetSelector,
    SourceTable, WorkflowNode, SOURCE_FILE_COLUMN,
};

// 引擎
pub use engine::{EngineError, PipelineExecutor, PipelineOutcome, SchemaMerger};

// 导入层
pub use importer::{
    CsvTableExporter, FsWorkbookStore, ImportError, TableExporter, WorkbookStore, XlsxTableExporter,
};

// 配置
pub use config::{AppConfig, OutputFormat};

// API
pub use api::{ApiError, ApiResult, WorkbookApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "多工作簿列合并平台";
