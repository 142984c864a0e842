// ==========================================
// 多工作簿列合并平台 - API 层
// ==========================================
// 职责: 提供与传输方式无关的业务接口,供命令行/HTTP 封装调用
// ==========================================

pub mod dto;
pub mod error;
pub mod workbook_api;

// 重导出核心类型
pub use dto::{
    ColumnsResponse, FileListResponse, MergeRequest, MergeResponse, PreviewResponse,
    SheetListResponse, WorkflowRequest, WorkflowRunResponse,
};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use workbook_api::WorkbookApi;
