// ==========================================
// 多工作簿列合并平台 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把引擎/导入错误转换为调用方可读的错误
// 约定: 配置错误与"无数据可合并"都属于调用方错误（client error）
// ==========================================

use crate::engine::EngineError;
use crate::importer::ImportError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含可定位的原因（节点ID/字段/文件/Sheet）
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 流水线/合并错误
    // ==========================================
    #[error("{0}")]
    Workflow(EngineError),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// 目的: 区分"找不到"/"请求非法"/"文件本身有问题"
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(name) => ApiError::NotFound(format!("文件 {}", name)),
            ImportError::SheetNotFound { file, sheet } => {
                ApiError::NotFound(format!("文件 {} 中的工作表 {}", file, sheet))
            }
            ImportError::InvalidFileName(name) => {
                ApiError::InvalidInput(format!("非法文件名: {}", name))
            }
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Store(import_err) => ApiError::from(import_err),
            other => ApiError::Workflow(other),
        }
    }
}

impl ApiError {
    /// 稳定的错误代码（供前端/脚本判断）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Workflow(e) => match e {
                EngineError::MissingField { .. } => "MISSING_FIELD",
                EngineError::UnknownFiles { .. } => "UNKNOWN_FILES",
                EngineError::MissingPrecedingStep { .. } => "MISSING_PRECEDING_STEP",
                EngineError::NoMergeExecuted => "NO_MERGE_EXECUTED",
                EngineError::NoData { .. } => "NO_DATA",
                EngineError::Store(_) => "IMPORT_ERROR",
            },
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }

    /// 是否为调用方错误（请求/配置/数据问题，而非服务端故障）
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ApiError::InternalError(_) | ApiError::Other(_))
    }

    /// 对应的 HTTP 状态码（供 HTTP 封装层使用）
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::InternalError(_) | ApiError::Other(_) => 500,
            _ => 400,
        }
    }

    /// 结构化详情（节点ID、未知文件、Sheet 与候选文件）
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Workflow(EngineError::MissingField {
                node_id,
                node_type,
                field,
            }) => Some(serde_json::json!({
                "node_id": node_id,
                "node_type": node_type,
                "field": field,
            })),
            ApiError::Workflow(EngineError::UnknownFiles { node_id, files }) => {
                Some(serde_json::json!({ "node_id": node_id, "files": files }))
            }
            ApiError::Workflow(EngineError::MissingPrecedingStep { node_id, step }) => {
                Some(serde_json::json!({ "node_id": node_id, "step": step.to_string() }))
            }
            ApiError::Workflow(EngineError::NoData { sheet, files }) => {
                Some(serde_json::json!({ "sheet_name": sheet, "files": files }))
            }
            _ => None,
        }
    }

    /// 转换为错误响应
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 错误响应（返回给调用方）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
