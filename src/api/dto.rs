// ==========================================
// 多工作簿列合并平台 - API 请求/响应结构
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::WorkflowNode;
use serde::{Deserialize, Serialize};

/// 文件列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

/// Sheet 列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetListResponse {
    pub filename: String,
    pub sheets: Vec<String>,
}

/// 预览响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    /// 列名（保持原表顺序）
    pub columns: Vec<String>,
    /// 行记录 {列名: 值}，缺失值显示为空串
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// 列并集响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsResponse {
    pub sheet: String,
    pub columns: Vec<String>,
}

/// 直接合并请求（使用全部已知文件）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    pub sheet_name: String,
    pub columns: Vec<String>,
}

/// 直接合并响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeResponse {
    pub output_identifier: String,
}

/// 流水线运行请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub nodes: Vec<WorkflowNode>,
}

impl WorkflowRequest {
    /// 解析流水线 JSON: {"nodes": [...]} 或直接为节点数组
    ///
    /// # 返回
    /// - Err(InvalidInput): JSON 格式错误、未知节点类型等（携带 serde 的原始错误信息）
    pub fn from_json(raw: &str) -> ApiResult<Self> {
        let invalid = |e: serde_json::Error| ApiError::InvalidInput(format!("流水线 JSON 格式错误: {}", e));

        let value: serde_json::Value = serde_json::from_str(raw).map_err(invalid)?;
        if value.is_array() {
            let nodes: Vec<WorkflowNode> = serde_json::from_value(value).map_err(invalid)?;
            Ok(Self { nodes })
        } else {
            serde_json::from_value(value).map_err(invalid)
        }
    }
}

/// 流水线运行响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunResponse {
    /// 固定为 "ok"
    pub status: String,
    /// 输出标识（输出目录中的文件名）
    pub output_identifier: String,
    pub sheet_name: String,
    pub columns: Vec<String>,
    /// 实际参与候选的文件（未选择时为全部已知文件）
    pub files: Vec<String>,
}
