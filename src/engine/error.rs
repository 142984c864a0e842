// ==========================================
// 多工作簿列合并平台 - 引擎错误类型
// ==========================================
// 原则: 配置错误立即失败并携带定位信息（节点ID/字段/文件/Sheet）
// 单个来源文件读取失败不属于错误（合并时静默跳过）
// ==========================================

use crate::domain::NodeType;
use crate::importer::ImportError;
use std::fmt;
use thiserror::Error;

/// 合并前必须完成的前置步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecedingStep {
    Sheet,
    Columns,
}

impl fmt::Display for PrecedingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecedingStep::Sheet => write!(f, "sheet"),
            PrecedingStep::Columns => write!(f, "columns"),
        }
    }
}

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 节点缺少必填字段（缺失或为空）
    #[error("节点 {node_id}: {node_type} 缺少必填字段 {field}")]
    MissingField {
        node_id: String,
        node_type: NodeType,
        field: &'static str,
    },

    /// select_files 引用了不存在的文件
    #[error("节点 {node_id}: 未知文件 {files:?}")]
    UnknownFiles { node_id: String, files: Vec<String> },

    /// merge_columns 之前未选择 Sheet/列
    #[error("节点 {node_id}: merge_columns 之前未选择 {step}（no {step} selected）")]
    MissingPrecedingStep { node_id: String, step: PrecedingStep },

    /// 节点序列中没有 merge_columns
    #[error("流水线未执行 merge_columns 节点")]
    NoMergeExecuted,

    /// 所有候选文件都没有可用数据
    #[error("没有可合并的数据: 工作表 '{sheet}', 候选文件 {files:?}")]
    NoData { sheet: String, files: Vec<String> },

    /// 无法列举已知文件全集
    #[error("读取文件列表失败: {0}")]
    Store(#[from] ImportError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
