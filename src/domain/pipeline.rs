// ==========================================
// 多工作簿列合并平台 - 流水线领域类型
// ==========================================
// WorkflowNode: 调用方提交的节点（线上格式）
// PipelineState: 单次运行内累积的文件/Sheet/列选择
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// SheetSelector - 目标 Sheet 名
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetSelector(String);

impl SheetSelector {
    /// 空串视为未提供
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ==========================================
// ColumnSet - 有序、去重的目标列
// ==========================================
// 插入顺序决定输出列顺序；驱动合并时必须非空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSet(Vec<String>);

impl ColumnSet {
    /// 构造列集合：保留首次出现的列名，去重后为空返回 None
    pub fn from_names<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }

        if unique.is_empty() {
            None
        } else {
            Some(Self(unique))
        }
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

// ==========================================
// FileSet - 参与合并的文件范围
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSet {
    /// 全部已知文件（运行时按当前目录解析）
    All,
    /// 显式指定的文件列表（设置时已校验）
    Explicit(Vec<String>),
}

// ==========================================
// 节点类型 (Node Type)
// ==========================================
// 序列化格式: snake_case（与调用方约定一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    SelectFiles,
    SelectSheet,
    SelectColumns,
    MergeColumns,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::SelectFiles => "select_files",
            NodeType::SelectSheet => "select_sheet",
            NodeType::SelectColumns => "select_columns",
            NodeType::MergeColumns => "merge_columns",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// WorkflowNode - 流水线节点（线上格式）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// 节点ID（错误信息中用于定位）
    pub id: String,

    /// 节点类型
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// select_files 的文件列表
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    /// select_sheet 的 Sheet 名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,

    /// select_columns 的列名列表
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

impl WorkflowNode {
    fn bare(id: &str, node_type: NodeType) -> Self {
        Self {
            id: id.to_string(),
            node_type,
            files: None,
            sheet_name: None,
            columns: None,
        }
    }

    pub fn select_files<S: Into<String>>(id: &str, files: impl IntoIterator<Item = S>) -> Self {
        Self {
            files: Some(files.into_iter().map(Into::into).collect()),
            ..Self::bare(id, NodeType::SelectFiles)
        }
    }

    pub fn select_sheet(id: &str, sheet_name: &str) -> Self {
        Self {
            sheet_name: Some(sheet_name.to_string()),
            ..Self::bare(id, NodeType::SelectSheet)
        }
    }

    pub fn select_columns<S: Into<String>>(id: &str, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: Some(columns.into_iter().map(Into::into).collect()),
            ..Self::bare(id, NodeType::SelectColumns)
        }
    }

    pub fn merge_columns(id: &str) -> Self {
        Self::bare(id, NodeType::MergeColumns)
    }
}

// ==========================================
// PipelineState - 单次运行的累积状态
// ==========================================
// 三个字段相互独立，任意顺序设置；重复设置直接覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineState {
    pub files: Option<Vec<String>>,
    pub sheet: Option<SheetSelector>,
    pub columns: Option<ColumnSet>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前文件范围（未设置时为全部文件）
    pub fn file_set(&self) -> FileSet {
        match &self.files {
            Some(files) => FileSet::Explicit(files.clone()),
            None => FileSet::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_set_dedup_keeps_first_order() {
        let set = ColumnSet::from_names(["B", "A", "B", "C", "A"]).unwrap();
        assert_eq!(set.names(), &["B", "A", "C"]);
    }

    #[test]
    fn test_column_set_rejects_empty() {
        assert!(ColumnSet::from_names(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_sheet_selector_rejects_empty() {
        assert!(SheetSelector::new("").is_none());
        assert_eq!(SheetSelector::new("Sales").unwrap().name(), "Sales");
    }

    #[test]
    fn test_node_wire_format() {
        let json = r#"[
            {"id": "n1", "type": "select_files", "files": ["a.xlsx"]},
            {"id": "n2", "type": "select_sheet", "sheet_name": "Sales"},
            {"id": "n3", "type": "select_columns", "columns": ["Region"]},
            {"id": "n4", "type": "merge_columns"}
        ]"#;
        let nodes: Vec<WorkflowNode> = serde_json::from_str(json).unwrap();

        assert_eq!(nodes[0], WorkflowNode::select_files("n1", ["a.xlsx"]));
        assert_eq!(nodes[1], WorkflowNode::select_sheet("n2", "Sales"));
        assert_eq!(nodes[2], WorkflowNode::select_columns("n3", ["Region"]));
        assert_eq!(nodes[3], WorkflowNode::merge_columns("n4"));

        let out = serde_json::to_value(&nodes[3]).unwrap();
        assert_eq!(out, serde_json::json!({"id": "n4", "type": "merge_columns"}));
    }

    #[test]
    fn test_unknown_node_type_rejected() {
        let json = r#"{"id": "x", "type": "drop_table"}"#;
        assert!(serde_json::from_str::<WorkflowNode>(json).is_err());
    }

    #[test]
    fn test_state_file_set_defaults_to_all() {
        let mut state = PipelineState::new();
        assert_eq!(state.file_set(), FileSet::All);

        state.files = Some(vec!["a.xlsx".to_string()]);
        assert_eq!(state.file_set(), FileSet::Explicit(vec!["a.xlsx".to_string()]));
    }
}
