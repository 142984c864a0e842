// ==========================================
// 多工作簿列合并平台 - 流水线执行器
// ==========================================
// 输入: 有序节点序列（select_files / select_sheet / select_columns / merge_columns）
// 输出: PipelineOutcome（合并结果 + 实际使用的 Sheet/列/文件）
// ==========================================
// 规则:
// 1. 严格按顺序处理节点，前序节点的状态变更对后续节点可见
// 2. select_* 节点覆盖对应状态（不累加）
// 3. 遇到第一个 merge_columns 即执行合并并返回，后续节点不再处理
// 4. 节点耗尽仍未合并 -> NoMergeExecuted
// ==========================================

use crate::domain::{
    ColumnSet, FileSet, MergedTable, NodeType, PipelineState, SheetSelector, WorkflowNode,
};
use crate::engine::error::{EngineError, EngineResult, PrecedingStep};
use crate::engine::merger::SchemaMerger;
use crate::importer::WorkbookStore;
use std::sync::Arc;
use tracing::instrument;

/// 流水线运行结果
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// 合并结果
    pub table: MergedTable,
    /// 使用的 Sheet
    pub sheet: SheetSelector,
    /// 使用的目标列
    pub columns: ColumnSet,
    /// 解析后的候选文件列表（未选择时为全部已知文件）
    pub files: Vec<String>,
}

// ==========================================
// PipelineStep - 校验后的节点
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
enum PipelineStep {
    SelectFiles(Vec<String>),
    SelectSheet(SheetSelector),
    SelectColumns(ColumnSet),
    MergeColumns,
}

impl PipelineStep {
    /// 校验节点载荷（缺失或为空 -> MissingField）
    fn from_node(node: &WorkflowNode) -> EngineResult<Self> {
        let missing = |field: &'static str| EngineError::MissingField {
            node_id: node.id.clone(),
            node_type: node.node_type,
            field,
        };

        match node.node_type {
            NodeType::SelectFiles => match &node.files {
                Some(files) if !files.is_empty() => Ok(PipelineStep::SelectFiles(files.clone())),
                _ => Err(missing("files")),
            },
            NodeType::SelectSheet => node
                .sheet_name
                .clone()
                .and_then(SheetSelector::new)
                .map(PipelineStep::SelectSheet)
                .ok_or_else(|| missing("sheet_name")),
            NodeType::SelectColumns => node
                .columns
                .clone()
                .and_then(ColumnSet::from_names)
                .map(PipelineStep::SelectColumns)
                .ok_or_else(|| missing("columns")),
            NodeType::MergeColumns => Ok(PipelineStep::MergeColumns),
        }
    }
}

// ==========================================
// PipelineExecutor - 流水线执行器
// ==========================================
pub struct PipelineExecutor {
    store: Arc<dyn WorkbookStore>,
    merger: SchemaMerger,
}

impl PipelineExecutor {
    pub fn new(store: Arc<dyn WorkbookStore>) -> Self {
        Self {
            store,
            merger: SchemaMerger::new(),
        }
    }

    /// 执行一条流水线
    ///
    /// # 返回
    /// - Ok(PipelineOutcome): 第一个 merge_columns 节点的合并结果
    /// - Err(MissingField / UnknownFiles / MissingPrecedingStep / NoData): 对应节点失败
    /// - Err(NoMergeExecuted): 节点序列中没有 merge_columns
    #[instrument(skip_all, fields(nodes = nodes.len()))]
    pub fn run(&self, nodes: &[WorkflowNode]) -> EngineResult<PipelineOutcome> {
        let mut state = PipelineState::new();

        for node in nodes {
            tracing::debug!(node_id = %node.id, node_type = %node.node_type, "处理节点");

            match PipelineStep::from_node(node)? {
                PipelineStep::SelectFiles(files) => {
                    self.check_known_files(&node.id, &files)?;
                    state.files = Some(files);
                }
                PipelineStep::SelectSheet(sheet) => {
                    state.sheet = Some(sheet);
                }
                PipelineStep::SelectColumns(columns) => {
                    state.columns = Some(columns);
                }
                PipelineStep::MergeColumns => {
                    return self.execute_merge(&node.id, state);
                }
            }
        }

        Err(EngineError::NoMergeExecuted)
    }

    /// 校验文件均属于当前已知文件全集
    fn check_known_files(&self, node_id: &str, files: &[String]) -> EngineResult<()> {
        let known = self.store.list_known_files()?;
        let unknown: Vec<String> = files
            .iter()
            .filter(|f| !known.contains(*f))
            .cloned()
            .collect();

        if !unknown.is_empty() {
            return Err(EngineError::UnknownFiles {
                node_id: node_id.to_string(),
                files: unknown,
            });
        }
        Ok(())
    }

    /// 终止节点：检查前置步骤后执行合并
    fn execute_merge(&self, node_id: &str, state: PipelineState) -> EngineResult<PipelineOutcome> {
        let file_set = state.file_set();

        let sheet = state.sheet.ok_or_else(|| EngineError::MissingPrecedingStep {
            node_id: node_id.to_string(),
            step: PrecedingStep::Sheet,
        })?;
        let columns = state
            .columns
            .ok_or_else(|| EngineError::MissingPrecedingStep {
                node_id: node_id.to_string(),
                step: PrecedingStep::Columns,
            })?;

        let files = self.resolve_files(file_set)?;
        let table = self
            .merger
            .merge_from_store(&sheet, &columns, &files, self.store.as_ref())?;

        tracing::info!(
            node_id,
            sheet = %sheet,
            columns = columns.len(),
            files = files.len(),
            rows = table.row_count(),
            "流水线合并完成"
        );

        Ok(PipelineOutcome {
            table,
            sheet,
            columns,
            files,
        })
    }

    fn resolve_files(&self, file_set: FileSet) -> EngineResult<Vec<String>> {
        match file_set {
            FileSet::Explicit(files) => Ok(files),
            FileSet::All => Ok(self.store.list_known_files()?),
        }
    }
}
