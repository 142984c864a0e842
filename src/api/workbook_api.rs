// ==========================================
// 多工作簿列合并平台 - 工作簿API
// ==========================================
// 职责: 文件/Sheet 浏览、预览、列并集、直接合并、流水线运行、结果下载
// ==========================================

use crate::api::dto::{
    ColumnsResponse, FileListResponse, MergeRequest, MergeResponse, PreviewResponse,
    SheetListResponse, WorkflowRequest, WorkflowRunResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::config::AppConfig;
use crate::domain::{CellValue, ColumnSet, SheetSelector};
use crate::engine::{union_columns, PipelineExecutor, SchemaMerger};
use crate::importer::{exporter_for, FsWorkbookStore, TableExporter, WorkbookStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;

/// 工作簿API
pub struct WorkbookApi {
    store: Arc<dyn WorkbookStore>,
    exporter: Arc<dyn TableExporter>,
    executor: PipelineExecutor,
    merger: SchemaMerger,
    preview_rows: usize,
}

impl WorkbookApi {
    /// 创建新的WorkbookApi实例
    pub fn new(
        store: Arc<dyn WorkbookStore>,
        exporter: Arc<dyn TableExporter>,
        preview_rows: usize,
    ) -> Self {
        Self {
            executor: PipelineExecutor::new(store.clone()),
            store,
            exporter,
            merger: SchemaMerger::new(),
            preview_rows,
        }
    }

    /// 基于目录配置创建（数据目录读取 + 按配置格式导出）
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(FsWorkbookStore::new(config)),
            Arc::from(exporter_for(config.output_format, &config.output_dir)),
            config.preview_rows,
        )
    }

    /// 列出全部已知文件
    pub fn list_files(&self) -> ApiResult<FileListResponse> {
        let files = self.store.list_known_files()?;
        Ok(FileListResponse { files })
    }

    /// 列出文件中的 Sheet
    #[instrument(skip(self))]
    pub fn list_sheets(&self, filename: &str) -> ApiResult<SheetListResponse> {
        let sheets = self.store.list_sheets(filename)?;
        Ok(SheetListResponse {
            filename: filename.to_string(),
            sheets,
        })
    }

    /// 预览 Sheet 前 N 行
    #[instrument(skip(self))]
    pub fn preview(&self, filename: &str, sheet: &str) -> ApiResult<PreviewResponse> {
        let table = self.store.load_sheet(filename, sheet)?.head(self.preview_rows);

        let rows: Vec<serde_json::Map<String, serde_json::Value>> = table
            .rows()
            .iter()
            .map(|row| {
                table
                    .columns()
                    .iter()
                    .zip(row.iter())
                    .map(|(column, value)| (column.clone(), preview_value(value)))
                    .collect()
            })
            .collect();

        Ok(PreviewResponse {
            columns: table.columns().to_vec(),
            rows,
        })
    }

    /// 汇总所有文件中该 Sheet 的列名
    #[instrument(skip(self))]
    pub fn columns(&self, sheet: &str) -> ApiResult<ColumnsResponse> {
        let columns = union_columns(sheet, self.store.as_ref())?;
        Ok(ColumnsResponse {
            sheet: sheet.to_string(),
            columns,
        })
    }

    /// 直接合并（全部已知文件）
    #[instrument(skip(self, request), fields(sheet = %request.sheet_name))]
    pub fn merge(&self, request: &MergeRequest) -> ApiResult<MergeResponse> {
        let sheet = SheetSelector::new(request.sheet_name.clone())
            .ok_or_else(|| ApiError::InvalidInput("sheet_name 不能为空".to_string()))?;
        let columns = ColumnSet::from_names(request.columns.iter().cloned())
            .ok_or_else(|| ApiError::InvalidInput("columns 不能为空".to_string()))?;

        let files = self.store.list_known_files()?;
        let table = self
            .merger
            .merge_from_store(&sheet, &columns, &files, self.store.as_ref())?;
        let output_identifier = self.exporter.export(&table, &sheet)?;

        Ok(MergeResponse { output_identifier })
    }

    /// 运行流水线
    #[instrument(skip(self, request), fields(nodes = request.nodes.len()))]
    pub fn run_workflow(&self, request: &WorkflowRequest) -> ApiResult<WorkflowRunResponse> {
        let outcome = self.executor.run(&request.nodes)?;
        let output_identifier = self.exporter.export(&outcome.table, &outcome.sheet)?;

        Ok(WorkflowRunResponse {
            status: "ok".to_string(),
            output_identifier,
            sheet_name: outcome.sheet.name().to_string(),
            columns: outcome.columns.into_vec(),
            files: outcome.files,
        })
    }

    /// 解析输出文件路径（供下载）
    pub fn download(&self, filename: &str) -> ApiResult<PathBuf> {
        Ok(self.exporter.resolve_output(filename)?)
    }
}

/// 预览值：缺失值显示为空串，其余按原类型输出
fn preview_value(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Null => serde_json::Value::String(String::new()),
        other => serde_json::to_value(other).unwrap_or(serde_json::Value::Null),
    }
}
