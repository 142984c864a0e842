// ==========================================
// 多工作簿列合并平台 - 结构对齐合并引擎
// ==========================================
// 输入: Sheet 名 + 目标列 + 有序来源（标识, 表格或缺失）
// 输出: MergedTable（目标列 + SourceFile）
// ==========================================
// 规则:
// 1. 来源缺失（读取失败/没有该 Sheet）静默跳过
// 2. 来源缺少的目标列补 Null，列顺序以目标列为准
// 3. 按来源顺序拼接，来源内保持原始行序
// 4. 没有任何来源参与 -> NoData（硬失败）
// ==========================================

use crate::domain::{CellValue, ColumnSet, MergedTable, SheetSelector, SourceTable, SOURCE_FILE_COLUMN};
use crate::engine::error::{EngineError, EngineResult};
use crate::importer::WorkbookStore;
use tracing::instrument;

// ==========================================
// SchemaMerger - 结构对齐合并器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaMerger;

impl SchemaMerger {
    pub fn new() -> Self {
        Self
    }

    /// 合并已加载的来源
    ///
    /// # 参数
    /// - sheet: 目标 Sheet（用于错误信息）
    /// - columns: 目标列（决定输出列顺序）
    /// - sources: 有序的 (来源标识, 表格)；None 表示该来源不可用
    ///
    /// # 返回
    /// - Ok(MergedTable): 至少一个来源参与时
    /// - Err(NoData): 所有来源都不可用，错误中列出全部候选来源
    pub fn merge<I>(
        &self,
        sheet: &SheetSelector,
        columns: &ColumnSet,
        sources: I,
    ) -> EngineResult<MergedTable>
    where
        I: IntoIterator<Item = (String, Option<SourceTable>)>,
    {
        let mut output_columns: Vec<String> = columns.names().to_vec();
        output_columns.push(SOURCE_FILE_COLUMN.to_string());

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        let mut contributed: Vec<String> = Vec::new();
        let mut candidates: Vec<String> = Vec::new();

        for (source_id, table) in sources {
            candidates.push(source_id.clone());

            let Some(table) = table else {
                continue;
            };

            rows.extend(Self::project(&table, columns, &source_id));
            contributed.push(source_id);
        }

        if contributed.is_empty() {
            return Err(EngineError::NoData {
                sheet: sheet.name().to_string(),
                files: candidates,
            });
        }

        tracing::debug!(
            sheet = %sheet,
            sources = contributed.len(),
            skipped = candidates.len() - contributed.len(),
            rows = rows.len(),
            "合并完成"
        );

        Ok(MergedTable {
            columns: output_columns,
            rows,
            sources: contributed,
        })
    }

    /// 从存储中逐个读取候选文件后合并
    ///
    /// 读取按候选顺序串行执行；任何读取错误都视为该来源缺失
    #[instrument(skip_all, fields(sheet = %sheet, candidates = candidates.len()))]
    pub fn merge_from_store(
        &self,
        sheet: &SheetSelector,
        columns: &ColumnSet,
        candidates: &[String],
        store: &dyn WorkbookStore,
    ) -> EngineResult<MergedTable> {
        let sources = candidates.iter().map(|file| {
            let table = match store.load_sheet(file, sheet.name()) {
                Ok(table) => Some(table),
                Err(e) => {
                    tracing::debug!(file = %file, error = %e, "来源不可用，跳过");
                    None
                }
            };
            (file.clone(), table)
        });

        self.merge(sheet, columns, sources)
    }

    /// 把单张表投影到目标列，并追加来源标识
    fn project(table: &SourceTable, columns: &ColumnSet, source_id: &str) -> Vec<Vec<CellValue>> {
        let indices: Vec<Option<usize>> = columns.iter().map(|c| table.column_index(c)).collect();

        table
            .rows()
            .iter()
            .map(|row| {
                let mut projected: Vec<CellValue> = indices
                    .iter()
                    .map(|idx| match idx {
                        Some(i) => row.get(*i).cloned().unwrap_or_default(),
                        None => CellValue::Null,
                    })
                    .collect();
                projected.push(CellValue::String(source_id.to_string()));
                projected
            })
            .collect()
    }
}
