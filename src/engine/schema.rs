// ==========================================
// 多工作簿列合并平台 - 列结构发现
// ==========================================
// 职责: 汇总所有已知文件中某个 Sheet 的列名并集
// 规则: 按文件顺序、首次出现顺序去重；读取失败或无该 Sheet 的文件跳过
// ==========================================

use crate::engine::error::EngineResult;
use crate::importer::WorkbookStore;
use tracing::instrument;

/// 跨文件汇总 Sheet 列名
///
/// # 返回
/// - Ok(Vec<String>): 列名并集（没有文件包含该 Sheet 时为空）
/// - Err(Store): 无法列举已知文件
#[instrument(skip(store))]
pub fn union_columns(sheet: &str, store: &dyn WorkbookStore) -> EngineResult<Vec<String>> {
    let mut union: Vec<String> = Vec::new();

    for file in store.list_known_files()? {
        let header = match store.load_header(&file, sheet) {
            Ok(header) => header,
            Err(e) => {
                tracing::debug!(file = %file, error = %e, "跳过文件");
                continue;
            }
        };

        for column in header {
            if !union.contains(&column) {
                union.push(column);
            }
        }
    }

    Ok(union)
}
