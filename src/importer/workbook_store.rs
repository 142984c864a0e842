// ==========================================
// 多工作簿列合并平台 - 工作簿存储
// ==========================================
// 职责: 提供"已知文件全集"与按 Sheet 读取表格的能力
// 实现: FsWorkbookStore（数据目录） / MemoryWorkbookStore（内存，测试与嵌入使用）
// ==========================================

use crate::config::AppConfig;
use crate::domain::SourceTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{UniversalFileParser, WorkbookParser};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ==========================================
// WorkbookStore Trait
// ==========================================
// 用途: 合并引擎与流水线执行器依赖的外部协作者
// 实现者: FsWorkbookStore, MemoryWorkbookStore
pub trait WorkbookStore: Send + Sync {
    /// 列出当前已知的全部文件标识（有序）
    fn list_known_files(&self) -> ImportResult<Vec<String>>;

    /// 列出文件中的 Sheet 名
    fn list_sheets(&self, file: &str) -> ImportResult<Vec<String>>;

    /// 读取文件中的指定 Sheet
    ///
    /// 文件不存在、无法解析、没有该 Sheet 都返回 Err
    fn load_sheet(&self, file: &str, sheet: &str) -> ImportResult<SourceTable>;

    /// 读取指定 Sheet 的表头
    fn load_header(&self, file: &str, sheet: &str) -> ImportResult<Vec<String>> {
        Ok(self.load_sheet(file, sheet)?.columns().to_vec())
    }
}

/// 校验文件标识：只允许数据目录下的裸文件名
///
/// 名字中间的连续点号（如 `sales..2024.csv`）合法
pub fn validate_file_name(file: &str) -> ImportResult<()> {
    let invalid = file.is_empty()
        || file == "."
        || file == ".."
        || file.contains('/')
        || file.contains('\\');
    if invalid {
        return Err(ImportError::InvalidFileName(file.to_string()));
    }
    Ok(())
}

// ==========================================
// FsWorkbookStore - 基于数据目录的实现
// ==========================================
pub struct FsWorkbookStore {
    config: AppConfig,
    parser: UniversalFileParser,
}

impl FsWorkbookStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
            parser: UniversalFileParser::new(config.csv_sheet_name.clone()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// 文件标识 -> 数据目录内的路径
    fn path_of(&self, file: &str) -> ImportResult<PathBuf> {
        validate_file_name(file)?;
        Ok(self.config.data_dir.join(file))
    }
}

impl WorkbookStore for FsWorkbookStore {
    fn list_known_files(&self) -> ImportResult<Vec<String>> {
        // 数据目录尚未创建时视为空集
        let data_dir = self.data_dir();
        if !data_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(data_dir)? {
            let entry = entry?;
            // 跟随符号链接：指向文件的链接同样视为已知文件
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if self.config.is_workbook_file(&name) {
                files.push(name);
            }
        }

        files.sort();
        Ok(files)
    }

    fn list_sheets(&self, file: &str) -> ImportResult<Vec<String>> {
        let path = self.path_of(file)?;
        self.parser.sheet_names(&path)
    }

    fn load_sheet(&self, file: &str, sheet: &str) -> ImportResult<SourceTable> {
        let path = self.path_of(file)?;
        tracing::debug!(file, sheet, "读取工作表");
        self.parser.parse_sheet(&path, sheet)
    }

    fn load_header(&self, file: &str, sheet: &str) -> ImportResult<Vec<String>> {
        let path = self.path_of(file)?;
        self.parser.parse_header(&path, sheet)
    }
}

// ==========================================
// MemoryWorkbookStore - 内存实现
// ==========================================
// 文件顺序即插入顺序；可标记"损坏"文件模拟读取失败
#[derive(Default)]
pub struct MemoryWorkbookStore {
    files: Vec<(String, Vec<(String, SourceTable)>)>,
    broken: HashSet<String>,
    load_log: Mutex<Vec<String>>,
}

impl MemoryWorkbookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加（或追加）一张 Sheet
    pub fn with_sheet(mut self, file: &str, sheet: &str, table: SourceTable) -> Self {
        match self.files.iter().position(|(name, _)| name == file) {
            Some(idx) => self.files[idx].1.push((sheet.to_string(), table)),
            None => self
                .files
                .push((file.to_string(), vec![(sheet.to_string(), table)])),
        }
        self
    }

    /// 添加一个无法读取的文件（出现在已知文件中，但任何读取都失败）
    pub fn with_broken_file(mut self, file: &str) -> Self {
        if !self.files.iter().any(|(name, _)| name == file) {
            self.files.push((file.to_string(), Vec::new()));
        }
        self.broken.insert(file.to_string());
        self
    }

    /// 按调用顺序记录的 load_sheet 请求（"file/sheet"）
    pub fn load_log(&self) -> Vec<String> {
        self.load_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn sheets_of(&self, file: &str) -> ImportResult<&[(String, SourceTable)]> {
        if self.broken.contains(file) {
            return Err(ImportError::FileReadError(format!("无法读取文件: {}", file)));
        }
        self.files
            .iter()
            .find(|(name, _)| name == file)
            .map(|(_, sheets)| sheets.as_slice())
            .ok_or_else(|| ImportError::FileNotFound(file.to_string()))
    }
}

impl WorkbookStore for MemoryWorkbookStore {
    fn list_known_files(&self) -> ImportResult<Vec<String>> {
        Ok(self.files.iter().map(|(name, _)| name.clone()).collect())
    }

    fn list_sheets(&self, file: &str) -> ImportResult<Vec<String>> {
        Ok(self
            .sheets_of(file)?
            .iter()
            .map(|(sheet, _)| sheet.clone())
            .collect())
    }

    fn load_sheet(&self, file: &str, sheet: &str) -> ImportResult<SourceTable> {
        if let Ok(mut log) = self.load_log.lock() {
            log.push(format!("{}/{}", file, sheet));
        }
        self.sheets_of(file)?
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, table)| table.clone())
            .ok_or_else(|| ImportError::SheetNotFound {
                file: file.to_string(),
                sheet: sheet.to_string(),
            })
    }
}
