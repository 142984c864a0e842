// ==========================================
// 多工作簿列合并平台 - 运行配置
// ==========================================
// 职责: 解析数据目录、输出目录、预览行数、可识别扩展名、输出格式
// 存储: 无持久化，启动时由环境变量/命令行组装
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 默认预览行数
pub const DEFAULT_PREVIEW_ROWS: usize = 50;

/// CSV 文件只有一张表，统一按此名称暴露
pub const DEFAULT_CSV_SHEET_NAME: &str = "Sheet1";

/// 环境变量键名
pub mod env_keys {
    pub const DATA_DIR: &str = "MINI_EXCEL_DATA_DIR";
    pub const OUTPUT_DIR: &str = "MINI_EXCEL_OUTPUT_DIR";
    pub const PREVIEW_ROWS: &str = "MINI_EXCEL_PREVIEW_ROWS";
    pub const CSV_SHEET_NAME: &str = "MINI_EXCEL_CSV_SHEET";
    pub const OUTPUT_FORMAT: &str = "MINI_EXCEL_OUTPUT_FORMAT";
}

// ==========================================
// OutputFormat - 合并结果文件格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    /// 输出文件扩展名（不含点）
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }

    /// 解析格式名（大小写不敏感）
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Some(OutputFormat::Xlsx),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

// ==========================================
// AppConfig - 运行配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 源文件目录（known files 的全集）
    pub data_dir: PathBuf,

    /// 合并结果输出目录
    pub output_dir: PathBuf,

    /// 预览返回的最大行数
    pub preview_rows: usize,

    /// 视为工作簿的扩展名（小写，不含点）
    pub allowed_extensions: Vec<String>,

    /// CSV 文件对外暴露的 Sheet 名
    pub csv_sheet_name: String,

    /// 合并结果文件格式
    pub output_format: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_base_dir(default_base_dir())
    }
}

impl AppConfig {
    /// 以 base_dir 为根创建配置（data/ 与 output/ 子目录）
    pub fn with_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        let base = base_dir.as_ref();
        Self {
            data_dir: base.join("data"),
            output_dir: base.join("output"),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            allowed_extensions: ["xlsx", "xls", "xlsm", "xlsb", "ods", "csv"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            csv_sheet_name: DEFAULT_CSV_SHEET_NAME.to_string(),
            output_format: OutputFormat::default(),
        }
    }

    /// 从进程环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置（未设置或为空的键使用默认值）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(dir) = non_empty(env_keys::DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty(env_keys::OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = non_empty(env_keys::PREVIEW_ROWS) {
            match raw.parse::<usize>() {
                Ok(rows) if rows > 0 => config.preview_rows = rows,
                _ => {
                    tracing::warn!(
                        config_key = env_keys::PREVIEW_ROWS,
                        raw_value = %raw,
                        "预览行数配置格式错误，使用默认值"
                    );
                }
            }
        }
        if let Some(name) = non_empty(env_keys::CSV_SHEET_NAME) {
            config.csv_sheet_name = name;
        }
        if let Some(raw) = non_empty(env_keys::OUTPUT_FORMAT) {
            match OutputFormat::parse(&raw) {
                Some(format) => config.output_format = format,
                None => {
                    tracing::warn!(
                        config_key = env_keys::OUTPUT_FORMAT,
                        raw_value = %raw,
                        "输出格式配置无法识别，使用默认值"
                    );
                }
            }
        }

        config
    }

    /// 判断文件名是否属于可识别的工作簿
    pub fn is_workbook_file(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|a| *a == ext)
            })
            .unwrap_or(false)
    }
}

/// 默认根目录: 用户数据目录/mini-excel-platform（取不到时回退到当前目录）
fn default_base_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("mini-excel-platform"),
        None => PathBuf::from("."),
    }
}
