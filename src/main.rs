// ==========================================
// 多工作簿列合并平台 - 命令行入口
// ==========================================
// 输出: 成功时 JSON 写入 stdout；失败时错误响应 JSON 写入 stderr
// 退出码: 0 成功 / 2 调用方错误 / 1 服务端错误
// ==========================================

use clap::{Parser, Subcommand};
use mini_excel_platform::api::{ApiError, ApiResult, MergeRequest, WorkflowRequest};
use mini_excel_platform::{logging, AppConfig, OutputFormat, WorkbookApi};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

/// 浏览数据目录中的工作簿，并按 Sheet/列合并为一张表
#[derive(Parser, Debug)]
#[command(name = "mini-excel-platform")]
#[command(version)]
#[command(about = "Merge a column set from one sheet across many workbooks", long_about = None)]
struct Cli {
    /// 源文件目录（默认读取 MINI_EXCEL_DATA_DIR，再回退到用户数据目录）
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// 合并结果输出目录（默认读取 MINI_EXCEL_OUTPUT_DIR）
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// 预览行数
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    preview_rows: Option<u32>,

    /// 合并结果格式（默认读取 MINI_EXCEL_OUTPUT_FORMAT，再回退到 xlsx）
    #[arg(long, global = true, value_parser = ["xlsx", "csv"])]
    output_format: Option<String>,

    /// 以 JSON 行格式输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 列出全部已知文件
    Files,

    /// 列出文件中的 Sheet
    Sheets { filename: String },

    /// 预览 Sheet 前 N 行
    Preview { filename: String, sheet: String },

    /// 汇总所有文件中某个 Sheet 的列名
    Columns { sheet: String },

    /// 对全部已知文件直接合并
    Merge {
        /// Sheet 名
        #[arg(long)]
        sheet: String,

        /// 目标列（按给定顺序输出，可重复）
        #[arg(long = "column", short = 'c', required = true)]
        columns: Vec<String>,
    },

    /// 运行流水线（JSON 文件；"-" 表示从 stdin 读取）
    Run { workflow: String },

    /// 输出合并结果文件的路径
    Download { filename: String },
}

/// 读取流水线 JSON（文件路径或 "-" 表示 stdin）
///
/// 读取失败与格式错误都属于调用方错误
fn read_workflow(source: &str) -> ApiResult<WorkflowRequest> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| ApiError::InvalidInput(format!("读取 stdin 失败: {}", e)))?;
        buf
    } else {
        std::fs::read_to_string(source).map_err(|e| {
            ApiError::InvalidInput(format!("读取流水线文件失败: {}: {}", source, e))
        })?
    };

    WorkflowRequest::from_json(&raw)
}

fn build_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(rows) = cli.preview_rows {
        config.preview_rows = rows as usize;
    }
    if let Some(format) = cli.output_format.as_deref().and_then(OutputFormat::parse) {
        config.output_format = format;
    }
    config
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 执行 API 调用并输出结果；API 错误转换为退出码
fn emit<T: Serialize>(result: ApiResult<T>) -> anyhow::Result<ExitCode> {
    match result {
        Ok(value) => {
            print_json(&value)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::warn!(code = err.code(), "请求失败: {}", err);
            eprintln!("{}", serde_json::to_string_pretty(&err.to_response())?);
            Ok(if err.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let config = build_config(&cli);
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        version = mini_excel_platform::VERSION,
        "配置已加载"
    );

    let api = WorkbookApi::from_config(&config);

    match cli.command {
        Command::Files => emit(api.list_files()),
        Command::Sheets { filename } => emit(api.list_sheets(&filename)),
        Command::Preview { filename, sheet } => emit(api.preview(&filename, &sheet)),
        Command::Columns { sheet } => emit(api.columns(&sheet)),
        Command::Merge { sheet, columns } => emit(api.merge(&MergeRequest {
            sheet_name: sheet,
            columns,
        })),
        Command::Run { workflow } => {
            emit(read_workflow(&workflow).and_then(|request| api.run_workflow(&request)))
        }
        Command::Download { filename } => emit(
            api.download(&filename)
                .map(|path| serde_json::json!({ "path": path.display().to_string() })),
        ),
    }
}
