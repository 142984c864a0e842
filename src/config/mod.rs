// ==========================================
// 多工作簿列合并平台 - 配置层
// ==========================================
// 职责: 数据目录/输出目录/预览行数等运行参数
// 来源: 默认值 < 环境变量 < 命令行参数
// ==========================================

pub mod app_config;

// 重导出核心配置
pub use app_config::{env_keys, AppConfig, OutputFormat};
