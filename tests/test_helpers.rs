// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供临时工作目录、CSV/XLSX 源文件、内存表格等测试数据
// ==========================================

#![allow(dead_code)]

use mini_excel_platform::{AppConfig, CellValue, SourceTable};
use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::fs;
use tempfile::TempDir;

/// 创建临时工作目录（data/ 与 output/）
///
/// # 返回
/// - TempDir: 临时目录（需要保持存活）
/// - AppConfig: 指向该目录的配置
pub fn create_test_workspace() -> Result<(TempDir, AppConfig), Box<dyn Error>> {
    let temp_dir = TempDir::new()?;
    let config = AppConfig::with_base_dir(temp_dir.path());
    fs::create_dir_all(&config.data_dir)?;
    Ok((temp_dir, config))
}

/// 在数据目录中写入 CSV 源文件
pub fn write_csv(config: &AppConfig, file_name: &str, lines: &[&str]) -> Result<(), Box<dyn Error>> {
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(config.data_dir.join(file_name), content)?;
    Ok(())
}

/// 在数据目录中写入 XLSX 源文件
///
/// # 参数
/// - sheets: (Sheet 名, 各行单元格)；可解析为数字的文本写为数字，空串留空
pub fn write_xlsx(
    config: &AppConfig,
    file_name: &str,
    sheets: &[(&str, &[&[&str]])],
) -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    for (sheet_name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*sheet_name)?;
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(number) => worksheet.write_number(r as u32, c as u16, number)?,
                    Err(_) => worksheet.write_string(r as u32, c as u16, *cell)?,
                };
            }
        }
    }
    workbook.save(config.data_dir.join(file_name))?;
    Ok(())
}

/// 构建内存表格
pub fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> SourceTable {
    SourceTable::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}

/// 读取输出 CSV 的全部行
pub fn read_output_lines(config: &AppConfig, output_name: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let content = fs::read_to_string(config.output_dir.join(output_name))?;
    Ok(content.lines().map(|l| l.to_string()).collect())
}
