// ==========================================
// 流水线端到端测试（数据目录 + CSV/XLSX 输出）
// ==========================================
// 测试目标: 从真实目录读取源文件，经 WorkbookApi 运行流水线并写出结果
// ==========================================

mod test_helpers;

use mini_excel_platform::api::{MergeRequest, WorkflowRequest};
use mini_excel_platform::importer::{ExcelParser, WorkbookParser};
use mini_excel_platform::{logging, AppConfig, CellValue, OutputFormat, WorkbookApi};
use std::fs;
use tempfile::TempDir;
use test_helpers::{create_test_workspace, read_output_lines, write_csv, write_xlsx};

/// 数据目录:
/// - a.csv: Region, Amount（2 行）
/// - b.csv: Region（1 行）
/// - broken.xlsx: 不是合法的工作簿
/// - c.csv: Manager（1 行）
/// - notes.txt: 非工作簿，不出现在文件列表中
fn setup() -> (TempDir, AppConfig, WorkbookApi) {
    logging::init_test();
    let (temp_dir, mut config) = create_test_workspace().expect("Failed to create workspace");
    config.output_format = OutputFormat::Csv;
    write_csv(&config, "a.csv", &["Region,Amount", "North,10", "South,20"]).unwrap();
    write_csv(&config, "b.csv", &["Region", "East"]).unwrap();
    write_csv(&config, "c.csv", &["Manager", "Li"]).unwrap();
    fs::write(config.data_dir.join("broken.xlsx"), "not a workbook").unwrap();
    fs::write(config.data_dir.join("notes.txt"), "ignore me").unwrap();

    let api = WorkbookApi::from_config(&config);
    (temp_dir, config, api)
}

fn parse_request(json: &str) -> WorkflowRequest {
    serde_json::from_str(json).expect("invalid workflow json")
}

#[test]
fn test_list_files_and_sheets() {
    let (_dir, _config, api) = setup();

    let files = api.list_files().unwrap().files;
    assert_eq!(files, vec!["a.csv", "b.csv", "broken.xlsx", "c.csv"]);

    let sheets = api.list_sheets("a.csv").unwrap();
    assert_eq!(sheets.sheets, vec!["Sheet1"]);

    let err = api.list_sheets("broken.xlsx").unwrap_err();
    assert_eq!(err.code(), "IMPORT_ERROR");
    assert!(err.is_client_error());
}

#[test]
fn test_union_columns_skips_unreadable_files() {
    let (_dir, _config, api) = setup();

    let response = api.columns("Sheet1").unwrap();
    assert_eq!(response.columns, vec!["Region", "Amount", "Manager"]);

    let response = api.columns("Sales").unwrap();
    assert!(response.columns.is_empty());
}

#[test]
fn test_preview_reads_first_rows() {
    let (_dir, _config, api) = setup();

    let preview = api.preview("a.csv", "Sheet1").unwrap();
    assert_eq!(preview.columns, vec!["Region", "Amount"]);
    assert_eq!(preview.rows.len(), 2);
    assert_eq!(preview.rows[0]["Region"], "North");
    assert_eq!(preview.rows[0]["Amount"], 10);
}

#[test]
fn test_workflow_with_selected_files() {
    let (_dir, config, api) = setup();
    let request = parse_request(
        r#"{"nodes": [
            {"id": "f", "type": "select_files", "files": ["a.csv", "b.csv"]},
            {"id": "s", "type": "select_sheet", "sheet_name": "Sheet1"},
            {"id": "c", "type": "select_columns", "columns": ["Amount", "Region"]},
            {"id": "m", "type": "merge_columns"}
        ]}"#,
    );

    let response = api.run_workflow(&request).unwrap();

    assert_eq!(response.status, "ok");
    assert_eq!(response.sheet_name, "Sheet1");
    assert_eq!(response.columns, vec!["Amount", "Region"]);
    assert_eq!(response.files, vec!["a.csv", "b.csv"]);
    assert_eq!(response.output_identifier, "merged_Sheet1.csv");

    let lines = read_output_lines(&config, &response.output_identifier).unwrap();
    assert_eq!(
        lines,
        vec![
            "Amount,Region,SourceFile",
            "10,North,a.csv",
            "20,South,a.csv",
            ",East,b.csv",
        ]
    );
}

#[test]
fn test_workflow_defaults_to_all_files_and_skips_broken() {
    let (_dir, config, api) = setup();
    let request = parse_request(
        r#"{"nodes": [
            {"id": "s", "type": "select_sheet", "sheet_name": "Sheet1"},
            {"id": "c", "type": "select_columns", "columns": ["Region"]},
            {"id": "m", "type": "merge_columns"}
        ]}"#,
    );

    let response = api.run_workflow(&request).unwrap();
    assert_eq!(response.files, vec!["a.csv", "b.csv", "broken.xlsx", "c.csv"]);

    let lines = read_output_lines(&config, &response.output_identifier).unwrap();
    // 表头 + a(2) + b(1) + c(1)；broken.xlsx 静默跳过
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[4], ",c.csv");

    let path = api.download(&response.output_identifier).unwrap();
    assert!(path.is_file());
}

#[test]
fn test_workflow_unknown_file() {
    let (_dir, _config, api) = setup();
    let request = parse_request(
        r#"{"nodes": [
            {"id": "f1", "type": "select_files", "files": ["a.csv", "z.csv", "notes.txt"]},
            {"id": "m", "type": "merge_columns"}
        ]}"#,
    );

    let err = api.run_workflow(&request).unwrap_err();
    let response = err.to_response();

    assert_eq!(response.code, "UNKNOWN_FILES");
    let details = response.details.unwrap();
    assert_eq!(details["node_id"], "f1");
    assert_eq!(details["files"], serde_json::json!(["z.csv", "notes.txt"]));
}

#[test]
fn test_workflow_empty_file_list_is_missing_field() {
    let (_dir, _config, api) = setup();
    let request = parse_request(
        r#"{"nodes": [
            {"id": "f", "type": "select_files", "files": []},
            {"id": "s", "type": "select_sheet", "sheet_name": "Sheet1"},
            {"id": "c", "type": "select_columns", "columns": ["Region"]},
            {"id": "m", "type": "merge_columns"}
        ]}"#,
    );

    let err = api.run_workflow(&request).unwrap_err();
    assert_eq!(err.code(), "MISSING_FIELD");
    assert!(err.to_string().contains("files"));
}

#[test]
fn test_workflow_missing_sheet_name_field() {
    let (_dir, _config, api) = setup();
    let request = parse_request(r#"{"nodes": [{"id": "s9", "type": "select_sheet"}]}"#);

    let err = api.run_workflow(&request).unwrap_err();
    assert_eq!(err.code(), "MISSING_FIELD");
    assert!(err.to_string().contains("s9"));
}

#[test]
fn test_workflow_merge_before_sheet() {
    let (_dir, _config, api) = setup();
    let request = parse_request(
        r#"{"nodes": [
            {"id": "c", "type": "select_columns", "columns": ["Region"]},
            {"id": "m", "type": "merge_columns"}
        ]}"#,
    );

    let err = api.run_workflow(&request).unwrap_err();
    assert_eq!(err.code(), "MISSING_PRECEDING_STEP");
    assert!(err.to_string().contains("no sheet selected"));
}

#[test]
fn test_direct_merge_absent_sheet_is_no_data() {
    let (_dir, config, api) = setup();

    let err = api
        .merge(&MergeRequest {
            sheet_name: "Sales".to_string(),
            columns: vec!["Region".to_string()],
        })
        .unwrap_err();

    assert_eq!(err.code(), "NO_DATA");
    assert!(err.is_client_error());
    let details = err.to_response().details.unwrap();
    assert_eq!(details["sheet_name"], "Sales");
    assert_eq!(
        details["files"],
        serde_json::json!(["a.csv", "b.csv", "broken.xlsx", "c.csv"])
    );
    // 失败时不产生输出
    assert!(!config.output_dir.join("merged_Sales.csv").exists());
}

#[test]
fn test_direct_merge_writes_output() {
    let (_dir, config, api) = setup();

    let response = api
        .merge(&MergeRequest {
            sheet_name: "Sheet1".to_string(),
            columns: vec!["Manager".to_string()],
        })
        .unwrap();

    let lines = read_output_lines(&config, &response.output_identifier).unwrap();
    assert_eq!(lines[0], "Manager,SourceFile");
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[4], "Li,c.csv");
}

#[test]
fn test_download_missing_output() {
    let (_dir, _config, api) = setup();

    let err = api.download("merged_nothing.csv").unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_known_file_with_consecutive_dots_contributes() {
    logging::init_test();
    let (_dir, mut config) = create_test_workspace().unwrap();
    config.output_format = OutputFormat::Csv;
    write_csv(&config, "sales..2024.csv", &["Region", "North", "South"]).unwrap();
    let api = WorkbookApi::from_config(&config);

    assert_eq!(api.list_files().unwrap().files, vec!["sales..2024.csv"]);

    let request = parse_request(
        r#"{"nodes": [
            {"id": "f", "type": "select_files", "files": ["sales..2024.csv"]},
            {"id": "s", "type": "select_sheet", "sheet_name": "Sheet1"},
            {"id": "c", "type": "select_columns", "columns": ["Region"]},
            {"id": "m", "type": "merge_columns"}
        ]}"#,
    );
    let response = api.run_workflow(&request).unwrap();

    let lines = read_output_lines(&config, &response.output_identifier).unwrap();
    assert_eq!(
        lines,
        vec!["Region,SourceFile", "North,sales..2024.csv", "South,sales..2024.csv"]
    );
}

#[test]
fn test_xlsx_sources_merge_into_xlsx_output() {
    logging::init_test();
    let (_dir, config) = create_test_workspace().unwrap();
    assert_eq!(config.output_format, OutputFormat::Xlsx);

    let a_sales: &[&[&str]] = &[&["Region", "Amount"], &["North", "10"], &["South", "20"]];
    let a_costs: &[&[&str]] = &[&["Budget"], &["100"]];
    let b_sales: &[&[&str]] = &[&["Amount", "Manager"], &["5", "Li"]];
    write_xlsx(&config, "a.xlsx", &[("Costs", a_costs), ("Sales", a_sales)]).unwrap();
    write_xlsx(&config, "b.xlsx", &[("Sales", b_sales)]).unwrap();
    let api = WorkbookApi::from_config(&config);

    assert_eq!(api.list_sheets("a.xlsx").unwrap().sheets, vec!["Costs", "Sales"]);
    assert_eq!(
        api.columns("Sales").unwrap().columns,
        vec!["Region", "Amount", "Manager"]
    );

    let request = parse_request(
        r#"{"nodes": [
            {"id": "s", "type": "select_sheet", "sheet_name": "Sales"},
            {"id": "c", "type": "select_columns", "columns": ["Region", "Amount", "Manager"]},
            {"id": "m", "type": "merge_columns"}
        ]}"#,
    );
    let response = api.run_workflow(&request).unwrap();
    assert_eq!(response.output_identifier, "merged_Sales.xlsx");

    let path = api.download(&response.output_identifier).unwrap();
    let merged = ExcelParser.parse_sheet(&path, "Sheet1").unwrap();

    assert_eq!(merged.columns(), &["Region", "Amount", "Manager", "SourceFile"]);
    assert_eq!(merged.row_count(), 3);
    assert_eq!(merged.value(0, "Amount"), Some(&CellValue::Int(10)));
    assert_eq!(merged.value(0, "Manager"), Some(&CellValue::Null));
    assert_eq!(merged.value(2, "Region"), Some(&CellValue::Null));
    assert_eq!(merged.value(2, "Manager"), Some(&CellValue::from("Li")));
    assert_eq!(merged.value(2, "SourceFile"), Some(&CellValue::from("b.xlsx")));
}
