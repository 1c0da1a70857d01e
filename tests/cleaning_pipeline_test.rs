// ==========================================
// 设备维修工单分析系统 - 清洗流程集成测试
// ==========================================
// 覆盖: 导入 → 字段映射 → 清洗 → 打标 → 交接文件导出
// ==========================================

mod test_helpers;

use work_order_analytics::importer::csv_export::{write_cleaned_csv, CLEANED_EXPORT_FILE_NAME};
use work_order_analytics::importer::{ImportError, WorkOrderImporter};
use work_order_analytics::{DataCleaner, Labeler, WorkOrder};

// ==========================================
// 五行场景: 工时 [10, 60, 1000, 61, NA]
//           设备号 [A, B, C, "", "NA"]
// ==========================================
#[test]
fn test_five_row_cleaning_scenario() {
    let rows = vec![
        test_helpers::complete_row(1, "P100", "A", "PLANNED", "10"),
        test_helpers::complete_row(2, "P100", "B", "PLANNED", "60"),
        test_helpers::complete_row(3, "P100", "C", "UNPLANNED", "1000"),
        test_helpers::complete_row(4, "P100", "", "UNPLANNED", "61"),
        test_helpers::complete_row(5, "P100", "E", "UNPLANNED", "NA"),
    ];
    let csv = test_helpers::write_work_order_csv(&rows);

    let importer = WorkOrderImporter::new();
    let cleaned = importer.load_clean(csv.path()).unwrap();

    // 空设备号与缺失工时的行被丢弃
    assert_eq!(cleaned.len(), 3);
    let ids: Vec<&str> = cleaned.iter().map(|o| o.equipment_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);

    // 打标: 60 不超阈值,1000 超阈值
    let labeled = Labeler::new(60.0).label(cleaned);
    let flags: Vec<bool> = labeled.iter().map(|l| l.major_breakdown).collect();
    assert_eq!(flags, vec![false, false, true]);
}

#[test]
fn test_literal_na_equipment_id_dropped() {
    let rows = vec![
        test_helpers::complete_row(1, "P100", "NA", "PLANNED", "30"),
        test_helpers::complete_row(2, "P100", "N/A", "PLANNED", "30"),
        test_helpers::complete_row(3, "P100", "EQ-001", "PLANNED", "30"),
    ];
    let csv = test_helpers::write_work_order_csv(&rows);

    let cleaned = WorkOrderImporter::new().load_clean(csv.path()).unwrap();
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].equipment_id, "EQ-001");
}

// ==========================================
// 幂等性: 对清洗输出再执行一次清洗得到相同数据集
// ==========================================
#[test]
fn test_cleaning_is_idempotent() {
    let rows = vec![
        test_helpers::complete_row(1, "P100", "A", "PLANNED", "10"),
        test_helpers::complete_row(2, "P200", "", "PLANNED", "20"),
        test_helpers::complete_row(3, "P200", "C", "UNPLANNED", "NA"),
        test_helpers::complete_row(4, "P300", "D", "UNPLANNED", "90"),
    ];
    let csv = test_helpers::write_work_order_csv(&rows);

    let first = WorkOrderImporter::new().load_clean(csv.path()).unwrap();

    // 清洗输出回灌为原始工单再清洗一次
    let as_raw: Vec<WorkOrder> = first
        .iter()
        .map(|o| WorkOrder {
            order_id: None,
            plant_id: o.plant_id.clone(),
            equipment_id: Some(o.equipment_id.clone()),
            functional_location: o.functional_location.clone(),
            equipment_category: None,
            order_description: o.order_description.clone(),
            maintenance_type_description: o.maintenance_type_description.clone(),
            maintenance_activity_type: o.maintenance_activity_type.clone(),
            execution_start_date: o.execution_start_date,
            execution_finish_date: o.execution_finish_date,
            maintenance_plan: o.maintenance_plan.clone(),
            maintenance_item: o.maintenance_item.clone(),
            valid_from: None,
            valid_to: None,
            actual_work_minutes: Some(o.actual_work_minutes),
            row_number: 0,
        })
        .collect();

    let second = DataCleaner.clean(as_raw);
    assert_eq!(first, second);
}

#[test]
fn test_missing_required_column_fails_fast() {
    let mut temp_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    use std::io::Write;
    writeln!(temp_file, "ORDER_ID,PLANT_ID,EQUIPMENT_ID").unwrap();
    writeln!(temp_file, "1,P100,EQ-001").unwrap();

    let result = WorkOrderImporter::new().load_raw(temp_file.path());
    assert!(matches!(
        result,
        Err(ImportError::MissingColumn(col)) if col == "ACTUAL_WORK_IN_MINUTES"
    ));
}

#[test]
fn test_invalid_minutes_reports_row_context() {
    let rows = vec![
        test_helpers::complete_row(1, "P100", "A", "PLANNED", "10"),
        test_helpers::complete_row(2, "P100", "B", "PLANNED", "abc"),
    ];
    let csv = test_helpers::write_work_order_csv(&rows);

    let result = WorkOrderImporter::new().load_raw(csv.path());
    // 行号从 2 起算（表头占第 1 行）,坏行在第 3 行
    assert!(matches!(
        result,
        Err(ImportError::TypeConversionError { row: 3, .. })
    ));
}

// ==========================================
// 交接文件: 导出后可被建模阶段原样回读
// ==========================================
#[test]
fn test_cleaned_export_round_trip() {
    let csv = test_helpers::separable_csv(20);
    let importer = WorkOrderImporter::new();
    let cleaned = importer.load_clean(csv.path()).unwrap();
    assert_eq!(cleaned.len(), 20);

    let dir = tempfile::tempdir().unwrap();
    let export_path = dir.path().join(CLEANED_EXPORT_FILE_NAME);
    write_cleaned_csv(&export_path, &cleaned).unwrap();

    let reloaded = importer.load_clean(&export_path).unwrap();
    assert_eq!(reloaded.len(), cleaned.len());
    for (a, b) in cleaned.iter().zip(reloaded.iter()) {
        assert_eq!(a.equipment_id, b.equipment_id);
        assert_eq!(a.actual_work_minutes, b.actual_work_minutes);
        assert_eq!(a.maintenance_activity_type, b.maintenance_activity_type);
    }
}
