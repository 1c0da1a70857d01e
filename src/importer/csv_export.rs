// ==========================================
// 设备维修工单分析系统 - 清洗结果导出
// ==========================================
// 职责: 清洗后工单写出为 CSV
// 用途: 分析阶段与建模阶段之间的显式交接文件
// ==========================================

use crate::domain::work_order::CleanWorkOrder;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::columns;
use csv::WriterBuilder;
use std::path::Path;

/// 约定的交接文件名
pub const CLEANED_EXPORT_FILE_NAME: &str = "cleaned_IWC_Work_Orders.csv";

/// 导出列（与导入列名一致,建模阶段可直接回读）
const EXPORT_HEADERS: [&str; 11] = [
    columns::PLANT_ID,
    columns::EQUIPMENT_ID,
    columns::FUNCTIONAL_LOC,
    columns::ORDER_DESCRIPTION,
    columns::MAINTENANCE_TYPE_DESCRIPTION,
    columns::MAINTENANCE_ACTIVITY_TYPE,
    columns::EXECUTION_START_DATE,
    columns::EXECUTION_FINISH_DATE,
    columns::MAINTENANCE_PLAN,
    columns::MAINTENANCE_ITEM,
    columns::ACTUAL_WORK_IN_MINUTES,
];

/// 写出清洗后数据集
///
/// # 参数
/// - path: 输出文件路径
/// - orders: 清洗后工单
pub fn write_cleaned_csv(path: &Path, orders: &[CleanWorkOrder]) -> ImportResult<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

    for order in orders {
        let record = [
            order.plant_id.clone().unwrap_or_default(),
            order.equipment_id.clone(),
            order.functional_location.clone().unwrap_or_default(),
            order.order_description.clone().unwrap_or_default(),
            order.maintenance_type_description.clone().unwrap_or_default(),
            order.maintenance_activity_type.clone().unwrap_or_default(),
            order
                .execution_start_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            order
                .execution_finish_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            order.maintenance_plan.clone().unwrap_or_default(),
            order.maintenance_item.clone().unwrap_or_default(),
            format!("{}", order.actual_work_minutes),
        ];
        writer
            .write_record(&record)
            .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;
    Ok(())
}
