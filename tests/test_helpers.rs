// ==========================================
// 设备维修工单分析系统 - 集成测试辅助
// ==========================================
// 职责: 生成工单 CSV 测试文件
// ==========================================

#![allow(dead_code)]

use std::io::Write;
use tempfile::{Builder, NamedTempFile};

/// 完整表头（与导入层标准列名一致）
pub const FULL_HEADER: &str = "ORDER_ID,PLANT_ID,EQUIPMENT_ID,FUNCTIONAL_LOC,EQUIPMENT_CATEGORY,ORDER_DESCRIPTION,MAINTENANCE_TYPE_DESCRIPTION,MAINTENANCE_ACTIVITY_TYPE,EXECUTION_START_DATE,EXECUTION_FINISH_DATE,MAINTENANCE_PLAN,MAINTENANCE_ITEM,VALID_FROM,VALID_TO,ACTUAL_WORK_IN_MINUTES";

/// 写出 .csv 临时文件（首行表头）
pub fn write_work_order_csv(rows: &[String]) -> NamedTempFile {
    let mut temp_file = Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("创建临时CSV失败");
    writeln!(temp_file, "{}", FULL_HEADER).expect("写表头失败");
    for row in rows {
        writeln!(temp_file, "{}", row).expect("写数据行失败");
    }
    temp_file
}

/// 九列建模特征全部非空的完整数据行
///
/// 派生列全部使用奇数模,避免与行号奇偶性对齐
pub fn complete_row(
    order_id: usize,
    plant_id: &str,
    equipment_id: &str,
    activity_type: &str,
    minutes: &str,
) -> String {
    const MAINTENANCE_TYPES: [&str; 3] = ["PREVENTIVE", "CORRECTIVE", "INSPECTION"];
    format!(
        "{order_id},{plant_id},{equipment_id},AREA-{area},M,REPAIR JOB {desc},{mtype},{activity_type},20240301,20240302,MP-{plan},MI-{item},20240101,20241231,{minutes}",
        area = order_id % 3,
        desc = order_id % 5,
        mtype = MAINTENANCE_TYPES[order_id % 3],
        plan = order_id % 3,
        item = order_id % 5,
    )
}

/// 可分数据集: 非计划维修固定 120 分钟（重大故障）,
/// 计划维修固定 30 分钟（一般维修）;
/// 活动类型是唯一与标签对齐的特征列
pub fn separable_csv(rows: usize) -> NamedTempFile {
    let lines: Vec<String> = (0..rows)
        .map(|i| {
            let (activity, minutes) = if i % 2 == 0 {
                ("UNPLANNED", "120")
            } else {
                ("PLANNED", "30")
            };
            complete_row(
                7000 + i,
                &format!("P{}", 100 + (i % 3)),
                &format!("EQ-{:03}", i % 7),
                activity,
                minutes,
            )
        })
        .collect();
    write_work_order_csv(&lines)
}
