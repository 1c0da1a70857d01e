// ==========================================
// 设备维修工单分析系统 - 字段映射器实现
// ==========================================
// 职责: 源列 → 工单字段映射 + 类型转换
// ==========================================

use crate::domain::work_order::WorkOrder;
use crate::importer::error::{ImportError, ImportResult};
use chrono::NaiveDate;
use std::collections::HashMap;

// ==========================================
// 标准列名
// ==========================================
pub mod columns {
    pub const ORDER_ID: &str = "ORDER_ID";
    pub const PLANT_ID: &str = "PLANT_ID";
    pub const EQUIPMENT_ID: &str = "EQUIPMENT_ID";
    pub const FUNCTIONAL_LOC: &str = "FUNCTIONAL_LOC";
    pub const EQUIPMENT_CATEGORY: &str = "EQUIPMENT_CATEGORY";
    pub const ORDER_DESCRIPTION: &str = "ORDER_DESCRIPTION";
    pub const MAINTENANCE_TYPE_DESCRIPTION: &str = "MAINTENANCE_TYPE_DESCRIPTION";
    pub const MAINTENANCE_ACTIVITY_TYPE: &str = "MAINTENANCE_ACTIVITY_TYPE";
    pub const EXECUTION_START_DATE: &str = "EXECUTION_START_DATE";
    pub const EXECUTION_FINISH_DATE: &str = "EXECUTION_FINISH_DATE";
    pub const MAINTENANCE_PLAN: &str = "MAINTENANCE_PLAN";
    pub const MAINTENANCE_ITEM: &str = "MAINTENANCE_ITEM";
    pub const VALID_FROM: &str = "VALID_FROM";
    pub const VALID_TO: &str = "VALID_TO";
    pub const ACTUAL_WORK_IN_MINUTES: &str = "ACTUAL_WORK_IN_MINUTES";
}

/// 必需列: 缺失任一列时整个导入失败
pub const REQUIRED_COLUMNS: [&str; 2] = [columns::ACTUAL_WORK_IN_MINUTES, columns::EQUIPMENT_ID];

pub struct FieldMapper;

impl FieldMapper {
    /// 校验表头包含全部必需列
    pub fn require_columns(&self, headers: &[String]) -> ImportResult<()> {
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(ImportError::MissingColumn(required.to_string()));
            }
        }
        Ok(())
    }

    /// 原始键值行 → WorkOrder
    ///
    /// # 参数
    /// - row: 列名 → 原始字符串值
    /// - row_number: 原始文件行号（错误定位用）
    pub fn map_to_work_order(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<WorkOrder> {
        Ok(WorkOrder {
            // 标识字段
            order_id: self.get_string(row, columns::ORDER_ID),
            plant_id: self.get_string(row, columns::PLANT_ID),

            // 设备信息
            equipment_id: self.get_string(row, columns::EQUIPMENT_ID),
            functional_location: self.get_string(row, columns::FUNCTIONAL_LOC),
            equipment_category: self.get_string(row, columns::EQUIPMENT_CATEGORY),

            // 工单内容
            order_description: self.get_string(row, columns::ORDER_DESCRIPTION),
            maintenance_type_description: self
                .get_string(row, columns::MAINTENANCE_TYPE_DESCRIPTION),
            maintenance_activity_type: self.get_string(row, columns::MAINTENANCE_ACTIVITY_TYPE),

            // 执行时间
            execution_start_date: self.parse_date(row, columns::EXECUTION_START_DATE, row_number)?,
            execution_finish_date: self
                .parse_date(row, columns::EXECUTION_FINISH_DATE, row_number)?,

            // 维修计划
            maintenance_plan: self.get_string(row, columns::MAINTENANCE_PLAN),
            maintenance_item: self.get_string(row, columns::MAINTENANCE_ITEM),

            // 有效期
            valid_from: self.parse_date(row, columns::VALID_FROM, row_number)?,
            valid_to: self.parse_date(row, columns::VALID_TO, row_number)?,

            // 工时
            actual_work_minutes: self.parse_f64(row, columns::ACTUAL_WORK_IN_MINUTES, row_number)?,

            // 元信息
            row_number,
        })
    }

    /// 提取字符串字段（TRIM,空串视为缺失）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        row.get(key).and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析浮点数
    fn parse_f64(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<f64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            // 工时列中的字面 NA 与缺失同义
            Some(value) if value == "NA" || value == "N/A" => Ok(None),
            Some(value) => {
                value
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| ImportError::TypeConversionError {
                        row: row_number,
                        field: key.to_string(),
                        message: format!("无法解析为浮点数: {}", value),
                    })
            }
        }
    }

    /// 解析日期（YYYYMMDD → NaiveDate,兼容 YYYY-MM-DD）
    fn parse_date(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<NaiveDate>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) if value == "NA" || value == "N/A" => Ok(None),
            Some(value) => NaiveDate::parse_from_str(&value, "%Y%m%d")
                .or_else(|_| NaiveDate::parse_from_str(&value, "%Y-%m-%d"))
                .map(Some)
                .map_err(|_| ImportError::DateFormatError {
                    row: row_number,
                    field: key.to_string(),
                    value,
                }),
        }
    }
}
