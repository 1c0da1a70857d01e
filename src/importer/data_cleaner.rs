// ==========================================
// 设备维修工单分析系统 - 数据清洗器实现
// ==========================================
// 职责: NULL 标准化 / 关键字段过滤 / 标识列丢弃
// 红线: 输出保证工时与设备号非空
// ==========================================

use crate::domain::work_order::{CleanWorkOrder, WorkOrder};
use tracing::{debug, warn};

pub struct DataCleaner;

impl DataCleaner {
    /// 清洗原始工单数据
    ///
    /// 规则（按序执行）:
    /// 1. 设备号标准化: 空串 / "NA" / "N/A" 归一为缺失
    /// 2. 丢弃工时缺失的记录
    /// 3. 丢弃设备号缺失的记录
    /// 4. 丢弃建模无关的标识列（工单号、设备类别、有效期）;
    ///    工厂代码保留,仅供分析聚合
    ///
    /// 清洗是幂等的: 对输出再执行一次得到相同数据集。
    /// 全部行被过滤时返回空集并告警,由调用方决定是否中止。
    pub fn clean(&self, orders: Vec<WorkOrder>) -> Vec<CleanWorkOrder> {
        let input_count = orders.len();

        let cleaned: Vec<CleanWorkOrder> = orders
            .into_iter()
            .filter_map(|order| {
                // 1. 设备号标准化
                let equipment_id = self.normalize_identifier(order.equipment_id)?;

                // 2. 工时缺失过滤
                let actual_work_minutes = order.actual_work_minutes?;

                // 3/4. 构造清洗后实体（标识列在此丢弃）
                Some(CleanWorkOrder {
                    plant_id: self.normalize_identifier(order.plant_id),
                    equipment_id,
                    functional_location: order.functional_location,
                    order_description: order.order_description,
                    maintenance_type_description: order.maintenance_type_description,
                    maintenance_activity_type: order.maintenance_activity_type,
                    execution_start_date: order.execution_start_date,
                    execution_finish_date: order.execution_finish_date,
                    maintenance_plan: order.maintenance_plan,
                    maintenance_item: order.maintenance_item,
                    actual_work_minutes,
                })
            })
            .collect();

        debug!(
            input_count,
            output_count = cleaned.len(),
            dropped = input_count - cleaned.len(),
            "工单清洗完成"
        );

        if cleaned.is_empty() && input_count > 0 {
            warn!("清洗后无剩余记录（全部行缺失工时或设备号）");
        }

        cleaned
    }

    /// 标识符标准化: TRIM 后空串与字面 NA 归一为缺失
    pub fn normalize_identifier(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() || trimmed == "NA" || trimmed == "N/A" {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }
}
