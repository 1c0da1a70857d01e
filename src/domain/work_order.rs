// ==========================================
// 设备维修工单分析系统 - 工单领域模型
// ==========================================
// 用途: 导入层写入,清洗/分析/建模各阶段只读
// 对齐: IWC_Work_Orders.csv 列定义
// ==========================================

use crate::domain::types::BreakdownLabel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// 建模特征列（规范顺序）
// ==========================================
// 红线: 特征向量各处必须按此顺序展开,
//       编码映射按列位置对齐
pub const FEATURE_COLUMNS: [&str; 9] = [
    "EQUIPMENT_ID",
    "FUNCTIONAL_LOC",
    "ORDER_DESCRIPTION",
    "MAINTENANCE_TYPE_DESCRIPTION",
    "MAINTENANCE_ACTIVITY_TYPE",
    "EXECUTION_START_DATE",
    "EXECUTION_FINISH_DATE",
    "MAINTENANCE_PLAN",
    "MAINTENANCE_ITEM",
];

// ==========================================
// WorkOrder - 原始工单记录
// ==========================================
// 用途: 字段映射后的中间产物,所有字段可缺失
// 生命周期: 仅在导入/清洗流程内
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    // ===== 标识字段 =====
    pub order_id: Option<String>,          // 工单号
    pub plant_id: Option<String>,          // 工厂代码

    // ===== 设备信息 =====
    pub equipment_id: Option<String>,      // 设备号
    pub functional_location: Option<String>, // 功能位置
    pub equipment_category: Option<String>, // 设备类别

    // ===== 工单内容 =====
    pub order_description: Option<String>, // 工单描述（自由文本）
    pub maintenance_type_description: Option<String>, // 维修类型描述
    pub maintenance_activity_type: Option<String>,    // 维修活动类型（计划/非计划）

    // ===== 执行时间 =====
    pub execution_start_date: Option<NaiveDate>,  // 执行开始日期
    pub execution_finish_date: Option<NaiveDate>, // 执行完成日期

    // ===== 维修计划 =====
    pub maintenance_plan: Option<String>,  // 维修计划号
    pub maintenance_item: Option<String>,  // 维修项目号

    // ===== 有效期 =====
    pub valid_from: Option<NaiveDate>,     // 有效起始日期
    pub valid_to: Option<NaiveDate>,       // 有效截止日期

    // ===== 工时 =====
    pub actual_work_minutes: Option<f64>,  // 实际工时（分钟）

    // ===== 元信息 =====
    pub row_number: usize, // 原始文件行号（用于错误定位）
}

// ==========================================
// CleanWorkOrder - 清洗后工单
// ==========================================
// 红线: actual_work_minutes 与 equipment_id 保证非空
// 说明: order_id 已丢弃; plant_id 仅供分析聚合,不进特征集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanWorkOrder {
    pub plant_id: Option<String>,          // 工厂代码（仅分析聚合用）
    pub equipment_id: String,              // 设备号（非空）
    pub functional_location: Option<String>, // 功能位置
    pub order_description: Option<String>, // 工单描述
    pub maintenance_type_description: Option<String>, // 维修类型描述
    pub maintenance_activity_type: Option<String>,    // 维修活动类型
    pub execution_start_date: Option<NaiveDate>,  // 执行开始日期
    pub execution_finish_date: Option<NaiveDate>, // 执行完成日期
    pub maintenance_plan: Option<String>,  // 维修计划号
    pub maintenance_item: Option<String>,  // 维修项目号
    pub actual_work_minutes: f64,          // 实际工时（分钟,非空）
}

impl CleanWorkOrder {
    /// 按规范顺序展开完整特征向量
    ///
    /// # 返回
    /// - Some(Vec<String>): 九列特征全部存在
    /// - None: 任一特征缺失（全行完整性要求,严于清洗规则）
    pub fn complete_features(&self) -> Option<Vec<String>> {
        Some(vec![
            self.equipment_id.clone(),
            self.functional_location.clone()?,
            self.order_description.clone()?,
            self.maintenance_type_description.clone()?,
            self.maintenance_activity_type.clone()?,
            self.execution_start_date?.format("%Y-%m-%d").to_string(),
            self.execution_finish_date?.format("%Y-%m-%d").to_string(),
            self.maintenance_plan.clone()?,
            self.maintenance_item.clone()?,
        ])
    }
}

// ==========================================
// LabeledWorkOrder - 打标后工单
// ==========================================
// 标签是工时与阈值的确定性函数,不独立持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledWorkOrder {
    pub order: CleanWorkOrder,
    pub major_breakdown: bool, // 实际工时 > 阈值
}

impl LabeledWorkOrder {
    /// 两级分类标签
    pub fn label(&self) -> BreakdownLabel {
        BreakdownLabel::from_flag(self.major_breakdown)
    }
}
