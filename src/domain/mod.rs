// ==========================================
// 设备维修工单分析系统 - 领域层
// ==========================================
// 职责: 工单实体与分析流程中间产物
// 红线: 清洗后实体保证关键字段非空
// ==========================================

pub mod types;
pub mod work_order;

// 重导出领域实体
pub use types::BreakdownLabel;
pub use work_order::{CleanWorkOrder, LabeledWorkOrder, WorkOrder, FEATURE_COLUMNS};
