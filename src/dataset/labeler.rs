// ==========================================
// 设备维修工单分析系统 - 打标器
// ==========================================
// 职责: 工时阈值 → 重大故障标签
// 红线: 严格大于判定;标签是工时与阈值的确定性函数
// ==========================================

use crate::domain::work_order::{CleanWorkOrder, LabeledWorkOrder};

pub struct Labeler {
    threshold_minutes: f64,
}

impl Labeler {
    /// 构造函数
    ///
    /// # 参数
    /// - threshold_minutes: 重大故障工时阈值（分钟）
    pub fn new(threshold_minutes: f64) -> Self {
        Self { threshold_minutes }
    }

    /// 单条判定: 实际工时严格大于阈值
    pub fn is_major_breakdown(&self, actual_work_minutes: f64) -> bool {
        actual_work_minutes > self.threshold_minutes
    }

    /// 批量打标（纯函数,全域有定义,无失败分支）
    pub fn label(&self, orders: Vec<CleanWorkOrder>) -> Vec<LabeledWorkOrder> {
        orders
            .into_iter()
            .map(|order| {
                let major_breakdown = self.is_major_breakdown(order.actual_work_minutes);
                LabeledWorkOrder {
                    order,
                    major_breakdown,
                }
            })
            .collect()
    }
}
