// ==========================================
// 设备维修工单分析系统 - 工单画像分析
// ==========================================
// 职责: 回答"停机多久 / 哪个工厂故障多 / 维修类型分布"
// 输入: 清洗后工单 + 重大故障阈值
// 输出: WorkOrderProfile（纯聚合,不含绘图）
// ==========================================

use crate::domain::work_order::CleanWorkOrder;
use serde::{Deserialize, Serialize};

/// 缺失维度值的聚合桶名
const UNSPECIFIED_BUCKET: &str = "UNKNOWN";

// ==========================================
// DowntimeStats - 停机工时统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeStats {
    pub count: usize,
    pub mean_minutes: f64,
    /// 中位数（最近秩法）
    pub median_minutes: f64,
    /// 90 分位（最近秩法）
    pub p90_minutes: f64,
    pub max_minutes: f64,
}

// ==========================================
// PlantProfile - 工厂维度画像
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantProfile {
    pub plant_id: String,
    pub order_count: usize,
    pub major_breakdown_count: usize,
}

/// 维度取值分布项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

// ==========================================
// WorkOrderProfile - 工单画像
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderProfile {
    pub downtime: DowntimeStats,

    /// 按工单量降序;重大故障数按同一阈值判定
    pub plants: Vec<PlantProfile>,

    /// 维修类型分布,按数量降序
    pub maintenance_types: Vec<CategoryCount>,

    /// 维修活动类型（计划/非计划）分布,按数量降序
    pub activity_types: Vec<CategoryCount>,
}

// ==========================================
// ProfileEngine - 画像引擎
// ==========================================
pub struct ProfileEngine {
    threshold_minutes: f64,
}

impl ProfileEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - threshold_minutes: 重大故障工时阈值（与打标口径一致）
    pub fn new(threshold_minutes: f64) -> Self {
        Self { threshold_minutes }
    }

    /// 生成工单画像
    pub fn profile(&self, orders: &[CleanWorkOrder]) -> WorkOrderProfile {
        WorkOrderProfile {
            downtime: self.downtime_stats(orders),
            plants: self.plant_profiles(orders),
            maintenance_types: distribution(orders, |o| o.maintenance_type_description.as_deref()),
            activity_types: distribution(orders, |o| o.maintenance_activity_type.as_deref()),
        }
    }

    fn downtime_stats(&self, orders: &[CleanWorkOrder]) -> DowntimeStats {
        let mut minutes: Vec<f64> = orders.iter().map(|o| o.actual_work_minutes).collect();
        minutes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = minutes.len();
        let mean = if count == 0 {
            0.0
        } else {
            minutes.iter().sum::<f64>() / count as f64
        };

        DowntimeStats {
            count,
            mean_minutes: mean,
            median_minutes: percentile(&minutes, 50.0),
            p90_minutes: percentile(&minutes, 90.0),
            max_minutes: minutes.last().copied().unwrap_or(0.0),
        }
    }

    fn plant_profiles(&self, orders: &[CleanWorkOrder]) -> Vec<PlantProfile> {
        let mut by_plant: std::collections::HashMap<String, (usize, usize)> =
            std::collections::HashMap::new();
        for order in orders {
            let plant = order
                .plant_id
                .clone()
                .unwrap_or_else(|| UNSPECIFIED_BUCKET.to_string());
            let entry = by_plant.entry(plant).or_insert((0, 0));
            entry.0 += 1;
            if order.actual_work_minutes > self.threshold_minutes {
                entry.1 += 1;
            }
        }

        let mut plants: Vec<PlantProfile> = by_plant
            .into_iter()
            .map(|(plant_id, (order_count, major_breakdown_count))| PlantProfile {
                plant_id,
                order_count,
                major_breakdown_count,
            })
            .collect();
        plants.sort_by(|a, b| {
            b.order_count
                .cmp(&a.order_count)
                .then_with(|| a.plant_id.cmp(&b.plant_id))
        });
        plants
    }
}

/// 维度取值分布（缺失值归入 UNKNOWN 桶,按数量降序）
fn distribution<F>(orders: &[CleanWorkOrder], extract: F) -> Vec<CategoryCount>
where
    F: Fn(&CleanWorkOrder) -> Option<&str>,
{
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for order in orders {
        let value = extract(order).unwrap_or(UNSPECIFIED_BUCKET).to_string();
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut result: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(value, count)| CategoryCount { value, count })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    result
}

/// 最近秩法分位数（已排序输入,空集为 0）
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = ((q / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.max(1) - 1]
}
