// ==========================================
// 设备维修工单分析系统 - 采样与切分器
// ==========================================
// 职责: 固定规模无放回抽样 → 全行完整性过滤 → 训练/测试切分
// 红线: 训练/测试两分区不相交,并集等于抽样数据集;
//       同一种子 + 同一输入顺序 ⇒ 结果完全可复现
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::types::BreakdownLabel;
use crate::domain::work_order::LabeledWorkOrder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// 数据集层错误类型
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("清洗后剩余行数不足: 可用 {available} 行,至少需要 2 行")]
    InsufficientRows { available: usize },
}

// ==========================================
// ModelSample - 建模样本
// ==========================================
// 特征按 FEATURE_COLUMNS 规范顺序展开
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSample {
    pub source_index: usize,    // 打标数据集中的行下标（行身份）
    pub features: Vec<String>,  // 九列分类特征
    pub label: BreakdownLabel,  // 分类目标
}

// ==========================================
// TrainTestSplit - 训练/测试分区
// ==========================================
// 分区成员一经划定不可变更
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Vec<ModelSample>,
    pub test: Vec<ModelSample>,
}

impl TrainTestSplit {
    /// 抽样数据集规模（两分区之和）
    pub fn sampled_len(&self) -> usize {
        self.train.len() + self.test.len()
    }
}

// ==========================================
// SampleSplitter - 采样与切分器
// ==========================================
pub struct SampleSplitter {
    sample_size: usize,
    train_ratio: f64,
    seed: u64,
}

impl SampleSplitter {
    /// 构造函数
    ///
    /// # 参数
    /// - sample_size: 抽样规模（超过数据量时取全量,不重复抽取）
    /// - train_ratio: 训练集占比
    /// - seed: 主随机种子
    pub fn new(sample_size: usize, train_ratio: f64, seed: u64) -> Self {
        Self {
            sample_size,
            train_ratio,
            seed,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.sample_size, config.train_ratio, config.seed)
    }

    /// 执行采样与切分
    ///
    /// 流程:
    /// 1. 无放回均匀抽样 min(sample_size, n) 行
    /// 2. 丢弃任一特征缺失的行（全行完整性,严于清洗规则）
    /// 3. 随机选取行下标划分训练集,其余为测试集（不分层）
    ///
    /// # 返回
    /// - Ok(TrainTestSplit): 两分区不相交,并集为抽样数据集
    /// - Err(InsufficientRows): 存活行数不足 2 行,模型训练无定义
    pub fn sample_and_split(
        &self,
        orders: &[LabeledWorkOrder],
    ) -> Result<TrainTestSplit, DatasetError> {
        // 1. 无放回抽样
        let mut sample_rng = StdRng::seed_from_u64(self.seed);
        let take = self.sample_size.min(orders.len());
        let sampled_indices = draw_without_replacement(&mut sample_rng, orders.len(), take);

        // 2. 全行完整性过滤
        let complete: Vec<ModelSample> = sampled_indices
            .into_iter()
            .filter_map(|idx| {
                let labeled = &orders[idx];
                labeled.order.complete_features().map(|features| ModelSample {
                    source_index: idx,
                    features,
                    label: labeled.label(),
                })
            })
            .collect();

        debug!(
            input_rows = orders.len(),
            requested = self.sample_size,
            complete_rows = complete.len(),
            "采样与完整性过滤完成"
        );

        if complete.len() < 2 {
            return Err(DatasetError::InsufficientRows {
                available: complete.len(),
            });
        }

        // 3. 随机下标切分（切分使用独立派生种子,与抽样互不干扰）
        let mut split_rng = StdRng::seed_from_u64(self.seed.wrapping_add(1));
        let train_size = (complete.len() as f64 * self.train_ratio).floor() as usize;
        let train_positions =
            draw_without_replacement(&mut split_rng, complete.len(), train_size);

        let mut in_train = vec![false; complete.len()];
        for pos in train_positions {
            in_train[pos] = true;
        }

        let mut train = Vec::with_capacity(train_size);
        let mut test = Vec::with_capacity(complete.len() - train_size);
        for (pos, sample) in complete.into_iter().enumerate() {
            if in_train[pos] {
                train.push(sample);
            } else {
                test.push(sample);
            }
        }

        debug!(
            train_rows = train.len(),
            test_rows = test.len(),
            "训练/测试切分完成"
        );

        Ok(TrainTestSplit { train, test })
    }
}

/// 无放回均匀抽取 k 个下标（部分 Fisher–Yates）
fn draw_without_replacement(rng: &mut StdRng, n: usize, k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let take = k.min(n);
    for i in 0..take {
        let j = rng.gen_range(i..n);
        indices.swap(i, j);
    }
    indices.truncate(take);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::work_order::CleanWorkOrder;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn labeled_order(idx: usize, complete: bool) -> LabeledWorkOrder {
        LabeledWorkOrder {
            order: CleanWorkOrder {
                plant_id: Some("P100".to_string()),
                equipment_id: format!("EQ-{:03}", idx),
                functional_location: Some("AREA-A".to_string()),
                order_description: Some("ROUTINE CHECK".to_string()),
                maintenance_type_description: Some("PREVENTIVE".to_string()),
                maintenance_activity_type: Some("PLANNED".to_string()),
                execution_start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                execution_finish_date: NaiveDate::from_ymd_opt(2024, 1, 2),
                maintenance_plan: if complete {
                    Some("MP-10".to_string())
                } else {
                    None
                },
                maintenance_item: Some("MI-20".to_string()),
                actual_work_minutes: (idx as f64) * 10.0,
            },
            major_breakdown: idx % 3 == 0,
        }
    }

    fn dataset(n: usize) -> Vec<LabeledWorkOrder> {
        (0..n).map(|i| labeled_order(i, true)).collect()
    }

    #[test]
    fn test_partition_sizes_and_disjointness() {
        let splitter = SampleSplitter::new(100, 0.8, 42);
        let split = splitter.sample_and_split(&dataset(100)).unwrap();

        // 两分区之和等于抽样数据集规模
        assert_eq!(split.sampled_len(), 100);
        assert_eq!(split.train.len(), 80);
        assert_eq!(split.test.len(), 20);

        // 行身份不相交
        let train_ids: HashSet<usize> = split.train.iter().map(|s| s.source_index).collect();
        let test_ids: HashSet<usize> = split.test.iter().map(|s| s.source_index).collect();
        assert!(train_ids.is_disjoint(&test_ids));
        assert_eq!(train_ids.len() + test_ids.len(), 100);
    }

    #[test]
    fn test_reproducible_with_same_seed() {
        let orders = dataset(200);
        let first = SampleSplitter::new(50, 0.8, 7)
            .sample_and_split(&orders)
            .unwrap();
        let second = SampleSplitter::new(50, 0.8, 7)
            .sample_and_split(&orders)
            .unwrap();

        assert_eq!(first.train, second.train);
        assert_eq!(first.test, second.test);
    }

    #[test]
    fn test_different_seed_changes_sample() {
        let orders = dataset(200);
        let first = SampleSplitter::new(50, 0.8, 1)
            .sample_and_split(&orders)
            .unwrap();
        let second = SampleSplitter::new(50, 0.8, 2)
            .sample_and_split(&orders)
            .unwrap();

        let first_ids: HashSet<usize> = first.train.iter().map(|s| s.source_index).collect();
        let second_ids: HashSet<usize> = second.train.iter().map(|s| s.source_index).collect();
        assert_ne!(first_ids, second_ids);
    }

    #[test]
    fn test_oversized_request_returns_full_set() {
        let splitter = SampleSplitter::new(1_000_000, 0.8, 42);
        let split = splitter.sample_and_split(&dataset(10)).unwrap();

        // 全量返回,无重复抽取
        assert_eq!(split.sampled_len(), 10);
        let ids: HashSet<usize> = split
            .train
            .iter()
            .chain(split.test.iter())
            .map(|s| s.source_index)
            .collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        let mut orders = dataset(10);
        orders.push(labeled_order(10, false)); // maintenance_plan 缺失

        let splitter = SampleSplitter::new(100, 0.8, 42);
        let split = splitter.sample_and_split(&orders).unwrap();
        assert_eq!(split.sampled_len(), 10);
        assert!(split
            .train
            .iter()
            .chain(split.test.iter())
            .all(|s| s.source_index != 10));
    }

    #[test]
    fn test_insufficient_rows() {
        let orders = vec![labeled_order(0, true)];
        let splitter = SampleSplitter::new(100, 0.8, 42);
        let result = splitter.sample_and_split(&orders);
        assert!(matches!(
            result,
            Err(DatasetError::InsufficientRows { available: 1 })
        ));
    }

    #[test]
    fn test_draw_without_replacement_bounds() {
        let mut rng = StdRng::seed_from_u64(0);
        let drawn = draw_without_replacement(&mut rng, 5, 10);
        assert_eq!(drawn.len(), 5);
        let unique: HashSet<usize> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 5);
    }
}
