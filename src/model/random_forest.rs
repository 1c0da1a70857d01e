// ==========================================
// 设备维修工单分析系统 - 随机森林分类器
// ==========================================
// 职责: 自助法抽样 + 特征子集的树集成,多数投票
// 红线: 每棵树的种子在并行段之前由主种子派生,
//       并行训练与串行训练结果完全一致;
//       投票聚合等待全部树完成
// ==========================================

use crate::config::AnalysisConfig;
use crate::dataset::sampler::ModelSample;
use crate::domain::types::BreakdownLabel;
use crate::model::decision_tree::{DecisionTree, EncodedDataset};
use crate::model::encoder::CategoricalEncoder;
use crate::model::error::{ModelError, ModelResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ==========================================
// ForestParams - 森林超参数
// ==========================================
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestParams {
    /// 树数量
    pub ntree: usize,
    /// 每次分裂考察的候选特征数
    pub mtry: usize,
    /// 主随机种子（自助法 + 特征子集 + 置换检验共用）
    pub seed: u64,
}

impl ForestParams {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            ntree: config.ntree,
            mtry: config.mtry,
            seed: config.seed,
        }
    }
}

// ==========================================
// FeatureImportance - 特征重要性
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    /// 特征列名
    pub feature: String,

    /// 平均精度下降: 袋外样本上置换该特征后的精度损失,
    /// 对有袋外样本的树取平均
    pub mean_decrease_accuracy: f64,

    /// 平均基尼下降: 该特征在全部树上贡献的
    /// 行数加权不纯度下降,除以树数量
    pub mean_decrease_gini: f64,
}

/// 单棵树的训练产出（聚合前的中间量）
struct TreeOutcome {
    tree: DecisionTree,
    gini_decrease: Vec<f64>,
    accuracy_decrease: Vec<f64>,
    has_oob: bool,
}

// ==========================================
// BreakdownForest - 重大故障预测森林
// ==========================================
// 训练完成后不再引用训练数据;编码器随模型持久化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownForest {
    params: ForestParams,
    feature_names: Vec<String>,
    encoder: CategoricalEncoder,
    trees: Vec<DecisionTree>,
    importance: Vec<FeatureImportance>,
}

impl BreakdownForest {
    /// 在训练分区上拟合森林
    ///
    /// # 参数
    /// - params: 超参数（mtry 超过特征数时截断到特征数）
    /// - feature_names: 特征列名,与样本特征向量按位对齐
    /// - train: 训练样本
    ///
    /// # 返回
    /// - Ok(BreakdownForest): 训练完成的森林,含特征重要性
    /// - Err(InsufficientRows / EmptyFeatureSet / FeatureDimensionMismatch)
    pub fn fit(
        params: ForestParams,
        feature_names: &[&str],
        train: &[ModelSample],
    ) -> ModelResult<Self> {
        if feature_names.is_empty() {
            return Err(ModelError::EmptyFeatureSet);
        }
        if train.len() < 2 {
            return Err(ModelError::InsufficientRows {
                available: train.len(),
            });
        }

        let num_features = feature_names.len();
        for sample in train {
            if sample.features.len() != num_features {
                return Err(ModelError::FeatureDimensionMismatch {
                    expected: num_features,
                    actual: sample.features.len(),
                });
            }
        }

        // 编码映射在训练分区上构建,随模型持久化
        let encoder = CategoricalEncoder::fit(num_features, train);
        let data = EncodedDataset {
            features: train.iter().map(|s| encoder.encode_row(&s.features)).collect(),
            labels: train.iter().map(|s| s.label).collect(),
        };

        let mtry = params.mtry.min(num_features);
        let n = data.len();

        // 每棵树的种子在并行段之前由主种子串行派生
        let mut seed_rng = StdRng::seed_from_u64(params.seed);
        let tree_seeds: Vec<u64> = (0..params.ntree).map(|_| seed_rng.gen()).collect();

        info!(
            ntree = params.ntree,
            mtry,
            train_rows = n,
            "开始训练随机森林"
        );

        let outcomes: Vec<TreeOutcome> = tree_seeds
            .into_par_iter()
            .map(|tree_seed| train_single_tree(&data, num_features, mtry, tree_seed))
            .collect();

        // 聚合投票与重要性之前,par_iter 已保证全部树完成
        let oob_trees = outcomes.iter().filter(|o| o.has_oob).count();
        let mut importance = Vec::with_capacity(num_features);
        for (f, name) in feature_names.iter().enumerate() {
            let gini_sum: f64 = outcomes.iter().map(|o| o.gini_decrease[f]).sum();
            let accuracy_sum: f64 = outcomes
                .iter()
                .filter(|o| o.has_oob)
                .map(|o| o.accuracy_decrease[f])
                .sum();
            importance.push(FeatureImportance {
                feature: name.to_string(),
                mean_decrease_accuracy: if oob_trees > 0 {
                    accuracy_sum / oob_trees as f64
                } else {
                    0.0
                },
                mean_decrease_gini: gini_sum / params.ntree as f64,
            });
        }

        debug!(oob_trees, "特征重要性聚合完成");

        Ok(Self {
            params,
            feature_names: feature_names.iter().map(|s| s.to_string()).collect(),
            encoder,
            trees: outcomes.into_iter().map(|o| o.tree).collect(),
            importance,
        })
    }

    /// 预测一行原始特征（多数投票,平票判为一般维修）
    ///
    /// 未见过的类别值经编码器落入未知桶,预测不会失败
    pub fn predict(&self, features: &[String]) -> ModelResult<BreakdownLabel> {
        if features.len() != self.feature_names.len() {
            return Err(ModelError::FeatureDimensionMismatch {
                expected: self.feature_names.len(),
                actual: features.len(),
            });
        }
        let encoded = self.encoder.encode_row(features);
        Ok(self.vote(&encoded))
    }

    fn vote(&self, encoded: &[u32]) -> BreakdownLabel {
        let major_votes = self
            .trees
            .iter()
            .filter(|t| t.predict_encoded(encoded).is_major())
            .count();
        BreakdownLabel::from_flag(major_votes * 2 > self.trees.len())
    }

    /// 特征重要性（建模列顺序,未排序）
    pub fn feature_importance(&self) -> &[FeatureImportance] {
        &self.importance
    }

    /// 特征列名
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// 超参数
    pub fn params(&self) -> ForestParams {
        self.params
    }

    /// 树数量
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// 序列化为 JSON（含编码映射,测试期编码与训练期一致）
    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从 JSON 恢复
    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// 训练单棵树: 自助法抽样 → 生长 → 袋外置换检验
fn train_single_tree(
    data: &EncodedDataset,
    num_features: usize,
    mtry: usize,
    tree_seed: u64,
) -> TreeOutcome {
    let mut rng = StdRng::seed_from_u64(tree_seed);
    let n = data.len();

    // 自助法: 有放回抽取 n 行
    let mut in_bag = vec![false; n];
    let mut bootstrap_rows = Vec::with_capacity(n);
    for _ in 0..n {
        let row = rng.gen_range(0..n);
        in_bag[row] = true;
        bootstrap_rows.push(row);
    }
    let oob_rows: Vec<usize> = (0..n).filter(|&r| !in_bag[r]).collect();

    let mut gini_decrease = vec![0.0; num_features];
    let tree = DecisionTree::fit(data, &bootstrap_rows, mtry, &mut rng, &mut gini_decrease);

    // 袋外置换检验: 逐特征打乱取值,度量精度损失
    let mut accuracy_decrease = vec![0.0; num_features];
    let has_oob = !oob_rows.is_empty();
    if has_oob {
        let oob_len = oob_rows.len() as f64;
        let baseline = oob_rows
            .iter()
            .filter(|&&r| tree.predict_encoded(&data.features[r]) == data.labels[r])
            .count();

        for f in 0..num_features {
            let mut permuted: Vec<u32> =
                oob_rows.iter().map(|&r| data.features[r][f]).collect();
            permuted.shuffle(&mut rng);

            let correct = oob_rows
                .iter()
                .zip(permuted.iter())
                .filter(|(&r, &value)| {
                    let mut row = data.features[r].clone();
                    row[f] = value;
                    tree.predict_encoded(&row) == data.labels[r]
                })
                .count();

            accuracy_decrease[f] = (baseline as f64 - correct as f64) / oob_len;
        }
    }

    TreeOutcome {
        tree,
        gini_decrease,
        accuracy_decrease,
        has_oob,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_FEATURES: [&str; 3] = ["EQUIPMENT_ID", "MAINTENANCE_ACTIVITY_TYPE", "PLAN"];

    fn sample(equipment: &str, activity: &str, plan: &str, major: bool) -> ModelSample {
        ModelSample {
            source_index: 0,
            features: vec![
                equipment.to_string(),
                activity.to_string(),
                plan.to_string(),
            ],
            label: BreakdownLabel::from_flag(major),
        }
    }

    /// 活动类型完全决定标签,其余两列为噪声
    fn separable_train(n: usize) -> Vec<ModelSample> {
        (0..n)
            .map(|i| {
                let major = i % 2 == 0;
                let activity = if major { "UNPLANNED" } else { "PLANNED" };
                sample(
                    &format!("EQ-{}", i % 5),
                    activity,
                    &format!("MP-{}", i % 3),
                    major,
                )
            })
            .collect()
    }

    fn params(ntree: usize, seed: u64) -> ForestParams {
        ForestParams {
            ntree,
            mtry: 2,
            seed,
        }
    }

    #[test]
    fn test_fit_learns_separable_data() {
        let train = separable_train(60);
        let forest = BreakdownForest::fit(params(25, 42), &TEST_FEATURES, &train).unwrap();

        for s in &train {
            assert_eq!(forest.predict(&s.features).unwrap(), s.label);
        }
        assert_eq!(forest.tree_count(), 25);
    }

    #[test]
    fn test_fit_deterministic_with_same_seed() {
        let train = separable_train(40);
        let first = BreakdownForest::fit(params(10, 7), &TEST_FEATURES, &train).unwrap();
        let second = BreakdownForest::fit(params(10, 7), &TEST_FEATURES, &train).unwrap();

        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_discriminative_feature_ranks_first() {
        let train = separable_train(60);
        let forest = BreakdownForest::fit(params(25, 42), &TEST_FEATURES, &train).unwrap();

        let importance = forest.feature_importance();
        let activity = &importance[1];
        assert_eq!(activity.feature, "MAINTENANCE_ACTIVITY_TYPE");
        for (f, other) in importance.iter().enumerate() {
            if f != 1 {
                assert!(activity.mean_decrease_accuracy >= other.mean_decrease_accuracy);
                assert!(activity.mean_decrease_gini >= other.mean_decrease_gini);
            }
        }
        assert!(activity.mean_decrease_accuracy > 0.0);
    }

    #[test]
    fn test_unseen_level_predicts_without_error() {
        let train = separable_train(40);
        let forest = BreakdownForest::fit(params(10, 42), &TEST_FEATURES, &train).unwrap();

        let unseen = vec![
            "EQ-NEVER".to_string(),
            "UNPLANNED".to_string(),
            "MP-NEVER".to_string(),
        ];
        assert!(forest.predict(&unseen).is_ok());
    }

    #[test]
    fn test_fit_insufficient_rows() {
        let train = separable_train(1);
        let result = BreakdownForest::fit(params(10, 42), &TEST_FEATURES, &train);
        assert!(matches!(
            result,
            Err(ModelError::InsufficientRows { available: 1 })
        ));
    }

    #[test]
    fn test_fit_dimension_mismatch() {
        let mut train = separable_train(10);
        train[3].features.pop();
        let result = BreakdownForest::fit(params(10, 42), &TEST_FEATURES, &train);
        assert!(matches!(
            result,
            Err(ModelError::FeatureDimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let train = separable_train(10);
        let forest = BreakdownForest::fit(params(5, 42), &TEST_FEATURES, &train).unwrap();
        let result = forest.predict(&["EQ-0".to_string()]);
        assert!(matches!(
            result,
            Err(ModelError::FeatureDimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_predictions() {
        let train = separable_train(40);
        let forest = BreakdownForest::fit(params(10, 42), &TEST_FEATURES, &train).unwrap();

        let restored = BreakdownForest::from_json(&forest.to_json().unwrap()).unwrap();
        for s in &train {
            assert_eq!(
                forest.predict(&s.features).unwrap(),
                restored.predict(&s.features).unwrap()
            );
        }
    }
}
