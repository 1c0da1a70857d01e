// ==========================================
// 设备维修工单分析系统 - 分类特征编码器
// ==========================================
// 职责: 类别值 → 稳定下标映射,逐特征独立
// 红线: 映射在训练分区上构建并随模型持久化,
//       测试期编码与训练期完全一致;
//       未见过的类别值一律落入未知桶,不得报错
// ==========================================

use crate::dataset::sampler::ModelSample;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 未知桶下标（每个特征的 0 号位保留给未见类别）
pub const UNKNOWN_LEVEL_INDEX: u32 = 0;

/// 未知桶展示名
const UNKNOWN_LEVEL_NAME: &str = "<UNKNOWN>";

// ==========================================
// FeatureLevels - 单特征类别表
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeatureLevels {
    index_of: HashMap<String, u32>, // 类别值 → 下标（1 起,0 为未知桶）
    names: Vec<String>,             // 下标 → 类别值
}

impl FeatureLevels {
    fn new() -> Self {
        Self {
            index_of: HashMap::new(),
            names: vec![UNKNOWN_LEVEL_NAME.to_string()],
        }
    }

    fn intern(&mut self, value: &str) -> u32 {
        if let Some(&idx) = self.index_of.get(value) {
            return idx;
        }
        let idx = self.names.len() as u32;
        self.index_of.insert(value.to_string(), idx);
        self.names.push(value.to_string());
        idx
    }

    fn lookup(&self, value: &str) -> u32 {
        self.index_of
            .get(value)
            .copied()
            .unwrap_or(UNKNOWN_LEVEL_INDEX)
    }
}

// ==========================================
// CategoricalEncoder - 分类特征编码器
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    feature_levels: Vec<FeatureLevels>,
}

impl CategoricalEncoder {
    /// 在训练样本上构建映射
    ///
    /// 下标按首次出现顺序分配,同一输入顺序 ⇒ 同一映射
    pub fn fit(num_features: usize, samples: &[ModelSample]) -> Self {
        let mut feature_levels: Vec<FeatureLevels> =
            (0..num_features).map(|_| FeatureLevels::new()).collect();

        for sample in samples {
            for (f, value) in sample.features.iter().enumerate() {
                if f < num_features {
                    feature_levels[f].intern(value);
                }
            }
        }

        Self { feature_levels }
    }

    /// 编码一行特征（未见类别 → 未知桶）
    pub fn encode_row(&self, features: &[String]) -> Vec<u32> {
        features
            .iter()
            .zip(self.feature_levels.iter())
            .map(|(value, levels)| levels.lookup(value))
            .collect()
    }

    /// 特征列数
    pub fn num_features(&self) -> usize {
        self.feature_levels.len()
    }

    /// 某特征的类别数（含未知桶）
    pub fn num_levels(&self, feature: usize) -> usize {
        self.feature_levels
            .get(feature)
            .map(|l| l.names.len())
            .unwrap_or(0)
    }
}
