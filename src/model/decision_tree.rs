// ==========================================
// 设备维修工单分析系统 - CART 决策树
// ==========================================
// 职责: 编码后分类特征上的二叉分类树
// 分裂: 无序类别二分 — 各类别按重大故障占比排序,
//       在排序前缀上取基尼不纯度下降最大的划分
// 红线: 随机性全部来自注入的 RNG,同一种子 ⇒ 同一棵树
// ==========================================

use crate::domain::types::BreakdownLabel;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 分裂的最小不纯度下降,低于此值停止生长
const MIN_IMPURITY_DECREASE: f64 = 1e-12;

// ==========================================
// EncodedDataset - 编码后数据集
// ==========================================
// 行与标签按下标对齐,特征值为编码器产出的类别下标
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    pub features: Vec<Vec<u32>>,
    pub labels: Vec<BreakdownLabel>,
}

impl EncodedDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ==========================================
// TreeNode - 树节点
// ==========================================
// Split: left_levels 为路由到左子树的类别下标（升序,
//        二分查找）;不在表中的值（含未知桶）一律走右子树
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        prediction: BreakdownLabel,
    },
    Split {
        feature: usize,
        left_levels: Vec<u32>,
        left: usize,
        right: usize,
    },
}

// ==========================================
// DecisionTree - 决策树
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    root: usize,
}

impl DecisionTree {
    /// 在指定行集上生长一棵树
    ///
    /// # 参数
    /// - data: 编码后数据集
    /// - rows: 参与训练的行下标（自助法抽样,允许重复）
    /// - mtry: 每次分裂考察的候选特征数
    /// - rng: 特征子集抽取用 RNG
    /// - gini_decrease: 逐特征累计的不纯度下降（按节点行数加权）
    pub fn fit(
        data: &EncodedDataset,
        rows: &[usize],
        mtry: usize,
        rng: &mut StdRng,
        gini_decrease: &mut [f64],
    ) -> Self {
        let num_features = data.features.first().map(|r| r.len()).unwrap_or(0);
        let mut nodes = Vec::new();
        let root = grow(
            data,
            rows.to_vec(),
            num_features,
            mtry,
            rng,
            gini_decrease,
            &mut nodes,
        );
        Self { nodes, root }
    }

    /// 预测一行编码后特征
    pub fn predict_encoded(&self, features: &[u32]) -> BreakdownLabel {
        let mut idx = self.root;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { prediction } => return *prediction,
                TreeNode::Split {
                    feature,
                    left_levels,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(u32::MAX);
                    idx = if left_levels.binary_search(&value).is_ok() {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// 节点总数
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// 无放回抽取 mtry 个候选特征下标（部分 Fisher–Yates）
fn sample_features(rng: &mut StdRng, num_features: usize, mtry: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..num_features).collect();
    let take = mtry.min(num_features);
    for i in 0..take {
        let j = rng.gen_range(i..num_features);
        indices.swap(i, j);
    }
    indices.truncate(take);
    indices
}

/// 基尼不纯度 1 - p² - q²
fn gini(n: usize, n_major: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = n_major as f64 / n as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

/// 节点多数类（平票判为一般维修）
fn majority_label(n: usize, n_major: usize) -> BreakdownLabel {
    BreakdownLabel::from_flag(n_major * 2 > n)
}

/// 候选分裂: 特征 + 左子树类别集 + 行数加权不纯度下降
struct CandidateSplit {
    feature: usize,
    left_levels: Vec<u32>,
    weighted_decrease: f64,
}

/// 递归生长子树,返回子树根的节点下标
fn grow(
    data: &EncodedDataset,
    rows: Vec<usize>,
    num_features: usize,
    mtry: usize,
    rng: &mut StdRng,
    gini_decrease: &mut [f64],
    nodes: &mut Vec<TreeNode>,
) -> usize {
    let n = rows.len();
    let n_major = rows
        .iter()
        .filter(|&&r| data.labels[r].is_major())
        .count();

    // 纯节点或行数不足,落叶
    if n < 2 || n_major == 0 || n_major == n {
        nodes.push(TreeNode::Leaf {
            prediction: majority_label(n, n_major),
        });
        return nodes.len() - 1;
    }

    let candidates = sample_features(rng, num_features, mtry);
    let best = candidates
        .into_iter()
        .filter_map(|feature| best_split_for_feature(data, &rows, feature, n, n_major))
        .fold(None::<CandidateSplit>, |acc, split| match acc {
            Some(current) if current.weighted_decrease >= split.weighted_decrease => Some(current),
            _ => Some(split),
        });

    let split = match best {
        Some(s) if s.weighted_decrease > MIN_IMPURITY_DECREASE => s,
        _ => {
            nodes.push(TreeNode::Leaf {
                prediction: majority_label(n, n_major),
            });
            return nodes.len() - 1;
        }
    };

    gini_decrease[split.feature] += split.weighted_decrease;

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows.into_iter().partition(|&r| {
        split
            .left_levels
            .binary_search(&data.features[r][split.feature])
            .is_ok()
    });

    let left = grow(
        data, left_rows, num_features, mtry, rng, gini_decrease, nodes,
    );
    let right = grow(
        data, right_rows, num_features, mtry, rng, gini_decrease, nodes,
    );

    nodes.push(TreeNode::Split {
        feature: split.feature,
        left_levels: split.left_levels,
        left,
        right,
    });
    nodes.len() - 1
}

/// 单特征最优二分
///
/// 类别按重大故障占比升序排列（同占比按下标,保证确定性）,
/// 依次尝试全部前缀划分,返回不纯度下降最大者
fn best_split_for_feature(
    data: &EncodedDataset,
    rows: &[usize],
    feature: usize,
    n: usize,
    n_major: usize,
) -> Option<CandidateSplit> {
    // 逐类别统计 (行数, 重大故障数)
    let mut stats: HashMap<u32, (usize, usize)> = HashMap::new();
    for &r in rows {
        let entry = stats.entry(data.features[r][feature]).or_insert((0, 0));
        entry.0 += 1;
        if data.labels[r].is_major() {
            entry.1 += 1;
        }
    }
    if stats.len() < 2 {
        return None;
    }

    let mut levels: Vec<(u32, usize, usize)> = stats
        .into_iter()
        .map(|(level, (count, major))| (level, count, major))
        .collect();
    levels.sort_by(|a, b| {
        let rate_a = a.2 as f64 / a.1 as f64;
        let rate_b = b.2 as f64 / b.1 as f64;
        rate_a
            .partial_cmp(&rate_b)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    let parent_weighted = n as f64 * gini(n, n_major);
    let mut best: Option<(f64, usize)> = None; // (下降量, 前缀长度)
    let mut nl = 0usize;
    let mut nl_major = 0usize;

    for cut in 1..levels.len() {
        let (_, count, major) = levels[cut - 1];
        nl += count;
        nl_major += major;
        let nr = n - nl;
        let nr_major = n_major - nl_major;

        let child_weighted = nl as f64 * gini(nl, nl_major) + nr as f64 * gini(nr, nr_major);
        let decrease = parent_weighted - child_weighted;
        if best.map(|(d, _)| decrease > d).unwrap_or(true) {
            best = Some((decrease, cut));
        }
    }

    best.map(|(weighted_decrease, cut)| {
        let mut left_levels: Vec<u32> = levels[..cut].iter().map(|(l, _, _)| *l).collect();
        left_levels.sort_unstable();
        CandidateSplit {
            feature,
            left_levels,
            weighted_decrease,
        }
    })
}
