// ==========================================
// 设备维修工单分析系统 - 模型评估器
// ==========================================
// 职责: 测试分区预测 → 混淆矩阵 / 精度 / 分类错误率
//       + 特征重要性排行
// 红线: 只报告,不自动重训或调参
// ==========================================

use crate::dataset::sampler::ModelSample;
use crate::domain::types::BreakdownLabel;
use crate::model::error::{ModelError, ModelResult};
use crate::model::random_forest::{BreakdownForest, FeatureImportance};
use serde::{Deserialize, Serialize};
use tracing::info;

// ==========================================
// ConfusionMatrix - 2×2 混淆矩阵
// ==========================================
// 行为实际类别,列为预测类别
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// 实际重大故障,预测重大故障
    pub major_as_major: usize,
    /// 实际重大故障,预测一般维修
    pub major_as_minor: usize,
    /// 实际一般维修,预测重大故障
    pub minor_as_major: usize,
    /// 实际一般维修,预测一般维修
    pub minor_as_minor: usize,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次预测
    pub fn record(&mut self, actual: BreakdownLabel, predicted: BreakdownLabel) {
        match (actual, predicted) {
            (BreakdownLabel::Major, BreakdownLabel::Major) => self.major_as_major += 1,
            (BreakdownLabel::Major, BreakdownLabel::Minor) => self.major_as_minor += 1,
            (BreakdownLabel::Minor, BreakdownLabel::Major) => self.minor_as_major += 1,
            (BreakdownLabel::Minor, BreakdownLabel::Minor) => self.minor_as_minor += 1,
        }
    }

    /// 全部单元格之和
    pub fn total(&self) -> usize {
        self.major_as_major + self.major_as_minor + self.minor_as_major + self.minor_as_minor
    }

    /// 精度 = 对角线 / 总数（空矩阵为 0）
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.major_as_major + self.minor_as_minor) as f64 / total as f64
    }

    /// 重大故障类错误率 = 错判数 / 该类总数（该类为空时为 0）
    pub fn major_class_error(&self) -> f64 {
        let class_total = self.major_as_major + self.major_as_minor;
        if class_total == 0 {
            return 0.0;
        }
        self.major_as_minor as f64 / class_total as f64
    }

    /// 一般维修类错误率
    pub fn minor_class_error(&self) -> f64 {
        let class_total = self.minor_as_major + self.minor_as_minor;
        if class_total == 0 {
            return 0.0;
        }
        self.minor_as_major as f64 / class_total as f64
    }
}

// ==========================================
// EvaluationReport - 评估报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub confusion_matrix: ConfusionMatrix,
    pub accuracy: f64,
    pub major_class_error: f64,
    pub minor_class_error: f64,

    /// 特征重要性,按平均精度下降降序
    pub importance_ranking: Vec<FeatureImportance>,
}

// ==========================================
// Evaluator - 评估器
// ==========================================
pub struct Evaluator;

impl Evaluator {
    /// 在测试分区上评估模型
    ///
    /// # 返回
    /// - Ok(EvaluationReport): 混淆矩阵单元格之和等于测试分区规模
    /// - Err(EmptyTestSet): 测试分区为空
    pub fn evaluate(
        &self,
        forest: &BreakdownForest,
        test: &[ModelSample],
    ) -> ModelResult<EvaluationReport> {
        if test.is_empty() {
            return Err(ModelError::EmptyTestSet);
        }

        let mut matrix = ConfusionMatrix::new();
        for sample in test {
            let predicted = forest.predict(&sample.features)?;
            matrix.record(sample.label, predicted);
        }

        let mut ranking = forest.feature_importance().to_vec();
        ranking.sort_by(|a, b| {
            b.mean_decrease_accuracy
                .partial_cmp(&a.mean_decrease_accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.feature.cmp(&b.feature))
        });

        let report = EvaluationReport {
            accuracy: matrix.accuracy(),
            major_class_error: matrix.major_class_error(),
            minor_class_error: matrix.minor_class_error(),
            confusion_matrix: matrix,
            importance_ranking: ranking,
        };

        info!(
            test_rows = test.len(),
            accuracy = report.accuracy,
            "模型评估完成"
        );
        Ok(report)
    }
}
