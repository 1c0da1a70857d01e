// ==========================================
// 设备维修工单分析系统 - 分析管道编排器
// ==========================================
// 用途: 协调 原始 → 清洗 → 打标 → 采样 → (训练, 测试)
//       → 模型 → 报告 的纯变换流水线
// 红线: 各阶段取值入、取值出,不存在隐式全局数据集;
//       清洗后行数不足时在任何模型拟合之前快速失败
// ==========================================

use crate::analytics::{ProfileEngine, WorkOrderProfile};
use crate::config::{AnalysisConfig, ConfigError};
use crate::dataset::labeler::Labeler;
use crate::dataset::sampler::{DatasetError, SampleSplitter};
use crate::domain::work_order::{CleanWorkOrder, FEATURE_COLUMNS};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportError;
use crate::importer::work_order_importer::WorkOrderImporter;
use crate::model::error::ModelError;
use crate::model::evaluator::{EvaluationReport, Evaluator};
use crate::model::random_forest::{BreakdownForest, ForestParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// 管道错误类型
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("清洗后无剩余工单,无法进入建模流程")]
    EmptyCleanedDataset,

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

// ==========================================
// PipelineReport - 管道运行报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// 原始文件行数
    pub input_rows: usize,
    /// 清洗后行数
    pub cleaned_rows: usize,
    /// 清洗后重大故障行数
    pub major_breakdown_rows: usize,
    /// 训练分区行数
    pub train_rows: usize,
    /// 测试分区行数
    pub test_rows: usize,
    /// 评估结果
    pub evaluation: EvaluationReport,
}

/// 建模流程产出: 训练完成的森林 + 运行报告
pub struct AnalysisOutcome {
    pub forest: BreakdownForest,
    pub report: PipelineReport,
}

/// 画像流程产出: 清洗后数据集 + 工单画像
pub struct ProfileOutcome {
    pub cleaned: Vec<CleanWorkOrder>,
    pub profile: WorkOrderProfile,
}

// ==========================================
// AnalysisPipeline - 分析管道
// ==========================================
pub struct AnalysisPipeline {
    config: AnalysisConfig,
}

impl AnalysisPipeline {
    /// 创建管道实例
    ///
    /// # 参数
    /// - config: 分析参数（调用方负责 validate）
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// 执行完整建模流程
    ///
    /// # 参数
    /// - csv_path: 工单 CSV 文件路径
    ///
    /// # 返回
    /// 训练完成的森林与运行报告;任一阶段失败即终止本次运行
    pub fn run(&self, csv_path: &Path) -> Result<AnalysisOutcome, PipelineError> {
        info!(path = %csv_path.display(), "开始执行建模流程");

        // ==========================================
        // 步骤1: 导入与清洗
        // ==========================================
        debug!("步骤1: 导入与清洗");
        let importer = WorkOrderImporter::new();
        let raw = importer.load_raw(csv_path)?;
        let input_rows = raw.len();

        let cleaned = DataCleaner.clean(raw);
        if cleaned.is_empty() {
            return Err(PipelineError::EmptyCleanedDataset);
        }
        info!(input_rows, cleaned_rows = cleaned.len(), "清洗完成");

        // ==========================================
        // 步骤2: 打标
        // ==========================================
        debug!("步骤2: 阈值打标");
        let labeler = Labeler::new(self.config.major_breakdown_threshold_minutes);
        let labeled = labeler.label(cleaned);
        let major_breakdown_rows = labeled.iter().filter(|l| l.major_breakdown).count();
        info!(
            major_breakdown_rows,
            minor_rows = labeled.len() - major_breakdown_rows,
            "打标完成"
        );

        // ==========================================
        // 步骤3: 采样与切分
        // ==========================================
        debug!("步骤3: 采样与切分");
        let splitter = SampleSplitter::from_config(&self.config);
        let split = splitter.sample_and_split(&labeled)?;
        info!(
            train_rows = split.train.len(),
            test_rows = split.test.len(),
            "采样与切分完成"
        );

        // ==========================================
        // 步骤4: 随机森林训练
        // ==========================================
        debug!("步骤4: 随机森林训练");
        let forest = BreakdownForest::fit(
            ForestParams::from_config(&self.config),
            &FEATURE_COLUMNS,
            &split.train,
        )?;

        // ==========================================
        // 步骤5: 评估
        // ==========================================
        debug!("步骤5: 测试分区评估");
        let evaluation = Evaluator.evaluate(&forest, &split.test)?;

        let report = PipelineReport {
            input_rows,
            cleaned_rows: labeled.len(),
            major_breakdown_rows,
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            evaluation,
        };

        info!(accuracy = report.evaluation.accuracy, "建模流程执行完成");
        Ok(AnalysisOutcome { forest, report })
    }

    /// 执行画像流程（导入 → 清洗 → 聚合统计）
    ///
    /// 返回清洗后数据集供交接文件导出使用
    pub fn profile(&self, csv_path: &Path) -> Result<ProfileOutcome, PipelineError> {
        info!(path = %csv_path.display(), "开始执行画像流程");

        let importer = WorkOrderImporter::new();
        let cleaned = importer.load_clean(csv_path)?;
        if cleaned.is_empty() {
            return Err(PipelineError::EmptyCleanedDataset);
        }

        let engine = ProfileEngine::new(self.config.major_breakdown_threshold_minutes);
        let profile = engine.profile(&cleaned);

        info!(cleaned_rows = cleaned.len(), "画像流程执行完成");
        Ok(ProfileOutcome { cleaned, profile })
    }
}
