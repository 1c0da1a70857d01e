// ==========================================
// 设备维修工单分析系统 - 核心库
// ==========================================
// 技术栈: Rust + CSV 批处理
// 系统定位: 维修决策支持（批量分析，非在线服务）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部数据
pub mod importer;

// 数据集层 - 打标 / 采样 / 切分
pub mod dataset;

// 模型层 - 随机森林与评估
pub mod model;

// 分析层 - 工单画像统计
pub mod analytics;

// 管道层 - 全流程编排
pub mod pipeline;

// 配置层 - 分析参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::BreakdownLabel;

// 领域实体
pub use domain::{CleanWorkOrder, LabeledWorkOrder, WorkOrder};

// 导入层
pub use importer::{CsvParser, DataCleaner, FieldMapper, ImportError, ImportResult};

// 数据集层
pub use dataset::{Labeler, SampleSplitter, TrainTestSplit};

// 模型层
pub use model::{
    BreakdownForest, CategoricalEncoder, ConfusionMatrix, EvaluationReport, Evaluator,
    FeatureImportance, ForestParams, ModelError, ModelResult,
};

// 分析层
pub use analytics::{ProfileEngine, WorkOrderProfile};

// 管道层
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, PipelineError, PipelineReport, ProfileOutcome};

// 配置
pub use config::AnalysisConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备维修工单分析系统";

// ==========================================
// 预编译检查
// ==========================================
