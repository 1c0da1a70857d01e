// ==========================================
// 设备维修工单分析系统 - 模型层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 模型层错误类型
#[derive(Error, Debug)]
pub enum ModelError {
    // ===== 训练数据错误 =====
    #[error("训练行数不足: 可用 {available} 行,至少需要 2 行")]
    InsufficientRows { available: usize },

    #[error("特征集为空,无法训练")]
    EmptyFeatureSet,

    #[error("特征维度不一致: 期望 {expected} 列,实际 {actual} 列")]
    FeatureDimensionMismatch { expected: usize, actual: usize },

    // ===== 评估错误 =====
    #[error("测试集为空,无法评估")]
    EmptyTestSet,

    // ===== 持久化错误 =====
    #[error("模型序列化失败: {0}")]
    SerializationError(String),
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::SerializationError(err.to_string())
    }
}

/// Result 类型别名
pub type ModelResult<T> = Result<T, ModelError>;
