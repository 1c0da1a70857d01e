// ==========================================
// 设备维修工单分析系统 - 配置层
// ==========================================
// 职责: 分析参数管理
// 存储: JSON 文件（可选覆写,缺省用内置默认值）
// ==========================================
// 红线: 阈值是配置,不是硬编码;
//       默认值沿用参考口径,未经论证不得擅改
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    FileReadError(String),

    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

// ==========================================
// AnalysisConfig - 分析参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 重大故障工时阈值（分钟,严格大于判定）
    pub major_breakdown_threshold_minutes: f64,

    /// 建模抽样规模（超过数据量时取全量）
    pub sample_size: usize,

    /// 训练集占比
    pub train_ratio: f64,

    /// 森林规模（树数量）
    pub ntree: usize,

    /// 每次分裂考察的候选特征数
    pub mtry: usize,

    /// 随机种子（采样/切分/自助法/特征子集共用的主种子）
    pub seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            major_breakdown_threshold_minutes: 60.0,
            sample_size: 100_000,
            train_ratio: 0.8,
            ntree: 100,
            mtry: 3,
            seed: 42,
        }
    }
}

impl AnalysisConfig {
    /// 从 JSON 文件加载配置（缺失字段回落到默认值）
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileReadError(format!("{}: {}", path.display(), e)))?;

        let config: AnalysisConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 参数合法性校验
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.major_breakdown_threshold_minutes <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "major_breakdown_threshold_minutes".to_string(),
                message: format!("必须为正数,实际 {}", self.major_breakdown_threshold_minutes),
            });
        }
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "train_ratio".to_string(),
                message: format!("必须在 (0, 1) 区间内,实际 {}", self.train_ratio),
            });
        }
        if self.sample_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sample_size".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        if self.ntree == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ntree".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        if self.mtry == 0 {
            return Err(ConfigError::InvalidValue {
                key: "mtry".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}
