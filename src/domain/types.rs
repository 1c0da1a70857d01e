// ==========================================
// 设备维修工单分析系统 - 领域类型定义
// ==========================================
// 红线: 故障标签是两级分类,不是数值
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 故障标签 (Breakdown Label)
// ==========================================
// 由实际工时与阈值比较派生,打标后作为分类目标使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakdownLabel {
    Major, // 重大故障（工时超阈值）
    Minor, // 一般维修
}

impl BreakdownLabel {
    /// 由打标结果构造标签
    pub fn from_flag(major_breakdown: bool) -> Self {
        if major_breakdown {
            BreakdownLabel::Major
        } else {
            BreakdownLabel::Minor
        }
    }

    /// 是否为重大故障
    pub fn is_major(&self) -> bool {
        matches!(self, BreakdownLabel::Major)
    }
}

impl fmt::Display for BreakdownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakdownLabel::Major => write!(f, "MAJOR"),
            BreakdownLabel::Minor => write!(f, "MINOR"),
        }
    }
}
