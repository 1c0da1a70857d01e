// ==========================================
// 设备维修工单分析系统 - 数据集层
// ==========================================
// 职责: 打标 / 采样 / 切分
// 红线: 随机性全部来自注入的种子,禁止进程级全局随机态
// ==========================================

pub mod labeler;
pub mod sampler;

pub use labeler::Labeler;
pub use sampler::{DatasetError, ModelSample, SampleSplitter, TrainTestSplit};
