// ==========================================
// 设备维修工单分析系统 - 建模主入口
// ==========================================
// 技术栈: Rust + CSV 批处理
// 系统定位: 决策支持系统（单次批量运行）
// ==========================================
//
// 用法:
//   cargo run --bin work-order-analytics -- <工单CSV> [配置JSON] [报告输出路径]

use std::error::Error;
use std::path::PathBuf;
use work_order_analytics::{AnalysisConfig, AnalysisPipeline, APP_NAME, VERSION};

fn main() -> Result<(), Box<dyn Error>> {
    // 初始化日志系统
    work_order_analytics::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 重大故障预测", APP_NAME);
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let csv_path = PathBuf::from(args.next().ok_or(
        "用法: work-order-analytics <工单CSV> [配置JSON] [报告输出路径]",
    )?);
    let config_path = args.next().map(PathBuf::from);
    let report_path = args.next().map(PathBuf::from);

    // 加载配置（缺省用内置默认值）
    let config = match &config_path {
        Some(path) => {
            tracing::info!("使用配置文件: {}", path.display());
            AnalysisConfig::from_json_file(path)?
        }
        None => AnalysisConfig::default(),
    };
    config.validate()?;

    let pipeline = AnalysisPipeline::new(config);
    let outcome = pipeline.run(&csv_path)?;
    let report = &outcome.report;

    println!("==================================================");
    println!("建模流程完成");
    println!("  原始行数:     {}", report.input_rows);
    println!("  清洗后行数:   {}", report.cleaned_rows);
    println!("  重大故障行数: {}", report.major_breakdown_rows);
    println!("  训练/测试:    {} / {}", report.train_rows, report.test_rows);
    println!("--------------------------------------------------");
    let matrix = &report.evaluation.confusion_matrix;
    println!("混淆矩阵（实际 × 预测）:");
    println!(
        "  MAJOR: {:>8} MAJOR, {:>8} MINOR",
        matrix.major_as_major, matrix.major_as_minor
    );
    println!(
        "  MINOR: {:>8} MAJOR, {:>8} MINOR",
        matrix.minor_as_major, matrix.minor_as_minor
    );
    println!("  精度: {:.4}", report.evaluation.accuracy);
    println!(
        "  分类错误率: MAJOR {:.4} / MINOR {:.4}",
        report.evaluation.major_class_error, report.evaluation.minor_class_error
    );
    println!("--------------------------------------------------");
    println!("特征重要性（按平均精度下降降序）:");
    for item in &report.evaluation.importance_ranking {
        println!(
            "  {:<32} 精度下降 {:>8.4}  基尼下降 {:>10.2}",
            item.feature, item.mean_decrease_accuracy, item.mean_decrease_gini
        );
    }
    println!("==================================================");

    // 报告落盘（JSON）
    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&path, json)?;
        tracing::info!("评估报告已写出: {}", path.display());
    }

    Ok(())
}
