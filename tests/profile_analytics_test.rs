// ==========================================
// 设备维修工单分析系统 - 画像流程集成测试
// ==========================================
// 覆盖: 画像管道 导入 → 清洗 → 聚合统计
// ==========================================

mod test_helpers;

use work_order_analytics::{AnalysisConfig, AnalysisPipeline, PipelineError};

#[test]
fn test_profile_pipeline_aggregations() {
    let rows = vec![
        test_helpers::complete_row(1, "P100", "EQ-001", "PLANNED", "30"),
        test_helpers::complete_row(2, "P100", "EQ-002", "UNPLANNED", "90"),
        test_helpers::complete_row(3, "P100", "EQ-003", "UNPLANNED", "120"),
        test_helpers::complete_row(4, "P200", "EQ-004", "PLANNED", "45"),
        // 设备号缺失,清洗时丢弃
        test_helpers::complete_row(5, "P200", "", "UNPLANNED", "300"),
    ];
    let csv = test_helpers::write_work_order_csv(&rows);

    let pipeline = AnalysisPipeline::new(AnalysisConfig::default());
    let outcome = pipeline.profile(csv.path()).unwrap();

    assert_eq!(outcome.cleaned.len(), 4);

    let profile = &outcome.profile;
    assert_eq!(profile.downtime.count, 4);
    assert_eq!(profile.downtime.max_minutes, 120.0);
    assert!((profile.downtime.mean_minutes - 71.25).abs() < 1e-9);

    // 工厂按工单量降序;重大故障按 60 分钟阈值严格大于判定
    assert_eq!(profile.plants[0].plant_id, "P100");
    assert_eq!(profile.plants[0].order_count, 3);
    assert_eq!(profile.plants[0].major_breakdown_count, 2);
    assert_eq!(profile.plants[1].plant_id, "P200");
    assert_eq!(profile.plants[1].major_breakdown_count, 0);

    // 维修活动类型分布
    let unplanned = profile
        .activity_types
        .iter()
        .find(|c| c.value == "UNPLANNED")
        .unwrap();
    assert_eq!(unplanned.count, 2);
}

#[test]
fn test_profile_empty_cleaned_dataset() {
    let rows = vec![test_helpers::complete_row(1, "P100", "NA", "PLANNED", "30")];
    let csv = test_helpers::write_work_order_csv(&rows);

    let result = AnalysisPipeline::new(AnalysisConfig::default()).profile(csv.path());
    assert!(matches!(result, Err(PipelineError::EmptyCleanedDataset)));
}

#[test]
fn test_profile_is_serializable() {
    let csv = test_helpers::separable_csv(30);
    let outcome = AnalysisPipeline::new(AnalysisConfig::default())
        .profile(csv.path())
        .unwrap();

    let json = serde_json::to_string_pretty(&outcome.profile).unwrap();
    assert!(json.contains("downtime"));
    assert!(json.contains("plants"));
}
