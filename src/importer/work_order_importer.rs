// ==========================================
// 设备维修工单分析系统 - 工单导入器
// ==========================================
// 职责: 文件解析 → 字段映射 → 数据清洗 全流程
// ==========================================

use crate::domain::work_order::{CleanWorkOrder, WorkOrder};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::CsvParser;
use crate::importer::error::ImportResult;
use std::path::Path;
use tracing::info;

pub struct WorkOrderImporter {
    parser: CsvParser,
    mapper: FieldMapper,
    cleaner: DataCleaner,
}

impl WorkOrderImporter {
    pub fn new() -> Self {
        Self {
            parser: CsvParser,
            mapper: FieldMapper,
            cleaner: DataCleaner,
        }
    }

    /// 读取原始工单（解析 + 必需列校验 + 字段映射）
    ///
    /// 行号从 2 起算（第 1 行为表头）,与源文件对齐
    pub fn load_raw(&self, path: &Path) -> ImportResult<Vec<WorkOrder>> {
        let headers = self.parser.read_headers(path)?;
        self.mapper.require_columns(&headers)?;

        let raw_records = self.parser.parse_to_raw_records(path)?;
        let mut orders = Vec::with_capacity(raw_records.len());
        for (idx, row) in raw_records.iter().enumerate() {
            orders.push(self.mapper.map_to_work_order(row, idx + 2)?);
        }

        info!(path = %path.display(), rows = orders.len(), "工单文件读取完成");
        Ok(orders)
    }

    /// 读取并清洗（load_raw + DataCleaner）
    pub fn load_clean(&self, path: &Path) -> ImportResult<Vec<CleanWorkOrder>> {
        let orders = self.load_raw(path)?;
        Ok(self.cleaner.clean(orders))
    }
}

impl Default for WorkOrderImporter {
    fn default() -> Self {
        Self::new()
    }
}
