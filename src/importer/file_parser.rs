// ==========================================
// 设备维修工单分析系统 - 文件解析器实现
// ==========================================
// 职责: 工单 CSV → 原始键值行
// 支持: CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 解析 CSV 文件为原始键值行
    ///
    /// # 参数
    /// - file_path: CSV 文件路径（需含表头行）
    ///
    /// # 返回
    /// 每行一个 列名 → 原始字符串值 的映射,完全空白的行被跳过
    pub fn parse_to_raw_records(
        &self,
        file_path: &Path,
    ) -> ImportResult<Vec<HashMap<String, String>>> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        // 打开 CSV 文件
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // 读取所有行
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }

    /// 读取表头列名（用于必需列校验）
    pub fn read_headers(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        let path = file_path;
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        Ok(reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect())
    }
}
