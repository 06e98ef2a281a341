//! # 批量汇总
//!
//! 把每个请求文件的处理记录写成 CSV（file, status, detail）。
//!
//! ## 依赖关系
//! - 被 `commands/calc.rs` 调用
//! - 使用 `csv` crate

use crate::batch::BatchResult;
use crate::error::{NactError, Result};

use std::path::Path;

/// 写出批量汇总 CSV
pub fn write_summary(output_path: &Path, result: &BatchResult) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(NactError::CsvError)?;
    for record in &result.records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| NactError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
