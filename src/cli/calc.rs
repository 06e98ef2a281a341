//! # calc 子命令 CLI 定义
//!
//! 输入可以是 JSON 请求文件、`-`（标准输入）或包含请求文件的目录（批量模式）。
//! 不给输入时，用 `-f key=value` 逐项给出请求字段。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/calc.rs`

use clap::Args;
use std::path::PathBuf;

/// calc 子命令参数
#[derive(Args, Debug)]
pub struct CalcArgs {
    /// Input: request JSON file, '-' for stdin, or directory of request files
    pub input: Option<PathBuf>,

    /// Request field as key=value (repeatable; 'rest' may be given several times)
    #[arg(short = 'f', long = "field", value_parser = parse_key_value, conflicts_with = "input")]
    pub fields: Vec<(String, String)>,

    /// Output path: response file in single mode (default stdout),
    /// directory for response files in batch mode (default next to each request)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for request files (batch mode, e.g., "*.json,req_*")
    #[arg(long, default_value = "*.json")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing response files (batch mode)
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Write a CSV summary of the batch run
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

/// 解析 `key=value` 形式的字段
pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!(
            "Invalid field '{}'. Use key=value, e.g. sample=H2O or rest=2024-01-01",
            input
        )),
    }
}
