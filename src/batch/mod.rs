//! # 批量处理模块
//!
//! 对目录中的多个请求文件批量校验和计算。
//!
//! ## 功能
//! - 收集匹配的请求文件
//! - 并行处理
//! - 进度反馈与统计
//! - CSV 汇总
//!
//! ## 依赖关系
//! - 被 `commands/calc.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;
pub mod summary;

pub use collector::{response_path, FileCollector};
pub use runner::{BatchResult, BatchRunner, ProcessResult};
pub use summary::write_summary;
