//! # 请求校验流水线
//!
//! 将原始请求逐字段解析为 `ValidatedRequest`。所有字段都会被解析，
//! 失败的字段汇总为字段错误表，一次性报告。
//!
//! ## 依赖关系
//! - 被 `engine/` 和 `commands/` 使用
//! - 使用 `parsers/`, `models/`, `physics/formula.rs`
//! - 子模块: validate

pub mod validate;

pub use validate::Validator;
