//! # 数据模型模块
//!
//! 定义原始请求、校验后请求和晶格参数数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `pipeline/`, `engine/` 和 `commands/` 使用
//! - 子模块: request, lattice

pub mod lattice;
pub mod request;

pub use request::{
    AbundanceTable, CalculationMode, DensityKind, DensitySpec, FieldErrors, RawRequest, RawValue,
    ValidatedRequest,
};
