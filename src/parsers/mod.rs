//! # 解析器模块
//!
//! 将带单位的自由文本实验参数解析为强类型数值。
//!
//! ## 依赖关系
//! - 被 `pipeline/` 和 `commands/` 模块使用
//! - 使用 `models/` 数据模型和 `physics/` 换算
//! - 子模块: timestamp, elapsed, density, quantity

pub mod density;
pub mod elapsed;
pub mod quantity;
pub mod timestamp;

pub use density::parse_density;
pub use elapsed::{parse_hours, resolve_elapsed_hours};
pub use quantity::{parse_mass, parse_wavelength, parse_xray_source};
pub use timestamp::parse_timestamp;

use crate::error::{NactError, Result};

/// 解析浮点数（忽略首尾空白）
pub fn parse_number(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| NactError::Format(format!("could not convert string to float: {:?}", text)))
}
