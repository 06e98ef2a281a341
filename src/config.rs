//! # 解析配置
//!
//! 解析器共享的只读配置。时间戳缺少时区时使用 `default_zone`。
//!
//! ## 依赖关系
//! - 被 `parsers/timestamp.rs`, `parsers/elapsed.rs`, `pipeline/` 使用
//! - 由 `commands/` 根据命令行参数构造

use crate::error::{NactError, Result};

use chrono_tz::Tz;

/// 默认时区（NCNR 所在地）
pub const DEFAULT_ZONE_NAME: &str = "US/Eastern";

/// 解析器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// 时间戳未指定时区时使用的时区
    pub default_zone: Tz,
}

impl ParserConfig {
    pub fn new(default_zone: Tz) -> Self {
        Self { default_zone }
    }

    /// 从 IANA 时区名创建配置（如 "Europe/Berlin"）
    pub fn from_zone_name(name: &str) -> Result<Self> {
        let zone = name.trim().parse::<Tz>().map_err(|e| {
            NactError::InvalidArgument(format!("unknown time zone '{}': {}", name, e))
        })?;
        Ok(Self::new(zone))
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(chrono_tz::US::Eastern)
    }
}
