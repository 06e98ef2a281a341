//! # 经过时间解析器
//!
//! 将停束时间转换为距离 `now` 的小时数。
//!
//! ## 输入形式
//! - 含 `-` 或 `:` 的字符串视为停束时刻，按宽松 ISO 8601 解析
//! - 否则为数值加可选单位：h, m, s, d, w, y（缺省为 h）
//!
//! ## 依赖关系
//! - 被 `pipeline/validate.rs` 使用（rest, exposure 字段）
//! - 使用 `parsers/timestamp.rs`

use crate::config::ParserConfig;
use crate::error::{NactError, Result};
use crate::parsers::{parse_number, timestamp};

use chrono::{DateTime, Utc};

/// 儒略年的小时数（考虑闰年平均）
pub const HOURS_PER_YEAR: f64 = 365.2425 * 24.0;

/// 单位到小时的换算因子
pub const HOUR_SCALE: [(char, f64); 6] = [
    ('h', 1.0),
    ('m', 1.0 / 60.0),
    ('s', 1.0 / 3600.0),
    ('d', 24.0),
    ('w', 24.0 * 7.0),
    ('y', HOURS_PER_YEAR),
];

const HOURS_HINT: &str = "expected time as value and units (h,m,s,d,w,y) or beam off date/time";

/// 解析停束时间（时间表达式或停束时刻），返回经过的小时数
pub fn resolve_elapsed_hours(text: &str, now: DateTime<Utc>, config: &ParserConfig) -> Result<f64> {
    let text = text.trim();
    if !text.contains(['-', ':']) {
        return parse_hours(text);
    }

    let beam_off = timestamp::parse_timestamp(text, config.default_zone)?;
    if beam_off > now {
        return Err(NactError::Range(
            "time off beam is in the future".to_string(),
        ));
    }
    let delta = now - beam_off;
    Ok(delta.num_milliseconds() as f64 / 3_600_000.0)
}

/// 解析时间表达式（数值加单位），返回小时数
pub fn parse_hours(text: &str) -> Result<f64> {
    let text = text.trim();
    let last = text
        .chars()
        .last()
        .ok_or_else(|| NactError::Format(HOURS_HINT.to_string()))?;

    let (magnitude, scale) = match HOUR_SCALE.iter().find(|(unit, _)| *unit == last) {
        Some((unit, scale)) => (&text[..text.len() - unit.len_utf8()], *scale),
        None => (text, 1.0),
    };

    parse_number(magnitude)
        .map(|value| value * scale)
        .map_err(|_| NactError::Format(HOURS_HINT.to_string()))
}
