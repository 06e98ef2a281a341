//! # 宽松 ISO 8601 时间戳解析器
//!
//! 解析可省略尾部字段的日期时间字符串。
//!
//! ## 文法
//! ```text
//! YYYY[-MM[-DD[<sep>hh:mm[:ss[.fff]][Z|±hh[[:]mm]]]]]
//! ```
//! 一旦某个字段被省略，其右侧的所有字段也必须省略（由正则表达式的嵌套保证）。
//!
//! ## 缺省字段
//! 缺省字段取**最晚**的可能值：月份为 12，日期为该月最后一天，
//! 时分秒为 23:59:59，小数秒为 0。这样从当前时刻反推的衰变时间最短，
//! 活度估计偏保守。
//!
//! ## 时区
//! - `Z`：UTC
//! - `±hh[:mm]`：相对 UTC 的偏移
//! - 省略：按 `zone` 的本地时间解释；夏令时重叠或空缺的时刻按标准时间偏移解释
//!
//! ## 依赖关系
//! - 被 `parsers/elapsed.rs` 和 `commands/` 使用
//! - 使用 `chrono`, `chrono-tz`, `regex`

use crate::error::{NactError, Result};

use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
    Utc,
};
use chrono_tz::{OffsetComponents, Tz};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static ISO8601_RELAXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^
        (?P<year>[0-9]{4})
        (?:
          -(?P<month>[0-9]{1,2})
          (?:
            -(?P<day>[0-9]{1,2})
            (?:
              .                              # separator, usually T or space
              (?P<hour>[0-9]{1,2})
              :(?P<minute>[0-9]{2})
              (?:
                :(?P<second>[0-9]{2})
                (?:\.(?P<fraction>[0-9]+))?
              )?
              (?P<zone>
                Z
                |
                (?P<sign>[+-])
                (?P<zone_hour>[0-9]{1,2})
                (?::?(?P<zone_minute>[0-9]{2}))?
              )?
            )?
          )?
        )?
        $",
    )
    .unwrap()
});

const GRAMMAR_HINT: &str = "expected YYYY[-MM[-DD[Thh:mm[:ss[.fff]][Z|+hh:mm]]]]";

/// 解析时间戳，返回绝对时刻
pub fn parse_timestamp(text: &str, zone: Tz) -> Result<DateTime<Utc>> {
    let caps = ISO8601_RELAXED
        .captures(text)
        .ok_or_else(|| NactError::grammar("date string", text, GRAMMAR_HINT))?;

    let naive = wall_clock(&caps, text)?;

    match caps.name("zone").map(|m| m.as_str()) {
        None => Ok(localize(naive, zone)),
        Some("Z") => Ok(Utc.from_utc_datetime(&naive)),
        Some(_) => {
            let sign = if group(&caps, "sign") == Some("-") { -1 } else { 1 };
            let minutes = group(&caps, "zone_hour").map_or(0, digits) * 60
                + group(&caps, "zone_minute").map_or(0, digits);
            let offset = TimeDelta::minutes(sign * i64::from(minutes));
            Ok(Utc.from_utc_datetime(&(naive - offset)))
        }
    }
}

/// 将匹配结果转换为本地墙上时间，缺省字段取最晚值
fn wall_clock(caps: &Captures<'_>, text: &str) -> Result<NaiveDateTime> {
    let year = group(caps, "year").map_or(0, digits) as i32;
    let month = group(caps, "month").map_or(12, digits);
    let day = match group(caps, "day") {
        Some(d) => digits(d),
        None => last_day_of_month(year, month)
            .ok_or_else(|| NactError::grammar("date string", text, "month out of range"))?,
    };
    let hour = group(caps, "hour").map_or(23, digits);
    let minute = group(caps, "minute").map_or(59, digits);
    let second = group(caps, "second").map_or(59, digits);
    let micros = group(caps, "fraction").map_or(0, fraction_micros);

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| NactError::grammar("date string", text, "invalid calendar date"))?;
    let time = NaiveTime::from_hms_micro_opt(hour, minute, second, micros)
        .ok_or_else(|| NactError::grammar("date string", text, "invalid time of day"))?;

    Ok(date.and_time(time))
}

/// 按时区解释本地时间
fn localize(naive: NaiveDateTime, zone: Tz) -> DateTime<Utc> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // 夏令时重叠或空缺：使用标准时间偏移
        LocalResult::Ambiguous(_, _) | LocalResult::None => {
            let standard = zone.offset_from_utc_datetime(&naive).base_utc_offset();
            Utc.from_utc_datetime(&(naive - standard))
        }
    }
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str())
}

/// 十进制数字串转整数（正则已保证只含数字且长度有限）
fn digits(s: &str) -> u32 {
    s.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// 小数秒截断到微秒
fn fraction_micros(s: &str) -> u32 {
    let padded: String = s.chars().chain(std::iter::repeat('0')).take(6).collect();
    digits(&padded)
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .filter(|d| d.month() == month)
        .map(|d| d.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_year_month_resolves_to_end_of_month() {
        let zone = chrono_tz::US::Eastern;
        let t = parse_timestamp("2010-03", zone).unwrap();
        let local = t.with_timezone(&zone);
        let expected = NaiveDate::from_ymd_opt(2010, 3, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(local.naive_local(), expected);
        // EDT (UTC-4) since 2010-03-14
        assert_eq!(t, utc(2010, 4, 1, 3, 59, 59));
    }

    #[test]
    fn test_year_only_resolves_to_new_years_eve() {
        let t = parse_timestamp("2010", chrono_tz::UTC).unwrap();
        assert_eq!(t, utc(2010, 12, 31, 23, 59, 59));
    }

    #[test]
    fn test_leap_february() {
        let t = parse_timestamp("2012-02", chrono_tz::UTC).unwrap();
        assert_eq!(t, utc(2012, 2, 29, 23, 59, 59));
        let t = parse_timestamp("2011-2", chrono_tz::UTC).unwrap();
        assert_eq!(t, utc(2011, 2, 28, 23, 59, 59));
    }

    #[test]
    fn test_explicit_utc_ignores_default_zone() {
        let a = parse_timestamp("2010-03-01T12:00Z", chrono_tz::US::Eastern).unwrap();
        let b = parse_timestamp("2010-03-01T12:00Z", chrono_tz::Asia::Tokyo).unwrap();
        assert_eq!(a, b);
        // seconds omitted -> 59
        assert_eq!(a, utc(2010, 3, 1, 12, 0, 59));
    }

    #[test]
    fn test_explicit_offset() {
        let t = parse_timestamp("2010-03-01T12:00:00+02:30", chrono_tz::US::Eastern).unwrap();
        assert_eq!(t, utc(2010, 3, 1, 9, 30, 0));
        let t = parse_timestamp("2010-03-01 12:00:00-0500", chrono_tz::UTC).unwrap();
        assert_eq!(t, utc(2010, 3, 1, 17, 0, 0));
        let t = parse_timestamp("2010-03-01T12:00:00-5", chrono_tz::UTC).unwrap();
        assert_eq!(t, utc(2010, 3, 1, 17, 0, 0));
    }

    #[test]
    fn test_fraction_truncated_to_micros() {
        let t = parse_timestamp("2010-03-01T12:00:00.1234567Z", chrono_tz::UTC).unwrap();
        assert_eq!(t.timestamp_subsec_micros(), 123_456);
        let t = parse_timestamp("2010-03-01T12:00:00.25Z", chrono_tz::UTC).unwrap();
        assert_eq!(t.timestamp_subsec_micros(), 250_000);
    }

    #[test]
    fn test_default_zone_applies_without_suffix() {
        let t = parse_timestamp("2010-01-15T08:00:00", chrono_tz::US::Eastern).unwrap();
        assert_eq!(t, utc(2010, 1, 15, 13, 0, 0));
    }

    #[test]
    fn test_dst_overlap_and_gap_use_standard_offset() {
        let zone = chrono_tz::US::Eastern;
        // fall back: 01:30 happens twice
        let t = parse_timestamp("2021-11-07T01:30:00", zone).unwrap();
        assert_eq!(t, utc(2021, 11, 7, 6, 30, 0));
        // spring forward: 02:30 does not exist
        let t = parse_timestamp("2021-03-14T02:30:00", zone).unwrap();
        assert_eq!(t, utc(2021, 3, 14, 7, 30, 0));
    }

    #[test]
    fn test_grammar_violations() {
        for bad in [
            "",
            "10-03",
            "2010-03Z",
            "2010-03-01T12",
            "2010-03-01T12:0",
            "2010-03-01T12:00:00.",
            "2010--01",
            "yesterday",
        ] {
            let err = parse_timestamp(bad, chrono_tz::UTC).unwrap_err();
            assert!(matches!(err, NactError::Grammar { .. }), "{:?}", bad);
        }
    }

    #[test]
    fn test_out_of_range_components() {
        for bad in [
            "2010-13",
            "2010-0",
            "2010-02-30",
            "2010-04-31T00:00",
            "2010-03-01T24:00",
            "2010-03-01T12:00:60",
        ] {
            let err = parse_timestamp(bad, chrono_tz::UTC).unwrap_err();
            assert!(matches!(err, NactError::Grammar { .. }), "{:?}", bad);
        }
    }
}
