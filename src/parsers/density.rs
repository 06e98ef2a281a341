//! # 密度描述解析器
//!
//! 解析样品密度字段，支持以下写法（按顺序匹配，先匹配者生效）：
//!
//! ```text
//! (空)                       未指定
//! 120A3                      每分子式单元体积 (Å³)
//! 2.2i                       同位素密度 (g/cm³)
//! 2.2n                       天然丰度密度 (g/cm³)
//! 2.2                        同位素密度；非正数视为未指定
//! a:4.05 c/a:1.6 gamma=120   晶格常数列表，由晶胞体积换算
//! ```
//!
//! ## 依赖关系
//! - 被 `pipeline/validate.rs` 和 `commands/parse.rs` 使用
//! - 使用 `models/lattice.rs` 和 `models/request.rs`

use crate::error::{NactError, Result};
use crate::models::lattice::{LatticeEntries, LatticeKey, LatticeParameters, ANG3_TO_CM3};
use crate::models::{DensityKind, DensitySpec};
use crate::parsers::parse_number;

use regex::Regex;
use std::sync::LazyLock;

/// 晶格常数列表的分隔符
static LATTICE_DELIMITERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;=:\s]+").unwrap());

/// 解析密度描述
pub fn parse_density(text: &str) -> Result<DensitySpec> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(DensitySpec::DEFAULT);
    }

    if let Some(volume) = text.strip_suffix("A3") {
        return Ok(DensitySpec::new(
            DensityKind::Volume,
            parse_number(volume)? * ANG3_TO_CM3,
        ));
    }
    if let Some(value) = text.strip_suffix('i') {
        return Ok(DensitySpec::new(DensityKind::Isotope, parse_number(value)?));
    }
    if let Some(value) = text.strip_suffix('n') {
        return Ok(DensitySpec::new(DensityKind::Natural, parse_number(value)?));
    }
    if let Ok(value) = parse_number(text) {
        return Ok(if value > 0.0 {
            DensitySpec::new(DensityKind::Isotope, value)
        } else {
            DensitySpec::DEFAULT
        });
    }

    let volume = parse_lattice(text)?.volume();
    if !(volume.is_finite() && volume > 0.0) {
        return Err(NactError::Range(format!(
            "Lattice constants {:?} do not describe a valid unit cell",
            text
        )));
    }
    Ok(DensitySpec::new(DensityKind::Volume, volume * ANG3_TO_CM3))
}

/// 晶格常数列表扫描状态
enum State {
    ExpectKey,
    ExpectValue(LatticeKey),
}

/// 解析晶格常数列表（键值交替）
pub fn parse_lattice(text: &str) -> Result<LatticeParameters> {
    let tokens: Vec<&str> = LATTICE_DELIMITERS
        .split(text)
        .filter(|t| !t.is_empty())
        .collect();

    // 先校验全部数值
    for token in tokens.iter().skip(1).step_by(2) {
        parse_number(token)?;
    }

    let mut entries = LatticeEntries::default();
    let mut state = State::ExpectKey;
    for token in &tokens {
        state = match state {
            State::ExpectKey => {
                let key = LatticeKey::from_token(token).ok_or_else(|| {
                    NactError::UnknownKey(format!(
                        "Unknown lattice constant {} (expected one of {})",
                        token,
                        LatticeKey::ALL.map(|k| k.as_str()).join(", ")
                    ))
                })?;
                State::ExpectValue(key)
            }
            State::ExpectValue(key) => {
                entries.set(key, parse_number(token)?);
                State::ExpectKey
            }
        };
    }
    if let State::ExpectValue(key) = state {
        return Err(NactError::UnknownKey(format!(
            "Lattice constant {} has no value",
            key
        )));
    }

    entries.resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1e-30)
    }

    #[test]
    fn test_empty_and_non_positive_are_default() {
        assert_eq!(parse_density("").unwrap(), DensitySpec::DEFAULT);
        assert_eq!(parse_density("   ").unwrap(), DensitySpec::DEFAULT);
        assert_eq!(parse_density("0").unwrap(), DensitySpec::DEFAULT);
        assert_eq!(parse_density("-5").unwrap(), DensitySpec::DEFAULT);
    }

    #[test]
    fn test_plain_and_suffixed_densities() {
        assert_eq!(
            parse_density("5").unwrap(),
            DensitySpec::new(DensityKind::Isotope, 5.0)
        );
        assert_eq!(
            parse_density("2.2i").unwrap(),
            DensitySpec::new(DensityKind::Isotope, 2.2)
        );
        assert_eq!(
            parse_density(" 1.1n ").unwrap(),
            DensitySpec::new(DensityKind::Natural, 1.1)
        );
    }

    #[test]
    fn test_volume_suffix() {
        let spec = parse_density("10A3").unwrap();
        assert_eq!(spec.kind, DensityKind::Volume);
        assert!(close(spec.value, 1e-23));
    }

    #[test]
    fn test_lattice_cubic_shorthand() {
        let spec = parse_density("a:4,alpha:90").unwrap();
        let cubic = parse_density("a=4 b=4 c=4 alpha=90 beta=90 gamma=90").unwrap();
        assert_eq!(spec.kind, DensityKind::Volume);
        assert!(close(spec.value, 64.0 * ANG3_TO_CM3));
        assert!(close(spec.value, cubic.value));

        let bare = parse_density("a 4").unwrap();
        assert!(close(bare.value, 64.0 * ANG3_TO_CM3));
    }

    #[test]
    fn test_lattice_ratio() {
        let spec = parse_density("a:4;c/a:2").unwrap();
        assert!(close(spec.value, 128e-24));
    }

    #[test]
    fn test_lattice_greek_and_delimiters() {
        let greek = parse_density(",A:3; c:5 ;γ:120,").unwrap();
        let ascii = parse_density("a:3 c:5 gamma:120").unwrap();
        assert!(close(greek.value, ascii.value));
        assert!(close(ascii.value, 45.0 * 3f64.sqrt() / 2.0 * ANG3_TO_CM3));
    }

    #[test]
    fn test_repeated_key_last_wins() {
        let spec = parse_density("a:3 a:4").unwrap();
        assert!(close(spec.value, 64.0 * ANG3_TO_CM3));
    }

    #[test]
    fn test_lattice_errors() {
        assert!(matches!(parse_density("c/a:2"), Err(NactError::UnknownKey(_))));
        assert!(matches!(parse_density("b:2"), Err(NactError::UnknownKey(_))));
        assert!(matches!(parse_density("a:4 d:5"), Err(NactError::UnknownKey(_))));
        assert!(matches!(parse_density("a:4 c"), Err(NactError::UnknownKey(_))));
        assert!(matches!(parse_density("a:x"), Err(NactError::Format(_))));
        assert!(matches!(parse_density("q:x"), Err(NactError::Format(_))));
        assert!(matches!(parse_density("xA3"), Err(NactError::Format(_))));
        assert!(matches!(parse_density("abci"), Err(NactError::Format(_))));
        assert!(matches!(
            parse_density("a:1 alpha:150 beta:150 gamma:150"),
            Err(NactError::Range(_))
        ));
        assert!(matches!(parse_density("a:-4"), Err(NactError::Range(_))));
    }

    #[test]
    fn test_every_key_takes_its_own_value() {
        let params = parse_lattice("a:3 b:4 c:5 alpha:90 beta:90 gamma:90").unwrap();
        assert_eq!((params.a, params.b, params.c), (3.0, 4.0, 5.0));
        assert!(close(params.volume(), 60.0));

        match parse_lattice("a:3 b:4 c") {
            Err(NactError::UnknownKey(msg)) => assert_eq!(msg, "Lattice constant c has no value"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key_lists_known_keys() {
        match parse_lattice("a:4 d:5") {
            Err(NactError::UnknownKey(msg)) => assert_eq!(
                msg,
                "Unknown lattice constant d (expected one of a, b, c, b/a, c/a, alpha, beta, gamma)"
            ),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
