//! # 带单位物理量解析器
//!
//! 解析质量、中子波长和 X 射线源。单位后缀区分大小写。
//!
//! | 物理量 | 后缀 | 换算 |
//! |---|---|---|
//! | 质量 (g) | kg, mg, ug, g, 无 | ×1000, ×1e-3, ×1e-6, ×1, ×1 |
//! | 中子波长 (Å) | meV, m/s, Ang, 无 | 色散关系, 色散关系, 原值, 原值 |
//! | X 射线波长 (Å) | Ka, keV, Ang, 元素符号, 无 | Kα 查表, λ=hc/E, 原值, Kα 查表, 原值 |
//!
//! ## 依赖关系
//! - 被 `pipeline/validate.rs` 和 `commands/parse.rs` 使用
//! - 使用 `physics/` 的换算函数和元素表

use crate::error::{NactError, Result};
use crate::parsers::parse_number;
use crate::physics::{elements, neutron, xray};

/// 质量单位到克的换算因子（按匹配顺序）
pub const MASS_UNITS: [(&str, f64); 4] = [("kg", 1000.0), ("mg", 0.001), ("ug", 1e-6), ("g", 1.0)];

/// 解析质量，返回克
pub fn parse_mass(text: &str) -> Result<f64> {
    let text = text.trim();
    for (suffix, scale) in MASS_UNITS {
        if let Some(magnitude) = text.strip_suffix(suffix) {
            return Ok(parse_number(magnitude)? * scale);
        }
    }
    parse_number(text)
}

/// 解析中子波长，返回 Å
pub fn parse_wavelength(text: &str) -> Result<f64> {
    let text = text.trim();
    if let Some(magnitude) = text.strip_suffix("meV") {
        let energy = positive(parse_number(magnitude)?, "neutron energy")?;
        Ok(neutron::wavelength_from_energy(energy))
    } else if let Some(magnitude) = text.strip_suffix("m/s") {
        let velocity = positive(parse_number(magnitude)?, "neutron velocity")?;
        Ok(neutron::wavelength_from_velocity(velocity))
    } else if let Some(magnitude) = text.strip_suffix("Ang") {
        parse_number(magnitude)
    } else {
        parse_number(text)
    }
}

/// 解析 X 射线源（靶材元素、光子能量或波长），返回 Å
pub fn parse_xray_source(text: &str) -> Result<f64> {
    let text = text.trim();
    if let Some(symbol) = text.strip_suffix("Ka") {
        k_alpha(symbol.trim())
    } else if let Some(magnitude) = text.strip_suffix("keV") {
        let energy = positive(parse_number(magnitude)?, "X-ray energy")?;
        Ok(xray::wavelength(energy))
    } else if let Some(magnitude) = text.strip_suffix("Ang") {
        parse_number(magnitude)
    } else if text.chars().next().is_some_and(char::is_alphabetic) {
        k_alpha(text)
    } else {
        parse_number(text)
    }
}

/// 查找元素的 Kα 波长
fn k_alpha(symbol: &str) -> Result<f64> {
    let element = elements::lookup(symbol)
        .ok_or_else(|| NactError::Format(format!("unknown element {:?}", symbol)))?;
    element.k_alpha.ok_or_else(|| {
        NactError::Format(format!("no K-alpha line tabulated for {}", element.symbol))
    })
}

fn positive(value: f64, what: &str) -> Result<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(NactError::Range(format!("{} must be positive", what)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_mass_suffixes() {
        assert_eq!(parse_mass("2kg").unwrap(), 2000.0);
        assert!(close(parse_mass("5mg").unwrap(), 0.005));
        assert!(close(parse_mass("3ug").unwrap(), 3e-6));
        assert_eq!(parse_mass("7g").unwrap(), 7.0);
        assert_eq!(parse_mass("7").unwrap(), 7.0);
        assert_eq!(parse_mass(" 1.5 kg ").unwrap(), 1500.0);
    }

    #[test]
    fn test_mass_round_trip() {
        for (suffix, scale) in MASS_UNITS {
            let grams = parse_mass(&format!("12.5{}", suffix)).unwrap();
            assert!(close(grams / scale, 12.5), "{}", suffix);
        }
    }

    #[test]
    fn test_mass_errors() {
        for bad in ["", "kg", "abc", "5 lb", "5Kg"] {
            assert!(matches!(parse_mass(bad), Err(NactError::Format(_))), "{:?}", bad);
        }
    }

    #[test]
    fn test_wavelength_units() {
        assert_eq!(parse_wavelength("4.75").unwrap(), 4.75);
        assert_eq!(parse_wavelength("4.75Ang").unwrap(), 4.75);

        let wl = parse_wavelength("25meV").unwrap();
        assert!(close(neutron::energy(wl), 25.0));

        let wl = parse_wavelength("2200m/s").unwrap();
        assert!(close(neutron::velocity(wl), 2200.0));
    }

    #[test]
    fn test_wavelength_errors() {
        assert!(matches!(parse_wavelength("fast"), Err(NactError::Format(_))));
        assert!(matches!(parse_wavelength("xmeV"), Err(NactError::Format(_))));
        assert!(matches!(parse_wavelength("0meV"), Err(NactError::Range(_))));
        assert!(matches!(parse_wavelength("-5m/s"), Err(NactError::Range(_))));
    }

    #[test]
    fn test_xray_sources() {
        assert_eq!(parse_xray_source("Cu Ka").unwrap(), 1.5418);
        assert_eq!(parse_xray_source("MoKa").unwrap(), 0.7107);
        assert_eq!(parse_xray_source("Ag").unwrap(), 0.5609);
        assert_eq!(parse_xray_source("1.54Ang").unwrap(), 1.54);
        assert_eq!(parse_xray_source("0.71").unwrap(), 0.71);

        let wl = parse_xray_source("8.04keV").unwrap();
        assert!(close(xray::energy(wl), 8.04));
    }

    #[test]
    fn test_xray_errors() {
        for bad in ["Xx Ka", "Qq", "H Ka", "", "abcAng", "keV"] {
            assert!(
                matches!(parse_xray_source(bad), Err(NactError::Format(_))),
                "{:?}",
                bad
            );
        }
    }
}
