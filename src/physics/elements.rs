//! # 元素数据库
//!
//! 元素符号、标准原子量以及常用靶材的特征 Kα 波长。
//!
//! ## 数据来源
//! - 原子量：IUPAC 标准原子量（放射性元素取最稳定同位素的质量数）
//! - Kα 波长：加权平均 (2·Kα1 + Kα2)/3，单位 Å
//!
//! ## 依赖关系
//! - 被 `physics/formula.rs` 和 `parsers/quantity.rs` 使用
//! - 纯静态数据，无外部依赖

use std::collections::HashMap;
use std::sync::LazyLock;

/// 元素
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// 原子序数
    pub number: u8,
    /// 元素符号
    pub symbol: &'static str,
    /// 原子量 (u)
    pub mass: f64,
    /// 天然丰度下的原子量 (u)，同位素 D/T 取 H 的值
    pub natural_mass: f64,
    /// 特征 Kα 波长 (Å)
    pub k_alpha: Option<f64>,
}

/// 按原子序数排列的 (符号, 原子量)
const STANDARD_MASSES: [(&str, f64); 118] = [
    ("H", 1.008),
    ("He", 4.002602),
    ("Li", 6.94),
    ("Be", 9.0121831),
    ("B", 10.81),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998403163),
    ("Ne", 20.1797),
    ("Na", 22.98976928),
    ("Mg", 24.305),
    ("Al", 26.9815385),
    ("Si", 28.085),
    ("P", 30.973761998),
    ("S", 32.06),
    ("Cl", 35.45),
    ("Ar", 39.948),
    ("K", 39.0983),
    ("Ca", 40.078),
    ("Sc", 44.955908),
    ("Ti", 47.867),
    ("V", 50.9415),
    ("Cr", 51.9961),
    ("Mn", 54.938044),
    ("Fe", 55.845),
    ("Co", 58.933194),
    ("Ni", 58.6934),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("Ga", 69.723),
    ("Ge", 72.630),
    ("As", 74.921595),
    ("Se", 78.971),
    ("Br", 79.904),
    ("Kr", 83.798),
    ("Rb", 85.4678),
    ("Sr", 87.62),
    ("Y", 88.90584),
    ("Zr", 91.224),
    ("Nb", 92.90637),
    ("Mo", 95.95),
    ("Tc", 98.0),
    ("Ru", 101.07),
    ("Rh", 102.90550),
    ("Pd", 106.42),
    ("Ag", 107.8682),
    ("Cd", 112.414),
    ("In", 114.818),
    ("Sn", 118.710),
    ("Sb", 121.760),
    ("Te", 127.60),
    ("I", 126.90447),
    ("Xe", 131.293),
    ("Cs", 132.90545196),
    ("Ba", 137.327),
    ("La", 138.90547),
    ("Ce", 140.116),
    ("Pr", 140.90766),
    ("Nd", 144.242),
    ("Pm", 145.0),
    ("Sm", 150.36),
    ("Eu", 151.964),
    ("Gd", 157.25),
    ("Tb", 158.92535),
    ("Dy", 162.500),
    ("Ho", 164.93033),
    ("Er", 167.259),
    ("Tm", 168.93422),
    ("Yb", 173.045),
    ("Lu", 174.9668),
    ("Hf", 178.49),
    ("Ta", 180.94788),
    ("W", 183.84),
    ("Re", 186.207),
    ("Os", 190.23),
    ("Ir", 192.217),
    ("Pt", 195.084),
    ("Au", 196.966569),
    ("Hg", 200.592),
    ("Tl", 204.38),
    ("Pb", 207.2),
    ("Bi", 208.98040),
    ("Po", 209.0),
    ("At", 210.0),
    ("Rn", 222.0),
    ("Fr", 223.0),
    ("Ra", 226.0),
    ("Ac", 227.0),
    ("Th", 232.0377),
    ("Pa", 231.03588),
    ("U", 238.02891),
    ("Np", 237.0),
    ("Pu", 244.0),
    ("Am", 243.0),
    ("Cm", 247.0),
    ("Bk", 247.0),
    ("Cf", 251.0),
    ("Es", 252.0),
    ("Fm", 257.0),
    ("Md", 258.0),
    ("No", 259.0),
    ("Lr", 266.0),
    ("Rf", 267.0),
    ("Db", 268.0),
    ("Sg", 269.0),
    ("Bh", 270.0),
    ("Hs", 277.0),
    ("Mt", 278.0),
    ("Ds", 281.0),
    ("Rg", 282.0),
    ("Cn", 285.0),
    ("Nh", 286.0),
    ("Fl", 289.0),
    ("Mc", 290.0),
    ("Lv", 293.0),
    ("Ts", 294.0),
    ("Og", 294.0),
];

/// 氢同位素 (符号, 原子量)
const HYDROGEN_ISOTOPES: [(&str, f64); 2] = [("D", 2.014101778), ("T", 3.01604928)];

/// 特征 Kα 波长 (Å)
const K_ALPHA_LINES: [(&str, f64); 20] = [
    ("Ti", 2.7497),
    ("V", 2.5048),
    ("Cr", 2.2910),
    ("Mn", 2.1031),
    ("Fe", 1.9373),
    ("Co", 1.7903),
    ("Ni", 1.6592),
    ("Cu", 1.5418),
    ("Zn", 1.4365),
    ("Ga", 1.3414),
    ("Zr", 0.7873),
    ("Mo", 0.7107),
    ("Rh", 0.6147),
    ("Pd", 0.5869),
    ("Ag", 0.5609),
    ("In", 0.5136),
    ("Sn", 0.4921),
    ("W", 0.2106),
    ("Pt", 0.1871),
    ("Au", 0.1853),
];

/// 元素表（按符号索引）
pub static ELEMENTS: LazyLock<HashMap<&'static str, Element>> = LazyLock::new(|| {
    let k_alpha: HashMap<&str, f64> = K_ALPHA_LINES.iter().copied().collect();
    let mut m = HashMap::new();

    for (i, &(symbol, mass)) in STANDARD_MASSES.iter().enumerate() {
        m.insert(
            symbol,
            Element {
                number: (i + 1) as u8,
                symbol,
                mass,
                natural_mass: mass,
                k_alpha: k_alpha.get(symbol).copied(),
            },
        );
    }

    let hydrogen_mass = STANDARD_MASSES[0].1;
    for &(symbol, mass) in HYDROGEN_ISOTOPES.iter() {
        m.insert(
            symbol,
            Element {
                number: 1,
                symbol,
                mass,
                natural_mass: hydrogen_mass,
                k_alpha: None,
            },
        );
    }

    m
});

/// 按符号查找元素（区分大小写）
pub fn lookup(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.get(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_symbol() {
        let fe = lookup("Fe").unwrap();
        assert_eq!(fe.number, 26);
        assert!((fe.mass - 55.845).abs() < 1e-9);
        assert_eq!(lookup("Og").unwrap().number, 118);
        assert!(lookup("fe").is_none());
        assert!(lookup("Xx").is_none());
    }

    #[test]
    fn test_k_alpha_lines() {
        assert_eq!(lookup("Cu").unwrap().k_alpha, Some(1.5418));
        assert_eq!(lookup("Mo").unwrap().k_alpha, Some(0.7107));
        assert_eq!(lookup("H").unwrap().k_alpha, None);
    }

    #[test]
    fn test_hydrogen_isotopes() {
        let d = lookup("D").unwrap();
        assert_eq!(d.number, 1);
        assert!((d.natural_mass - 1.008).abs() < 1e-12);
        assert!(d.mass > 2.0);
    }
}
