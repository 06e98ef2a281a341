//! # 化学式解析
//!
//! 解析样品化学式，提供分子量与密度信息。
//!
//! ## 文法
//! ```text
//! formula := part+ ['@' density ['n' | 'i']]
//! part    := (symbol | '(' part+ ')') [count]
//! symbol  := [A-Z][a-z]?        (须为已知元素，D/T 为氢同位素)
//! count   := [0-9.]+
//! ```
//! `@1.11` 给出样品密度 (g/cm³)；`@1.11n` 给出天然丰度下的密度。
//!
//! ## 依赖关系
//! - 被 `pipeline/validate.rs` 和 `engine/` 使用
//! - 使用 `physics/elements.rs`

use crate::error::{NactError, Result};
use crate::physics::elements::{self, Element};
use crate::physics::AVOGADRO;

use std::fmt;

/// 化学式组成部分
#[derive(Debug, Clone, PartialEq)]
enum Part {
    Atom(&'static Element, f64),
    Group(Vec<Part>, f64),
}

/// 化学式
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    parts: Vec<Part>,
    /// 样品密度 (g/cm³)
    pub density: Option<f64>,
}

impl Formula {
    /// 解析化学式
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(NactError::Delegated("sample formula is empty".to_string()));
        }

        let (body, density_text) = match text.split_once('@') {
            Some((body, density)) => (body, Some(density.trim())),
            None => (text, None),
        };

        let mut cursor = Cursor::new(body);
        let parts = cursor.sequence()?;
        if let Some(c) = cursor.peek() {
            return Err(cursor.unexpected(c));
        }
        if parts.is_empty() {
            return Err(NactError::Delegated(format!(
                "no elements in formula {:?}",
                text
            )));
        }

        let mut formula = Formula {
            parts,
            density: None,
        };
        if let Some(density_text) = density_text {
            formula.density = Some(formula.parse_density(density_text)?);
        }
        Ok(formula)
    }

    /// 解析 `@` 之后的密度
    fn parse_density(&self, text: &str) -> Result<f64> {
        let (value, natural) = match text.strip_suffix('n') {
            Some(v) => (v, true),
            None => (text.strip_suffix('i').unwrap_or(text), false),
        };
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| NactError::Delegated(format!("invalid density {:?} in formula", text)))?;

        if natural {
            Ok(self.density_from_natural(value))
        } else {
            Ok(value)
        }
    }

    /// 原子及其总数（合并重复元素，按首次出现排序）
    pub fn atoms(&self) -> Vec<(&'static Element, f64)> {
        let mut atoms: Vec<(&'static Element, f64)> = Vec::new();
        collect_atoms(&self.parts, 1.0, &mut atoms);
        atoms
    }

    /// 分子量 (u)
    pub fn molecular_mass_u(&self) -> f64 {
        self.atoms().iter().map(|(el, n)| el.mass * n).sum()
    }

    /// 天然丰度下的分子量 (u)
    pub fn natural_mass_u(&self) -> f64 {
        self.atoms().iter().map(|(el, n)| el.natural_mass * n).sum()
    }

    /// 每个分子式单元的质量 (g)
    pub fn molecular_mass(&self) -> f64 {
        self.molecular_mass_u() / AVOGADRO
    }

    /// 天然丰度密度换算：ρ_natural = ρ · M_natural / M
    pub fn natural_density(&self, density: f64) -> f64 {
        density * self.natural_mass_u() / self.molecular_mass_u()
    }

    /// 由天然丰度密度求同位素密度：ρ = ρ_natural · M / M_natural
    pub fn density_from_natural(&self, natural: f64) -> f64 {
        natural * self.molecular_mass_u() / self.natural_mass_u()
    }

    /// LaTeX 下标形式，如 `H$_{2}$O`
    pub fn to_latex(&self) -> String {
        let mut out = String::new();
        write_parts(&mut out, &self.parts, true);
        out
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_parts(&mut out, &self.parts, false);
        f.write_str(&out)
    }
}

fn collect_atoms(parts: &[Part], scale: f64, atoms: &mut Vec<(&'static Element, f64)>) {
    for part in parts {
        match part {
            Part::Atom(el, n) => match atoms.iter_mut().find(|(e, _)| e.symbol == el.symbol) {
                Some((_, total)) => *total += n * scale,
                None => atoms.push((*el, n * scale)),
            },
            Part::Group(inner, n) => collect_atoms(inner, n * scale, atoms),
        }
    }
}

fn write_parts(out: &mut String, parts: &[Part], latex: bool) {
    for part in parts {
        let count = match part {
            Part::Atom(el, n) => {
                out.push_str(el.symbol);
                *n
            }
            Part::Group(inner, n) => {
                out.push('(');
                write_parts(out, inner, latex);
                out.push(')');
                *n
            }
        };
        if count != 1.0 {
            if latex {
                out.push_str(&format!("$_{{{}}}$", count));
            } else {
                out.push_str(&count.to_string());
            }
        }
    }
}

/// 逐字符扫描器
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self, c: char) -> NactError {
        NactError::Delegated(format!(
            "unexpected {:?} at position {} in formula {:?}",
            c, self.pos, self.src
        ))
    }

    /// 解析一串组成部分，遇到 `)` 或结尾时停止
    fn sequence(&mut self) -> Result<Vec<Part>> {
        let mut parts = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('(') => {
                    self.bump();
                    let inner = self.sequence()?;
                    if self.bump() != Some(')') {
                        return Err(NactError::Delegated(format!(
                            "unbalanced parentheses in formula {:?}",
                            self.src
                        )));
                    }
                    if inner.is_empty() {
                        return Err(NactError::Delegated(format!(
                            "empty group in formula {:?}",
                            self.src
                        )));
                    }
                    let count = self.count()?;
                    parts.push(Part::Group(inner, count));
                }
                Some(c) if c.is_ascii_uppercase() => {
                    let element = self.symbol()?;
                    let count = self.count()?;
                    parts.push(Part::Atom(element, count));
                }
                Some(')') | None => return Ok(parts),
                Some(c) => return Err(self.unexpected(c)),
            }
        }
    }

    fn symbol(&mut self) -> Result<&'static Element> {
        let start = self.pos;
        self.bump();
        if self.peek().is_some_and(|c| c.is_ascii_lowercase()) {
            self.bump();
        }
        let symbol = &self.src[start..self.pos];
        elements::lookup(symbol)
            .ok_or_else(|| NactError::Delegated(format!("unknown element {:?}", symbol)))
    }

    fn count(&mut self) -> Result<f64> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.bump();
        }
        let digits = &self.src[start..self.pos];
        if digits.is_empty() {
            return Ok(1.0);
        }
        digits
            .parse()
            .map_err(|_| NactError::Delegated(format!("invalid count {:?} in formula", digits)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water() {
        let f = Formula::parse("H2O").unwrap();
        assert_eq!(f.to_string(), "H2O");
        assert!((f.molecular_mass_u() - 18.015).abs() < 1e-9);
        assert!(f.density.is_none());
    }

    #[test]
    fn test_groups_and_latex() {
        let f = Formula::parse("Ca(OH)2").unwrap();
        assert_eq!(f.to_string(), "Ca(OH)2");
        assert_eq!(f.to_latex(), "Ca(OH)$_{2}$");

        let atoms = f.atoms();
        let symbols: Vec<&str> = atoms.iter().map(|(el, _)| el.symbol).collect();
        assert_eq!(symbols, ["Ca", "O", "H"]);
        assert_eq!(atoms[2].1, 2.0);
    }

    #[test]
    fn test_fractional_counts_and_repeats() {
        let f = Formula::parse("Fe0.5 Ni0.5 Fe").unwrap();
        let atoms = f.atoms();
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].1, 1.5);
        assert_eq!(f.to_string(), "Fe0.5Ni0.5Fe");
    }

    #[test]
    fn test_density_suffix() {
        let f = Formula::parse("D2O@1.11").unwrap();
        assert_eq!(f.density, Some(1.11));

        // 天然丰度密度换算为同位素密度
        let f = Formula::parse("D2O@1n").unwrap();
        let expected = f.molecular_mass_u() / f.natural_mass_u();
        assert!((f.density.unwrap() - expected).abs() < 1e-12);
        assert!(f.density.unwrap() > 1.1);
    }

    #[test]
    fn test_rejections() {
        for bad in ["", "Xx", "h2o", "H2O)", "(H2O", "()", "H1.2.3", "H2O@abc", "NaCl!"] {
            let err = Formula::parse(bad).unwrap_err();
            assert!(matches!(err, NactError::Delegated(_)), "{:?}", bad);
        }
    }
}
