//! # 晶格常数模型
//!
//! 晶格常数键集合、解析中间态以及解析后的六个晶格参数。
//!
//! ## 晶系简写
//! ```text
//! a:4                  立方      a=b=c, α=β=γ=90
//! a:4 c:6              四方      a=b
//! a:3 c/a:1.6 gamma:120 六方
//! a:5 alpha:60         菱方      α=β=γ
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/density.rs` 使用
//! - 无外部模块依赖

use crate::error::{NactError, Result};

use serde::Serialize;
use std::fmt;

/// 埃³ → 厘米³
pub const ANG3_TO_CM3: f64 = 1e-24;

/// 晶格常数键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeKey {
    A,
    B,
    C,
    BOverA,
    COverA,
    Alpha,
    Beta,
    Gamma,
}

impl LatticeKey {
    pub const ALL: [LatticeKey; 8] = [
        LatticeKey::A,
        LatticeKey::B,
        LatticeKey::C,
        LatticeKey::BOverA,
        LatticeKey::COverA,
        LatticeKey::Alpha,
        LatticeKey::Beta,
        LatticeKey::Gamma,
    ];

    /// 从输入记号识别键（不区分大小写，接受希腊字母）
    pub fn from_token(token: &str) -> Option<Self> {
        let lower = token.to_lowercase();
        let key = match lower.as_str() {
            "a" => LatticeKey::A,
            "b" => LatticeKey::B,
            "c" => LatticeKey::C,
            "b/a" => LatticeKey::BOverA,
            "c/a" => LatticeKey::COverA,
            "alpha" | "α" => LatticeKey::Alpha,
            "beta" | "β" => LatticeKey::Beta,
            "gamma" | "γ" => LatticeKey::Gamma,
            _ => return None,
        };
        Some(key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LatticeKey::A => "a",
            LatticeKey::B => "b",
            LatticeKey::C => "c",
            LatticeKey::BOverA => "b/a",
            LatticeKey::COverA => "c/a",
            LatticeKey::Alpha => "alpha",
            LatticeKey::Beta => "beta",
            LatticeKey::Gamma => "gamma",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LatticeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 用户给出的晶格常数（比值键尚未展开）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatticeEntries {
    values: [Option<f64>; 8],
}

impl LatticeEntries {
    /// 设置键值，重复的键以后者为准
    pub fn set(&mut self, key: LatticeKey, value: f64) {
        self.values[key.index()] = Some(value);
    }

    pub fn get(&self, key: LatticeKey) -> Option<f64> {
        self.values[key.index()]
    }

    /// 展开比值键并补全缺省值
    ///
    /// - `b/a`, `c/a` 需要 `a`，覆盖直接给出的 `b`, `c`
    /// - 给出 `alpha` 时缺省的 `beta`, `gamma` 取 `alpha`
    /// - 缺省的 `b`, `c` 取 `a`，缺省的角度取 90°
    pub fn resolve(&self) -> Result<LatticeParameters> {
        let a = self.get(LatticeKey::A);
        let b = self.scaled(LatticeKey::BOverA, LatticeKey::B, a)?;
        let c = self.scaled(LatticeKey::COverA, LatticeKey::C, a)?;
        let a = a.ok_or_else(|| {
            NactError::UnknownKey("Lattice constant a is required".to_string())
        })?;

        let alpha = self.get(LatticeKey::Alpha);
        let beta = self.get(LatticeKey::Beta).or(alpha);
        let gamma = self.get(LatticeKey::Gamma).or(alpha);

        Ok(LatticeParameters {
            a,
            b: b.unwrap_or(a),
            c: c.unwrap_or(a),
            alpha: alpha.unwrap_or(90.0),
            beta: beta.unwrap_or(90.0),
            gamma: gamma.unwrap_or(90.0),
        })
    }

    fn scaled(
        &self,
        ratio: LatticeKey,
        direct: LatticeKey,
        a: Option<f64>,
    ) -> Result<Option<f64>> {
        match (self.get(ratio), a) {
            (Some(r), Some(a)) => Ok(Some(r * a)),
            (Some(_), None) => Err(NactError::UnknownKey(format!(
                "Lattice constant {} requires a value for a",
                ratio
            ))),
            (None, _) => Ok(self.get(direct)),
        }
    }
}

/// 晶格参数：边长 (Å)，角度 (度)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatticeParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl LatticeParameters {
    /// 晶胞体积 (Å³)，三斜晶系通式
    ///
    /// V = abc·sqrt(1 − cos²α − cos²β − cos²γ + 2·cosα·cosβ·cosγ)
    ///
    /// 角度无法构成晶胞时返回 NaN。
    pub fn volume(&self) -> f64 {
        let cos_alpha = self.alpha.to_radians().cos();
        let cos_beta = self.beta.to_radians().cos();
        let cos_gamma = self.gamma.to_radians().cos();

        let radicand = 1.0 - cos_alpha * cos_alpha - cos_beta * cos_beta - cos_gamma * cos_gamma
            + 2.0 * cos_alpha * cos_beta * cos_gamma;

        self.a * self.b * self.c * radicand.sqrt()
    }
}
