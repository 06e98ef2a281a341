//! # X 射线光子能量与波长换算
//!
//! λ = h c / E
//!
//! ## 依赖关系
//! - 被 `parsers/quantity.rs` 和 `engine/beam.rs` 使用

use super::{ELECTRON_VOLT, PLANCK, SPEED_OF_LIGHT};

/// E·λ 常数 (keV·Å)
pub const ENERGY_WAVELENGTH_FACTOR: f64 = PLANCK * SPEED_OF_LIGHT / (ELECTRON_VOLT * 1e3) * 1e10;

/// 能量 (keV) → 波长 (Å)
pub fn wavelength(energy: f64) -> f64 {
    ENERGY_WAVELENGTH_FACTOR / energy
}

/// 波长 (Å) → 能量 (keV)
pub fn energy(wavelength: f64) -> f64 {
    ENERGY_WAVELENGTH_FACTOR / wavelength
}
