//! # 中子色散关系
//!
//! 中子能量、速度与波长之间的换算。
//!
//! ## 公式
//! - E = h² / (2 mₙ λ²)
//! - v = h / (mₙ λ)
//!
//! ## 依赖关系
//! - 被 `parsers/quantity.rs` 和 `engine/beam.rs` 使用
//! - 使用 `physics/mod.rs` 的物理常数

use super::{ELECTRON_VOLT, NEUTRON_MASS, PLANCK};

/// E·λ² 常数 (meV·Å²)
pub const ENERGY_FACTOR: f64 =
    PLANCK * PLANCK / (2.0 * NEUTRON_MASS) / (ELECTRON_VOLT * 1e-3) * 1e20;

/// v·λ 常数 (m/s·Å)
pub const VELOCITY_FACTOR: f64 = PLANCK / NEUTRON_MASS * 1e10;

/// 能量 (meV) → 波长 (Å)
pub fn wavelength_from_energy(energy: f64) -> f64 {
    (ENERGY_FACTOR / energy).sqrt()
}

/// 速度 (m/s) → 波长 (Å)
pub fn wavelength_from_velocity(velocity: f64) -> f64 {
    VELOCITY_FACTOR / velocity
}

/// 波长 (Å) → 能量 (meV)
pub fn energy(wavelength: f64) -> f64 {
    ENERGY_FACTOR / (wavelength * wavelength)
}

/// 波长 (Å) → 速度 (m/s)
pub fn velocity(wavelength: f64) -> f64 {
    VELOCITY_FACTOR / wavelength
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors() {
        assert!((ENERGY_FACTOR - 81.8042).abs() < 1e-3);
        assert!((VELOCITY_FACTOR - 3956.034).abs() < 1e-2);
    }

    #[test]
    fn test_thermal_neutron() {
        // 25.3 meV 热中子约 1.798 Å, 2200 m/s
        let wl = wavelength_from_energy(25.3);
        assert!((wl - 1.798).abs() < 1e-3);
        assert!((velocity(wl) - 2200.0).abs() < 2.0);
        assert!((energy(wl) - 25.3).abs() < 1e-9);
        assert!((wavelength_from_velocity(velocity(wl)) - wl).abs() < 1e-12);
    }
}
