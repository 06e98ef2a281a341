//! # 物理数据与换算模块
//!
//! 为请求解析提供所需的最小物理知识：常数、中子色散关系、
//! X 射线能量换算、元素表和化学式。
//!
//! ## 子模块
//! - `elements`: 元素符号、原子量、Kα 波长
//! - `formula`: 化学式解析
//! - `neutron`: 中子能量/速度/波长
//! - `xray`: 光子能量/波长
//!
//! ## 依赖关系
//! - 被 `parsers/`, `pipeline/`, `engine/` 使用

pub mod elements;
pub mod formula;
pub mod neutron;
pub mod xray;

pub use formula::Formula;

/// 普朗克常数 (J·s)
pub const PLANCK: f64 = 6.626_070_15e-34;

/// 中子质量 (kg)
pub const NEUTRON_MASS: f64 = 1.674_927_498_04e-27;

/// 电子伏特 (J)
pub const ELECTRON_VOLT: f64 = 1.602_176_634e-19;

/// 光速 (m/s)
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// 阿伏伽德罗常数 (1/mol)
pub const AVOGADRO: f64 = 6.022_140_76e23;
