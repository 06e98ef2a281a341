//! # parse 子命令 CLI 定义
//!
//! 单独运行某个字段解析器，便于检查自由文本参数的解释结果。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/parse.rs`

use clap::{Args, ValueEnum};

/// 可单独运行的解析器
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ParseKind {
    /// Relaxed ISO 8601 timestamp
    Timestamp,
    /// Rest time: duration (e.g. 2d) or beam-off timestamp
    Rest,
    /// Exposure duration (e.g. 90m)
    Exposure,
    /// Sample mass (e.g. 5mg)
    Mass,
    /// Density, unit-cell volume or lattice constants
    Density,
    /// Neutron wavelength, energy (meV) or velocity (m/s)
    Wavelength,
    /// X-ray source: anode element, energy (keV) or wavelength
    Xray,
    /// Chemical formula with optional @density
    Formula,
}

impl std::fmt::Display for ParseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseKind::Timestamp => write!(f, "timestamp"),
            ParseKind::Rest => write!(f, "rest"),
            ParseKind::Exposure => write!(f, "exposure"),
            ParseKind::Mass => write!(f, "mass"),
            ParseKind::Density => write!(f, "density"),
            ParseKind::Wavelength => write!(f, "wavelength"),
            ParseKind::Xray => write!(f, "xray"),
            ParseKind::Formula => write!(f, "formula"),
        }
    }
}

/// parse 子命令参数
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Parser to run
    #[arg(value_enum)]
    pub kind: ParseKind,

    /// Values to parse (each is parsed independently)
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub values: Vec<String>,
}
