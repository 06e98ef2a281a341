//! # parse 命令实现
//!
//! 对每个输入值单独运行选定的解析器，并以表格显示解析结果。
//! 解析失败的值在表格中显示错误信息，命令最后以错误退出。
//!
//! ## 依赖关系
//! - 使用 `cli/parse.rs` 定义的参数
//! - 使用 `parsers/` 和 `physics/formula.rs`
//! - 使用 `tabled` 输出表格

use crate::cli::parse::{ParseArgs, ParseKind};
use crate::config::ParserConfig;
use crate::error::{NactError, Result};
use crate::models::DensityKind;
use crate::parsers;
use crate::physics::{neutron, xray, Formula};
use crate::utils::output;

use chrono::{DateTime, SecondsFormat, Utc};
use tabled::{Table, Tabled};

/// 解析结果表格行
#[derive(Debug, Clone, Tabled)]
struct ParsedRow {
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

/// 执行 parse 命令
pub fn execute(args: ParseArgs, config: &ParserConfig, now: DateTime<Utc>) -> Result<()> {
    let mut failed = 0;
    let rows: Vec<ParsedRow> = args
        .values
        .iter()
        .map(|text| match parse_value(args.kind, text, config, now) {
            Ok((value, unit)) => ParsedRow {
                input: text.clone(),
                value,
                unit,
            },
            Err(e) => {
                failed += 1;
                ParsedRow {
                    input: text.clone(),
                    value: format!("error: {}", e),
                    unit: String::new(),
                }
            }
        })
        .collect();

    output::print_header(&format!("Parsed {} values", args.kind));
    println!("{}", Table::new(&rows));

    if failed > 0 {
        return Err(NactError::Other(format!(
            "{} of {} values failed to parse",
            failed,
            rows.len()
        )));
    }
    Ok(())
}

/// 运行解析器，返回 (数值, 单位) 的显示文本
fn parse_value(
    kind: ParseKind,
    text: &str,
    config: &ParserConfig,
    now: DateTime<Utc>,
) -> Result<(String, String)> {
    let parsed = match kind {
        ParseKind::Timestamp => {
            let instant = parsers::parse_timestamp(text, config.default_zone)?;
            (
                instant.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                "UTC".to_string(),
            )
        }
        ParseKind::Rest => {
            let hours = parsers::resolve_elapsed_hours(text, now, config)?;
            (format!("{:.6}", hours), "h".to_string())
        }
        ParseKind::Exposure => (format!("{:.6}", parsers::parse_hours(text)?), "h".to_string()),
        ParseKind::Mass => (format!("{}", parsers::parse_mass(text)?), "g".to_string()),
        ParseKind::Density => {
            let spec = parsers::parse_density(text)?;
            match spec.kind {
                DensityKind::Default => ("default".to_string(), String::new()),
                DensityKind::Volume => (format!("{:e}", spec.value), "cm³/formula unit".to_string()),
                DensityKind::Isotope | DensityKind::Natural => {
                    (format!("{}", spec.value), format!("g/cm³ ({})", spec.kind))
                }
            }
        }
        ParseKind::Wavelength => {
            let wavelength = parsers::parse_wavelength(text)?;
            (
                format!(
                    "{:.6} ({:.4} meV, {:.1} m/s)",
                    wavelength,
                    neutron::energy(wavelength),
                    neutron::velocity(wavelength)
                ),
                "Å".to_string(),
            )
        }
        ParseKind::Xray => {
            let wavelength = parsers::parse_xray_source(text)?;
            (
                format!("{:.6} ({:.4} keV)", wavelength, xray::energy(wavelength)),
                "Å".to_string(),
            )
        }
        ParseKind::Formula => {
            let formula = Formula::parse(text)?;
            let value = match formula.density {
                Some(density) => format!(
                    "{} {:.4} @ {} g/cm³",
                    formula,
                    formula.molecular_mass_u(),
                    density
                ),
                None => format!("{} {:.4}", formula, formula.molecular_mass_u()),
            };
            (value, "u".to_string())
        }
    };
    Ok(parsed)
}
