//! # 字段校验
//!
//! | 字段 | 缺省值 | 解析器 |
//! |---|---|---|
//! | calculate | all | `CalculationMode` |
//! | sample | (必填) | `Formula::parse` |
//! | flux | 100000 | 数值 |
//! | fast | 0 | 数值 |
//! | Cd | 0 | 数值 |
//! | exposure | 1 | `parse_hours` |
//! | mass | 0 | `parse_mass` |
//! | density | 0 | `parse_density` |
//! | rest | [] → [0, 1, 24, 360] | `resolve_elapsed_hours` |
//! | decay | 0.001 | 数值 |
//! | thickness | 1 | 数值 |
//! | wavelength | 1 | `parse_wavelength` |
//! | xray | Cu Ka | `parse_xray_source` |
//! | abundance | IAEA | `AbundanceTable` |
//!
//! ## 依赖关系
//! - 被 `engine/` 和 `commands/` 使用
//! - 使用 `parsers/`, `models/request.rs`, `physics/formula.rs`

use crate::config::ParserConfig;
use crate::error::{NactError, Result};
use crate::models::{
    AbundanceTable, CalculationMode, FieldErrors, RawRequest, RawValue, ValidatedRequest,
};
use crate::parsers::{
    parse_density, parse_hours, parse_mass, parse_number, parse_wavelength, parse_xray_source,
    resolve_elapsed_hours,
};
use crate::physics::Formula;

use chrono::{DateTime, Utc};

/// 未给出停束时间时使用的时间点 (h)
pub const DEFAULT_REST_TIMES: [f64; 4] = [0.0, 1.0, 24.0, 360.0];

/// 请求校验器
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    config: &'a ParserConfig,
    now: DateTime<Utc>,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a ParserConfig, now: DateTime<Utc>) -> Self {
        Self { config, now }
    }

    /// 校验请求
    ///
    /// 每个字段独立解析；任一字段失败时返回完整的字段错误表。
    pub fn validate(&self, raw: &RawRequest) -> std::result::Result<ValidatedRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        let calculate = errors.capture(
            "calculate",
            single(raw, "calculate", "all").and_then(str::parse::<CalculationMode>),
        );
        let sample = errors.capture(
            "sample",
            required(raw, "sample")
                .and_then(|text| Formula::parse(text).map(|chem| (text.to_string(), chem))),
        );
        let fluence = errors.capture("flux", single(raw, "flux", "100000").and_then(parse_number));
        let fast_ratio = errors.capture("fast", single(raw, "fast", "0").and_then(parse_number));
        let cd_ratio = errors.capture("Cd", single(raw, "Cd", "0").and_then(parse_number));
        let exposure = errors.capture("exposure", single(raw, "exposure", "1").and_then(parse_hours));
        let mass = errors.capture("mass", single(raw, "mass", "0").and_then(parse_mass));
        let density = errors.capture("density", single(raw, "density", "0").and_then(parse_density));
        let rest_times = errors.capture("rest", self.rest_times(raw));
        let decay_level =
            errors.capture("decay", single(raw, "decay", "0.001").and_then(parse_number));
        let thickness =
            errors.capture("thickness", single(raw, "thickness", "1").and_then(parse_number));
        let wavelength = errors.capture(
            "wavelength",
            single(raw, "wavelength", "1").and_then(parse_wavelength),
        );
        let xray_wavelength = errors.capture(
            "xray",
            single(raw, "xray", "Cu Ka").and_then(parse_xray_source),
        );
        let abundance = errors.capture(
            "abundance",
            single(raw, "abundance", "IAEA").and_then(str::parse::<AbundanceTable>),
        );

        let (
            Some(calculate),
            Some((sample, chem)),
            Some(fluence),
            Some(fast_ratio),
            Some(cd_ratio),
            Some(exposure),
            Some(mass),
            Some(density),
            Some(rest_times),
            Some(decay_level),
            Some(thickness),
            Some(wavelength),
            Some(xray_wavelength),
            Some(abundance),
        ) = (
            calculate,
            sample,
            fluence,
            fast_ratio,
            cd_ratio,
            exposure,
            mass,
            density,
            rest_times,
            decay_level,
            thickness,
            wavelength,
            xray_wavelength,
            abundance,
        )
        else {
            return Err(errors);
        };

        Ok(ValidatedRequest {
            calculate,
            sample,
            chem,
            fluence,
            fast_ratio,
            cd_ratio,
            exposure,
            mass,
            density,
            rest_times,
            decay_level,
            thickness,
            wavelength,
            xray_wavelength,
            abundance,
        })
    }

    /// 解析全部停束时间，空列表替换为缺省时间点
    fn rest_times(&self, raw: &RawRequest) -> Result<Vec<f64>> {
        let hours = many(raw, "rest")
            .iter()
            .map(|text| resolve_elapsed_hours(text, self.now, self.config))
            .collect::<Result<Vec<f64>>>()?;
        if hours.is_empty() {
            Ok(DEFAULT_REST_TIMES.to_vec())
        } else {
            Ok(hours)
        }
    }
}

/// 单值字段，缺省时返回 `default`
fn single<'r>(raw: &'r RawRequest, field: &str, default: &'r str) -> Result<&'r str> {
    match raw.get(field) {
        None => Ok(default),
        Some(RawValue::Single(text)) => Ok(text),
        Some(RawValue::Many(_)) => Err(NactError::Format(format!(
            "expected a single value for {}, got a list",
            field
        ))),
    }
}

fn required<'r>(raw: &'r RawRequest, field: &str) -> Result<&'r str> {
    match raw.get(field) {
        None => Err(NactError::Format(format!("{} is required", field))),
        Some(_) => single(raw, field, ""),
    }
}

/// 可重复字段，单值视为只有一项的列表
fn many<'r>(raw: &'r RawRequest, field: &str) -> Vec<&'r str> {
    match raw.get(field) {
        None => Vec::new(),
        Some(RawValue::Single(text)) => vec![text.as_str()],
        Some(RawValue::Many(items)) => items.iter().map(String::as_str).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DensityKind, DensitySpec};
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn validate(body: serde_json::Value) -> std::result::Result<ValidatedRequest, FieldErrors> {
        let config = ParserConfig::default();
        let raw = RawRequest::from_json(body).unwrap();
        Validator::new(&config, now()).validate(&raw)
    }

    #[test]
    fn test_defaults() {
        let req = validate(json!({"sample": "Co"})).unwrap();
        assert_eq!(req.calculate, CalculationMode::All);
        assert_eq!(req.sample, "Co");
        assert_eq!(req.fluence, 100000.0);
        assert_eq!(req.fast_ratio, 0.0);
        assert_eq!(req.cd_ratio, 0.0);
        assert_eq!(req.exposure, 1.0);
        assert_eq!(req.mass, 0.0);
        assert_eq!(req.density, DensitySpec::DEFAULT);
        assert_eq!(req.rest_times, DEFAULT_REST_TIMES.to_vec());
        assert_eq!(req.decay_level, 0.001);
        assert_eq!(req.thickness, 1.0);
        assert_eq!(req.wavelength, 1.0);
        assert_eq!(req.xray_wavelength, 1.5418);
        assert_eq!(req.abundance, AbundanceTable::Iaea1987);
    }

    #[test]
    fn test_full_request() {
        let req = validate(json!({
            "calculate": "activation",
            "sample": "Au@19.3",
            "flux": "1e8",
            "fast": 0.1,
            "Cd": "40",
            "exposure": "2d",
            "mass": "5mg",
            "density": "a:4.08",
            "rest": ["30m", "2024-06-01T10:00:00Z"],
            "decay": "1e-4",
            "thickness": "0.1",
            "wavelength": "1.8Ang",
            "xray": "Mo Ka",
            "abundance": "IUPAC",
        }))
        .unwrap();

        assert_eq!(req.calculate, CalculationMode::Activation);
        assert_eq!(req.chem.density, Some(19.3));
        assert_eq!(req.fluence, 1e8);
        assert_eq!(req.fast_ratio, 0.1);
        assert_eq!(req.exposure, 48.0);
        assert!((req.mass - 0.005).abs() < 1e-12);
        assert_eq!(req.density.kind, DensityKind::Volume);
        assert_eq!(req.rest_times, vec![0.5, 2.0]);
        assert_eq!(req.thickness, 0.1);
        assert_eq!(req.wavelength, 1.8);
        assert_eq!(req.xray_wavelength, 0.7107);
        assert_eq!(req.abundance, AbundanceTable::Iupac);
    }

    #[test]
    fn test_every_failure_reported() {
        let errors = validate(json!({
            "sample": "H2O",
            "flux": "lots",
            "rest": ["1h", "2099-01-01"],
        }))
        .unwrap_err();

        assert_eq!(errors.len(), 2);
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, ["flux", "rest"]);
        assert_eq!(errors.get("rest"), Some("time off beam is in the future"));
    }

    #[test]
    fn test_list_for_single_field() {
        let errors = validate(json!({"sample": "H2O", "mass": ["1g", "2g"]})).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("mass").is_some());
    }

    #[test]
    fn test_unknown_mode_and_abundance() {
        let errors = validate(json!({
            "sample": "H2O",
            "calculate": "everything",
            "abundance": "CODATA",
        }))
        .unwrap_err();
        assert_eq!(
            errors.get("calculate"),
            Some("calculate should be one of 'scattering', 'activation' or 'all'")
        );
        assert_eq!(errors.get("abundance"), Some("abundance should be IUPAC or IAEA"));
    }

    #[test]
    fn test_sample_errors() {
        let errors = validate(json!({})).unwrap_err();
        assert_eq!(errors.get("sample"), Some("sample is required"));

        let errors = validate(json!({"sample": ""})).unwrap_err();
        assert!(errors.get("sample").is_some());

        let errors = validate(json!({"sample": "Xx2"})).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_single_rest_value_and_empty_rest() {
        let req = validate(json!({"sample": "Co", "rest": "1w"})).unwrap();
        assert_eq!(req.rest_times, vec![168.0]);

        let req = validate(json!({"sample": "Co", "rest": []})).unwrap();
        assert_eq!(req.rest_times, DEFAULT_REST_TIMES.to_vec());
    }
}
