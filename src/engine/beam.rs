//! # 束流运动学引擎
//!
//! 内置的计算引擎：只报告束流参数（中子能量、速度，光子能量）和样品数密度。
//! 本构建不附带活化截面与散射长度数据，活化计算以模式错误的形式报告。
//!
//! ## 依赖关系
//! - 被 `commands/calc.rs` 使用
//! - 使用 `physics/neutron.rs`, `physics/xray.rs`

use crate::engine::{Engine, Sample};
use crate::error::{NactError, Result};
use crate::models::ValidatedRequest;
use crate::physics::{neutron, xray};

use serde_json::{json, Value};

/// 束流运动学引擎
#[derive(Debug, Clone, Copy, Default)]
pub struct BeamEngine;

impl BeamEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for BeamEngine {
    fn activation(&self, _request: &ValidatedRequest, _sample: &Sample) -> Result<Value> {
        Err(NactError::Delegated(
            "activation tables are not available in this build".to_string(),
        ))
    }

    fn scattering(&self, request: &ValidatedRequest, sample: &Sample) -> Result<Value> {
        let wavelength = request.wavelength;
        if !(wavelength > 0.0) {
            return Err(NactError::Range(format!(
                "neutron wavelength must be positive, got {}",
                wavelength
            )));
        }

        Ok(json!({
            "neutron": {
                "wavelength": wavelength,
                "energy": neutron::energy(wavelength),
                "velocity": neutron::velocity(wavelength),
            },
            "formula_units_per_cm3": sample.density / request.chem.molecular_mass(),
        }))
    }

    fn xray_scattering(&self, request: &ValidatedRequest, _sample: &Sample) -> Result<Value> {
        let wavelength = request.xray_wavelength;
        if !(wavelength > 0.0) {
            return Err(NactError::Range(format!(
                "X-ray wavelength must be positive, got {}",
                wavelength
            )));
        }

        Ok(json!({
            "xray": {
                "wavelength": wavelength,
                "energy": xray::energy(wavelength),
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::engine::calculate;
    use crate::models::RawRequest;
    use crate::pipeline::Validator;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn run(body: Value) -> Value {
        let config = ParserConfig::default();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let raw = RawRequest::from_json(body).unwrap();
        let request = Validator::new(&config, now).validate(&raw).unwrap();
        serde_json::to_value(calculate(&BeamEngine::new(), &request)).unwrap()
    }

    #[test]
    fn test_beam_kinematics() {
        let value = run(json!({"sample": "Si", "wavelength": "25meV", "xray": "8.04keV"}));

        let energy = value["scattering"]["neutron"]["energy"].as_f64().unwrap();
        assert!((energy - 25.0).abs() < 1e-9);

        let photon = value["xray_scattering"]["xray"]["energy"].as_f64().unwrap();
        assert!((photon - 8.04).abs() < 1e-9);
    }

    #[test]
    fn test_activation_reported_as_mode_error() {
        let value = run(json!({"sample": "Co"}));
        assert!(value["activation"]["error"].is_string());
        assert!(value["scattering"]["neutron"].is_object());
    }

    #[test]
    fn test_zero_wavelength_is_mode_error() {
        let value = run(json!({"sample": "Co", "wavelength": "0", "calculate": "scattering"}));
        assert!(value["scattering"]["error"].is_string());
        assert!(value["xray_scattering"]["xray"].is_object());
        assert_eq!(value["sample"]["density"], json!(1.0));
    }
}
