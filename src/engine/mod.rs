//! # 计算引擎模块
//!
//! 把校验后的请求交给物理计算引擎，并组装响应信封。
//!
//! ## 流程
//! ```text
//! JSON / 表单 → RawRequest → Validator → ValidatedRequest → Sample::resolve
//!                                 │                              │
//!                                 └→ Response::Invalid           └→ Engine → Response::Success
//! ```
//! 每个计算模式独立执行，一个模式失败只影响该模式的结果。
//!
//! ## 依赖关系
//! - 被 `commands/calc.rs` 使用
//! - 使用 `pipeline/`, `models/`, `physics/`
//! - 子模块: response, beam

pub mod beam;
pub mod response;

pub use beam::BeamEngine;
pub use response::{ModeResult, Response, SampleSummary, Success, VERSION};

use crate::error::Result;
use crate::models::{DensityKind, RawRequest, ValidatedRequest};
use crate::pipeline::Validator;

use serde_json::Value;

/// 物理计算引擎
pub trait Engine: Send + Sync {
    /// 中子活化
    fn activation(&self, request: &ValidatedRequest, sample: &Sample) -> Result<Value>;

    /// 中子散射
    fn scattering(&self, request: &ValidatedRequest, sample: &Sample) -> Result<Value>;

    /// X 射线散射
    fn xray_scattering(&self, request: &ValidatedRequest, sample: &Sample) -> Result<Value>;
}

/// 补全默认值后的样品参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// 同位素密度 (g/cm³)
    pub density: f64,
    /// 天然丰度密度 (g/cm³)
    pub natural_density: f64,
    /// 质量 (g)
    pub mass: f64,
}

impl Sample {
    /// 由密度描述和化学式确定样品密度与质量
    pub fn resolve(request: &ValidatedRequest) -> Self {
        let chem = &request.chem;
        let spec = request.density;

        let density = if spec.kind == DensityKind::Default || spec.value == 0.0 {
            chem.density.unwrap_or(1.0)
        } else {
            match spec.kind {
                DensityKind::Volume => chem.molecular_mass() / spec.value,
                DensityKind::Natural => chem.density_from_natural(spec.value),
                DensityKind::Isotope | DensityKind::Default => spec.value,
            }
        };

        let mass = if request.mass == 0.0 { 1.0 } else { request.mass };

        Self {
            density,
            natural_density: chem.natural_density(density),
            mass,
        }
    }
}

/// 对校验后的请求执行计算
pub fn calculate(engine: &dyn Engine, request: &ValidatedRequest) -> Response {
    let sample = Sample::resolve(request);
    let mode = request.calculate;

    let activation = mode
        .includes_activation()
        .then(|| ModeResult::from_result(engine.activation(request, &sample)));
    let (scattering, xray_scattering) = if mode.includes_scattering() {
        (
            Some(ModeResult::from_result(engine.scattering(request, &sample))),
            Some(ModeResult::from_result(
                engine.xray_scattering(request, &sample),
            )),
        )
    } else {
        (None, None)
    };

    Response::Success(Success {
        success: true,
        version: VERSION,
        sample: SampleSummary {
            name: request.sample.clone(),
            formula: request.chem.to_string(),
            formula_latex: request.chem.to_latex(),
            mass: sample.mass,
            density: sample.density,
            thickness: request.thickness,
            natural_density: sample.natural_density,
        },
        activation,
        scattering,
        xray_scattering,
    })
}

/// 校验并计算，校验失败时返回无效请求响应
pub fn api_call(engine: &dyn Engine, validator: &Validator, raw: &RawRequest) -> Response {
    match validator.validate(raw) {
        Ok(request) => calculate(engine, &request),
        Err(errors) => Response::invalid(errors),
    }
}

/// 处理 JSON 请求正文，无法提取请求时返回意外错误响应
pub fn respond_to_json(engine: &dyn Engine, validator: &Validator, body: &str) -> Response {
    match RawRequest::from_json_str(body) {
        Ok(raw) => api_call(engine, validator, &raw),
        Err(e) => Response::unexpected(e.to_string()),
    }
}
