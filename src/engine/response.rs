//! # 响应信封
//!
//! 三种顶层响应：
//! ```text
//! 成功     {success: true, version, sample, activation?, scattering?, xray_scattering?}
//! 无效请求 {success: false, error: "invalid request", detail: {field: message}}
//! 意外错误 {success: false, version, error: "unexpected exception", detail: {query: message}}
//! ```
//!
//! ## 依赖关系
//! - 被 `engine/mod.rs` 和 `commands/calc.rs` 使用
//! - 使用 `serde` / `serde_json`

use crate::error::Result;
use crate::models::FieldErrors;

use serde::Serialize;
use serde_json::Value;

/// 响应中报告的版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 顶层响应
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success(Success),
    Invalid(Invalid),
    Unexpected(Unexpected),
}

impl Response {
    pub fn invalid(detail: FieldErrors) -> Self {
        Response::Invalid(Invalid {
            success: false,
            error: "invalid request",
            detail,
        })
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Response::Unexpected(Unexpected {
            success: false,
            version: VERSION,
            error: "unexpected exception",
            detail: QueryDetail {
                query: message.into(),
            },
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    /// 序列化为 JSON 文本
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

/// 成功响应
#[derive(Debug, Clone, Serialize)]
pub struct Success {
    pub success: bool,
    pub version: &'static str,
    pub sample: SampleSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation: Option<ModeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scattering: Option<ModeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xray_scattering: Option<ModeResult>,
}

impl Success {
    /// 计算失败的模式名
    pub fn failed_modes(&self) -> Vec<&'static str> {
        [
            ("activation", &self.activation),
            ("scattering", &self.scattering),
            ("xray_scattering", &self.xray_scattering),
        ]
        .into_iter()
        .filter(|(_, section)| section.as_ref().is_some_and(ModeResult::is_failed))
        .map(|(name, _)| name)
        .collect()
    }
}

/// 样品信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    pub name: String,
    pub formula: String,
    pub formula_latex: String,
    /// 质量 (g)
    pub mass: f64,
    /// 同位素密度 (g/cm³)
    pub density: f64,
    /// 厚度 (cm)
    pub thickness: f64,
    /// 天然丰度密度 (g/cm³)
    pub natural_density: f64,
}

/// 单个计算模式的结果，失败时为 `{error}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModeResult {
    Computed(Value),
    Failed { error: String },
}

impl ModeResult {
    pub fn from_result(result: Result<Value>) -> Self {
        match result {
            Ok(value) => ModeResult::Computed(value),
            Err(e) => ModeResult::Failed {
                error: e.to_string(),
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ModeResult::Failed { .. })
    }
}

/// 无效请求响应
#[derive(Debug, Clone, Serialize)]
pub struct Invalid {
    pub success: bool,
    pub error: &'static str,
    pub detail: FieldErrors,
}

/// 意外错误响应
#[derive(Debug, Clone, Serialize)]
pub struct Unexpected {
    pub success: bool,
    pub version: &'static str,
    pub error: &'static str,
    pub detail: QueryDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryDetail {
    pub query: String,
}
