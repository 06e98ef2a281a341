//! # 请求数据模型
//!
//! 原始请求（字段名 → 字符串或字符串序列）、字段错误以及校验后的强类型请求。
//!
//! ## 依赖关系
//! - 被 `pipeline/`, `engine/`, `commands/` 使用
//! - 使用 `physics/formula.rs`

use crate::error::{NactError, Result};
use crate::physics::Formula;

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────
// 原始请求
// ─────────────────────────────────────────────────────────────

/// 可重复字段（停束时间）
pub const REPEATABLE_FIELD: &str = "rest";

/// 原始字段值
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Single(String),
    Many(Vec<String>),
}

/// 原始请求
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRequest {
    fields: BTreeMap<String, RawValue>,
}

impl RawRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: RawValue) {
        self.fields.insert(canonical_field(field.into()), value);
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    /// 从 JSON 文本提取请求
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(value)
    }

    /// 从 JSON 对象提取请求
    ///
    /// 字符串与数字视为单值，数组视为序列，`null` 视为缺省。
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(NactError::Extraction(
                "request body must be a JSON object".to_string(),
            ));
        };

        let mut request = Self::new();
        for (field, value) in map {
            let raw = match value {
                Value::Null => continue,
                Value::Array(items) => RawValue::Many(
                    items
                        .into_iter()
                        .map(|item| scalar_text(&field, item))
                        .collect::<Result<Vec<_>>>()?,
                ),
                other => RawValue::Single(scalar_text(&field, other)?),
            };
            request.insert(field, raw);
        }
        Ok(request)
    }

    /// 从表单风格的键值对提取请求
    ///
    /// 单值字段取第一次出现的值；`rest` 收集全部值。
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut request = Self::new();
        for (field, value) in pairs {
            let field = canonical_field(field);
            if field == REPEATABLE_FIELD {
                match request.fields.entry(field).or_insert(RawValue::Many(Vec::new())) {
                    RawValue::Many(values) => values.push(value),
                    RawValue::Single(_) => {}
                }
            } else {
                request.fields.entry(field).or_insert(RawValue::Single(value));
            }
        }
        request
    }
}

/// `rest[]`（表单数组写法）等同于 `rest`
fn canonical_field(field: String) -> String {
    match field.strip_suffix("[]") {
        Some(base) => base.to_string(),
        None => field,
    }
}

fn scalar_text(field: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(NactError::Extraction(format!(
            "field '{}' must be a string or number, got {}",
            field, other
        ))),
    }
}

// ─────────────────────────────────────────────────────────────
// 字段错误
// ─────────────────────────────────────────────────────────────

/// 单个字段的解析错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// 字段错误表（按字段名排序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.insert(error.field, error.message);
    }

    /// 记录字段结果：成功返回值，失败登记错误
    pub fn capture<T>(&mut self, field: &'static str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(FieldError {
                    field,
                    message: e.to_string(),
                });
                None
            }
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

#[cfg(test)]
impl FieldErrors {
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

// ─────────────────────────────────────────────────────────────
// 字段取值类型
// ─────────────────────────────────────────────────────────────

/// 计算模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMode {
    Scattering,
    Activation,
    All,
}

impl CalculationMode {
    pub fn includes_activation(self) -> bool {
        matches!(self, CalculationMode::Activation | CalculationMode::All)
    }

    pub fn includes_scattering(self) -> bool {
        matches!(self, CalculationMode::Scattering | CalculationMode::All)
    }
}

impl FromStr for CalculationMode {
    type Err = NactError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scattering" => Ok(CalculationMode::Scattering),
            "activation" => Ok(CalculationMode::Activation),
            "all" => Ok(CalculationMode::All),
            _ => Err(NactError::Format(
                "calculate should be one of 'scattering', 'activation' or 'all'".to_string(),
            )),
        }
    }
}

/// 同位素丰度表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AbundanceTable {
    #[serde(rename = "IUPAC")]
    Iupac,
    #[serde(rename = "IAEA")]
    Iaea1987,
}

impl FromStr for AbundanceTable {
    type Err = NactError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            // NIST 2001 数据已并入 IUPAC 表
            "IUPAC" | "NIST" => Ok(AbundanceTable::Iupac),
            "IAEA" => Ok(AbundanceTable::Iaea1987),
            _ => Err(NactError::Format(
                "abundance should be IUPAC or IAEA".to_string(),
            )),
        }
    }
}

/// 密度描述类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityKind {
    /// 未指定，使用化学式自带密度或 1
    Default,
    /// 每分子式单元体积 (cm³)
    Volume,
    /// 同位素密度 (g/cm³)
    Isotope,
    /// 天然丰度密度 (g/cm³)
    Natural,
}

impl fmt::Display for DensityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DensityKind::Default => write!(f, "default"),
            DensityKind::Volume => write!(f, "volume"),
            DensityKind::Isotope => write!(f, "isotope"),
            DensityKind::Natural => write!(f, "natural"),
        }
    }
}

/// 密度描述
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensitySpec {
    pub kind: DensityKind,
    pub value: f64,
}

impl DensitySpec {
    pub const DEFAULT: DensitySpec = DensitySpec {
        kind: DensityKind::Default,
        value: 0.0,
    };

    pub fn new(kind: DensityKind, value: f64) -> Self {
        Self { kind, value }
    }
}

// ─────────────────────────────────────────────────────────────
// 校验后的请求
// ─────────────────────────────────────────────────────────────

/// 校验后的请求
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedRequest {
    pub calculate: CalculationMode,
    pub sample: String,
    #[serde(skip_serializing)]
    pub chem: Formula,
    /// 中子通量 (n/cm²/s)
    pub fluence: f64,
    pub fast_ratio: f64,
    #[serde(rename = "Cd_ratio")]
    pub cd_ratio: f64,
    /// 辐照时间 (h)
    pub exposure: f64,
    /// 样品质量 (g)
    pub mass: f64,
    pub density: DensitySpec,
    /// 停束时间 (h)
    pub rest_times: Vec<f64>,
    pub decay_level: f64,
    /// 样品厚度 (cm)
    pub thickness: f64,
    /// 中子波长 (Å)
    pub wavelength: f64,
    /// X 射线波长 (Å)
    pub xray_wavelength: f64,
    pub abundance: AbundanceTable,
}
