//! # 统一错误处理模块
//!
//! 定义 nact 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - 文法错误 `Grammar`：输入不符合解析器的文法（时间戳、晶格常数列表）
//! - 格式错误 `Format`：数值或单位后缀无法识别
//! - 范围错误 `Range`：推导值越界（例如时间戳位于未来）
//! - 键错误 `UnknownKey`：晶格常数键不合法、键值不成对、比值键缺少 `a`
//! - 委托错误 `Delegated`：外部协作者（化学式解析器、计算引擎）的原样错误
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// nact 统一错误类型
#[derive(Error, Debug)]
pub enum NactError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 字段解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unable to parse {what} {input:?}: {reason}")]
    Grammar {
        what: &'static str,
        input: String,
        reason: String,
    },

    #[error("{0}")]
    Format(String),

    #[error("{0}")]
    Range(String),

    #[error("{0}")]
    UnknownKey(String),

    #[error("{0}")]
    Delegated(String),

    // ─────────────────────────────────────────────────────────────
    // 请求提取错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed request: {0}")]
    Extraction(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl NactError {
    /// 构造时间戳文法错误
    pub fn grammar(what: &'static str, input: &str, reason: impl Into<String>) -> Self {
        NactError::Grammar {
            what,
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, NactError>;
