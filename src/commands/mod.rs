//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config.rs`, `parsers/`, `utils/`
//! - 子模块: calc, parse

pub mod calc;
pub mod parse;

use crate::cli::{Cli, Commands};
use crate::config::ParserConfig;
use crate::error::Result;
use crate::parsers::parse_timestamp;

use chrono::{DateTime, Utc};

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    let config = ParserConfig::from_zone_name(&cli.timezone)?;
    let now = resolve_now(cli.now.as_deref(), &config)?;

    match cli.command {
        Commands::Calc(args) => calc::execute(args, &config, now),
        Commands::Parse(args) => parse::execute(args, &config, now),
    }
}

/// 确定参考时间：`--now` 按宽松时间戳解析，缺省为当前时间
fn resolve_now(text: Option<&str>, config: &ParserConfig) -> Result<DateTime<Utc>> {
    match text {
        Some(text) => parse_timestamp(text, config.default_zone),
        None => Ok(Utc::now()),
    }
}
