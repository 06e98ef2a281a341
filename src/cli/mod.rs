//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `calc`: 校验请求并计算，输出 JSON 响应（单文件、标准输入、键值对或批量目录）
//! - `parse`: 单独运行某个字段解析器，以表格显示结果
//!
//! 全局参数 `--timezone` 与 `--now` 决定时间戳的解释方式。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: calc, parse

pub mod calc;
pub mod parse;

use crate::config::DEFAULT_ZONE_NAME;

use clap::{Parser, Subcommand};

/// nact - 中子活化请求计算器
#[derive(Parser, Debug)]
#[command(name = "nact")]
#[command(version)]
#[command(about = "Neutron activation calculator: validate requests and compute responses", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Time zone for timestamps without an explicit offset (IANA name)
    #[arg(long, global = true, env = "NACT_TIMEZONE", default_value = DEFAULT_ZONE_NAME)]
    pub timezone: String,

    /// Reference time for elapsed-time calculations (default: current time)
    #[arg(long, global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a request and compute the JSON response
    Calc(calc::CalcArgs),

    /// Run a single field parser and show the parsed value
    Parse(parse::ParseArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "nact",
            "parse",
            "mass",
            "5mg",
            "--timezone",
            "Europe/Berlin",
            "--now",
            "2024-06-01T12:00:00Z",
        ])
        .unwrap();
        assert_eq!(cli.timezone, "Europe/Berlin");
        assert_eq!(cli.now.as_deref(), Some("2024-06-01T12:00:00Z"));
        assert!(matches!(cli.command, Commands::Parse(_)));
    }
}
