//! # nact - 中子活化请求计算器
//!
//! 把自由文本的实验参数（样品化学式、通量、辐照与停束时间、密度、波长、
//! X 射线源）解析为强类型请求，交给计算引擎，并输出 JSON 响应。
//!
//! ## 子命令
//! - `calc`  - 校验请求并计算（单文件、标准输入、键值对、批量目录）
//! - `parse` - 单独运行某个字段解析器
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── engine/    (计算引擎与响应信封)
//!   │     ├── pipeline/  (字段校验流水线)
//!   │     ├── parsers/   (时间戳、时长、密度、物理量解析器)
//!   │     ├── physics/   (常数、元素表、化学式)
//!   │     ├── models/    (数据模型)
//!   │     └── batch/     (批量处理)
//!   ├── config.rs   (解析配置)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod engine;
mod error;
mod models;
mod parsers;
mod physics;
mod pipeline;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
