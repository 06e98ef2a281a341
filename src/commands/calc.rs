//! # calc 命令实现
//!
//! 校验请求并计算，输出 JSON 响应。
//!
//! ## 功能
//! - 单文件 / 标准输入：响应写到 `--output` 或标准输出
//! - `-f key=value` 字段：按表单规则组成请求
//! - 目录：并行处理所有请求文件，每个请求写出 `<stem>.response.json`
//! - 可选 CSV 汇总
//!
//! 响应不是成功信封时命令以错误退出。
//!
//! ## 依赖关系
//! - 使用 `cli/calc.rs` 定义的参数
//! - 使用 `engine/` 和 `pipeline/`
//! - 使用 `batch/` 模块进行批量处理

use crate::batch::{self, BatchRunner, FileCollector, ProcessResult};
use crate::cli::calc::CalcArgs;
use crate::config::ParserConfig;
use crate::engine::{self, BeamEngine, Engine, Response};
use crate::error::{NactError, Result};
use crate::models::RawRequest;
use crate::pipeline::Validator;
use crate::utils::output;

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::Path;

/// 执行 calc 命令
pub fn execute(args: CalcArgs, config: &ParserConfig, now: DateTime<Utc>) -> Result<()> {
    let engine = BeamEngine::new();
    let validator = Validator::new(config, now);

    let response = match args.input.as_deref() {
        None if args.fields.is_empty() => {
            return Err(NactError::InvalidArgument(
                "No request given: pass a request file, '-' for stdin, or -f key=value fields"
                    .to_string(),
            ));
        }
        None => {
            let raw = RawRequest::from_pairs(args.fields.iter().cloned());
            engine::api_call(&engine, &validator, &raw)
        }
        Some(path) if path == Path::new("-") => {
            let body = io::read_to_string(io::stdin()).map_err(|e| NactError::FileReadError {
                path: "<stdin>".to_string(),
                source: e,
            })?;
            engine::respond_to_json(&engine, &validator, &body)
        }
        Some(path) if path.is_dir() => return execute_batch(path, &args, &engine, &validator),
        Some(path) if path.is_file() => {
            let body = read_request(path)?;
            engine::respond_to_json(&engine, &validator, &body)
        }
        Some(path) => {
            return Err(NactError::FileNotFound {
                path: path.display().to_string(),
            })
        }
    };

    emit(&response, &args)?;
    match &response {
        Response::Success(success) => {
            for mode in success.failed_modes() {
                output::print_warning(&format!("Section '{}' could not be computed", mode));
            }
            Ok(())
        }
        _ => Err(NactError::Other(describe_failure(&response))),
    }
}

/// 输出单个响应
fn emit(response: &Response, args: &CalcArgs) -> Result<()> {
    let text = response.to_json(args.pretty)?;
    match &args.output {
        Some(path) => {
            fs::write(path, text + "\n").map_err(|e| NactError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
            output::print_success(&format!("Response written to '{}'", path.display()));
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn read_request(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| NactError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 非成功响应的简短描述
fn describe_failure(response: &Response) -> String {
    match response {
        Response::Success(_) => "success".to_string(),
        Response::Invalid(invalid) => format!(
            "invalid request: {}",
            invalid.detail.fields().collect::<Vec<_>>().join(", ")
        ),
        Response::Unexpected(unexpected) => {
            format!("unexpected exception: {}", unexpected.detail.query)
        }
    }
}

/// 批量处理模式
fn execute_batch(
    input: &Path,
    args: &CalcArgs,
    engine: &dyn Engine,
    validator: &Validator,
) -> Result<()> {
    output::print_header("Batch Request Calculation");
    output::print_info(&format!("Batch mode: directory '{}'", input.display()));

    let files = FileCollector::new(input.to_path_buf())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} request files", files.len()));

    // 确保输出目录存在
    if let Some(dir) = &args.output {
        fs::create_dir_all(dir).map_err(|e| NactError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;
    }

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!("Using {} parallel jobs", runner.jobs()));
    let result = runner.run(files, |file| process_batch_file(file, args, engine, validator))?;

    // 打印统计
    output::print_separator();
    output::print_done(&format!(
        "Batch complete: {} requests ({} success, {} skipped, {} failed)",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed requests:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    if let Some(summary) = &args.summary {
        batch::write_summary(summary, &result)?;
        output::print_success(&format!("Summary written to '{}'", summary.display()));
    }

    Ok(())
}

/// 处理批量模式中的单个请求文件
fn process_batch_file(
    input: &Path,
    args: &CalcArgs,
    engine: &dyn Engine,
    validator: &Validator,
) -> ProcessResult {
    let output_file = batch::response_path(input, args.output.as_deref());

    // 检查是否已存在
    if output_file.exists() && !args.overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    let written = read_request(input).and_then(|body| {
        let response = engine::respond_to_json(engine, validator, &body);
        let text = response.to_json(args.pretty)?;
        fs::write(&output_file, text + "\n").map_err(|e| NactError::FileWriteError {
            path: output_file.display().to_string(),
            source: e,
        })?;
        Ok(response)
    });

    match written {
        Ok(response) if response.is_success() => {
            ProcessResult::Success(output_file.display().to_string())
        }
        Ok(response) => {
            ProcessResult::Failed(input.display().to_string(), describe_failure(&response))
        }
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}
