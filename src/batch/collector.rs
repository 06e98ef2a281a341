//! # 文件收集器
//!
//! 根据输入目录和 glob 模式收集待处理的请求文件。
//!
//! ## 功能
//! - 逗号分隔的多个 glob 模式
//! - 递归目录搜索
//! - 跳过已生成的响应文件（`*.response.json`）
//!
//! ## 依赖关系
//! - 被 `commands/calc.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{NactError, Result};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 响应文件后缀
pub const RESPONSE_SUFFIX: &str = ".response.json";

/// 文件收集器
pub struct FileCollector {
    /// 输入目录
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器（默认匹配 `*.json`）
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: Vec::new(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Pattern::new(s).map_err(|e| {
                    NactError::InvalidArgument(format!("Invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的请求文件（按路径排序）
    pub fn collect(&self) -> Vec<PathBuf> {
        if !self.input.is_dir() {
            return vec![];
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| self.matches_patterns(entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// 检查文件是否匹配任一模式（响应文件除外）
    fn matches_patterns(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        if filename.ends_with(RESPONSE_SUFFIX) {
            return false;
        }

        if self.patterns.is_empty() {
            return filename.ends_with(".json");
        }

        self.patterns.iter().any(|p| p.matches(filename))
    }
}

/// 请求文件对应的响应文件路径：`<stem>.response.json`
pub fn response_path(request: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = request
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("request");
    let name = format!("{}{}", stem, RESPONSE_SUFFIX);
    match output_dir {
        Some(dir) => dir.join(name),
        None => request.with_file_name(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_patterns_and_skip_responses() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.json", "b.json", "a.response.json", "notes.txt", "req_1"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.json"), "{}").unwrap();

        let names = |files: Vec<PathBuf>| -> Vec<String> {
            files
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
                .collect()
        };

        let flat = FileCollector::new(dir.path().to_path_buf())
            .with_pattern("*.json")
            .unwrap()
            .collect();
        assert_eq!(names(flat), ["a.json", "b.json"]);

        let deep = FileCollector::new(dir.path().to_path_buf())
            .with_pattern("*.json, req_*")
            .unwrap()
            .recursive(true)
            .collect();
        assert_eq!(names(deep), ["a.json", "b.json", "req_1", "c.json"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = FileCollector::new(PathBuf::from(".")).with_pattern("[*.json");
        assert!(matches!(result, Err(NactError::InvalidArgument(_))));
    }

    #[test]
    fn test_response_path() {
        let request = Path::new("/data/run1.json");
        assert_eq!(
            response_path(request, None),
            PathBuf::from("/data/run1.response.json")
        );
        assert_eq!(
            response_path(request, Some(Path::new("/out"))),
            PathBuf::from("/out/run1.response.json")
        );
    }
}
