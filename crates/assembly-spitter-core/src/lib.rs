//! 内联汇编提取核心库
//!
//! 设计要点：
//! - 不做完整的 Solidity 解析：以 `assembly {` 为起点，按花括号计数截取块。
//! - 扫描范围由可选的 `.scope` 声明文件决定，缺失时回退为整个工作区。
//! - 单线程顺序扫描，输出顺序与文件发现顺序一致。

mod error;
mod extract;
mod options;
mod report;
mod scan;
mod scope;

pub use error::{Result, SpitterError};
pub use extract::{extract_blocks, extract_blocks_from_text, is_block_start, BlockExtractor};
pub use options::{
    load_config, ConfigFile, OutputFormat, ScanOptions, ScanStats, DEFAULT_EXTENSION, DEFAULT_LANGUAGE,
    DEFAULT_REPORT_STEM, DEFAULT_SCOPE_FILE,
};
pub use report::{FileSnippets, OutputItem, Report};
pub use scan::{render_report, scan_and_write, scan_workspace, ScanOutcome};
pub use scope::{
    enumerate_scoped, enumerate_sources, find_declaration_file, resolve_scope, resolve_with_declaration,
    ResolvedScope, ScopeDeclaration,
};
