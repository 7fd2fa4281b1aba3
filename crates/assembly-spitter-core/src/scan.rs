//! 扫描主流程：范围解析 → 逐文件提取 → 生成报告
//!
//! 全程单线程顺序执行：文件按发现顺序逐个读取与提取，输出顺序与发现顺序一致。
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, SpitterError};
use crate::extract::extract_blocks_from_text;
use crate::options::{OutputFormat, ScanOptions, ScanStats};
use crate::report::Report;
use crate::scope::resolve_scope;

/// 单次扫描的结果
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// 范围内没有任何源文件（提示性结果，不写出报告）
    NoFiles { scope_file: Option<PathBuf> },
    /// 至少扫描了一个源文件（报告本身可能为空）
    Report { report: Report, stats: ScanStats },
}

/// 扫描工作区并构建报告（不写出）
/// - 读取失败直接返回错误，不跳过
pub fn scan_workspace(root: &Path, opts: &ScanOptions) -> Result<ScanOutcome> {
    let resolved = resolve_scope(root, opts)?;
    info!(files = resolved.files.len(), "candidate source files");

    if resolved.files.is_empty() {
        return Ok(ScanOutcome::NoFiles { scope_file: resolved.declaration_path });
    }

    let mut stats = ScanStats { scope_file: resolved.declaration_path, ..ScanStats::default() };
    let mut report = Report::new();

    for path in &resolved.files {
        let text = read_source(path)?;
        let snippets = extract_blocks_from_text(&text);
        debug!(path = %path.display(), snippets = snippets.len(), "scanned file");

        stats.files_scanned += 1;
        if !snippets.is_empty() {
            stats.files_with_snippets += 1;
            stats.snippets_written += snippets.len();
        }
        report.push(path, snippets);
    }

    Ok(ScanOutcome::Report { report, stats })
}

/// 读取源文件文本
/// - 非法 UTF-8 字节按替换字符有损解码，不中断扫描
/// - 真实 I/O 错误原样返回
pub(crate) fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| SpitterError::io(path, e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            debug!(path = %path.display(), "source is not valid UTF-8, decoding lossily");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// 按选项渲染报告文本
pub fn render_report(report: &Report, opts: &ScanOptions) -> Result<String> {
    match opts.format {
        OutputFormat::Markdown => Ok(report.to_markdown(&opts.language)),
        OutputFormat::Json => Ok(report.to_json()?),
    }
}

/// 扫描工作区并将报告一次性写入 `out`
/// - 返回 None 表示范围内没有源文件，此时不写任何内容
pub fn scan_and_write(root: &Path, out: &mut dyn Write, opts: &ScanOptions) -> Result<Option<ScanStats>> {
    match scan_workspace(root, opts)? {
        ScanOutcome::NoFiles { .. } => Ok(None),
        ScanOutcome::Report { report, stats } => {
            let text = render_report(&report, opts)?;
            out.write_all(text.as_bytes()).map_err(|e| SpitterError::io("<report output>", e))?;
            info!(
                files_scanned = stats.files_scanned,
                files_with_snippets = stats.files_with_snippets,
                snippets_written = stats.snippets_written,
                "report rendered"
            );
            Ok(Some(stats))
        }
    }
}
