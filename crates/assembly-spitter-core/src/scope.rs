//! 扫描范围解析（范围声明文件定位、解析与源文件枚举）
//!
//! 两种遍历深度不同，刻意分开实现：
//! - 声明文件查找：根目录 + 一级子目录，绝不更深。
//! - 源文件枚举：从根目录无限深度递归。
//!
//! 目录项按文件名排序遍历，保证发现顺序在各平台上可复现。
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::options::ScanOptions;

/// 范围声明：有序的路径前缀列表
///
/// 前缀按“子串包含”与候选文件的完整路径比较，而非按路径结构匹配。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeDeclaration {
    prefixes: Vec<String>,
}

impl ScopeDeclaration {
    /// 解析声明文本：逐行去除首尾空白，丢弃空行，保留顺序
    pub fn parse(text: &str) -> Self {
        let prefixes = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self { prefixes }
    }

    pub fn from_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { prefixes: prefixes.into_iter().map(Into::into).collect() }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// 路径是否命中任一前缀
    pub fn matches(&self, path: &Path) -> bool {
        self.prefixes.iter().any(|p| path_contains(path, p))
    }
}

/// 单个前缀的匹配规则：完整路径包含该子串即命中
fn path_contains(path: &Path, prefix: &str) -> bool {
    path.to_string_lossy().contains(prefix)
}

/// 范围解析结果
#[derive(Debug, Clone, Default)]
pub struct ResolvedScope {
    /// 找到的声明文件路径
    pub declaration_path: Option<PathBuf>,
    /// 成功读取并解析的声明
    pub declaration: Option<ScopeDeclaration>,
    /// 候选源文件（发现顺序；多前缀命中的文件会重复出现）
    pub files: Vec<PathBuf>,
}

/// 查找范围声明文件：先查根目录，再按文件名顺序查一级子目录，返回第一个命中
pub fn find_declaration_file(root: &Path, file_name: &str) -> Result<Option<PathBuf>> {
    let candidate = root.join(file_name);
    if candidate.is_file() {
        return Ok(Some(candidate));
    }

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        debug!(dir = %entry.path().display(), "looking for scope file");
        let candidate = entry.path().join(file_name);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// 递归枚举根目录下所有以 `extension` 结尾的普通文件
pub fn enumerate_sources(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    walk_sources(root, extension, |_| true)
}

/// 按声明逐个前缀做一次完整遍历，结果按前缀顺序拼接，不去重
pub fn enumerate_scoped(root: &Path, declaration: &ScopeDeclaration, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for prefix in declaration.prefixes() {
        debug!(%prefix, "searching scope prefix");
        let found = walk_sources(root, extension, |p| path_contains(p, prefix))?;
        debug!(%prefix, count = found.len(), "scope prefix matched");
        files.extend(found);
    }
    Ok(files)
}

/// 显式入口：给定根目录与（可选）声明，返回候选文件
/// - 有声明：按前缀过滤
/// - 无声明：全量枚举
pub fn resolve_with_declaration(root: &Path, declaration: Option<&ScopeDeclaration>, extension: &str) -> Result<Vec<PathBuf>> {
    match declaration {
        Some(decl) => enumerate_scoped(root, decl, extension),
        None => enumerate_sources(root, extension),
    }
}

/// 解析工作区范围：定位并读取声明文件，失败或缺失时回退为全量枚举
pub fn resolve_scope(root: &Path, opts: &ScanOptions) -> Result<ResolvedScope> {
    let declaration_path = find_declaration_file(root, &opts.scope_file_name)?;

    // 声明文件按严格 UTF-8 读取；读取或解码失败视为声明损坏，回退全量枚举
    let declaration = match &declaration_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => {
                let decl = ScopeDeclaration::parse(&text);
                info!(path = %path.display(), prefixes = ?decl.prefixes(), "scope file found");
                Some(decl)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "scope file unreadable, falling back to full workspace");
                None
            }
        },
        None => {
            info!(scope_file = %opts.scope_file_name, "scope file not found, scanning full workspace");
            None
        }
    };

    let files = resolve_with_declaration(root, declaration.as_ref(), &opts.extension)?;
    Ok(ResolvedScope { declaration_path, declaration, files })
}

fn walk_sources<F>(root: &Path, extension: &str, keep: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.to_string_lossy().ends_with(extension) && keep(path) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
