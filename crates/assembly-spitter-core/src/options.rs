//! 扫描选项、配置文件与统计信息（模块）
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpitterError};

/// 默认范围声明文件名
pub const DEFAULT_SCOPE_FILE: &str = ".scope";
/// 默认源文件扩展名
pub const DEFAULT_EXTENSION: &str = ".sol";
/// 默认代码块语言标记
pub const DEFAULT_LANGUAGE: &str = "solidity";
/// 默认报告文件名（不含扩展名）
pub const DEFAULT_REPORT_STEM: &str = "assembly_snippets";

/// 报告输出格式
/// - Markdown：每个文件一个二级标题，片段包在围栏代码块中
/// - Json：机器可读数组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn file_extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

/// 扫描选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// 范围声明文件名（在根目录及其一级子目录中查找）
    pub scope_file_name: String,
    /// 源文件扩展名（按路径后缀匹配，含点号）
    pub extension: String,
    /// Markdown 围栏代码块的语言标记
    pub language: String,
    /// 输出格式
    pub format: OutputFormat,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            scope_file_name: DEFAULT_SCOPE_FILE.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            format: OutputFormat::Markdown,
        }
    }
}

impl ScanOptions {
    /// 以配置文件覆盖默认值（未出现的键保持原值）
    pub fn apply_config(&mut self, cfg: ConfigFile) {
        if let Some(v) = cfg.scope_file { self.scope_file_name = v; }
        if let Some(v) = cfg.extension { self.extension = v; }
        if let Some(v) = cfg.language { self.language = v; }
        if let Some(v) = cfg.format { self.format = v; }
    }

    /// 工作区下的默认报告路径
    pub fn default_output_path(&self, root: &Path) -> PathBuf {
        root.join(format!("{}.{}", DEFAULT_REPORT_STEM, self.format.file_extension()))
    }
}

/// 配置文件结构（TOML），所有键均可省略
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub scope_file: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// 从 TOML 文件加载配置
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let txt = std::fs::read_to_string(path).map_err(|e| SpitterError::io(path, e))?;
    toml::from_str(&txt).map_err(|source| SpitterError::Config { path: path.to_path_buf(), source })
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_with_snippets: usize,
    pub snippets_written: usize,
    /// 实际使用的范围声明文件；None 表示走了默认全量枚举
    pub scope_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_overrides_only_present_keys() {
        let cfg: ConfigFile = toml::from_str("language = \"yul\"\nformat = \"json\"\n").unwrap();
        let mut opts = ScanOptions::default();
        opts.apply_config(cfg);

        assert_eq!(opts.language, "yul");
        assert_eq!(opts.format, OutputFormat::Json);
        assert_eq!(opts.scope_file_name, ".scope");
        assert_eq!(opts.extension, ".sol");
    }

    #[test]
    fn test_load_config_rejects_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("spitter.toml");
        std::fs::write(&path, "threads = 4\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, SpitterError::Config { .. }));
    }

    #[test]
    fn test_load_config_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config(&temp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, SpitterError::Io { .. }));
    }

    #[test]
    fn test_default_output_path_follows_format() {
        let mut opts = ScanOptions::default();
        let root = Path::new("/work");
        assert_eq!(opts.default_output_path(root), PathBuf::from("/work/assembly_snippets.md"));
        opts.format = OutputFormat::Json;
        assert_eq!(opts.default_output_path(root), PathBuf::from("/work/assembly_snippets.json"));
    }
}
