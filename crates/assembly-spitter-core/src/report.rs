//! 报告结构与渲染（Markdown / JSON）
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// 单个文件提取出的全部片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnippets {
    /// 文件基名（用作 Markdown 标题）
    pub file_name: String,
    pub path: PathBuf,
    /// 按文档顺序排列的片段
    pub snippets: Vec<String>,
}

/// JSON 输出项（对应输出数组的单个元素）
#[derive(Debug, Clone, Serialize)]
pub struct OutputItem<'a> {
    pub file: &'a str,
    pub path: String,
    pub snippets: &'a [String],
}

/// 报告：按发现顺序累积，最后一次性写出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    files: Vec<FileSnippets>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个文件的提取结果；无片段的文件直接忽略
    pub fn push(&mut self, path: &Path, snippets: Vec<String>) {
        if snippets.is_empty() {
            return;
        }
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        self.files.push(FileSnippets { file_name, path: path.to_path_buf(), snippets });
    }

    pub fn files(&self) -> &[FileSnippets] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn snippet_count(&self) -> usize {
        self.files.iter().map(|f| f.snippets.len()).sum()
    }

    /// 渲染为 Markdown：每个文件一个二级标题，每个片段一个带语言标记的围栏代码块
    pub fn to_markdown(&self, language: &str) -> String {
        let mut out = String::new();
        for f in &self.files {
            let _ = write!(out, "## {}\n\n", f.file_name);
            for snippet in &f.snippets {
                let _ = write!(out, "```{}\n{}\n```\n\n", language, snippet);
            }
        }
        out
    }

    /// 渲染为 JSON 数组
    pub fn to_json(&self) -> serde_json::Result<String> {
        let items: Vec<OutputItem<'_>> = self
            .files
            .iter()
            .map(|f| OutputItem {
                file: &f.file_name,
                path: f.path.to_string_lossy().into_owned(),
                snippets: &f.snippets,
            })
            .collect();
        serde_json::to_string_pretty(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Report {
        let mut r = Report::new();
        r.push(Path::new("/w/contracts/Vault.sol"), vec!["assembly {\n  x := 1\n}".into()]);
        r.push(Path::new("/w/contracts/Empty.sol"), Vec::new());
        r.push(Path::new("/w/lib/Math.sol"), vec!["assembly {\n}".into(), "assembly {\n  y := 2\n}".into()]);
        r
    }

    #[test]
    fn test_markdown_layout() {
        let md = sample().to_markdown("solidity");
        let expected = "\
## Vault.sol

```solidity
assembly {
  x := 1
}
```

## Math.sol

```solidity
assembly {
}
```

```solidity
assembly {
  y := 2
}
```

";
        assert_eq!(md, expected);
    }

    #[test]
    fn test_files_without_snippets_are_omitted() {
        let r = sample();
        assert_eq!(r.files().len(), 2);
        assert_eq!(r.snippet_count(), 3);
        assert!(r.files().iter().all(|f| f.file_name != "Empty.sol"));
    }

    #[test]
    fn test_empty_report_renders_empty_markdown() {
        assert_eq!(Report::new().to_markdown("solidity"), "");
    }

    #[test]
    fn test_json_shape() {
        let json = sample().to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v[0]["file"], "Vault.sol");
        assert_eq!(v[0]["path"], "/w/contracts/Vault.sol");
        assert_eq!(v[1]["snippets"].as_array().unwrap().len(), 2);
    }
}
