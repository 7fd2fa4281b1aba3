//! 内联汇编块提取（逐行扫描 + 花括号计数）
//!
//! 规则：
//! - 不在块内时，匹配 `\bassembly\s*\{` 的行开启一个块，深度置 1；该行自身的花括号不再重复计数。
//! - 在块内时，原样收集每一行，并按字面 `{` / `}` 数量更新深度；深度归零即结束当前块。
//! - 在块内不再识别 `assembly` 关键字，仅由花括号计数决定结束位置。
//! - 文件结束时仍未闭合的块按原样输出（降级处理，不报错）。
//!
//! 已知限制：不识别字符串与注释，其中的花括号同样参与计数。

use std::sync::OnceLock;

use regex::Regex;

const BLOCK_START_PATTERN: &str = r"\bassembly\s*\{";

fn block_start() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| Regex::new(BLOCK_START_PATTERN).expect("compile assembly block pattern"))
}

/// 该行是否开启一个汇编块
pub fn is_block_start(line: &str) -> bool {
    block_start().is_match(line)
}

/// 逐行状态机，供整文件提取与流式读取共用
#[derive(Debug, Default)]
pub struct BlockExtractor {
    inside: bool,
    depth: i64,
    current: Vec<String>,
    snippets: Vec<String>,
}

impl BlockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 喂入一行（不含换行符）
    pub fn push_line(&mut self, line: &str) {
        if !self.inside {
            if is_block_start(line) {
                self.inside = true;
                self.depth = 1;
                self.current.push(line.to_string());
            }
            return;
        }

        self.current.push(line.to_string());
        let opens = line.matches('{').count() as i64;
        let closes = line.matches('}').count() as i64;
        self.depth += opens - closes;
        if self.depth == 0 {
            self.flush();
            self.inside = false;
        }
    }

    /// 结束输入并返回全部片段（按出现顺序）
    pub fn finish(mut self) -> Vec<String> {
        if self.inside {
            tracing::debug!(depth = self.depth, lines = self.current.len(), "unterminated assembly block, keeping partial capture");
            self.flush();
        }
        self.snippets
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.snippets.push(self.current.join("\n"));
            self.current.clear();
        }
    }
}

/// 从有序行序列中提取全部汇编块
pub fn extract_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut extractor = BlockExtractor::new();
    for line in lines {
        extractor.push_line(line.as_ref());
    }
    extractor.finish()
}

/// 从整段文本中提取（行尾 `\n` 与 `\r\n` 均被去除）
pub fn extract_blocks_from_text(text: &str) -> Vec<String> {
    let mut extractor = BlockExtractor::new();
    for line in text.lines() {
        extractor.push_line(line);
    }
    extractor.finish()
}
