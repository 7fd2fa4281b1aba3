use anyhow::{Context, Result};
use assembly_spitter_core::{load_config, render_report, scan_workspace, OutputFormat, ScanOptions, ScanOutcome};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "assembly-spitter", version, about = "Collect inline assembly blocks from Solidity sources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 扫描工作区并生成 assembly_snippets.md
    Scan {
        /// 工作区根目录
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// 输出文件；默认写到 <root>/assembly_snippets.<md|json>
        #[arg(long)]
        output: Option<PathBuf>,

        /// 输出到标准输出而不是文件
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// 输出格式
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// 配置文件路径（TOML）
        #[arg(long)]
        config: Option<PathBuf>,

        /// 范围声明文件名（默认 .scope）
        #[arg(long)]
        scope_file: Option<String>,

        /// 源文件扩展名（默认 .sol）
        #[arg(long)]
        extension: Option<String>,

        /// 代码块语言标记（默认 solidity）
        #[arg(long)]
        language: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Markdown,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { root, output, stdout, format, config, scope_file, extension, language } => {
            let root = root.canonicalize().with_context(|| format!("resolve workspace root {}", root.display()))?;
            info!(?root, "starting scan");

            // 组装选项：默认值 → 配置文件 → 命令行参数
            let mut opts = ScanOptions::default();
            if let Some(path) = &config {
                opts.apply_config(load_config(path).context("load config file")?);
            }
            if let Some(v) = scope_file { opts.scope_file_name = v; }
            if let Some(v) = extension { opts.extension = v; }
            if let Some(v) = language { opts.language = v; }
            if let Some(v) = format { opts.format = v.into(); }

            match scan_workspace(&root, &opts).context("scan workspace failed")? {
                ScanOutcome::NoFiles { .. } => {
                    notify(&format!("No {} files found.", display_language(&opts.language)));
                }
                ScanOutcome::Report { report, stats } => {
                    let text = render_report(&report, &opts).context("render report")?;
                    if stdout {
                        let mut out = std::io::stdout().lock();
                        out.write_all(text.as_bytes()).context("write report to stdout")?;
                        out.flush().ok();
                    } else {
                        let path = output.unwrap_or_else(|| opts.default_output_path(&root));
                        write_report(&path, &text)?;
                        notify(&format!("Assembly snippets saved to {}", path.display()));
                    }
                    info!(
                        files_scanned = stats.files_scanned,
                        files_with_snippets = stats.files_with_snippets,
                        snippets_written = stats.snippets_written,
                        "scan finished"
                    );
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 支持通过环境变量 RUST_LOG 控制日志等级，如：RUST_LOG=debug
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 报告只写一次；写失败直接向上返回
fn write_report(path: &Path, text: &str) -> Result<()> {
    info!(?path, "writing report");
    let mut out = BufWriter::new(File::create(path).with_context(|| format!("create output file {}", path.display()))?);
    out.write_all(text.as_bytes()).context("write report")?;
    out.flush().context("flush report")?;
    Ok(())
}

/// 面向用户的完成/空结果提示
fn notify(msg: &str) {
    println!("{msg}");
}

/// "solidity" → "Solidity"
fn display_language(lang: &str) -> String {
    let mut chars = lang.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_language_capitalizes() {
        assert_eq!(display_language("solidity"), "Solidity");
        assert_eq!(display_language(""), "");
    }

    #[test]
    fn test_cli_parses_scan_flags() {
        let cli = Cli::try_parse_from(["assembly-spitter", "scan", "--root", "/w", "--format", "json", "--stdout"]).unwrap();
        let Commands::Scan { root, format, stdout, output, .. } = cli.command;
        assert_eq!(root, PathBuf::from("/w"));
        assert!(matches!(format, Some(FormatArg::Json)));
        assert!(stdout);
        assert!(output.is_none());
    }

    #[test]
    fn test_write_report_to_default_output_path() {
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::write(root.join("A.sol"), "contract A {\n    assembly {\n        x := 1\n    }\n}\n").unwrap();

        let opts = ScanOptions::default();
        let ScanOutcome::Report { report, .. } = scan_workspace(root, &opts).unwrap() else {
            panic!("expected a report");
        };
        let path = opts.default_output_path(root);
        write_report(&path, &render_report(&report, &opts).unwrap()).unwrap();

        assert_eq!(path, root.join("assembly_snippets.md"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "## A.sol\n\n```solidity\n    assembly {\n        x := 1\n    }\n```\n\n");
    }

    #[test]
    fn test_write_report_into_missing_directory_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing/report.md");
        assert!(write_report(&path, "x").is_err());
    }

    #[test]
    fn test_cli_rejects_stdout_with_output() {
        let res = Cli::try_parse_from(["assembly-spitter", "scan", "--stdout", "--output", "x.md"]);
        assert!(res.is_err());
    }
}
