//! 命令行层
//!
//! 命令定义、结果输出与退出码规则。`main` 只负责加载配置、初始化日志并调用 [`execute`]。

use crate::config::AppConfig;
use crate::error::Result;
use crate::report::BatchReport;
use crate::services::{
    ConversionTestService, ExportOutcome, MemoryValidationService, NamespaceValidationService,
    OntologyExporter, OntologyValidationService, conversion_test, memory_validation,
    namespace_validation, ontology_validation,
};
use clap::{CommandFactory, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// MIF 记忆格式验证与转换工具
#[derive(Parser, Debug)]
#[command(name = "mif", version, about = "Validate and convert MIF memory records and ontologies")]
pub struct Cli {
    /// 仓库根目录
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// 配置文件（默认 `<root>/mif.toml`）
    #[arg(long, global = true, env = "MIF_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Schema-validate every memory record
    ValidateMemories,
    /// Schema-validate every ontology document
    ValidateOntologies,
    /// Check record namespaces against the ontologies (warnings only)
    ValidateNamespaces,
    /// Compare markdown records with their JSON-LD counterparts
    TestConversion,
    /// Convert ontology YAML to JSON-LD
    Convert {
        /// Input YAML file
        input: Option<PathBuf>,
        /// Output JSON-LD file (default: input with a .jsonld extension)
        output: Option<PathBuf>,
        /// Convert every ontology under the ontology root
        #[arg(long)]
        all: bool,
    },
}

/// 命令结果对应的退出状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::FAILURE,
        }
    }
}

/// 执行命令，结果写入 `out`，单文件错误写入 `err`
///
/// 返回 `Err` 表示命令无法开始（例如 schema 缺失），由调用方按失败处理。
pub fn execute<O: Write, E: Write>(
    command: Command,
    config: &AppConfig,
    out: &mut O,
    err: &mut E,
) -> Result<Exit> {
    match command {
        Command::ValidateMemories => {
            let report = MemoryValidationService::new(config).run()?;
            write_report(
                out,
                &report,
                memory_validation::FAILURE_HEADING,
                memory_validation::SUCCESS_HEADING,
            )
        }
        Command::ValidateOntologies => {
            let report = OntologyValidationService::new(config).run()?;
            write_report(
                out,
                &report,
                ontology_validation::FAILURE_HEADING,
                ontology_validation::SUCCESS_HEADING,
            )
        }
        Command::ValidateNamespaces => {
            let report = NamespaceValidationService::new(config).run()?;
            if report.is_clean() {
                writeln!(out, "{}", namespace_validation::SUCCESS_HEADING)?;
            } else {
                write!(out, "{}", report.render(namespace_validation::WARNING_HEADING))?;
                writeln!(out, "\n{}", namespace_validation::EXTENSION_NOTE)?;
            }
            Ok(Exit::Success)
        }
        Command::TestConversion => {
            let result = ConversionTestService::new(config).run()?;
            writeln!(out, "{}", result.summary())?;
            if result.report.has_failures() {
                writeln!(out)?;
            }
            write_report(
                out,
                &result.report,
                conversion_test::FAILURE_HEADING,
                conversion_test::SUCCESS_HEADING,
            )
        }
        Command::Convert { input, output, all } => {
            convert(config, input.as_deref(), output.as_deref(), all, out, err)
        }
    }
}

/// 输出报告：存在错误级别发现项时为失败
fn write_report<O: Write>(
    out: &mut O,
    report: &BatchReport,
    failure: &str,
    success: &str,
) -> Result<Exit> {
    if report.has_failures() {
        write!(out, "{}", report.render(failure))?;
        Ok(Exit::Failure)
    } else {
        writeln!(out, "{success}")?;
        Ok(Exit::Success)
    }
}

/// `convert --all` 总是成功；单文件模式缺少输入时输出帮助并失败
fn convert<O: Write, E: Write>(
    config: &AppConfig,
    input: Option<&Path>,
    output: Option<&Path>,
    all: bool,
    out: &mut O,
    err: &mut E,
) -> Result<Exit> {
    let exporter = OntologyExporter::new(config);

    if all {
        let mut converted = 0;
        for outcome in exporter.convert_all()? {
            match outcome {
                ExportOutcome::Converted { input, output } => {
                    converted += 1;
                    writeln!(out, "Converted: {} -> {}", file_name(&input), file_name(&output))?;
                }
                ExportOutcome::Failed { input, error } => {
                    writeln!(err, "Error converting {}: {}", input.display(), error)?;
                }
            }
        }
        writeln!(out, "\nConverted {converted} files")?;
        return Ok(Exit::Success);
    }

    let Some(input) = input else {
        let mut command = Cli::command();
        match command.find_subcommand_mut("convert") {
            Some(convert) => convert.write_help(out)?,
            None => command.write_help(out)?,
        }
        return Ok(Exit::Failure);
    };

    match exporter.convert_file(input, output) {
        Ok(path) => {
            writeln!(out, "Created: {}", path.display())?;
            Ok(Exit::Success)
        }
        Err(e) => {
            writeln!(err, "Error: {e}")?;
            Ok(Exit::Failure)
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
