//! CLI: sanitize | check, one schema against many documents.
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;

use json_sanitizer::path_de;
use json_sanitizer::{ConfigFile, ElementPaths, Issue, Options, SanitizeError, Sanitized, Sanitizer, Schema, Value, WarningPolicy};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON documents against a type-descriptor schema and emit them in canonical form
#[derive(Parser, Debug)]
#[command(name = "json-sanitizer", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print (or write) the normalized form of every accepted document
    Sanitize(SanitizeOut),
    /// report warnings and errors per document
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// schema file in the raw descriptor encoding (JSON)
    #[arg(long, short)]
    schema: PathBuf,

    /// JSON Pointer to select a subnode in each document (e.g. /data/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct PolicySettings {
    /// TOML file with a [sanitizer] table; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// accept documents that only have warnings
    #[arg(long, default_value_t = false)]
    allow_warnings: bool,

    /// locate array element issues by index (`tags:0`) instead of the array path
    #[arg(long, default_value_t = false)]
    indexed_element_paths: bool,

    /// refuse documents nested deeper than this
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(clap::Parser, Debug)]
struct SanitizeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    policy: PolicySettings,

    /// output directory, one <stem>.json per input (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// single-line JSON output
    #[arg(long)]
    compact: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    policy: PolicySettings,

    /// machine-readable JSON report on stdout
    #[arg(long)]
    json: bool,
}

/// One input document and what became of it.
struct Outcome {
    path: PathBuf,
    result: Result<Sanitized, SanitizeError>,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
enum Status {
    Accepted,
    Rejected,
    Invalid,
}

#[derive(Serialize)]
struct ReportEntry<'a> {
    path: String,
    status: Status,
    warnings: &'a [Issue],
    errors: &'a [Issue],
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_schema(&self) -> anyhow::Result<Schema> {
        let src = std::fs::read_to_string(&self.schema)
            .with_context(|| format!("failed to read schema file {}", self.schema.display()))?;
        let schema = path_de::from_str_with_path::<Schema>(&src)
            .with_context(|| format!("failed to decode schema file {}", self.schema.display()))?;
        Ok(schema)
    }

    /// Runs every input through the sanitizer in parallel; results keep input order.
    fn load_process(&self, sanitizer: &Sanitizer) -> anyhow::Result<Vec<Outcome>> {
        let schema = self.load_schema()?;
        let source_paths = resolve_file_path_patterns(&self.input)?;
        tracing::debug!(documents = source_paths.len(), "resolved inputs");
        source_paths
            .into_par_iter()
            .map(|path| {
                let source = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read source file {}", path.display()))?;
                let result = match self.json_pointer.as_deref() {
                    None => sanitizer.sanitize(&source, &schema),
                    Some(pointer) => select(&source, pointer, &path)?
                        .and_then(|value| sanitizer.sanitize_value(&value, &schema)),
                };
                Ok(Outcome { path, result })
            })
            .collect()
    }
}

impl PolicySettings {
    fn options(&self) -> anyhow::Result<Options> {
        let mut options = match &self.config {
            Some(path) => ConfigFile::load(path)?.sanitizer,
            None => Options::default(),
        };
        if self.allow_warnings {
            options.warnings = WarningPolicy::Report;
        }
        if self.indexed_element_paths {
            options.element_paths = ElementPaths::Indexed;
        }
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        Ok(options)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Exit code: 0 when every document was accepted, 1 otherwise.
    pub fn run(&self) -> anyhow::Result<i32> {
        match &self.cmd {
            Command::Sanitize(target) => {
                let sanitizer = Sanitizer::new(target.policy.options()?);
                let outcomes = target.input_settings.load_process(&sanitizer)?;
                let mut rejected = 0;
                for outcome in &outcomes {
                    match &outcome.result {
                        Ok(sanitized) => {
                            print_warnings(&outcome.path, sanitized.warnings());
                            let src = render_value(sanitized.value(), target.compact)?;
                            match target.out.as_ref() {
                                Some(dir) => write_output(dir, &outcome.path, &src)?,
                                None => println!("{src}"),
                            }
                        }
                        Err(error) => {
                            rejected += 1;
                            eprintln!("{} {}", "rejected".red().bold(), outcome.path.display());
                            eprint!("{}", indent(&error.to_string()));
                        }
                    }
                }
                Ok(if rejected == 0 { 0 } else { 1 })
            }
            Command::Check(target) => {
                let sanitizer = Sanitizer::new(target.policy.options()?);
                let outcomes = target.input_settings.load_process(&sanitizer)?;
                if target.json {
                    let report = outcomes.iter().map(report_entry).collect::<Vec<_>>();
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    for outcome in &outcomes {
                        print_check(outcome);
                    }
                }
                let rejected = outcomes.iter().filter(|o| o.result.is_err()).count();
                Ok(if rejected == 0 { 0 } else { 1 })
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Outer error: the document could not be located at all. Inner error: the
/// selected node was found but the text did not parse.
fn select(source: &str, pointer: &str, path: &Path) -> anyhow::Result<Result<Value, SanitizeError>> {
    let json = match serde_json::from_str::<serde_json::Value>(source) {
        Ok(json) => json,
        Err(error) => return Ok(Err(SanitizeError::Parse(error.into()))),
    };
    let node = json
        .pointer(pointer)
        .ok_or_else(|| anyhow!("JSON pointer {pointer} matched nothing in {}", path.display()))?;
    Ok(Ok(Value::from(node.clone())))
}

fn render_value(value: &Value, compact: bool) -> anyhow::Result<String> {
    Ok(if compact { serde_json::to_string(value)? } else { serde_json::to_string_pretty(value)? })
}

fn write_output(dir: &Path, source: &Path, src: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let stem = source.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let target = dir.join(format!("{stem}.json"));
    std::fs::write(&target, src).with_context(|| format!("failed to write {}", target.display()))
}

fn print_warnings(path: &Path, warnings: &[Issue]) {
    for issue in warnings {
        eprintln!("{} {}: {}", "warning".yellow().bold(), path.display(), issue);
    }
}

fn print_check(outcome: &Outcome) {
    let path = outcome.path.display();
    match &outcome.result {
        Ok(sanitized) if sanitized.warnings().is_empty() => println!("{} {path}", "ok".green().bold()),
        Ok(sanitized) => {
            println!("{} {path}", "ok".green().bold());
            for issue in sanitized.warnings() {
                println!("  {} {issue}", "warning:".yellow());
            }
        }
        Err(error) => {
            println!("{} {path}", "rejected".red().bold());
            match error.failure() {
                Some(failure) => {
                    for issue in failure.warnings() {
                        println!("  {} {issue}", "warning:".yellow());
                    }
                    for issue in failure.errors() {
                        println!("  {} {issue}", "error:".red());
                    }
                }
                None => println!("  {} {error}", "error:".red()),
            }
        }
    }
}

fn report_entry(outcome: &Outcome) -> ReportEntry<'_> {
    let path = outcome.path.to_string_lossy().into_owned();
    match &outcome.result {
        Ok(sanitized) => ReportEntry {
            path,
            status: Status::Accepted,
            warnings: sanitized.warnings(),
            errors: &[],
            message: None,
        },
        Err(error) => match error.failure() {
            Some(failure) => ReportEntry {
                path,
                status: Status::Rejected,
                warnings: failure.warnings(),
                errors: failure.errors(),
                message: Some(failure.message().to_string()),
            },
            None => ReportEntry {
                path,
                status: Status::Invalid,
                warnings: &[],
                errors: &[],
                message: Some(error.to_string()),
            },
        },
    }
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("  {line}\n")).collect()
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let before = out.len();
        for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
            out.push(entry?);
        }
        if out.len() == before {
            return Err(anyhow!("glob pattern matched no files: {pattern}"));
        }
    }
    Ok(out)
}
