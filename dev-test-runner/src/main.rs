//! Runs every fixture in `cases/*.json` (or the glob given as the first
//! argument) through the public sanitizer API.
use anyhow::{Context, bail};
use colored::Colorize;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use json_sanitizer::path_de::from_str_with_path;
use json_sanitizer::{IssueCode, Options, SanitizeError, Sanitizer, Schema};

#[derive(Debug, Deserialize)]
struct Case {
    #[serde(default)]
    description: Option<String>,
    document: serde_json::Value,
    schema: Schema,
    #[serde(default)]
    options: Options,
    expect: Expect,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Expect {
    Accepted {
        value: serde_json::Value,
        #[serde(default)]
        warnings: Vec<IssueCode>,
    },
    Rejected {
        #[serde(default)]
        warnings: Vec<IssueCode>,
        #[serde(default)]
        errors: Vec<IssueCode>,
    },
    TooDeep,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let pattern = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/cases/*.json").to_string());

    let mut failed = 0;
    let mut total = 0;
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        total += 1;
        let src = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let case: Case = from_str_with_path(&src)
            .with_context(|| format!("failed to decode case {}", path.display()))?;
        let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        match run_case(&case) {
            Ok(()) => eprintln!("✅ {name}"),
            Err(reason) => {
                failed += 1;
                eprintln!("{} {name}: {reason:#}", "❌".red());
                if let Some(description) = &case.description {
                    eprintln!("   {}", description.dimmed());
                }
            }
        }
    }

    if total == 0 {
        bail!("no cases matched {pattern}");
    }
    eprintln!("—— {} passed, {} failed ——", total - failed, failed);
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_case(case: &Case) -> anyhow::Result<()> {
    let document = serde_json::to_string(&case.document)?;
    let outcome = Sanitizer::new(case.options).sanitize(&document, &case.schema);
    tracing::debug!(?outcome, "case finished");
    match (&case.expect, outcome) {
        (Expect::Accepted { value, warnings }, Ok(sanitized)) => {
            let actual = sanitized.value().to_json();
            if &actual != value {
                bail!("expected value {value}, got {actual}");
            }
            check_codes("warnings", warnings, sanitized.warnings().iter().map(|i| i.code()))
        }
        (Expect::Rejected { warnings, errors }, Err(SanitizeError::Rejected(failure))) => {
            check_codes("warnings", warnings, failure.warnings().iter().map(|i| i.code()))?;
            check_codes("errors", errors, failure.errors().iter().map(|i| i.code()))
        }
        (Expect::TooDeep, Err(SanitizeError::TooDeep { .. })) => Ok(()),
        (expect, Ok(sanitized)) => bail!("expected {expect:?}, document was accepted as {}", sanitized.value()),
        (expect, Err(error)) => bail!("expected {expect:?}, got error: {error}"),
    }
}

fn check_codes(what: &str, expected: &[IssueCode], actual: impl Iterator<Item = IssueCode>) -> anyhow::Result<()> {
    let actual = actual.collect::<Vec<_>>();
    if actual != expected {
        bail!("expected {what} {expected:?}, got {actual:?}");
    }
    Ok(())
}
