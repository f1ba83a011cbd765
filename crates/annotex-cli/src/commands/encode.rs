//! Encode command - build a training record from one text file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use annotex_core::matchers::{MatcherKind, MatcherSet};
use annotex_core::models::config::{AnnotexConfig, MatcherConfig};
use annotex_core::models::value::ExpectedValues;
use annotex_core::AnnotationCodec;

/// Arguments for the encode command.
#[derive(Args)]
pub struct EncodeArgs {
    /// Text file to annotate
    #[arg(short, long)]
    text: PathBuf,

    /// JSON object of field name to expected value
    #[arg(long)]
    values: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    matchers: MatcherArgs,
}

/// Matcher selection shared by encode and batch.
#[derive(Args)]
pub struct MatcherArgs {
    /// Matcher for a field, as FIELD=KIND (exact, normalized, numeric, date)
    #[arg(short = 'm', long = "matcher", value_parser = parse_matcher_override)]
    pub overrides: Vec<(String, MatcherKind)>,

    /// Matcher for fields without an explicit one
    #[arg(long)]
    pub fallback: Option<MatcherKind>,
}

impl MatcherArgs {
    /// Configured matchers with command-line overrides applied.
    pub fn build<'a>(
        &self,
        config: &AnnotexConfig,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> MatcherSet {
        let mut matcher_config: MatcherConfig = config.matchers.clone();
        for (field, kind) in &self.overrides {
            matcher_config.fields.insert(field.clone(), *kind);
        }
        if self.fallback.is_some() {
            matcher_config.fallback = self.fallback;
        }
        matcher_config.build(fields)
    }
}

fn parse_matcher_override(s: &str) -> Result<(String, MatcherKind), String> {
    let (field, kind) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=KIND, got {:?}", s))?;
    if field.trim().is_empty() {
        return Err("field name must not be empty".to_string());
    }
    Ok((field.trim().to_string(), kind.trim().parse()?))
}

/// Read a JSON object of expected values, keeping its key order.
pub fn read_values(path: &Path) -> anyhow::Result<ExpectedValues> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid values file {}: {}", path.display(), e))
}

pub fn run(args: EncodeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;

    if !args.text.exists() {
        anyhow::bail!("Input file not found: {}", args.text.display());
    }

    let text = fs::read_to_string(&args.text)?;
    let values = read_values(&args.values)?;
    let matchers = args.matchers.build(&config, values.keys().map(String::as_str));

    info!("Encoding {}", args.text.display());

    let report = AnnotationCodec::new().encode_detailed(&text, &values, &matchers)?;
    let line = report.record.to_json_line()?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, format!("{}\n", line))?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", line);
    }

    eprintln!(
        "{} {} annotated, {} not found, {} skipped",
        style("ℹ").blue(),
        report.matched(),
        report.unmatched.len(),
        report.skipped.len()
    );
    for field in &report.unmatched {
        eprintln!("  - {} {}", style("not found:").yellow(), field);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matcher_override() {
        assert_eq!(
            parse_matcher_override("price=numeric"),
            Ok(("price".to_string(), MatcherKind::Numeric))
        );
        assert!(parse_matcher_override("price").is_err());
        assert!(parse_matcher_override("=exact").is_err());
        assert!(parse_matcher_override("price=fuzzy").is_err());
    }
}
