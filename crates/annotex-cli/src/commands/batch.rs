//! Batch command - encode many text files into a training dataset.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use annotex_core::dataset::{DatasetBuilder, DatasetDocument, ImportManifest, SplitPlan};
use annotex_core::models::value::ExpectedValues;
use annotex_core::DirectorySink;

use super::encode::MatcherArgs;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input text files or glob pattern
    #[arg(required = true)]
    input: String,

    /// JSON object mapping file stem to its expected values
    #[arg(long)]
    values: PathBuf,

    /// Output directory for records and the import manifest
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Prefix for manifest URIs (overrides config)
    #[arg(long)]
    uri_prefix: Option<String>,

    /// Share of documents for VALIDATION (overrides config)
    #[arg(long)]
    validation: Option<f32>,

    /// Share of documents for TEST (overrides config)
    #[arg(long)]
    test: Option<f32>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    #[command(flatten)]
    matchers: MatcherArgs,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::config::load(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let content = fs::read_to_string(&args.values)?;
    let all_values: HashMap<String, ExpectedValues> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid values file {}: {}", args.values.display(), e))?;

    // Pair each file with its values; files without values are skipped
    let mut docs = Vec::with_capacity(files.len());
    let mut skipped = 0usize;
    for path in &files {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        match all_values.get(&name) {
            Some(values) => docs.push(DatasetDocument {
                name,
                text: fs::read_to_string(path)?,
                values: values.clone(),
            }),
            None => {
                warn!("No expected values for {}, skipping", path.display());
                skipped += 1;
            }
        }
    }

    if docs.is_empty() {
        anyhow::bail!("None of the {} input files has expected values", files.len());
    }

    println!(
        "{} Found {} documents to encode",
        style("ℹ").blue(),
        docs.len()
    );

    let plan = SplitPlan::new(
        args.validation.unwrap_or(config.dataset.validation_fraction),
        args.test.unwrap_or(config.dataset.test_fraction),
    )?;
    let field_names: Vec<&str> = docs
        .iter()
        .flat_map(|d| d.values.keys().map(String::as_str))
        .collect();
    let matchers = args.matchers.build(&config, field_names);

    let builder = DatasetBuilder::new(&matchers)
        .with_plan(plan)
        .with_uri_prefix(
            args.uri_prefix
                .clone()
                .unwrap_or_else(|| config.dataset.uri_prefix.clone()),
        )
        .with_manifest_name(config.dataset.manifest_name.clone());

    fs::create_dir_all(&args.output_dir)?;
    let sink = DirectorySink::new(&args.output_dir);

    let pb = ProgressBar::new(docs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    let mut manifest = ImportManifest::new();
    let mut failed = 0usize;
    let mut unmatched = 0usize;

    for (doc, split) in docs.iter().zip(plan.assign(docs.len())) {
        match builder.write_document(doc, split, &sink) {
            Ok((row, report)) => {
                debug!(
                    "{}: {} annotations ({})",
                    doc.name,
                    report.matched(),
                    row.split
                );
                unmatched += report.unmatched.len();
                manifest.push(row.split, row.uri);
            }
            Err(e) => {
                failed += 1;
                error!("Failed to encode {}: {}", doc.name, e);
                if !args.continue_on_error {
                    pb.abandon();
                    return Err(e.into());
                }
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    builder.write_manifest(&manifest, &sink)?;

    println!();
    println!("{}", style("Batch Summary").bold().underlined());
    println!("  Records written: {}", style(manifest.len()).green());
    if failed > 0 {
        println!("  Failed:          {}", style(failed).red());
    }
    if skipped > 0 {
        println!("  Skipped:         {}", style(skipped).yellow());
    }
    println!("  Fields not found: {}", unmatched);
    println!(
        "  Manifest:        {}",
        args.output_dir.join(&config.dataset.manifest_name).display()
    );
    println!("  Total time:      {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
