//! Decode command - read field values from a prediction response.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use indexmap::IndexMap;
use tracing::info;

use annotex_core::models::annotation::parse_predictions;
use annotex_core::AnnotationCodec;

/// Arguments for the decode command.
#[derive(Args)]
pub struct DecodeArgs {
    /// Text the predictions were made on
    #[arg(short, long)]
    text: PathBuf,

    /// Prediction response (JSON array, or object with a "payload" array)
    #[arg(short, long)]
    predictions: PathBuf,

    /// Field to extract
    #[arg(short, long, required_unless_present = "all", conflicts_with = "all")]
    field: Option<String>,

    /// Extract every predicted field
    #[arg(long)]
    all: bool,

    /// Value printed when the field has no prediction
    #[arg(short, long, conflicts_with = "all")]
    default: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text
    Text,
}

pub fn run(args: DecodeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;

    let text = fs::read_to_string(&args.text)?;
    let predictions = fs::read_to_string(&args.predictions)?;
    let results = parse_predictions(&predictions).map_err(|e| {
        anyhow::anyhow!("Invalid predictions file {}: {}", args.predictions.display(), e)
    })?;

    info!("Loaded {} predictions", results.len());

    let codec = AnnotationCodec::new();
    let default = args.default.or(config.decode.default_value);

    let values: IndexMap<String, Option<String>> = match &args.field {
        Some(field) => {
            let value = codec
                .decode_field(&text, &results, field)
                .or_else(|| default.clone());
            IndexMap::from([(field.clone(), value)])
        }
        None => codec
            .decode_all(&text, &results)
            .into_iter()
            .map(|(k, v)| (k, Some(v)))
            .collect(),
    };

    // Absence is only an error when asked for one field with no default
    if let Some(field) = &args.field {
        if values.get(field).is_some_and(|v| v.is_none()) {
            anyhow::bail!("No prediction for field {}", field);
        }
    }

    print!("{}", format_values(&values, args.format, args.field.is_some())?);

    Ok(())
}

fn format_values(
    values: &IndexMap<String, Option<String>>,
    format: OutputFormat,
    single: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(values)?)),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["field", "value"])?;
            for (field, value) in values {
                writer.write_record([field.as_str(), value.as_deref().unwrap_or("")])?;
            }
            let bytes = writer.into_inner().map_err(|e| e.into_error())?;
            Ok(String::from_utf8(bytes)?)
        }
        OutputFormat::Text if single => Ok(values
            .values()
            .map(|v| format!("{}\n", v.as_deref().unwrap_or("")))
            .collect()),
        OutputFormat::Text => Ok(values
            .iter()
            .map(|(k, v)| format!("{}: {}\n", k, v.as_deref().unwrap_or("")))
            .collect()),
    }
}
