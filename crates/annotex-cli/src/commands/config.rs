//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use tracing::debug;

use annotex_core::models::config::AnnotexConfig;

/// Environment variable overriding the default config file location.
pub const CONFIG_ENV: &str = "ANNOTEX_CONFIG";

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one setting by dotted key (e.g., "dataset.test_fraction")
    Get { key: String },

    /// Change one setting; the value is parsed as JSON, else taken as a string
    Set { key: String, value: String },

    /// Print where the configuration file lives
    Path,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let file = ConfigFile::resolve(config_path);

    match args.command {
        ConfigCommand::Show => {
            if !file.path.exists() {
                eprintln!(
                    "{} {} does not exist, showing defaults",
                    style("ℹ").blue(),
                    file.path.display()
                );
            }
            println!("{}", serde_json::to_string_pretty(&file.read()?)?);
        }
        ConfigCommand::Init { force } => {
            if file.path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    file.path.display()
                );
            }
            file.write(&AnnotexConfig::default())?;
            println!("{} Created {}", style("✓").green(), file.path.display());
        }
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(file.read()?)?;
            println!("{}", serde_json::to_string_pretty(lookup(&json, &key)?)?);
        }
        ConfigCommand::Set { key, value } => {
            let value: Value =
                serde_json::from_str(&value).unwrap_or_else(|_| Value::String(value.clone()));
            let mut json = serde_json::to_value(file.read()?)?;
            assign(&mut json, &key, value.clone())?;

            let config: AnnotexConfig = serde_json::from_value(json)?;
            config.validate()?;
            file.write(&config)?;
            println!("{} {} = {}", style("✓").green(), key, value);
        }
        ConfigCommand::Path => {
            let status = if file.path.exists() {
                style("exists").green()
            } else {
                style("not created, run 'annotex config init'").yellow()
            };
            println!("{} ({})", file.path.display(), status);
        }
    }

    Ok(())
}

pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("annotex")
        .join("config.json")
}

/// Load the explicit config file, else the default one if it exists,
/// else built-in defaults.
pub fn load(config_path: Option<&str>) -> anyhow::Result<AnnotexConfig> {
    match config_path {
        Some(path) => {
            debug!("Loading config from {}", path);
            Ok(AnnotexConfig::from_file(Path::new(path))?)
        }
        None => ConfigFile::resolve(None).read(),
    }
}

/// The config file the `config` subcommands read and write.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    fn resolve(config_path: Option<&str>) -> Self {
        let path = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);
        Self { path }
    }

    /// Missing file reads as defaults.
    fn read(&self) -> anyhow::Result<AnnotexConfig> {
        if self.path.exists() {
            debug!("Loading config from {}", self.path.display());
            Ok(AnnotexConfig::from_file(&self.path)?)
        } else {
            debug!("No config at {}, using defaults", self.path.display());
            Ok(AnnotexConfig::default())
        }
    }

    fn write(&self, config: &AnnotexConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(config.save(&self.path)?)
    }
}

fn lookup<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |node, part| {
        node.get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// Set a dotted key. Every section before the last part must exist;
/// the last part may be new (e.g. a field under `matchers.fields`).
fn assign(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parent, last) = match key.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, key),
    };

    let mut node = json;
    for part in parent.into_iter().flat_map(|p| p.split('.')) {
        node = node
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }

    match node.as_object_mut() {
        Some(section) => {
            section.insert(last.to_string(), value);
            Ok(())
        }
        None => anyhow::bail!("{} is not a configuration section", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_key() {
        let json = json!({"dataset": {"test_fraction": 0.1}});
        assert_eq!(lookup(&json, "dataset.test_fraction").unwrap(), &json!(0.1));
        assert!(lookup(&json, "dataset.missing").is_err());
    }

    #[test]
    fn test_assign_adds_new_leaf() {
        let mut json = json!({"matchers": {"fields": {}}});
        assign(&mut json, "matchers.fields.price", json!("numeric")).unwrap();
        assert_eq!(json["matchers"]["fields"]["price"], "numeric");
    }

    #[test]
    fn test_assign_rejects_missing_section_and_scalar_parent() {
        let mut json = json!({"dataset": {"test_fraction": 0.1}});
        assert!(assign(&mut json, "nope.value", json!(1)).is_err());
        assert!(assign(&mut json, "dataset.test_fraction.x", json!(1)).is_err());
    }

    #[test]
    fn test_explicit_path_wins_over_default() {
        let file = ConfigFile::resolve(Some("custom.json"));
        assert_eq!(file.path, PathBuf::from("custom.json"));
    }
}
