use clap::Subcommand;
use tokenearner_core::error::ConfigError;
use tokenearner_core::storage::data_dir;
use tokenearner_core::{Config, StorageBackend};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value
    Get {
        /// Dotted key, e.g. "storage.backend" or "host.open_links"
        key: String,
    },
    /// Change one value and save
    Set { key: String, value: String },
    /// Print every key as `key = value`
    List,
    /// Restore the default configuration
    Reset,
    /// Show where configuration and ledger live
    Paths,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            tracing::info!(%key, "config updated");
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let mut lines = Vec::new();
            flatten("", &serde_json::to_value(&config)?, &mut lines);
            for line in lines {
                println!("{line}");
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Paths => {
            let config = Config::load()?;
            let dir = data_dir()?;
            let ledger = match config.storage.backend {
                StorageBackend::File => dir.join("tokenEarnerData.json").display().to_string(),
                StorageBackend::Sqlite => dir.join("tokenearner.db").display().to_string(),
                StorageBackend::Memory => "(in memory, not persisted)".to_string(),
            };
            println!("config: {}", dir.join("config.toml").display());
            println!("ledger: {ledger}");
        }
    }
    Ok(())
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        serde_json::Value::String(s) => out.push(format!("{prefix} = {s}")),
        other => out.push(format!("{prefix} = {other}")),
    }
}
