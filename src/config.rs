use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::rules::{Rule, custom_rule, default_rules};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub use_default_rules: bool,
    #[serde(default)]
    pub replacements: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_default_rules: true,
            replacements: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("DESLOP_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("deslop.toml")
}

pub fn load_config() -> Config {
    let path = config_path();
    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to parse {path:?}: {e}");
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

/// Builds the effective ordered rule list: the built-in table (unless
/// disabled) followed by user replacements. User entries come out of an
/// unordered map, so they are sorted longest phrase first to keep the order
/// fixed and to let multi-word entries win over their prefixes.
pub fn compile_rules(config: &Config) -> Vec<Rule> {
    let mut rules = if config.use_default_rules {
        default_rules()
    } else {
        Vec::new()
    };

    let mut custom: Vec<(&str, &str)> = config
        .replacements
        .iter()
        .filter(|(from, _)| !from.trim().is_empty())
        .map(|(from, to)| (from.as_str(), to.as_str()))
        .collect();
    custom.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

    for (from, to) in custom {
        rules.push(custom_rule(from, to));
    }

    debug!("{} replacement rules active", rules.len());
    rules
}
