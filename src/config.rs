//! Optional user configuration (`config.toml`).

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 64 * 1024;

pub const DEFAULT_PROMPT: &str = "> ";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub log: String,
    /// Print the stored formula next to the value for `get`.
    pub echo_formulas: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            log: DEFAULT_LOG_FILTER.to_string(),
            echo_formulas: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    prompt: Option<String>,
    log: Option<String>,
    echo_formulas: Option<bool>,
}

impl ConfigFile {
    fn apply(self, config: &mut Config) {
        if let Some(prompt) = self.prompt {
            config.prompt = prompt;
        }
        if let Some(log) = self.log.filter(|s| !s.trim().is_empty()) {
            config.log = log;
        }
        if let Some(echo) = self.echo_formulas {
            config.echo_formulas = echo;
        }
    }
}

/// Load the config from `explicit`, or from the user's config dir.
///
/// Never fails: problems come back as warnings and defaults are kept.
/// A missing default file is silent; a missing explicit file is a warning.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut config = Config::default();
    let mut warnings = Vec::new();

    let path = match explicit.map(Path::to_path_buf).or_else(user_config_path) {
        Some(path) => path,
        None => return (config, warnings),
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (config, warnings);
    }

    match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<ConfigFile>(&content) {
                Ok(file) => file.apply(&mut config),
                Err(err) => warnings.push(format!("Failed to parse {}: {}", path.display(), err)),
            },
            Err(err) => warnings.push(format!("Failed to read {}: {}", path.display(), err)),
        },
        Err(err) => warnings.push(format!(
            "Failed to read metadata for {}: {}",
            path.display(),
            err
        )),
    }

    (config, warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "canno")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
