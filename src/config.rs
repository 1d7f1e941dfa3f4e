use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE: &str = "example.db";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuizConfig {
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("quizstore.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<QuizConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: QuizConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &QuizConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Like [`load_config`], but a file that cannot be read or parsed is logged
/// and treated as absent
pub fn load_config_lenient(path: Option<&Path>) -> Option<QuizConfig> {
    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring unusable config: {:#}", e);
            None
        }
    }
}

/// Flag, then config file, then `example.db`
pub fn resolve_database(flag: Option<&Path>, config: Option<&QuizConfig>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    config
        .and_then(|c| c.database.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
}
