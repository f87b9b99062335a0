use std::{fs, path::Path};

use anyhow::{Context, Result};
use snake_survival_core::MatchConfig;

/// Loads the match configuration, falling back to defaults without a file.
pub(crate) fn load(path: Option<&Path>) -> Result<MatchConfig> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read match config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid match config at {}", path.display()))
}

pub(crate) fn parse(contents: &str) -> Result<MatchConfig> {
    let config: MatchConfig =
        toml::from_str(contents).context("failed to parse match config toml contents")?;
    config.validate()?;
    Ok(config)
}
