//! Config command - show where settings come from

use std::path::Path;

use anyhow::Result;
use spa_config::Config;

pub fn handle(config: &Config, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::config_path(),
    };
    println!("# {}", path.display());
    println!("{}", render(config)?);
    Ok(())
}

/// Effective config as TOML, with the token masked
fn render(config: &Config) -> Result<String> {
    let mut shown = config.clone();
    if shown.archive.github_token.is_some() {
        shown.archive.github_token = Some("********".to_string());
    }
    Ok(toml::to_string_pretty(&shown)?)
}
