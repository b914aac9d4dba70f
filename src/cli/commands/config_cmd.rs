//! Configuration management commands.

use std::path::Path;

use console::style;

use crate::cli::icons::{error, success};
use crate::config::{Config, DEFAULT_CONFIG_FILENAME};

/// Print the effective configuration as JSON.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    eprintln!("{} Source: {}", style("→").dim(), source);

    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// Write a default config file.
pub async fn cmd_config_init(output: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = output.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILENAME));

    if path.exists() && !force {
        eprintln!(
            "{} {} already exists (use --force to overwrite)",
            error(),
            path.display()
        );
        anyhow::bail!("Config file already exists: {}", path.display());
    }

    let contents = Config::default().to_toml()?;
    tokio::fs::write(path, contents).await?;

    eprintln!("{} Wrote {}", success(), path.display());
    Ok(())
}
