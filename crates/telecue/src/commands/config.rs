use std::path::Path;

use anyhow::Result;

use telecue_core::AppConfig;

pub fn path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}

/// Write a configuration file with every default spelled out
pub fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        println!("Configuration already exists at {}", config_path.display());
        println!("\nTo overwrite it with defaults, run:");
        println!("  telecue config init --force");
        return Ok(());
    }

    AppConfig::default().save_to(config_path)?;
    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}
