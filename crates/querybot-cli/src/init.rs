//! `querybot init` — write a default config file to fill in.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use querybot_core::config::{load_config, save_config};

/// Create the config file if it doesn't exist yet. Returns whether it was created.
pub fn run(config_path: &Path) -> Result<bool> {
    println!();
    println!("{}", "🔎 Querybot — Setup".cyan().bold());
    println!();

    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
        return Ok(false);
    }

    // Missing file: defaults plus whatever the environment already provides.
    let config = load_config(Some(config_path));
    save_config(&config, Some(config_path))
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    println!(
        "  {} created config at {}",
        "✓".green(),
        config_path.display()
    );
    println!();
    println!(
        "{}",
        "  Fill in provider credentials, then run `querybot status`.".green()
    );
    println!();

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert!(run(&path).unwrap());
        assert!(path.exists());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"providers\""));
        assert!(contents.contains("\"timeoutSecs\""));

        assert!(!run(&path).unwrap());
    }
}
