//! Show or write the configuration file.

use std::path::Path;

use irisflow_common::config::{config_file_path, AppConfig};

/// `unreadable` marks a config file that exists but failed to load; it is
/// never overwritten with the defaults that replaced it.
pub fn run(config: &AppConfig, write: bool, unreadable: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    println!("Config file: {}", path.display());

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
    println!("{json}");

    if write {
        ensure_writable(&path, unreadable)?;
        config
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to save config: {e}"))?;
        println!("\nConfig saved to: {}", path.display());
    }

    Ok(())
}

fn ensure_writable(path: &Path, unreadable: bool) -> anyhow::Result<()> {
    if unreadable {
        anyhow::bail!(
            "Refusing to overwrite unreadable config at {}; fix or remove it first",
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_config_is_not_overwritten() {
        let path = Path::new("/nonexistent/irisflow/config.json");
        let err = ensure_writable(path, true).unwrap_err();
        assert!(err.to_string().contains("Refusing to overwrite"));
        assert!(ensure_writable(path, false).is_ok());
    }

    #[test]
    fn test_write_with_unreadable_config_fails_before_saving() {
        assert!(run(&AppConfig::default(), true, true).is_err());
    }
}
