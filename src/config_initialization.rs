//! Configuration initialization and hierarchy management

use std::path::Path;

use tracing::info;

use crate::adapters::{Settings, TomlConfigAdapter};
use crate::cli::{Cli, Commands};
use crate::domain::model::DividePolicy;
use crate::error::{SplitClipError, SplitClipResult};

/// Config files tried, in order, when `--config` is not given
const DEFAULT_CONFIG_PATHS: &[&str] = &["splitclip.toml", "config/splitclip.toml"];

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> SplitClipResult<Settings> {
    let mut adapter = TomlConfigAdapter::new();

    match &cli.config {
        Some(path) => adapter.load_file(path)?,
        None => {
            if let Some(path) = DEFAULT_CONFIG_PATHS
                .iter()
                .map(Path::new)
                .find(|path| path.is_file())
            {
                adapter.load_file(path)?;
            }
        }
    }

    let env_overrides = adapter.apply_env()?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    apply_cli_configuration_overrides(&mut adapter, cli)?;

    let settings = adapter.settings().clone();
    settings.validate()?;
    Ok(settings)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_configuration_overrides(adapter: &mut TomlConfigAdapter, cli: &Cli) -> SplitClipResult<()> {
    if let Some(level) = &cli.log_level {
        adapter.set("log_level", level)?;
    }
    if let Some(preset) = &cli.preset {
        adapter.set("preset", preset)?;
    }
    if let Some(composition) = &cli.composition {
        adapter.set("composition", composition)?;
    }
    if let Commands::Divide(args) = &cli.command {
        if let Some(policy) = &args.policy {
            adapter.set("divide_policy", policy)?;
        }
        if let Some(delay) = args.delay_ms {
            adapter.set("divide_delay_ms", &delay.to_string())?;
            if adapter.settings().divide_policy()? == DividePolicy::Sequential {
                return Err(SplitClipError::ConfigError {
                    message: "--delay-ms only applies to the fixed-delay divide policy".to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;

    use crate::domain::model::{Composition, Preset};

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("splitclip.toml");
        std::fs::write(&path, "[splitclip]\npreset = \"medium\"\ndivide_policy = \"sequential\"\n").unwrap();

        let cli = Cli::parse_from([
            "splitclip",
            "--config",
            path.to_str().unwrap(),
            "--preset",
            "low-quality",
            "divide",
            "--input",
            "clip.mp4",
            "--policy",
            "fixed-delay",
            "--delay-ms",
            "20",
        ]);
        let settings = initialize_configuration_hierarchy(&cli).unwrap();

        assert_eq!(settings.export_configuration().unwrap().preset, Preset::LowQuality);
        assert_eq!(
            settings.divide_policy().unwrap(),
            DividePolicy::FixedDelay(Duration::from_millis(20))
        );
    }

    #[test]
    fn test_delay_without_fixed_delay_policy_is_rejected() {
        let cli = Cli::parse_from(["splitclip", "divide", "--input", "clip.mp4", "--delay-ms", "20"]);
        let err = initialize_configuration_hierarchy(&cli).unwrap_err();
        assert!(err.to_string().contains("fixed-delay"));
    }

    #[test]
    fn test_delay_accepted_when_file_selects_fixed_delay() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("splitclip.toml");
        std::fs::write(&path, "[splitclip]\ndivide_policy = \"fixed-delay\"\n").unwrap();

        let cli = Cli::parse_from([
            "splitclip",
            "--config",
            path.to_str().unwrap(),
            "divide",
            "--input",
            "clip.mp4",
            "--delay-ms",
            "40",
        ]);
        let settings = initialize_configuration_hierarchy(&cli).unwrap();
        assert_eq!(
            settings.divide_policy().unwrap(),
            DividePolicy::FixedDelay(Duration::from_millis(40))
        );
    }

    #[test]
    fn test_cli_composition_override() {
        let cli = Cli::parse_from([
            "splitclip",
            "--composition",
            "reencode",
            "--preset",
            "medium",
            "trim",
            "--input",
            "clip.mp4",
            "--start",
            "0",
            "--end",
            "1",
        ]);
        let export = initialize_configuration_hierarchy(&cli)
            .unwrap()
            .export_configuration()
            .unwrap();
        assert_eq!(export.composition, Composition::Reencode);
        assert_eq!(export.preset, Preset::Medium);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let cli = Cli::parse_from([
            "splitclip",
            "--config",
            "/nonexistent/splitclip.toml",
            "divide",
            "--input",
            "clip.mp4",
        ]);
        assert!(initialize_configuration_hierarchy(&cli).is_err());
    }
}
