use crate::config::Config;
use color_eyre::eyre::{Context, Result};
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .with_context(|| format!("Failed to open config file {}", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub region_size: Option<usize>,
    pub num_compromised: Option<usize>,
    pub rng_seed: Option<u64>,
    pub seed_identity_sample_size: Option<usize>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(region_size) = overrides.region_size {
        info!("Overriding Sybil region size: {}", region_size);
        config.attack.region_size = region_size;
    }

    if let Some(num_compromised) = overrides.num_compromised {
        info!("Overriding compromised identity count: {}", num_compromised);
        config.attack.num_compromised = num_compromised;
    }

    if let Some(rng_seed) = overrides.rng_seed {
        info!("Overriding RNG seed: {}", rng_seed);
        config.experiment.rng_seed = rng_seed;
    }

    if let Some(sample_size) = overrides.seed_identity_sample_size {
        info!("Overriding seed identity sample size: {}", sample_size);
        config.experiment.seed_identity_sample_size = sample_size;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_file() {
        let yaml = r#"
attack:
  num_compromised: 3
  region_size: 7
experiment:
  rng_seed: 99
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.attack.num_compromised, 3);
        assert_eq!(config.attack.region_size, 7);
        assert_eq!(config.experiment.rng_seed, 99);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let yaml = r#"
solver:
  tol: -1.0
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_config(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.yaml"));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let overrides = CliOverrides {
            region_size: Some(200),
            rng_seed: Some(7),
            ..Default::default()
        };

        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.attack.region_size, 200);
        assert_eq!(config.attack.num_compromised, 100);
        assert_eq!(config.experiment.rng_seed, 7);
    }

    #[test]
    fn test_overrides_are_validated() {
        let mut config = Config::default();
        let overrides = CliOverrides {
            seed_identity_sample_size: Some(0),
            ..Default::default()
        };
        assert!(apply_overrides(&mut config, &overrides).is_err());
    }
}
