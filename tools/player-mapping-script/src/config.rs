use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a mapping run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Provider discriminator stamped on every mapped row (e.g., "fantasypros")
    pub source: String,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,

    pub input: InputConfig,

    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Canonical Sleeper player dump
    pub players_path: PathBuf,

    /// Provider rows to reconcile
    pub records_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the mapping report is written
    pub report_path: PathBuf,

    /// How many unmatched rows to log and keep in the report
    pub unmatched_sample: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            source: "fantasypros".to_string(),
            log_level: "info".to_string(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            players_path: PathBuf::from("data/players/sleeper_players.json"),
            records_path: PathBuf::from("data/fantasypros/projections.json"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("data/mappings/player_mapping.json"),
            unmatched_sample: 25,
        }
    }
}

/// Command-line values that take precedence over file and environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub players: Option<PathBuf>,
    pub records: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub source: Option<String>,
    pub unmatched_sample: Option<usize>,
}

impl MappingConfig {
    /// Defaults, then config file, then environment, then command line
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        Self::load_with(path, overrides, |key| std::env::var(key).ok())
    }

    fn load_with<F>(path: Option<&Path>, overrides: ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup);
        config.apply_cli(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: MappingConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Override with environment variables if present
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("PLAYER_MAPPING_PLAYERS") {
            self.input.players_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("PLAYER_MAPPING_RECORDS") {
            self.input.records_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("PLAYER_MAPPING_OUTPUT") {
            self.output.report_path = PathBuf::from(path);
        }

        if let Some(source) = lookup("PLAYER_MAPPING_SOURCE") {
            self.source = source;
        }
    }

    pub fn apply_cli(&mut self, overrides: ConfigOverrides) {
        if let Some(players) = overrides.players {
            self.input.players_path = players;
        }
        if let Some(records) = overrides.records {
            self.input.records_path = records;
        }
        if let Some(output) = overrides.output {
            self.output.report_path = output;
        }
        if let Some(source) = overrides.source {
            self.source = source;
        }
        if let Some(sample) = overrides.unmatched_sample {
            self.output.unmatched_sample = sample;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            anyhow::bail!("source name must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = MappingConfig::default();
        assert_eq!(config.source, "fantasypros");
        assert_eq!(config.output.unmatched_sample, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
source = "fantasypros-ros"

[output]
unmatched_sample = 5
"#
        )
        .unwrap();

        let config = MappingConfig::from_file(file.path()).unwrap();

        assert_eq!(config.source, "fantasypros-ros");
        assert_eq!(config.output.unmatched_sample, 5);
        assert_eq!(config.output.report_path, OutputConfig::default().report_path);
        assert_eq!(config.input, InputConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(MappingConfig::from_file(Path::new("/nonexistent/mapping.toml")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PLAYER_MAPPING_PLAYERS", "/tmp/players.json"),
            ("PLAYER_MAPPING_SOURCE", "espn"),
        ]
        .into_iter()
        .collect();

        let mut config = MappingConfig::default();
        config.apply_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.input.players_path, PathBuf::from("/tmp/players.json"));
        assert_eq!(config.source, "espn");
        assert_eq!(config.input.records_path, InputConfig::default().records_path);
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_env_beats_file() {
        let file = write_config(
            r#"
source = "file-source"

[input]
players_path = "file/players.json"
records_path = "file/records.json"
"#,
        );
        let env: HashMap<&str, &str> = [("PLAYER_MAPPING_SOURCE", "env-source")].into_iter().collect();

        let config = MappingConfig::load_with(Some(file.path()), ConfigOverrides::default(), |key| {
            env.get(key).map(|value| value.to_string())
        })
        .unwrap();

        assert_eq!(config.source, "env-source");
        assert_eq!(config.input.players_path, PathBuf::from("file/players.json"));
    }

    #[test]
    fn test_cli_beats_env_and_file() {
        let file = write_config(
            r#"
source = "file-source"

[output]
unmatched_sample = 3
"#,
        );
        let env: HashMap<&str, &str> = [
            ("PLAYER_MAPPING_SOURCE", "env-source"),
            ("PLAYER_MAPPING_OUTPUT", "env/report.json"),
            ("PLAYER_MAPPING_RECORDS", "env/records.json"),
        ]
        .into_iter()
        .collect();
        let overrides = ConfigOverrides {
            source: Some("cli-source".to_string()),
            output: Some(PathBuf::from("cli/report.json")),
            unmatched_sample: Some(50),
            ..Default::default()
        };

        let config = MappingConfig::load_with(Some(file.path()), overrides, |key| {
            env.get(key).map(|value| value.to_string())
        })
        .unwrap();

        assert_eq!(config.source, "cli-source");
        assert_eq!(config.output.report_path, PathBuf::from("cli/report.json"));
        assert_eq!(config.output.unmatched_sample, 50);
        assert_eq!(config.input.records_path, PathBuf::from("env/records.json"));
        assert_eq!(config.input.players_path, InputConfig::default().players_path);
    }

    #[test]
    fn test_load_rejects_blank_cli_source() {
        let overrides = ConfigOverrides { source: Some(String::new()), ..Default::default() };
        assert!(MappingConfig::load_with(None, overrides, |_| None).is_err());
    }

    #[test]
    fn test_blank_source_is_rejected() {
        let config = MappingConfig { source: "  ".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = MappingConfig::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: MappingConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, config);
    }
}
