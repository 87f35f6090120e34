use crate::domain::constants::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub predict: PredictSection,
    #[serde(default)]
    pub audit: AuditSection,
    #[serde(default)]
    pub stream: StreamSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct ServerSection {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PredictSection {
    pub reveal_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AuditSection {
    pub generate_samples: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct StreamSection {
    pub interval_ms: Option<u64>,
    pub batch_size: Option<u32>,
    pub drift_probability: Option<f64>,
    pub drift_shift: Option<f64>,
}

/// Effective settings after defaults, config file, environment and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub timeout_ms: u64,
    pub reveal_delay_ms: u64,
    pub generate_samples: u32,
    pub audit_samples: u32,
    pub stream_interval_ms: u64,
    pub stream_batch_size: u32,
    pub drift_probability: f64,
    pub drift_shift: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
            generate_samples: DEFAULT_GENERATE_SAMPLES,
            audit_samples: DEFAULT_AUDIT_SAMPLES,
            stream_interval_ms: DEFAULT_STREAM_INTERVAL_MS,
            stream_batch_size: DEFAULT_STREAM_BATCH_SIZE,
            drift_probability: DEFAULT_DRIFT_PROBABILITY,
            drift_shift: DEFAULT_DRIFT_SHIFT,
        }
    }
}

/// Values given on the command line (clap also folds `RVL_*` env vars in).
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl Settings {
    pub fn resolve(file: &ConfigFile, overrides: &Overrides) -> anyhow::Result<Self> {
        let mut s = Settings::default();
        if let Some(v) = &file.server.base_url {
            s.base_url = v.clone();
        }
        if let Some(v) = file.server.timeout_ms {
            s.timeout_ms = v;
        }
        if let Some(v) = file.predict.reveal_delay_ms {
            s.reveal_delay_ms = v;
        }
        if let Some(v) = file.audit.generate_samples {
            s.audit_samples = v;
        }
        if let Some(v) = file.stream.interval_ms {
            s.stream_interval_ms = v;
        }
        if let Some(v) = file.stream.batch_size {
            s.stream_batch_size = v;
        }
        if let Some(v) = file.stream.drift_probability {
            s.drift_probability = v;
        }
        if let Some(v) = file.stream.drift_shift {
            s.drift_shift = v;
        }

        if let Some(v) = &overrides.base_url {
            s.base_url = v.clone();
        }
        if let Some(v) = overrides.timeout_ms {
            s.timeout_ms = v;
        }
        s.validate()?;
        Ok(s)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("base url must start with http:// or https://: {}", url);
        }
        if self.timeout_ms == 0 {
            anyhow::bail!("timeout_ms must be positive");
        }
        check_stream(self.stream_batch_size, self.drift_probability)
    }

    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }
}

/// A zero interval is allowed and screens batches back to back.
pub fn check_stream(batch_size: u32, drift_probability: f64) -> anyhow::Result<()> {
    if batch_size == 0 {
        anyhow::bail!("stream batch size must be positive");
    }
    if !(0.0..=1.0).contains(&drift_probability) {
        anyhow::bail!(
            "drift probability must be between 0 and 1, got {}",
            drift_probability
        );
    }
    Ok(())
}

pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/rvl"))
}

pub fn config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_config_file(path: &Path) -> anyhow::Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))
}

pub fn load_settings(overrides: &Overrides) -> anyhow::Result<Settings> {
    let file = load_config_file(&config_path()?)?;
    Settings::resolve(&file, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_flags() {
        let s = Settings::resolve(&ConfigFile::default(), &Overrides::default()).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.base_url, "http://localhost:8000");
        assert_eq!(s.stream_interval(), Duration::from_secs(2));
    }

    #[test]
    fn flags_beat_file_values() {
        let file: ConfigFile = toml::from_str(
            r#"
[server]
base_url = "http://verifier.internal:9000"
timeout_ms = 2500

[stream]
batch_size = 50
drift_probability = 0.1
"#,
        )
        .unwrap();
        let s = Settings::resolve(
            &file,
            &Overrides {
                base_url: Some("https://override.example".to_string()),
                timeout_ms: None,
            },
        )
        .unwrap();
        assert_eq!(s.base_url, "https://override.example");
        assert_eq!(s.timeout_ms, 2500);
        assert_eq!(s.stream_batch_size, 50);
        assert_eq!(s.drift_probability, 0.1);
        assert_eq!(s.drift_shift, DEFAULT_DRIFT_SHIFT);
    }

    #[test]
    fn rejects_bad_values() {
        let bad_url = Overrides {
            base_url: Some("localhost:8000".to_string()),
            timeout_ms: None,
        };
        assert!(Settings::resolve(&ConfigFile::default(), &bad_url).is_err());

        let file: ConfigFile = toml::from_str("[stream]\ndrift_probability = 1.5\n").unwrap();
        assert!(Settings::resolve(&file, &Overrides::default()).is_err());
    }

    #[test]
    fn missing_file_means_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = load_config_file(&tmp.path().join("nope.toml")).unwrap();
        assert!(cfg.server.base_url.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let p = tmp.path().join("config.toml");
        std::fs::write(&p, "[server\nbase_url = 1").unwrap();
        assert!(load_config_file(&p).is_err());
    }
}
