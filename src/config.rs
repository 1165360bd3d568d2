use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// The five layout strategies. `mode` persists as the bare index, so the
/// variants are pinned to their wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Forecast = 0,
    Alert = 1,
    Graph = 2,
    SunriseSunset = 3,
    DayCurve = 4,
}

impl RenderMode {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(n: u8) -> Option<Self> {
        match n {
            0 => Some(RenderMode::Forecast),
            1 => Some(RenderMode::Alert),
            2 => Some(RenderMode::Graph),
            3 => Some(RenderMode::SunriseSunset),
            4 => Some(RenderMode::DayCurve),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Metric,
    Imperial,
}

impl Unit {
    pub fn toggled(self) -> Self {
        match self {
            Unit::Metric => Unit::Imperial,
            Unit::Imperial => Unit::Metric,
        }
    }

    /// Value the weather API expects in its `units` parameter.
    pub fn api_str(self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelSize {
    Small,
    Large,
}

/// Persisted device settings, one flat key/value document.
///
/// Key names match the on-disk contract, not Rust conventions. The
/// controller is the only writer; the orchestrator reads one snapshot
/// per render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "LAT")]
    pub lat: String,
    #[serde(rename = "LON")]
    pub lon: String,
    #[serde(rename = "API_KEY")]
    pub api_key: String,
    #[serde(rename = "mode", serialize_with = "ser_mode", deserialize_with = "de_mode")]
    pub mode: RenderMode,
    #[serde(rename = "TEMP_UNIT")]
    pub unit: Unit,
    #[serde(rename = "FORECAST_INTERVAL", deserialize_with = "de_hours")]
    pub forecast_interval: u32,
    #[serde(rename = "LANG")]
    pub lang: String,
    #[serde(rename = "INKY_SIZE")]
    pub panel: PanelSize,
    #[serde(rename = "MODE2_RAIN", deserialize_with = "de_bool")]
    pub rain_overlay: bool,
    #[serde(rename = "MODE2_PRESSURE", deserialize_with = "de_bool")]
    pub pressure_overlay: bool,
    #[serde(rename = "cold_temp")]
    pub cold_temp: f64,
    #[serde(rename = "hot_temp")]
    pub hot_temp: f64,
    /// Shown once on the next render, then cleared in the store.
    #[serde(rename = "one_time_message", default)]
    pub one_time_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lat: "51.5072".to_string(),
            lon: "-0.1276".to_string(),
            api_key: String::new(),
            mode: RenderMode::Forecast,
            unit: Unit::Metric,
            forecast_interval: 3,
            lang: "EN".to_string(),
            panel: PanelSize::Small,
            rain_overlay: false,
            pressure_overlay: false,
            cold_temp: 0.0,
            hot_temp: 30.0,
            one_time_message: String::new(),
        }
    }
}

fn ser_mode<S: Serializer>(mode: &RenderMode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(mode.index())
}

fn de_mode<'de, D: Deserializer<'de>>(d: D) -> Result<RenderMode, D::Error> {
    // hand-edited documents carry either `2` or `"2"`
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u8),
        Str(String),
    }
    let n = match Raw::deserialize(d)? {
        Raw::Int(n) => n,
        Raw::Str(s) => s
            .trim()
            .parse::<u8>()
            .map_err(|_| de::Error::custom(format!("mode is not a number: {s:?}")))?,
    };
    RenderMode::from_index(n).ok_or_else(|| de::Error::custom(format!("mode out of range 0-4: {n}")))
}

fn de_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Str(String),
    }
    match Raw::deserialize(d)? {
        Raw::Bool(b) => Ok(b),
        Raw::Int(n) => Ok(n != 0),
        Raw::Str(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "t" => Ok(true),
            "0" | "false" | "no" | "n" | "f" | "" => Ok(false),
            other => Err(de::Error::custom(format!("expected boolean, got {other:?}"))),
        },
    }
}

fn de_hours<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Str(String),
    }
    match Raw::deserialize(d)? {
        Raw::Int(n) => Ok(n),
        Raw::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("interval is not a number: {s:?}"))),
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.forecast_interval == 0 {
        return Err(ConfigError::Validation(
            "FORECAST_INTERVAL must be at least 1 hour".into(),
        ));
    }
    if cfg.cold_temp > cfg.hot_temp {
        return Err(ConfigError::Validation(format!(
            "cold_temp ({}) must not exceed hot_temp ({})",
            cfg.cold_temp, cfg.hot_temp
        )));
    }
    Ok(())
}

/// Explicit load/save access to the persisted document. Writers go
/// through `save`; the last write wins.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let s = fs::read_to_string(&self.path)?;
        let cfg: Config = serde_yaml::from_str(&s)?;
        validate(&cfg)?;
        Ok(cfg)
    }

    pub fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        let s = serde_yaml::to_string(cfg)?;
        fs::write(&self.path, s)?;
        Ok(())
    }

    /// Drop the one-shot message after it has been rendered once.
    pub fn clear_one_time_message(&self) -> Result<(), ConfigError> {
        let mut cfg = self.load()?;
        if !cfg.one_time_message.is_empty() {
            cfg.one_time_message.clear();
            self.save(&cfg)?;
        }
        Ok(())
    }
}

/// Try common locations in order (first hit wins).
pub fn find_config_file() -> Option<PathBuf> {
    if let Some(home) = home_dir() {
        let p = home.join(".config/inkwx/config.yaml");
        if p.exists() {
            return Some(p);
        }
        let p = home.join(".config/inkwx.yaml");
        if p.exists() {
            return Some(p);
        }
    }
    for candidate in &["inkwx.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return Some(p);
        }
    }
    None
}

/// CLI surface. Settings live in the config document; the flags here
/// only locate it and steer the process.
#[derive(Debug, Parser, Clone)]
#[command(name = "inkwx", about = "Inky Impression weather display daemon")]
pub struct Cli {
    /// Path to the YAML config document (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Run exactly one render cycle, then exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub once: bool,
    /// Dump the parsed config and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn store_with(cfg: &Config) -> (NamedTempFile, ConfigStore) {
        let f = NamedTempFile::new().unwrap();
        let store = ConfigStore::new(f.path());
        store.save(cfg).unwrap();
        (f, store)
    }

    #[test]
    fn round_trips_through_yaml() {
        let mut cfg = Config::default();
        cfg.mode = RenderMode::Graph;
        cfg.unit = Unit::Imperial;
        cfg.rain_overlay = true;
        cfg.one_time_message = "MODE:Graph".to_string();
        let (_f, store) = store_with(&cfg);
        assert_eq!(store.load().unwrap(), cfg);
    }

    #[test]
    fn document_uses_contract_key_names() {
        let s = serde_yaml::to_string(&Config::default()).unwrap();
        for key in [
            "LAT", "LON", "API_KEY", "mode", "TEMP_UNIT", "FORECAST_INTERVAL", "LANG",
            "INKY_SIZE", "MODE2_RAIN", "MODE2_PRESSURE", "cold_temp", "hot_temp",
            "one_time_message",
        ] {
            assert!(s.contains(key), "missing key {key} in:\n{s}");
        }
    }

    #[test]
    fn accepts_stringly_typed_scalars() {
        let doc = r#"
LAT: "35.68"
LON: "139.69"
API_KEY: abc123
mode: "3"
TEMP_UNIT: imperial
FORECAST_INTERVAL: "6"
LANG: EN
INKY_SIZE: large
MODE2_RAIN: "true"
MODE2_PRESSURE: "false"
cold_temp: 3.5
hot_temp: 28.0
one_time_message: ""
"#;
        let cfg: Config = serde_yaml::from_str(doc).unwrap();
        assert_eq!(cfg.mode, RenderMode::SunriseSunset);
        assert_eq!(cfg.forecast_interval, 6);
        assert!(cfg.rain_overlay);
        assert!(!cfg.pressure_overlay);
        assert_eq!(cfg.panel, PanelSize::Large);
    }

    #[test]
    fn rejects_out_of_range_mode() {
        let mut doc = serde_yaml::to_string(&Config::default()).unwrap();
        doc = doc.replace("mode: 0", "mode: 9");
        assert!(serde_yaml::from_str::<Config>(&doc).is_err());
    }

    #[test]
    fn validation_rejects_zero_interval() {
        let mut cfg = Config::default();
        cfg.forecast_interval = 0;
        let f = NamedTempFile::new().unwrap();
        let store = ConfigStore::new(f.path());
        store.save(&cfg).unwrap();
        assert!(matches!(store.load(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn one_time_message_clears_once() {
        let mut cfg = Config::default();
        cfg.one_time_message = "Unit:Metric".to_string();
        let (_f, store) = store_with(&cfg);

        store.clear_one_time_message().unwrap();
        assert!(store.load().unwrap().one_time_message.is_empty());

        // idempotent on an already-empty message
        store.clear_one_time_message().unwrap();
        assert!(store.load().unwrap().one_time_message.is_empty());
    }

    #[test]
    fn unit_toggle_round_trips() {
        assert_eq!(Unit::Imperial.toggled().toggled(), Unit::Imperial);
        assert_eq!(Unit::Metric.toggled(), Unit::Imperial);
    }

    #[test]
    fn mode_indices_are_stable() {
        for n in 0..=4 {
            assert_eq!(RenderMode::from_index(n).unwrap().index(), n);
        }
        assert!(RenderMode::from_index(5).is_none());
    }
}
