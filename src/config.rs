/*
 *  config.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration: defaults, YAML, CLI
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
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

/// Top-level runner configuration. Every field is optional so YAML and
/// CLI layers can be merged Option-by-Option.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// e.g. "info" | "debug"
    pub log_level: Option<String>,
    /// Stop after this many ticks; run until signalled when unset
    pub run_secs: Option<u64>,
    /// PBM written on every flush
    pub snapshot: Option<PathBuf>,
    pub battery: Option<BatteryConfig>,
    pub bluetooth: Option<BluetoothConfig>,
}

/// Simulated battery
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BatteryConfig {
    pub start_percent: Option<u8>,
    pub drain_every_secs: Option<u64>,
    pub charging: Option<bool>,
}

/// Simulated phone link
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BluetoothConfig {
    pub connected: Option<bool>,
    pub toggle_every_secs: Option<u64>,
}

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_START_PERCENT: u8 = 100;
pub const DEFAULT_DRAIN_EVERY_SECS: u64 = 60;

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn battery_start_percent(&self) -> u8 {
        self.battery.as_ref().and_then(|b| b.start_percent).unwrap_or(DEFAULT_START_PERCENT)
    }

    pub fn battery_drain_every_secs(&self) -> u64 {
        self.battery.as_ref().and_then(|b| b.drain_every_secs).unwrap_or(DEFAULT_DRAIN_EVERY_SECS)
    }

    pub fn battery_charging(&self) -> bool {
        self.battery.as_ref().and_then(|b| b.charging).unwrap_or(false)
    }

    pub fn bluetooth_connected(&self) -> bool {
        self.bluetooth.as_ref().and_then(|b| b.connected).unwrap_or(true)
    }

    pub fn bluetooth_toggle_every_secs(&self) -> Option<u64> {
        self.bluetooth.as_ref().and_then(|b| b.toggle_every_secs)
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "hybridface", about = "Hybrid analog/digital watchface", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// shorthand for --log-level debug
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub run_secs: Option<u64>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub snapshot: Option<PathBuf>,
    #[arg(long)]
    pub battery_percent: Option<u8>,
    #[arg(long)]
    pub battery_drain_secs: Option<u64>,
    #[arg(long, action = ArgAction::Set)]
    pub charging: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub bt_connected: Option<bool>,
    #[arg(long)]
    pub bt_toggle_secs: Option<u64>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Outcome of loading: the merged config, and whether to print it and stop
#[derive(Debug)]
pub struct Loaded {
    pub config: Config,
    pub dump: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Loaded, ConfigError> {
    load_from(Cli::parse())
}

pub fn load_from(cli: Cli) -> Result<Loaded, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, &cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(Loaded { config: cfg, dump: cli.dump_config })
}

/// Pretty YAML of the effective config
pub fn dump(cfg: &Config) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(cfg)?)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/hybridface/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/hybridface/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/hybridface.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["hybridface.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    if src.run_secs.is_some()  { dst.run_secs = src.run_secs; }
    if src.snapshot.is_some()  { dst.snapshot = src.snapshot; }
    // battery
    match (&mut dst.battery, src.battery) {
        (None, Some(b)) => dst.battery = Some(b),
        (Some(d), Some(s)) => merge_battery(d, s),
        _ => {}
    }
    // bluetooth
    match (&mut dst.bluetooth, src.bluetooth) {
        (None, Some(b)) => dst.bluetooth = Some(b),
        (Some(d), Some(s)) => merge_bluetooth(d, s),
        _ => {}
    }
}

fn merge_battery(dst: &mut BatteryConfig, src: BatteryConfig) {
    if src.start_percent.is_some()    { dst.start_percent = src.start_percent; }
    if src.drain_every_secs.is_some() { dst.drain_every_secs = src.drain_every_secs; }
    if src.charging.is_some()         { dst.charging = src.charging; }
}

fn merge_bluetooth(dst: &mut BluetoothConfig, src: BluetoothConfig) {
    if src.connected.is_some()         { dst.connected = src.connected; }
    if src.toggle_every_secs.is_some() { dst.toggle_every_secs = src.toggle_every_secs; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }
    if cli.debug               { cfg.log_level = Some("debug".into()); }
    if cli.run_secs.is_some()  { cfg.run_secs = cli.run_secs; }
    if cli.snapshot.is_some()  { cfg.snapshot = cli.snapshot.clone(); }

    let any_battery = cli.battery_percent.is_some()
        || cli.battery_drain_secs.is_some()
        || cli.charging.is_some();
    if any_battery {
        let battery = cfg.battery.get_or_insert_with(BatteryConfig::default);
        if cli.battery_percent.is_some()    { battery.start_percent = cli.battery_percent; }
        if cli.battery_drain_secs.is_some() { battery.drain_every_secs = cli.battery_drain_secs; }
        if cli.charging.is_some()           { battery.charging = cli.charging; }
    }

    if cli.bt_connected.is_some() || cli.bt_toggle_secs.is_some() {
        let bluetooth = cfg.bluetooth.get_or_insert_with(BluetoothConfig::default);
        if cli.bt_connected.is_some()   { bluetooth.connected = cli.bt_connected; }
        if cli.bt_toggle_secs.is_some() { bluetooth.toggle_every_secs = cli.bt_toggle_secs; }
    }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(level) = cfg.log_level.as_deref() {
        match level {
            "error" | "warn" | "info" | "debug" | "trace" | "off" => {}
            _ => return Err(ConfigError::Validation(format!("unknown log_level '{level}'"))),
        }
    }
    if cfg.run_secs == Some(0) {
        return Err(ConfigError::Validation("run_secs must be > 0".into()));
    }
    if let Some(battery) = cfg.battery.as_ref() {
        if let Some(p) = battery.start_percent {
            if p > 100 {
                return Err(ConfigError::Validation("battery start_percent must be 0..=100".into()));
            }
        }
        if battery.drain_every_secs == Some(0) {
            return Err(ConfigError::Validation("battery drain_every_secs must be > 0".into()));
        }
    }
    if let Some(bluetooth) = cfg.bluetooth.as_ref() {
        if bluetooth.toggle_every_secs == Some(0) {
            return Err(ConfigError::Validation("bluetooth toggle_every_secs must be > 0".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.battery_start_percent(), 100);
        assert_eq!(cfg.battery_drain_every_secs(), 60);
        assert!(!cfg.battery_charging());
        assert!(cfg.bluetooth_connected());
        assert_eq!(cfg.bluetooth_toggle_every_secs(), None);
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_yaml_then_cli_precedence() {
        let yaml = "log_level: warn\nbattery:\n  start_percent: 40\n  drain_every_secs: 5\nbluetooth:\n  toggle_every_secs: 30\n";
        let mut cfg = Config::default();
        merge(&mut cfg, parse_yaml(yaml).unwrap());
        assert_eq!(cfg.log_level(), "warn");
        assert_eq!(cfg.battery_start_percent(), 40);

        let cli = Cli {
            battery_percent: Some(7),
            bt_connected: Some(false),
            debug: true,
            ..Cli::default()
        };
        apply_cli_overrides(&mut cfg, &cli);
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.battery_start_percent(), 7);
        assert_eq!(cfg.battery_drain_every_secs(), 5);
        assert!(!cfg.bluetooth_connected());
        assert_eq!(cfg.bluetooth_toggle_every_secs(), Some(30));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.battery = Some(BatteryConfig { start_percent: Some(101), ..Default::default() });
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));

        let mut cfg = Config::default();
        cfg.bluetooth = Some(BluetoothConfig { toggle_every_secs: Some(0), ..Default::default() });
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.log_level = Some("loud".into());
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/hybridface.yaml")),
            ..Cli::default()
        };
        assert!(matches!(load_from(cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(parse_yaml("battery: [1, 2"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_dump_round_trips_fields() {
        let mut cfg = Config::default();
        cfg.run_secs = Some(10);
        let text = dump(&cfg).unwrap();
        assert!(text.contains("run_secs: 10"));
    }
}
