use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::constants::{DEFAULT_LISTEN_ADDRESS, DEFAULT_PORT, DEFAULT_QUEUE_DEPTH};

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

/// Top-level app configuration. Every key is optional; unset keys take
/// the built-in defaults through the accessors below.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>, // e.g., "info" | "debug"
    pub listen: Option<ListenConfig>,
    pub render: Option<RenderConfig>,
    /// strip geometry & frame output
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ListenConfig {
    pub address: Option<String>,
    pub port: Option<u16>,
    /// per-connection read deadline, off when unset
    pub read_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RenderConfig {
    /// redraw once per burst of queued commands
    pub coalesce: Option<bool>,
    pub queue_depth: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub text_width: Option<u32>,
    pub knobs_width: Option<u32>,
    pub meters_width: Option<u32>,
    pub height: Option<u32>,
    /// write every presented frame here as PPM
    pub snapshot: Option<PathBuf>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "bitx-strip", about = "Mixer state strip fed over TCP", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// shorthand for --log-level debug
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(short, long)]
    pub port: Option<u16>,
    #[arg(long)]
    pub read_timeout_ms: Option<u64>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub snapshot: Option<PathBuf>,
    /// redraw after every command instead of once per burst
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_coalesce: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn address(&self) -> &str {
        self.listen
            .as_ref()
            .and_then(|l| l.address.as_deref())
            .unwrap_or(DEFAULT_LISTEN_ADDRESS)
    }

    pub fn port(&self) -> u16 {
        self.listen.as_ref().and_then(|l| l.port).unwrap_or(DEFAULT_PORT)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.listen
            .as_ref()
            .and_then(|l| l.read_timeout_ms)
            .map(Duration::from_millis)
    }

    pub fn coalesce(&self) -> bool {
        self.render.as_ref().and_then(|r| r.coalesce).unwrap_or(true)
    }

    pub fn queue_depth(&self) -> usize {
        self.render
            .as_ref()
            .and_then(|r| r.queue_depth)
            .unwrap_or(DEFAULT_QUEUE_DEPTH)
    }

    pub fn snapshot(&self) -> Option<&Path> {
        self.display.as_ref().and_then(|d| d.snapshot.as_deref())
    }
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_from(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML and `cli` overrides, then validate.
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
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
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/bitx-strip/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/bitx-strip/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/bitx-strip.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["bitx-strip.yaml", "config.yaml", "config/bitx-strip.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    // listen
    match (&mut dst.listen, src.listen) {
        (None, Some(c)) => dst.listen = Some(c),
        (Some(d), Some(s)) => merge_listen(d, s),
        _ => {}
    }
    // render
    match (&mut dst.render, src.render) {
        (None, Some(c)) => dst.render = Some(c),
        (Some(d), Some(s)) => merge_render(d, s),
        _ => {}
    }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_listen(dst: &mut ListenConfig, src: ListenConfig) {
    if src.address.is_some()         { dst.address = src.address; }
    if src.port.is_some()            { dst.port = src.port; }
    if src.read_timeout_ms.is_some() { dst.read_timeout_ms = src.read_timeout_ms; }
}

fn merge_render(dst: &mut RenderConfig, src: RenderConfig) {
    if src.coalesce.is_some()    { dst.coalesce = src.coalesce; }
    if src.queue_depth.is_some() { dst.queue_depth = src.queue_depth; }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.text_width.is_some()   { dst.text_width = src.text_width; }
    if src.knobs_width.is_some()  { dst.knobs_width = src.knobs_width; }
    if src.meters_width.is_some() { dst.meters_width = src.meters_width; }
    if src.height.is_some()       { dst.height = src.height; }
    if src.snapshot.is_some()     { dst.snapshot = src.snapshot; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }
    if cli.debug { cfg.log_level = Some("debug".into()); }

    if cli.address.is_some() || cli.port.is_some() || cli.read_timeout_ms.is_some() {
        let listen = cfg.listen.get_or_insert_with(ListenConfig::default);
        if cli.address.is_some()         { listen.address = cli.address.clone(); }
        if cli.port.is_some()            { listen.port = cli.port; }
        if cli.read_timeout_ms.is_some() { listen.read_timeout_ms = cli.read_timeout_ms; }
    }

    if cli.no_coalesce {
        cfg.render.get_or_insert_with(RenderConfig::default).coalesce = Some(false);
    }

    if cli.snapshot.is_some() {
        cfg.display.get_or_insert_with(DisplayConfig::default).snapshot = cli.snapshot.clone();
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(level) = cfg.log_level.as_deref() {
        match level.to_ascii_lowercase().as_str() {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => return Err(ConfigError::Validation(format!("unknown log_level '{level}'"))),
        }
    }
    if let Some(listen) = cfg.listen.as_ref() {
        if let Some(addr) = listen.address.as_deref() {
            if addr.trim().is_empty() {
                return Err(ConfigError::Validation("listen address must not be empty".into()));
            }
        }
        if listen.read_timeout_ms == Some(0) {
            return Err(ConfigError::Validation("listen read_timeout_ms must be > 0".into()));
        }
    }
    if let Some(render) = cfg.render.as_ref() {
        if render.queue_depth == Some(0) {
            return Err(ConfigError::Validation("render queue_depth must be > 0".into()));
        }
    }
    if let Some(display) = cfg.display.as_ref() {
        let dims = [display.text_width, display.knobs_width, display.meters_width, display.height];
        if dims.iter().any(|d| *d == Some(0)) {
            return Err(ConfigError::Validation("display widths/height must be > 0".into()));
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
        assert_eq!(cfg.port(), 9876);
        assert_eq!(cfg.address(), "0.0.0.0");
        assert_eq!(cfg.read_timeout(), None);
        assert!(cfg.coalesce());
        assert_eq!(cfg.queue_depth(), DEFAULT_QUEUE_DEPTH);
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.snapshot(), None);
    }

    #[test]
    fn test_yaml_merge() {
        let mut cfg = parse_yaml("listen:\n  port: 9000\ndisplay:\n  height: 90\n").unwrap();
        let over = parse_yaml("listen:\n  read_timeout_ms: 250\nrender:\n  coalesce: false\n").unwrap();
        merge(&mut cfg, over);
        assert_eq!(cfg.port(), 9000);
        assert_eq!(cfg.read_timeout(), Some(Duration::from_millis(250)));
        assert!(!cfg.coalesce());
        assert_eq!(cfg.display.as_ref().and_then(|d| d.height), Some(90));
    }

    #[test]
    fn test_cli_overrides_yaml() {
        let mut cfg = parse_yaml("log_level: warn\nlisten:\n  port: 9000\n  address: 127.0.0.1\n").unwrap();
        let cli = Cli {
            port: Some(7000),
            debug: true,
            no_coalesce: true,
            snapshot: Some(PathBuf::from("/tmp/strip.ppm")),
            ..Default::default()
        };
        apply_cli_overrides(&mut cfg, &cli);
        assert_eq!(cfg.port(), 7000);
        assert_eq!(cfg.address(), "127.0.0.1");
        assert_eq!(cfg.log_level(), "debug");
        assert!(!cfg.coalesce());
        assert_eq!(cfg.snapshot(), Some(Path::new("/tmp/strip.ppm")));
    }

    #[test]
    fn test_validation() {
        let bad = parse_yaml("render:\n  queue_depth: 0\n").unwrap();
        assert!(matches!(validate(&bad), Err(ConfigError::Validation(_))));
        let bad = parse_yaml("display:\n  knobs_width: 0\n").unwrap();
        assert!(validate(&bad).is_err());
        let bad = parse_yaml("log_level: chatty\n").unwrap();
        assert!(validate(&bad).is_err());
        let bad = parse_yaml("listen:\n  read_timeout_ms: 0\n").unwrap();
        assert!(validate(&bad).is_err());
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_missing_explicit_config() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/bitx-strip.yaml")),
            ..Default::default()
        };
        assert!(matches!(load_from(&cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(parse_yaml("listen: [1, 2"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_round_trip_dump() {
        let cfg = parse_yaml("listen:\n  port: 9001\nrender:\n  queue_depth: 8\n").unwrap();
        let dumped = serde_yaml::to_string(&cfg).unwrap();
        assert_eq!(parse_yaml(&dumped).unwrap(), cfg);
    }
}
