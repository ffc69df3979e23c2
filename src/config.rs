use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::system::scheduler::RefreshConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub refresh: RefreshSection,
    pub sampler: SamplerSection,
    pub history: HistorySection,
    pub logging: LoggingConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RefreshSection {
    pub process_interval_ms: u64,
    pub graph_interval_ms: u64,
    pub highlight_ms: u64,
}

impl Default for RefreshSection {
    fn default() -> Self {
        RefreshSection {
            process_interval_ms: 2000,
            graph_interval_ms: 1000,
            highlight_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplerSection {
    pub window_ms: u64,
    pub pause_ms: u64,
    pub series_capacity: usize,
}

impl Default for SamplerSection {
    fn default() -> Self {
        SamplerSection {
            window_ms: 1000,
            pause_ms: 1000,
            series_capacity: 3600,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistorySection {
    pub evict_stale: bool,
}

impl Default for HistorySection {
    fn default() -> Self {
        HistorySection { evict_stale: true }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: "text".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub next_view: String,
    pub cycle_sort: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            next_view: "Tab".to_string(),
            cycle_sort: "s".to_string(),
        }
    }
}

impl Config {
    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            process_interval: Duration::from_millis(self.refresh.process_interval_ms),
            graph_interval: Duration::from_millis(self.refresh.graph_interval_ms),
            highlight_duration: Duration::from_millis(self.refresh.highlight_ms),
            sample_window: Duration::from_millis(self.sampler.window_ms),
            sample_pause: Duration::from_millis(self.sampler.pause_ms),
            series_capacity: self.sampler.series_capacity,
            evict_stale_history: self.history.evict_stale,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("procpulse").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

/// Parses a keybind such as `q`, `Tab` or `Esc`.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match s.to_lowercase().as_str() {
        "tab" => Some(KeyCode::Tab),
        "enter" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.refresh.process_interval_ms, 2000);
        assert_eq!(config.refresh.graph_interval_ms, 1000);
        assert_eq!(config.refresh.highlight_ms, 1000);
        assert_eq!(config.sampler.window_ms, 1000);
        assert!(config.history.evict_stale);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.colors.theme, "dark");
        assert_eq!(config.keybinds.quit, "q");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[refresh]
process_interval_ms = 500
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.refresh.process_interval_ms, 500);
        // Other fields should be defaults
        assert_eq!(config.refresh.graph_interval_ms, 1000);
        assert_eq!(config.sampler.series_capacity, 3600);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[refresh]
process_interval_ms = 3000
graph_interval_ms = 500
highlight_ms = 250

[sampler]
window_ms = 200
pause_ms = 800
series_capacity = 0

[history]
evict_stale = false

[logging]
level = "debug"
format = "json"
file = "/tmp/procpulse.log"

[colors]
theme = "light"

[keybinds]
quit = "x"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let refresh = config.refresh_config();
        assert_eq!(refresh.process_interval, Duration::from_millis(3000));
        assert_eq!(refresh.graph_interval, Duration::from_millis(500));
        assert_eq!(refresh.highlight_duration, Duration::from_millis(250));
        assert_eq!(refresh.sample_window, Duration::from_millis(200));
        assert_eq!(refresh.sample_pause, Duration::from_millis(800));
        assert_eq!(refresh.series_capacity, 0);
        assert!(!refresh.evict_stale_history);
        assert_eq!(config.logging.format, "json");
        assert_eq!(
            config.logging.file.as_deref(),
            Some(Path::new("/tmp/procpulse.log"))
        );
        assert_eq!(config.colors.theme, "light");
        assert_eq!(config.keybinds.quit, "x");
        assert_eq!(config.keybinds.next_view, "Tab");
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.refresh.process_interval_ms, 2000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("procpulse_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.refresh.process_interval_ms, 2000);
        let _ = std::fs::remove_file(&temp);
    }

    #[test]
    fn parse_key_variants() {
        assert_eq!(parse_key("q"), Some(KeyCode::Char('q')));
        assert_eq!(parse_key("Tab"), Some(KeyCode::Tab));
        assert_eq!(parse_key("Escape"), Some(KeyCode::Esc));
        assert_eq!(parse_key("F13"), None);
    }
}
