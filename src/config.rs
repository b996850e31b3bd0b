use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::tracker::ExerciseKind;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CounterConfig {
    /// ランドマーク採用の最小信頼度
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    /// 同じ側のレップ間の最小間隔（ミリ秒）
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// フレームごとにログを出す
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// 接続直後の種目
    #[serde(default)]
    pub default_exercise: ExerciseKind,
    /// セッション履歴 (JSON Lines)
    #[serde(default = "default_history_path")]
    pub history_path: String,
}

fn default_min_confidence() -> f32 { 0.7 }
fn default_cooldown_ms() -> u64 { 2500 }
fn default_listen_addr() -> String { "0.0.0.0:9400".to_string() }
fn default_history_path() -> String { "sessions.jsonl".to_string() }

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            verbose: false,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_exercise: ExerciseKind::default(),
            history_path: default_history_path(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// 読み込めなければデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error ({}), using defaults: {:#}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.counter, CounterConfig::default());
        assert_eq!(config.counter.min_confidence, 0.7);
        assert_eq!(config.counter.cooldown_ms, 2500);
        assert_eq!(config.server.listen_addr, "0.0.0.0:9400");
        assert!(!config.server.verbose);
        assert_eq!(config.session.default_exercise, ExerciseKind::LegLifts);
        assert_eq!(config.session.history_path, "sessions.jsonl");
    }

    #[test]
    fn test_partial_override() {
        let config = Config::parse(
            r#"
            [counter]
            cooldown_ms = 1000

            [session]
            default_exercise = "Heel Slides"
            "#,
        )
        .unwrap();
        assert_eq!(config.counter.cooldown_ms, 1000);
        assert_eq!(config.counter.min_confidence, 0.7);
        assert_eq!(config.session.default_exercise, ExerciseKind::HeelSlides);
    }

    #[test]
    fn test_unknown_exercise_is_error() {
        assert!(Config::parse("[session]\ndefault_exercise = \"Squats\"").is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.counter.cooldown_ms, 2500);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nverbose = true\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert!(config.server.verbose);
    }
}
