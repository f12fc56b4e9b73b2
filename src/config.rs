use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::memory::memory_limit_from_percent;
use crate::nth_prime::{LocatorOptions, DEFAULT_BOUND_FACTOR};
use crate::output::OutputFormat;
use crate::prime_pi_engine::EngineOptions;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// n 番目の素数探索の初期上端係数（r = bound_factor * n）
    #[serde(default = "default_bound_factor")]
    pub bound_factor: u64,
    /// この x 以上で larges 更新を並列化する
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: u64,
    /// テーブルに使ってよいシステムメモリの割合 (10.0 ~ 90.0)
    #[serde(default = "default_memory_usage_percent")]
    pub memory_usage_percent: f64,
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
    /// 結果を Miller-Rabin と π(x) で再検証するか
    #[serde(default)]
    pub verify_result: bool,
    /// 二分探索の各ステップを info ログに出すか
    #[serde(default = "default_log_search_steps")]
    pub log_search_steps: bool,
}

fn default_bound_factor() -> u64 {
    DEFAULT_BOUND_FACTOR
}

fn default_parallel_threshold() -> u64 {
    EngineOptions::default().parallel_threshold
}

fn default_memory_usage_percent() -> f64 {
    50.0
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_log_search_steps() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bound_factor: default_bound_factor(),
            parallel_threshold: default_parallel_threshold(),
            memory_usage_percent: default_memory_usage_percent(),
            output_format: default_output_format(),
            verify_result: false,
            log_search_steps: default_log_search_steps(),
        }
    }
}

impl Config {
    /// π(x) エンジン用のオプション。メモリ上限はこの時点のシステムメモリから決める。
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            parallel_threshold: self.parallel_threshold,
            memory_limit_bytes: Some(memory_limit_from_percent(self.memory_usage_percent)),
        }
    }

    pub fn locator_options(&self) -> LocatorOptions {
        LocatorOptions {
            bound_factor: self.bound_factor,
            engine: self.engine_options(),
        }
    }
}

const SETTINGS_FILE: &str = "settings.toml";

pub fn load_or_create_config() -> Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    if Path::new(SETTINGS_FILE).exists() {
        load_config_from(SETTINGS_FILE)
    } else {
        let cfg = Config::default();
        save_config_to(SETTINGS_FILE, &cfg)?;
        Ok(cfg)
    }
}

pub fn load_config_from<P: AsRef<Path>>(
    path: P,
) -> Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    let cfg = toml::from_str(&contents)?;
    Ok(cfg)
}

pub fn save_config_to<P: AsRef<Path>>(
    path: P,
    cfg: &Config,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let toml_str = toml::to_string_pretty(cfg)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(toml_str.as_bytes())?;
    writer.flush()?;
    Ok(())
}
