use std::path::PathBuf;

use sosu_keisu::config::{load_config_from, save_config_to, Config};
use sosu_keisu::engine_types::{compute_eta, format_eta};
use sosu_keisu::nth_prime::DEFAULT_BOUND_FACTOR;
use sosu_keisu::output::{ComputationReport, OutputFormat, Query};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sosu-keisu-{}-{name}", std::process::id()))
}

#[test]
fn config_round_trips_through_toml() {
    let path = temp_path("settings.toml");
    let cfg = Config {
        bound_factor: 40,
        parallel_threshold: 1_000,
        memory_usage_percent: 25.0,
        output_format: OutputFormat::Json,
        verify_result: true,
        log_search_steps: false,
    };
    save_config_to(&path, &cfg).unwrap();
    let loaded = load_config_from(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, cfg);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let path = temp_path("partial.toml");
    std::fs::write(&path, "bound_factor = 90\n").unwrap();
    let loaded = load_config_from(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let defaults = Config::default();
    assert_eq!(loaded.bound_factor, 90);
    assert_eq!(loaded.parallel_threshold, defaults.parallel_threshold);
    assert_eq!(loaded.output_format, OutputFormat::Text);
    assert!(!loaded.verify_result);
    assert!(loaded.log_search_steps);
}

#[test]
fn locator_options_follow_config() {
    let cfg = Config::default();
    let opts = cfg.locator_options();
    assert_eq!(opts.bound_factor, DEFAULT_BOUND_FACTOR);
    assert_eq!(opts.engine.parallel_threshold, cfg.parallel_threshold);
    assert!(opts.engine.memory_limit_bytes.is_some());
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(load_config_from(temp_path("does-not-exist.toml")).is_err());
}

#[test]
fn text_report_mentions_query_and_result() {
    let report = ComputationReport::new(Query::PrimePi { x: 100 }, 25, 3, None);
    let text = report.render(OutputFormat::Text).unwrap();
    assert!(text.starts_with("pi(100) = 25"));
    assert!(!text.contains("Verified"));

    let report = ComputationReport::new(Query::NthPrime { n: 5 }, 11, 1, Some(true));
    let text = report.render(OutputFormat::Text).unwrap();
    assert!(text.starts_with("nth_prime(5) = 11"));
    assert!(text.contains("Verified: OK"));
}

#[test]
fn json_report_is_machine_readable() {
    let report = ComputationReport::new(Query::PrimeCountInRange { min: 10, max: 20 }, 4, 0, None);
    let json = report.render(OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["result"], 4);
    assert_eq!(value["query"]["prime_count_in_range"]["min"], 10);
    assert_eq!(value["query"]["prime_count_in_range"]["max"], 20);
    assert!(value["verified"].is_null());
}

#[test]
fn eta_helpers() {
    assert_eq!(compute_eta(0, 10, 5.0), None);
    assert_eq!(compute_eta(1, 0, 5.0), None);
    assert_eq!(compute_eta(5, 10, 5.0), Some(5));
    assert_eq!(format_eta(None), "Calculating...");
    assert_eq!(format_eta(Some(45)), "45 sec");
    assert_eq!(format_eta(Some(125)), "2 min 5 sec");
    assert_eq!(format_eta(Some(3670)), "1 h 1 min");
}
