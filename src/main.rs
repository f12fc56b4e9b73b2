use std::process::ExitCode;
use std::time::Instant;

use sosu_keisu::config::{load_config_from, load_or_create_config, Config};
use sosu_keisu::engine_types::{format_eta, PrimeResult};
use sosu_keisu::memory::get_memory_info;
use sosu_keisu::nth_prime::nth_prime_with;
use sosu_keisu::output::{ComputationReport, OutputFormat, Query};
use sosu_keisu::prime_pi_engine::{compute_prime_count_in_range_with, compute_prime_pi_with};
use sosu_keisu::verify::verify_nth_prime;

const USAGE: &str = "Usage:
  sosu-keisu --prime-pi <x> [options]
  sosu-keisu --nth-prime <n> [options]
  sosu-keisu --range <min> <max> [options]

Options:
  --json            print the report as JSON
  --verify          re-check an nth-prime result with Miller-Rabin and pi(x)
  --config <path>   read settings from <path> instead of ./settings.toml";

/// コマンドライン引数を解釈した結果。
struct CliArgs {
    query: Query,
    json: bool,
    verify: bool,
    config_path: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> PrimeResult<()> {
    let mut cfg: Config = match &args.config_path {
        Some(path) => load_config_from(path)?,
        None => load_or_create_config()?,
    };
    if args.json {
        cfg.output_format = OutputFormat::Json;
    }
    if args.verify {
        cfg.verify_result = true;
    }

    let opts = cfg.locator_options();
    let start = Instant::now();
    let mut verified = None;

    let result = match args.query {
        Query::PrimePi { x } => {
            log::info!("{}", get_memory_info(x).format());
            compute_prime_pi_with(x, &opts.engine)?
        }
        Query::PrimeCountInRange { min, max } => {
            log::info!("{}", get_memory_info(max).format());
            compute_prime_count_in_range_with(min, max, &opts.engine)?
        }
        Query::NthPrime { n } => {
            let log_steps = cfg.log_search_steps;
            let p = nth_prime_with(n, &opts, |step| {
                if log_steps {
                    log::info!(
                        "[{}/{}] L=={} M=={} R=={} RANGE=={} (ETA {})",
                        step.iteration,
                        step.max_iterations,
                        step.low,
                        step.mid,
                        step.high,
                        step.range,
                        format_eta(step.eta_secs)
                    );
                }
            })?;
            if cfg.verify_result {
                verified = Some(verify_nth_prime(n, p, &opts.engine)?.is_ok());
            }
            p
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let report = ComputationReport::new(args.query, result, elapsed_ms, verified);
    println!("{}", report.render(cfg.output_format)?);

    if verified == Some(false) {
        return Err(format!("verification failed for {result}").into());
    }
    Ok(())
}

/// `--prime-pi <x>` / `--nth-prime <n>` / `--range <min> <max>` 形式の引数を解釈する。
///
/// - 対応例:
///   - `sosu-keisu --prime-pi 1000000000000`
///   - `sosu-keisu --nth-prime 50847535 --verify`
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut query = None;
    let mut json = false;
    let mut verify = false;
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--prime-pi" => {
                let x = parse_u64_arg(args.next(), "--prime-pi")?;
                query = Some(Query::PrimePi { x });
            }
            "--nth-prime" => {
                let n = parse_u64_arg(args.next(), "--nth-prime")?;
                if n == 0 {
                    return Err("Invalid n for --nth-prime: must be >= 1".to_string());
                }
                query = Some(Query::NthPrime { n });
            }
            "--range" => {
                let min = parse_u64_arg(args.next(), "--range")?;
                let max = parse_u64_arg(args.next(), "--range")?;
                query = Some(Query::PrimeCountInRange { min, max });
            }
            "--json" => json = true,
            "--verify" => verify = true,
            "--config" => {
                config_path = Some(args.next().ok_or("Missing path for --config")?);
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    let query = query.ok_or("No query given")?;
    Ok(CliArgs {
        query,
        json,
        verify,
        config_path,
    })
}

fn parse_u64_arg(value: Option<String>, flag: &str) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("Missing value for {flag}"))?;
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("Invalid value for {flag}: {value} ({e})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_each_query_with_options() {
        let args = parse(&["--prime-pi", "1000", "--json"]).unwrap();
        assert_eq!(args.query, Query::PrimePi { x: 1_000 });
        assert!(args.json && !args.verify);

        let args = parse(&["--nth-prime", "5", "--verify", "--config", "my.toml"]).unwrap();
        assert_eq!(args.query, Query::NthPrime { n: 5 });
        assert!(args.verify);
        assert_eq!(args.config_path.as_deref(), Some("my.toml"));

        let args = parse(&["--range", "10", "20"]).unwrap();
        assert_eq!(args.query, Query::PrimeCountInRange { min: 10, max: 20 });
    }

    #[test]
    fn rejects_bad_usage() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--json"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["--prime-pi"]).is_err());
        assert!(parse(&["--prime-pi", "-5"]).is_err());
        assert!(parse(&["--prime-pi", "abc"]).is_err());
        assert!(parse(&["--range", "10"]).is_err());
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--nth-prime", "0"]).is_err());
    }
}
