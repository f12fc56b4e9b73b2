use std::time::Instant;

use sosu_keisu::prime_pi_engine::{compute_prime_pi, compute_prime_pi_with, EngineOptions};

/// Lucy_Hedgehog 法による π(x) の簡易ベンチマーク（逐次版と並列版）。
///
/// 使い方:
/// ```bash
/// cargo run --example bench_prime_pi --release
/// ```
fn main() {
    env_logger::init();

    // 負荷と所要時間のバランスを見て適宜変更してください。
    let test_points: &[u64] = &[
        10_000,
        1_000_000,
        100_000_000,
        10_000_000_000,
        // 10^12 は数十秒かかる環境もあるためコメントアウトしています。
        // 1_000_000_000_000,
    ];

    let parallel = EngineOptions {
        parallel_threshold: 0,
        memory_limit_bytes: None,
    };

    println!("=== Lucy_Hedgehog pi(x) benchmark ===");
    for &x in test_points {
        println!("Computing pi({x}) ...");

        let start = Instant::now();
        match compute_prime_pi(x) {
            Ok(pi) => println!("  sequential: pi({x}) = {pi}  (elapsed: {:.3?})", start.elapsed()),
            Err(e) => println!("  Error while computing pi({x}): {e}"),
        }

        let start = Instant::now();
        match compute_prime_pi_with(x, &parallel) {
            Ok(pi) => println!("  parallel:   pi({x}) = {pi}  (elapsed: {:.3?})", start.elapsed()),
            Err(e) => println!("  Error while computing pi({x}): {e}"),
        }
        println!();
    }
}
