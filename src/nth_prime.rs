//! n 番目の素数を π(x) の二分探索で求める。
//!
//! - 探索範囲は `[0, bound_factor * n]` から始める（既定の係数は 70）。
//! - 上端で π(r) >= n が成り立たない場合は r を倍々に広げ、元の r を下端にする。
//! - 各反復で `SearchStep` をオブザーバーに渡す。オブザーバーなしの `nth_prime` は副作用を持たない。

use std::time::Instant;

use crate::engine_types::{compute_eta, PrimeResult, SearchStep};
use crate::prime_pi_engine::{compute_prime_pi_with, EngineOptions};
use crate::verify::is_probable_prime;

/// 既定の探索上限係数（r = 70n）。
pub const DEFAULT_BOUND_FACTOR: u64 = 70;

/// 二分探索のオプション。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocatorOptions {
    /// 初期上端 r = bound_factor * n の係数（1 以上）。
    pub bound_factor: u64,
    /// 各反復で呼ぶ π(x) エンジンのオプション。
    pub engine: EngineOptions,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            bound_factor: DEFAULT_BOUND_FACTOR,
            engine: EngineOptions::default(),
        }
    }
}

/// n 番目の素数（1 始まり、n = 1 → 2）を返す。
pub fn nth_prime(n: u64) -> PrimeResult<u64> {
    nth_prime_with(n, &LocatorOptions::default(), |_| {})
}

/// オプションとオブザーバー付きで n 番目の素数を探す。
///
/// 不変条件 π(low) < n <= π(high) を保ったまま high - low が 1 になるまで二分探索し、high を返す。
/// π は素数の位置でしか増えないので、high は π(high) >= n を満たす最小の整数であり n 番目の素数になる。
pub fn nth_prime_with(
    n: u64,
    opts: &LocatorOptions,
    mut observer: impl FnMut(SearchStep),
) -> PrimeResult<u64> {
    if n == 0 {
        return Err("n must be >= 1".into());
    }
    if opts.bound_factor == 0 {
        return Err("bound_factor must be >= 1".into());
    }

    let (mut low, mut high) = establish_bounds(n, opts)?;
    log::info!("L=={low} R=={high}");

    let max_iterations = search_iterations(high - low);
    let start = Instant::now();
    let mut iteration = 0u32;

    while high - low > 1 {
        iteration += 1;
        let mid = low + (high - low) / 2;
        let eta_secs = compute_eta(
            u64::from(iteration - 1),
            u64::from(max_iterations),
            start.elapsed().as_secs_f64(),
        );
        let step = SearchStep {
            iteration,
            max_iterations,
            low,
            mid,
            high,
            range: high - low - 1,
            eta_secs,
        };
        log::debug!("L=={low} M=={mid} R=={high} RANGE=={}", step.range);
        observer(step);

        if compute_prime_pi_with(mid, &opts.engine)? < n {
            low = mid;
        } else {
            high = mid;
        }
    }

    debug_assert!(is_probable_prime(high), "located value {high} is not prime");
    log::info!("nth_prime({n}) = {high} ({iteration} iterations, {:.3?})", start.elapsed());
    Ok(high)
}

/// π(low) < n <= π(high) を満たす初期区間を作る。
///
/// r = bound_factor * n で足りなければ、足りるまで区間を [r, 2r] に移す。
fn establish_bounds(n: u64, opts: &LocatorOptions) -> PrimeResult<(u64, u64)> {
    let mut low = 0u64;
    let mut high = opts
        .bound_factor
        .checked_mul(n)
        .ok_or_else(|| format!("search bound {} * {n} overflows u64", opts.bound_factor))?
        .max(2);

    while compute_prime_pi_with(high, &opts.engine)? < n {
        log::warn!("search bound {high} is too small for n={n}, widening");
        low = high;
        high = high
            .checked_mul(2)
            .ok_or_else(|| format!("search bound for n={n} overflows u64"))?;
    }
    Ok((low, high))
}

/// 幅 `width` の区間が 1 に縮むまでの反復回数の上限（⌈log2 width⌉）。
fn search_iterations(width: u64) -> u32 {
    if width <= 1 {
        0
    } else {
        u64::BITS - (width - 1).leading_zeros()
    }
}
