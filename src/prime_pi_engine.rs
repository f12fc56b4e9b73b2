use std::time::Instant;

use rayon::prelude::*;

use crate::engine_types::PrimeResult;
use crate::memory::estimate_table_memory;
use crate::sieve_math::{integer_sqrt, sieve_primes};

/// π(x) エンジンの実行オプション。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// この値以上の x では `larges` の更新を rayon で並列化する。
    pub parallel_threshold: u64,
    /// テーブルの推定メモリ量がこれを超える場合は計算せずにエラーを返す。
    pub memory_limit_bytes: Option<u64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: 1_000_000_000_000,
            memory_limit_bytes: None,
        }
    }
}

/// Lucy_Hedgehog 法の 2 本の DP テーブル。
///
/// - `smalls[i]`: i 以下で「まだ篩い落とされていない」2 以上の整数の個数（0 <= i <= v）
/// - `larges[i]`: ⌊x/i⌋ 以下で同じ条件を満たす整数の個数（1 <= i <= v）
///
/// 素数 p を昇順に `sieve_out` し終えると `larges[1] == π(x)` になる。
/// `smalls[0]` は参照されないので 0 のままにしておく。
#[derive(Debug, Clone)]
pub struct PrimeTables {
    x: u64,
    v: usize,
    smalls: Vec<u64>,
    larges: Vec<u64>,
}

impl PrimeTables {
    /// x に対するテーブルを初期化する（x >= 1 を想定）。
    pub fn new(x: u64) -> Self {
        let v = integer_sqrt(x) as usize;
        let smalls: Vec<u64> = (0..=v as u64).map(|i| i.saturating_sub(1)).collect();
        let mut larges = vec![0u64; v + 1];
        for (i, slot) in larges.iter_mut().enumerate().skip(1) {
            *slot = x / i as u64 - 1;
        }
        Self {
            x,
            v,
            smalls,
            larges,
        }
    }

    pub fn x(&self) -> u64 {
        self.x
    }

    pub fn v(&self) -> usize {
        self.v
    }

    /// 値 `value` 以下の残存個数を、v 以下なら `smalls`、それ以外は `larges[x / value]` から引く。
    ///
    /// `value` は x / i の形（1 <= i <= x）であること。
    #[inline]
    pub fn count_at(&self, value: u64) -> u64 {
        if value <= self.v as u64 {
            self.smalls[value as usize]
        } else {
            self.larges[(self.x / value) as usize]
        }
    }

    /// 素数 p の倍数（p² 以上で、p 未満の素因数を持たないもの）をテーブルから取り除く。
    ///
    /// p は昇順に与えること。p < 2 または p² > x の場合は何もせず false を返す。
    /// 合成数の p は smalls[p] == smalls[p-1] で判定でき、テーブルを変えずに true を返す。
    pub fn sieve_out(&mut self, p: u64, parallel: bool) -> bool {
        if p < 2 {
            return false;
        }
        let p2 = match p.checked_mul(p) {
            Some(p2) if p2 <= self.x => p2,
            _ => return false,
        };
        let sp = self.smalls[(p - 1) as usize];
        if self.smalls[p as usize] == sp {
            return true;
        }

        let limit = (self.v as u64).min(self.x / p2) as usize;
        if parallel {
            // 読み出し先は常に i*p 以上のインデックスなので、どの順でも更新前の値を読む
            let tables = &*self;
            let corrections: Vec<u64> = (1..=limit)
                .into_par_iter()
                .map(|i| tables.count_at(tables.x / i as u64 / p) - sp)
                .collect();
            for (slot, c) in self.larges[1..=limit].iter_mut().zip(corrections) {
                *slot -= c;
            }
        } else {
            for i in 1..=limit {
                let c = self.count_at(self.x / i as u64 / p) - sp;
                self.larges[i] -= c;
            }
        }

        // 降順必須: smalls[i / p] はこの p でまだ更新されていない値である必要がある
        if p2 <= self.v as u64 {
            let p = p as usize;
            for i in (p2 as usize..=self.v).rev() {
                let c = self.smalls[i / p] - sp;
                self.smalls[i] -= c;
            }
        }
        true
    }

    /// 現時点の `larges[1]`。全素数 <= v を篩い終えていれば π(x)。
    pub fn pi(&self) -> u64 {
        if self.v == 0 {
            return 0;
        }
        self.larges[1]
    }
}

/// Prime counting function π(x) を Lucy_Hedgehog 法で計算する（逐次版）。
///
/// - 入力: `x`（x 以下の素数の個数を求める）
/// - 戻り値: `PrimeResult<u64>`（成功時は π(x)）
/// - 計算量はおよそ O(x^(3/4) / ln x)、メモリは O(√x)。
pub fn compute_prime_pi(x: u64) -> PrimeResult<u64> {
    compute_prime_pi_with(
        x,
        &EngineOptions {
            parallel_threshold: u64::MAX,
            memory_limit_bytes: None,
        },
    )
}

/// オプション付きで π(x) を計算する。
///
/// 結果は `compute_prime_pi` と常に一致する。並列化されるのは各素数の `larges` 更新だけで、
/// `smalls` の降順更新は逐次のまま。
pub fn compute_prime_pi_with(x: u64, opts: &EngineOptions) -> PrimeResult<u64> {
    if x < 2 {
        return Ok(0);
    }
    if x == 2 {
        return Ok(1);
    }

    if let Some(limit) = opts.memory_limit_bytes {
        let needed = estimate_table_memory(x);
        if needed > limit {
            return Err(format!(
                "pi({x}) needs about {needed} bytes of tables, over the limit of {limit} bytes"
            )
            .into());
        }
    }

    let start = Instant::now();
    let mut tables = PrimeTables::new(x);
    let primes = sieve_primes(tables.v() as u64);
    let parallel = x >= opts.parallel_threshold;
    log::debug!(
        "pi({x}): v={}, sieving primes={}, parallel={parallel}",
        tables.v(),
        primes.len()
    );

    for &p in &primes {
        if !tables.sieve_out(p, parallel) {
            break;
        }
    }

    let pi = tables.pi();
    log::trace!("pi({x}) = {pi} ({:.3?})", start.elapsed());
    Ok(pi)
}

/// 区間 [min, max] に含まれる素数の個数を計算するヘルパー。
///
/// - min > max の場合はエラーを返す。
/// - 計算自体は `compute_prime_pi` を2回呼ぶだけの薄いラッパー。
pub fn compute_prime_count_in_range(min: u64, max: u64) -> PrimeResult<u64> {
    compute_prime_count_in_range_with(min, max, &EngineOptions::default())
}

pub fn compute_prime_count_in_range_with(
    min: u64,
    max: u64,
    opts: &EngineOptions,
) -> PrimeResult<u64> {
    if min > max {
        return Err("min must be <= max".into());
    }

    let pi_max = compute_prime_pi_with(max, opts)?;
    let pi_before_min = if min > 0 {
        compute_prime_pi_with(min - 1, opts)?
    } else {
        0
    };

    Ok(pi_max - pi_before_min)
}
