use crate::engine_types::PrimeResult;
use crate::prime_pi_engine::{compute_prime_pi_with, EngineOptions};

/// `verify_nth_prime` の結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// 順位 n。
    pub n: u64,
    /// 検証した値 p。
    pub prime: u64,
    /// Miller-Rabin による素数判定の結果。
    pub is_prime: bool,
    /// π(p)。
    pub pi_at: u64,
    /// π(p - 1)。
    pub pi_before: u64,
}

impl VerifyReport {
    /// p が素数で、π(p) = n かつ π(p-1) = n-1 なら true。
    pub fn is_ok(&self) -> bool {
        self.is_prime && self.pi_at == self.n && self.pi_before + 1 == self.n
    }
}

/// 64bit 整数に対する決定的 Miller-Rabin 素数判定。
///
/// n 番目の素数として見つかった値の事後チェックに使います。
/// 既知の 7 基数セットにより、u64 全域で決定的に判定できます。
///
/// 参考: https://miller-rabin.appspot.com/ （64bit 用の既知の基数セット）
pub fn is_probable_prime(n: u64) -> bool {
    // 小さいケース
    if n < 2 {
        return false;
    }
    if n == 2 || n == 3 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    // n-1 = d * 2^s を求める
    let mut d = n - 1;
    let mut s = 0u32;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    // 64bit 決定的テスト用の基数
    const BASES: [u64; 7] = [2, 325, 9375, 28178, 450775, 9780504, 1795265022];

    for &a in &BASES {
        if a % n == 0 {
            continue;
        }
        if !miller_rabin_round(n, d, s, a) {
            return false;
        }
    }
    true
}

fn miller_rabin_round(n: u64, d: u64, s: u32, a: u64) -> bool {
    let mut x = mod_pow(a % n, d, n);
    if x == 1 || x == n - 1 {
        return true;
    }

    for _ in 1..s {
        x = mod_mul(x, x, n);
        if x == n - 1 {
            return true;
        }
    }
    false
}

fn mod_mul(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn mod_pow(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut res = 1u64;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            res = mod_mul(res, base, m);
        }
        base = mod_mul(base, base, m);
        exp >>= 1;
    }
    res
}

/// `prime` が n 番目の素数であることを π(x) との整合性で検証する。
///
/// - n = 0 や prime = 0 は前提条件違反としてエラーを返す。
/// - π(p) と π(p-1) の 2 回の計算を伴うため、p が大きいと相応に時間がかかる。
pub fn verify_nth_prime(n: u64, prime: u64, opts: &EngineOptions) -> PrimeResult<VerifyReport> {
    if n == 0 {
        return Err("n must be >= 1".into());
    }
    if prime == 0 {
        return Err("prime must be >= 1".into());
    }

    let report = VerifyReport {
        n,
        prime,
        is_prime: is_probable_prime(prime),
        pi_at: compute_prime_pi_with(prime, opts)?,
        pi_before: compute_prime_pi_with(prime - 1, opts)?,
    };

    if report.is_ok() {
        log::info!("verified: {prime} is prime #{n}");
    } else {
        log::warn!("verification failed: {report:?}");
    }
    Ok(report)
}
