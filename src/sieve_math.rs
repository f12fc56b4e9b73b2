//! mod 6 ホイール（2, 3 を除外）のビット篩と整数平方根。
//!
//! ビット配列のインデックス `i` は整数 `(3i + 1) | 1` に対応します。
//! - i = 0, 1, 2, 3, 4, ... → 1, 5, 7, 11, 13, ...
//! - ビットが立っている ⇔ 合成数

use bitvec::prelude::*;

/// `n` 以下の最大の整数平方根を 2 分探索で求める。
pub fn integer_sqrt(n: u64) -> u64 {
    let mut low = 0u64;
    let mut high = n.min(u32::MAX as u64);
    while low <= high {
        let mid = (low + high) >> 1;
        match mid.checked_mul(mid) {
            Some(val) if val == n => return mid,
            Some(val) if val < n => low = mid + 1,
            _ => high = mid - 1,
        }
    }
    high
}

/// ホイールのインデックスを整数値に戻す。
#[inline]
pub fn wheel_index_to_value(index: usize) -> u64 {
    (3 * index as u64 + 1) | 1
}

/// 整数値をホイールのインデックスに変換する。6k±1 以外は None。
#[inline]
pub fn wheel_value_to_index(value: u64) -> Option<usize> {
    match value % 6 {
        1 | 5 => Some((value / 3) as usize),
        _ => None,
    }
}

/// `n` 未満の 6k±1 形式の候補を篩ったビット配列を返す（ビットが立っている ⇔ 合成数）。
///
/// 素数 k = 3i+1|1 ごとに 2 本のマーキングを行う:
/// - 1 本目は k² から、2 本目は k(k - 2(i&1) + 4) から、どちらも 2k 刻み（インデックス上）。
/// - 2 本で 6k+1 / 6k-1 の両方の剰余類をちょうど覆う。
pub fn wheel_sieve_bits(n: u64) -> BitVec {
    let flag = usize::from(n % 6 == 2);
    let len = (n / 3) as usize + flag;
    let mut bits = bitvec![0; len];

    let max_i = (integer_sqrt(n) / 3) as usize;
    for i in 1..=max_i {
        if i >= len || bits[i] {
            continue;
        }
        let k = wheel_index_to_value(i) as usize;
        let step = 2 * k;

        for j in (k * k / 3..len).step_by(step) {
            bits.set(j, true);
        }
        for j in (k * (k - 2 * (i & 1) + 4) / 3..len).step_by(step) {
            bits.set(j, true);
        }
    }
    bits
}

/// `limit` 以下の素数を昇順で返す（mod 6 ホイール篩）。
///
/// - 2 と 3 は個別に扱う。
/// - `limit <= 4` の場合はビット配列を作らない。
pub fn sieve_primes(limit: u64) -> Vec<u64> {
    let mut primes = Vec::new();
    if limit > 1 {
        primes.push(2);
    }
    if limit > 2 {
        primes.push(3);
    }
    if limit <= 4 {
        return primes;
    }

    let bits = wheel_sieve_bits(limit + 1);
    primes.reserve(estimated_prime_count(limit));
    // インデックス 0 は 1 に対応するので読み飛ばす
    primes.extend(
        bits.iter_zeros()
            .filter(|&i| i >= 1)
            .map(wheel_index_to_value),
    );
    primes
}

/// π(limit) の上界（1.25506 x / ln x、x > 1 で成立）による容量見積もり。
pub fn estimated_prime_count(limit: u64) -> usize {
    if limit < 2 {
        return 0;
    }
    let x = limit as f64;
    (1.25506 * x / x.ln()) as usize + 1
}
