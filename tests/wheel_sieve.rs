use sosu_keisu::sieve_math::{
    integer_sqrt, sieve_primes, wheel_index_to_value, wheel_sieve_bits, wheel_value_to_index,
};

#[test]
fn wheel_index_encoding_round_trips() {
    let expected = [1u64, 5, 7, 11, 13, 17, 19, 23, 25, 29, 31, 35];
    for (i, &value) in expected.iter().enumerate() {
        assert_eq!(wheel_index_to_value(i), value);
        assert_eq!(wheel_value_to_index(value), Some(i));
    }

    // 2 と 3 の倍数はホイールに載らない
    for value in [0u64, 2, 3, 4, 6, 8, 9, 10, 12, 15, 21, 27] {
        assert_eq!(wheel_value_to_index(value), None, "value={value}");
    }
}

#[test]
fn small_limits_special_case_two_and_three() {
    assert!(sieve_primes(0).is_empty());
    assert!(sieve_primes(1).is_empty());
    assert_eq!(sieve_primes(2), vec![2]);
    assert_eq!(sieve_primes(3), vec![2, 3]);
    assert_eq!(sieve_primes(4), vec![2, 3]);
    assert_eq!(sieve_primes(5), vec![2, 3, 5]);
    assert_eq!(sieve_primes(7), vec![2, 3, 5, 7]);
}

#[test]
fn squares_of_primes_are_excluded() {
    assert_eq!(sieve_primes(25), vec![2, 3, 5, 7, 11, 13, 17, 19, 23]);
    assert_eq!(sieve_primes(49).last(), Some(&47));
    assert!(!sieve_primes(121).contains(&121));
    assert!(!sieve_primes(169).contains(&169));
}

/// 全ての limit について試し割りと一致することを確認する（両方のマーキングの取りこぼし・過剰検出を検出）。
#[test]
fn sieve_matches_trial_division() {
    let reference: Vec<u64> = (2..=5_000u64).filter(|&n| is_prime_trial(n)).collect();
    for limit in 0..=5_000u64 {
        let primes = sieve_primes(limit);
        let expected: Vec<u64> = reference.iter().copied().take_while(|&p| p <= limit).collect();
        assert_eq!(primes, expected, "limit={limit}");
    }
}

#[test]
fn sieve_count_for_larger_limits() {
    assert_eq!(sieve_primes(1_000_000).len(), 78_498);
    assert_eq!(sieve_primes(10_000_000).len(), 664_579);
}

#[test]
fn bit_sieve_marks_only_composites() {
    let n = 1_000u64;
    let bits = wheel_sieve_bits(n);
    for (i, bit) in bits.iter().by_vals().enumerate().skip(1) {
        let value = wheel_index_to_value(i);
        assert!(value < n + 2, "index {i} decodes past the sieve range");
        assert_eq!(bit, !is_prime_trial(value), "value={value}");
    }
}

#[test]
fn integer_sqrt_is_exact() {
    for n in 0..=10_000u64 {
        let r = integer_sqrt(n);
        assert!(r * r <= n && (r + 1) * (r + 1) > n, "isqrt({n}) = {r}");
    }
    assert_eq!(integer_sqrt(999_999_999_999), 999_999);
    assert_eq!(integer_sqrt(1_000_000_000_000), 1_000_000);
    assert_eq!(integer_sqrt(u64::MAX), u32::MAX as u64);
}

fn is_prime_trial(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}
