use sysinfo::System;

use crate::sieve_math::{estimated_prime_count, integer_sqrt};

/// システムの物理メモリ総量を取得（バイト単位）
pub fn get_total_memory() -> u64 {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.total_memory()
}

/// π(x) の計算に必要なメモリ量を推定（バイト単位）
///
/// - `smalls` / `larges`: それぞれ (v+1) 個の u64
/// - ホイール篩のビット配列: 約 v/3 ビット
/// - 篩に使う素数リスト: π(v) 個の u64（上界で見積もる）
pub fn estimate_table_memory(x: u64) -> u64 {
    let v = integer_sqrt(x);
    let tables = 2 * (v + 1) * 8;
    let sieve_bits = v / 24 + 1;
    let sieving_primes = estimated_prime_count(v) as u64 * 8;
    tables + sieve_bits + sieving_primes
}

/// システムメモリの `memory_usage_percent` % を上限バイト数として返す
/// memory_usage_percent: 10.0 ~ 90.0 にクランプされる
pub fn memory_limit_from_percent(memory_usage_percent: f64) -> u64 {
    let percent = memory_usage_percent.clamp(10.0, 90.0);
    (get_total_memory() as f64 * percent / 100.0) as u64
}

/// メモリ使用量の情報を表示用に取得
pub fn get_memory_info(x: u64) -> MemoryInfo {
    let total_memory = get_total_memory();
    let estimated_tables = estimate_table_memory(x);
    let usage_percent = if total_memory > 0 {
        (estimated_tables as f64 / total_memory as f64) * 100.0
    } else {
        0.0
    };

    MemoryInfo {
        total_memory,
        estimated_tables,
        usage_percent,
    }
}

#[derive(Debug, Clone)]
pub struct MemoryInfo {
    pub total_memory: u64,
    pub estimated_tables: u64,
    pub usage_percent: f64,
}

impl MemoryInfo {
    pub fn format(&self) -> String {
        format!(
            "メモリ: システム {:.1}GB, テーブル推定 {:.1}MB ({:.3}%)",
            self.total_memory as f64 / (1024.0 * 1024.0 * 1024.0),
            self.estimated_tables as f64 / (1024.0 * 1024.0),
            self.usage_percent
        )
    }
}
