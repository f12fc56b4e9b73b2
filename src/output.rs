use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::engine_types::PrimeResult;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    #[serde(alias = "JSON")]
    Json,
}

/// 実行したクエリの種類
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// π(x)
    PrimePi { x: u64 },
    /// n 番目の素数
    NthPrime { n: u64 },
    /// 区間 [min, max] の素数個数
    PrimeCountInRange { min: u64, max: u64 },
}

/// 1 回の計算結果のレポート
#[derive(Serialize, Debug, Clone)]
pub struct ComputationReport {
    pub query: Query,
    pub result: u64,
    pub execution_time_ms: u64,
    pub computed_at: String,
    pub tool_version: String,
    /// 検証を行った場合のみ Some
    pub verified: Option<bool>,
}

impl ComputationReport {
    /// レポートを新規作成
    pub fn new(query: Query, result: u64, execution_time_ms: u64, verified: Option<bool>) -> Self {
        Self {
            query,
            result,
            execution_time_ms,
            computed_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            verified,
        }
    }

    /// 指定フォーマットで文字列化する
    pub fn render(&self, format: OutputFormat) -> PrimeResult<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => {
                let mut out = match self.query {
                    Query::PrimePi { x } => format!("pi({x}) = {}", self.result),
                    Query::NthPrime { n } => format!("nth_prime({n}) = {}", self.result),
                    Query::PrimeCountInRange { min, max } => {
                        format!("primes in [{min}, {max}] = {}", self.result)
                    }
                };
                out.push_str(&format!("\nExecution Time: {} ms", self.execution_time_ms));
                out.push_str(&format!("\nComputed: {}", self.computed_at));
                if let Some(ok) = self.verified {
                    out.push_str(&format!("\nVerified: {}", if ok { "OK" } else { "MISMATCH" }));
                }
                Ok(out)
            }
        }
    }
}
