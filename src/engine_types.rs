use std::error::Error;

// エンジン層（π(x) 計算 / n 番目の素数探索 / 検証）で共有するエラー型と進捗情報の定義。
//
// - `SearchStep` は二分探索のオブザーバー（CLI のログ出力など）との契約です。
// - フィールドの意味を変える場合は `nth_prime` と `main.rs` の表示も合わせて見直してください。

/// エンジン共通の結果型。
///
/// - 入力の前提条件違反（n = 0 など）、オーバーフロー、メモリ上限超過、設定ファイルの I/O エラーは
///   すべてこの型で呼び出し側に返します。
/// - エラーは `Send + Sync` な Box でラップされ、スレッドをまたいでも安全に伝播できます。
pub type PrimeResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// n 番目の素数を探す二分探索の 1 ステップ分の情報。
///
/// 観測側とは次の「契約」を満たします:
/// - `low < mid < high` であり、探索中は π(low) < n <= π(high) が成り立つこと
/// - `range` は `high - low - 1`、つまり両端を除いた残り候補数であること
/// - `iteration` は 1 から始まり、`max_iterations` を超えないこと
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchStep {
    /// 何回目の反復か（1 始まり）。
    pub iteration: u32,
    /// 探索幅から見積もった反復回数の上限。
    pub max_iterations: u32,
    pub low: u64,
    pub mid: u64,
    pub high: u64,
    pub range: u64,
    /// 推定残り時間（秒）。まだ計算できない場合は None。
    pub eta_secs: Option<u64>,
}

/// 現在の進捗と経過時間から ETA（残り時間の秒数）を推定するユーティリティ。
///
/// - `processed` / `total` は 0 以上で、`processed <= total` を想定しています。
/// - 進捗 0% の間は `None` を返し、ある程度進んでから ETA を表示する前提です。
pub fn compute_eta(processed: u64, total: u64, elapsed_secs: f64) -> Option<u64> {
    if total == 0 {
        return None;
    }
    let progress = processed.min(total) as f64 / total as f64;
    if progress > 0.0 {
        let total_time = elapsed_secs / progress;
        Some(((total_time - elapsed_secs).max(0.0)).round() as u64)
    } else {
        None
    }
}

/// ETA（残り時間の秒数）を人間が読みやすい文字列にフォーマットするヘルパー。
///
/// 例:
/// - `None`  → `"Calculating..."`
/// - `Some(45)` → `"45 sec"`
/// - `Some(125)` → `"2 min 5 sec"`
/// - `Some(3670)` → `"1 h 1 min"`
pub fn format_eta(eta_secs: Option<u64>) -> String {
    match eta_secs {
        None => "Calculating...".to_string(),
        Some(secs) => {
            if secs < 60 {
                format!("{secs} sec")
            } else if secs < 3600 {
                let minutes = secs / 60;
                let seconds = secs % 60;
                if seconds == 0 {
                    format!("{minutes} min")
                } else {
                    format!("{minutes} min {seconds} sec")
                }
            } else {
                let hours = secs / 3600;
                let minutes = (secs % 3600) / 60;
                if minutes == 0 {
                    format!("{hours} h")
                } else {
                    format!("{hours} h {minutes} min")
                }
            }
        }
    }
}
