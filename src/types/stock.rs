use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A listed instrument in the screening universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    #[serde(rename = "stock_id")]
    pub code: String,
    #[serde(rename = "stock_name")]
    pub name: String,
}

impl StockInfo {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// Default Taiwan stock universe (TWSE listed, large caps).
const DEFAULT_STOCKS: &[(&str, &str)] = &[
    ("2330", "台積電"),
    ("2317", "鴻海"),
    ("2454", "聯發科"),
    ("2881", "富邦金"),
    ("2882", "國泰金"),
    ("2412", "中華電"),
    ("2303", "聯電"),
    ("1301", "台塑"),
    ("1303", "南亞"),
    ("2002", "中鋼"),
    ("2886", "兆豐金"),
    ("2891", "中信金"),
    ("2892", "第一金"),
    ("2884", "玉山金"),
    ("2885", "元大金"),
    ("2883", "開發金"),
    ("3008", "大立光"),
    ("2357", "華碩"),
    ("2382", "廣達"),
    ("2308", "台達電"),
    ("2409", "友達"),
    ("3711", "日月光投控"),
    ("2207", "和泰車"),
    ("2105", "正新"),
    ("1216", "統一"),
];

/// Get the default screening universe.
pub fn default_stock_list() -> Vec<StockInfo> {
    DEFAULT_STOCKS
        .iter()
        .map(|(code, name)| StockInfo::new(code, name))
        .collect()
}

/// Progress of the background refresh job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub is_updating: bool,
    /// RFC 3339 time of the last completed refresh.
    pub last_update_time: Option<String>,
    pub stocks_count: usize,
    /// Id of the running or last refresh job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
    /// Instruments that failed to fetch or timed out in the last refresh.
    pub failed: usize,
}
