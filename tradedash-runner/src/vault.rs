//! Vault client: account value, APR, all-time PnL and open positions from
//! the exchange info endpoint.
//!
//! The client is blocking and refreshed manually; hosts run it off their
//! main loop. Failures are [`VaultError`] values and never touch the core.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::VaultConfig;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vault endpoint returned status {status} for {request}")]
    Status { request: &'static str, status: u16 },

    #[error("unexpected vault response: {0}")]
    Malformed(String),
}

/// One open position held by the vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub coin: String,
    /// Signed size; negative for shorts.
    pub size: f64,
    pub entry_price: f64,
    pub leverage: String,
    pub unrealized_pnl: f64,
}

impl OpenPosition {
    pub fn side(&self) -> &'static str {
        if self.size < 0.0 {
            "Short"
        } else {
            "Long"
        }
    }

    pub fn abs_size(&self) -> f64 {
        self.size.abs()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultSnapshot {
    pub account_value: f64,
    /// Annualized return in percent.
    pub apr_pct: f64,
    pub all_time_pnl: f64,
    pub positions: Vec<OpenPosition>,
    pub fetched_at: DateTime<Local>,
}

pub struct VaultClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    address: String,
}

impl VaultClient {
    pub fn new(config: &VaultConfig) -> Result<Self, VaultError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            address: config.address.clone(),
        })
    }

    /// Fetch vault details and clearinghouse state and combine them.
    pub fn fetch(&self) -> Result<VaultSnapshot, VaultError> {
        let details = self.post(
            "vaultDetails",
            json!({
                "type": "vaultDetails",
                "vaultAddress": self.address,
                "user": self.address,
            }),
        )?;
        let state = self.post(
            "clearinghouseState",
            json!({
                "type": "clearinghouseState",
                "user": self.address,
            }),
        )?;
        let snapshot = snapshot_from_json(&details, &state, Local::now())?;
        info!(
            account_value = snapshot.account_value,
            positions = snapshot.positions.len(),
            "vault refreshed"
        );
        Ok(snapshot)
    }

    fn post(&self, request: &'static str, body: Value) -> Result<Value, VaultError> {
        debug!(request, endpoint = %self.endpoint, "vault request");
        let response = self.http.post(&self.endpoint).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(VaultError::Status {
                request,
                status: status.as_u16(),
            });
        }
        Ok(response.json::<Value>()?)
    }
}

// ─── Response decoding ──────────────────────────────────────────────

/// Numbers arrive either as JSON numbers or as decimal strings.
fn number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Value of the last `[timestamp, value]` pair in a history array.
fn last_history_value(history: Option<&Value>) -> f64 {
    history
        .and_then(Value::as_array)
        .and_then(|entries| entries.last())
        .and_then(|entry| entry.get(1))
        .map(|v| number(Some(v)))
        .unwrap_or(0.0)
}

/// `portfolio` is a list of `[period, data]` pairs; find the `allTime` data.
fn all_time(details: &Value) -> Option<&Value> {
    details
        .get("portfolio")?
        .as_array()?
        .iter()
        .filter_map(Value::as_array)
        .find(|pair| pair.first().and_then(Value::as_str) == Some("allTime"))
        .and_then(|pair| pair.get(1))
}

fn open_position(entry: &Value) -> Option<OpenPosition> {
    let p = entry.get("position")?;
    let size = number(p.get("szi"));
    if size == 0.0 {
        return None;
    }
    let coin = p
        .get("coin")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .unwrap_or("UNKNOWN")
        .to_string();
    let leverage = match p.get("leverage").and_then(|l| l.get("value")) {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "1".to_string(),
    };
    Some(OpenPosition {
        coin,
        size,
        entry_price: number(p.get("entryPx")),
        leverage,
        unrealized_pnl: number(p.get("unrealizedPnl")),
    })
}

/// Combine the two endpoint responses into a snapshot.
///
/// Account value is the last all-time history entry, falling back to the
/// cross-margin summary when that is zero. APR arrives as a fraction.
pub fn snapshot_from_json(
    details: &Value,
    state: &Value,
    fetched_at: DateTime<Local>,
) -> Result<VaultSnapshot, VaultError> {
    if !details.is_object() {
        return Err(VaultError::Malformed("vaultDetails is not an object".into()));
    }
    if !state.is_object() {
        return Err(VaultError::Malformed(
            "clearinghouseState is not an object".into(),
        ));
    }

    let all_time = all_time(details);
    let mut account_value = last_history_value(all_time.and_then(|d| d.get("accountValueHistory")));
    if account_value == 0.0 {
        account_value = number(
            state
                .get("crossMarginSummary")
                .and_then(|s| s.get("accountValue")),
        );
    }

    let positions = state
        .get("assetPositions")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(open_position).collect())
        .unwrap_or_default();

    Ok(VaultSnapshot {
        account_value,
        apr_pct: number(details.get("apr")) * 100.0,
        all_time_pnl: last_history_value(all_time.and_then(|d| d.get("pnlHistory"))),
        positions,
        fetched_at,
    })
}
