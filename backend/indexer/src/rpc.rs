//! Soroban RPC client: polls `getEvents` and decodes crowdfund ledger events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns a soft error or a
//!   rate-limit response, capped at [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//! * JSON-RPC "invalid request" / "method not found" are surfaced immediately.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, LedgerEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// JSON-RPC codes that retrying will never fix.
const HARD_ERROR_CODES: [i64; 2] = [-32600, -32601];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topic list, as decoded by the RPC
    pub topic: Vec<String>,
    /// Event data, as decoded by the RPC
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    /// Unique event id; falls back to `pagingToken` on older RPCs
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

/// One page of `getEvents` output.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Self {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    async fn wait(&mut self) {
        tokio::time::sleep(Duration::from_secs(self.secs)).await;
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
    }
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` is the ledger sequence to scan from (inclusive).
/// * `cursor` is an opaque pagination cursor from a previous response.
/// * `limit` caps the number of events returned.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let mut backoff = Backoff::new();
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });

    loop {
        let resp = match client.post(rpc_url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(backoff_secs = backoff.secs, "RPC request failed: {e}");
                backoff.wait().await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(backoff_secs = backoff.secs, "Rate-limited by RPC");
            backoff.wait().await;
            continue;
        }

        let parsed: RpcResponse = resp.json().await?;

        if let Some(err) = parsed.error {
            if HARD_ERROR_CODES.contains(&err.code) {
                return Err(IndexerError::EventParse(format!(
                    "RPC hard error {}: {}",
                    err.code, err.message
                )));
            }
            warn!(
                backoff_secs = backoff.secs,
                code = err.code,
                "RPC soft error: {}",
                err.message
            );
            backoff.wait().await;
            continue;
        }

        let result = parsed.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            count = result.events.len(),
            latest_ledger = ?result.latest_ledger,
            "Fetched events"
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    match cursor {
        Some(cur) => params["pagination"]["cursor"] = json!(cur),
        None => params["startLedger"] = json!(start_ledger),
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Fields pulled out of an event's data payload.
#[derive(Debug, Default, PartialEq, Eq)]
struct Payload {
    actor: Option<String>,
    amount: Option<String>,
    request_id: Option<String>,
}

/// Decode a list of raw RPC events into [`LedgerEvent`]s.
///
/// Events from failed contract calls are dropped: their state changes were reverted.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<LedgerEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call.unwrap_or(true))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<LedgerEvent> {
    let Some(event_id) = raw.id.clone().or_else(|| raw.paging_token.clone()) else {
        warn!(ledger = ?raw.ledger, tx = ?raw.tx_hash, "Skipping event without an id");
        return None;
    };
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let campaign_id = raw.topic.get(1).map(|t| extract_scalar(t));
    let payload = decode_payload(&raw.value, kind);

    Some(LedgerEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        campaign_id,
        request_id: payload.request_id,
        actor: payload.actor,
        amount: payload.amount,
        ledger: raw.ledger.unwrap_or(0) as i64,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

fn decode_payload(value: &Value, kind: EventKind) -> Payload {
    match kind {
        EventKind::CampaignCreated => Payload {
            actor: extract_field(value, &["owner"]),
            amount: extract_field(value, &["target"]),
            request_id: None,
        },
        EventKind::DonationReceived | EventKind::DonationRefunded => Payload {
            actor: extract_field(value, &["donor"]),
            amount: extract_field(value, &["amount"]),
            request_id: None,
        },
        EventKind::RequestCreated => Payload {
            actor: None,
            amount: extract_field(value, &["amount"]),
            request_id: extract_field(value, &["request_id"]),
        },
        EventKind::RequestApproved => Payload {
            actor: extract_field(value, &["voter"]),
            amount: None,
            request_id: extract_field(value, &["request_id"]),
        },
        EventKind::FundsReleased => Payload {
            actor: extract_field(value, &["recipient"]),
            amount: extract_field(value, &["amount"]),
            request_id: extract_field(value, &["request_id"]),
        },
        EventKind::LedgerInitialized => Payload {
            actor: extract_field(value, &["admin"]),
            ..Payload::default()
        },
        EventKind::QuorumUpdated | EventKind::Unknown => Payload::default(),
    }
}

/// Look up the first present key and render it as a string.
/// Values may arrive bare (`"5000"`, `5000`) or wrapped (`{"type":"i128","value":"5000"}`).
fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(render_scalar)
}

fn render_scalar(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(_) => v.get("value").and_then(render_scalar),
        _ => None,
    }
}

/// Extract a Soroban Symbol from the decoded topic string.
/// The RPC may return `{"type":"symbol","value":"created"}` or just the raw string.
fn extract_symbol(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| v.get("value").and_then(|x| x.as_str()).map(String::from))
        .unwrap_or_else(|| raw.to_string())
}

/// Extract a campaign id from a topic entry that might be a JSON object or a raw number/string.
fn extract_scalar(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| render_scalar(&v))
        .unwrap_or_else(|| raw.to_string())
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
