//! Canonical event types emitted by the crowdfund ledger contract.
//!
//! These mirror the payloads in `contracts/crowdfund_ledger/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the ledger contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The ledger was initialised (`init` topic).
    LedgerInitialized,
    /// The default quorum basis changed (`quorum` topic).
    QuorumUpdated,
    /// A campaign was opened (`created` topic).
    CampaignCreated,
    /// A donation was accepted (`donated` topic).
    DonationReceived,
    /// A donor was refunded from a failed campaign (`refunded` topic).
    DonationRefunded,
    /// The owner raised a spending request (`req_new` topic).
    RequestCreated,
    /// A donor approved a request (`approved` topic).
    RequestApproved,
    /// A request was finalized and paid to the owner (`released` topic).
    FundsReleased,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "init" => Self::LedgerInitialized,
            "quorum" => Self::QuorumUpdated,
            "created" => Self::CampaignCreated,
            "donated" => Self::DonationReceived,
            "refunded" => Self::DonationRefunded,
            "req_new" => Self::RequestCreated,
            "approved" => Self::RequestApproved,
            "released" => Self::FundsReleased,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LedgerInitialized => "ledger_initialized",
            Self::QuorumUpdated => "quorum_updated",
            Self::CampaignCreated => "campaign_created",
            Self::DonationReceived => "donation_received",
            Self::DonationRefunded => "donation_refunded",
            Self::RequestCreated => "request_created",
            Self::RequestApproved => "request_approved",
            Self::FundsReleased => "funds_released",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the event moves money, and so belongs on a campaign timeline.
    pub fn timeline_label(&self) -> Option<&'static str> {
        match self {
            Self::DonationReceived => Some("donate"),
            Self::DonationRefunded => Some("refund"),
            Self::FundsReleased => Some("withdraw"),
            _ => None,
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "ledger_initialized" => Self::LedgerInitialized,
            "quorum_updated" => Self::QuorumUpdated,
            "campaign_created" => Self::CampaignCreated,
            "donation_received" => Self::DonationReceived,
            "donation_refunded" => Self::DonationRefunded,
            "request_created" => Self::RequestCreated,
            "request_approved" => Self::RequestApproved,
            "funds_released" => Self::FundsReleased,
            _ => Self::Unknown,
        }
    }
}

/// A fully decoded ledger event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// RPC event id (`<paging token>-<index>`), unique per contract event.
    pub event_id: String,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub request_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub request_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// One row of a campaign's money-in / money-out history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// `donate`, `refund` or `withdraw`.
    pub kind: String,
    /// Donor for donations and refunds; the owner for withdrawals.
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub request_id: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
}

impl TimelineEntry {
    /// Project a stored record onto the timeline, or `None` if it moves no money.
    pub fn from_record(record: &EventRecord) -> Option<Self> {
        let kind = EventKind::from_db(&record.event_type).timeline_label()?;
        Some(Self {
            kind: kind.to_string(),
            actor: record.actor.clone(),
            amount: record.amount.clone(),
            request_id: record.request_id.clone(),
            ledger: record.ledger,
            timestamp: record.timestamp,
        })
    }
}
