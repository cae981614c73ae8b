//! # Types
//!
//! Shared data structures used across all modules of the crowdfund ledger.
//!
//! ## Config / State split
//!
//! A `Campaign` is stored as two separate ledger entries:
//!
//! - [`CampaignConfig`] — written once at creation; never mutated.
//! - [`CampaignState`] — written on every donation, refund and payout.
//!
//! The public API exposes the reconstructed [`Campaign`] view, with its
//! [`CampaignStatus`] derived from the two halves and the ledger clock.
//!
//! ## Status is derived, never stored
//!
//! ```text
//! Active ──(collected >= target)──► Successful
//!    └────(now >= deadline)───────► Failed
//! ```
//!
//! `Successful` wins over `Failed`: once the target is met it stays met.

use soroban_sdk::{contracttype, Address, String};

/// Lifecycle status of a campaign, derived on every read.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CampaignStatus {
    /// Before the deadline with the target not yet met; accepting donations.
    Active,
    /// Target met. Requests may be paid out.
    Successful,
    /// Deadline passed with the target unmet. Donors may claim refunds.
    Failed,
}

/// What a request's approvals are measured against.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuorumBasis {
    /// Every donation entry counts, so repeat donations grow the denominator.
    DonationEntries,
    /// Each donor identity counts once.
    UniqueDonors,
}

/// Contract-wide settings written by `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    pub admin: Address,
    /// Asset every campaign is denominated in.
    pub token: Address,
    /// Quorum basis given to newly created campaigns.
    pub quorum_basis: QuorumBasis,
}

/// Immutable campaign configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub id: u64,
    pub owner: Address,
    pub title: String,
    pub description: String,
    pub image: String,
    pub target: i128,
    pub deadline: u64,
    pub created_at: u64,
    pub quorum_basis: QuorumBasis,
}

/// Mutable campaign state.
///
/// Kept small so that donations, the most frequent write, stay cheap.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CampaignState {
    /// Sum of every donation entry ever accepted.
    pub amount_collected: i128,
    /// Sum of completed request amounts.
    pub disbursed: i128,
    /// Sum returned to donors by refunds.
    pub refunded: i128,
    pub donation_count: u32,
    pub donor_count: u32,
    pub request_count: u32,
}

/// Full read-only projection of a campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Unique identifier (auto-incremented).
    pub id: u64,
    /// Creator; the only identity that may create and finalize requests.
    pub owner: Address,
    pub title: String,
    pub description: String,
    pub image: String,
    /// Funding target.
    pub target: i128,
    /// Ledger timestamp at which donations close.
    pub deadline: u64,
    pub created_at: u64,
    pub quorum_basis: QuorumBasis,
    pub amount_collected: i128,
    pub disbursed: i128,
    pub refunded: i128,
    pub donation_count: u32,
    pub donor_count: u32,
    pub request_count: u32,
    /// Status as of the ledger timestamp the view was built at.
    pub status: CampaignStatus,
}

/// One accepted contribution. Repeat donations by the same donor are separate entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationEntry {
    /// Position in the campaign's donation log.
    pub id: u32,
    pub donor: Address,
    pub amount: i128,
    pub timestamp: u64,
    pub refunded: bool,
}

/// An itemized spending proposal against a campaign's raised funds.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    /// Position in the campaign's request log.
    pub id: u32,
    pub description: String,
    pub amount: i128,
    /// Always the campaign owner.
    pub recipient: Address,
    pub completed: bool,
    /// Number of distinct donors that approved.
    pub approvals: u32,
    pub created_at: u64,
    pub completed_at: Option<u64>,
}

/// A released request, as shown in a campaign's payout history.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payout {
    pub request_id: u32,
    pub amount: i128,
    pub recipient: Address,
    pub timestamp: u64,
}
