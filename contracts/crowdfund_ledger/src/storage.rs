//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the ledger.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key             | Type          | Description                          |
//! |-----------------|---------------|--------------------------------------|
//! | `Admin`         | `Address`     | Address allowed to change defaults   |
//! | `Token`         | `Address`     | Asset every campaign is raised in    |
//! | `QuorumBasis`   | `QuorumBasis` | Default quorum basis for new campaigns |
//! | `CampaignCount` | `u64`         | Auto-increment campaign ID counter   |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                              | Type             | Description                     |
//! |----------------------------------|------------------|---------------------------------|
//! | `CampConfig(id)`                 | `CampaignConfig` | Immutable campaign configuration |
//! | `CampState(id)`                  | `CampaignState`  | Mutable campaign totals          |
//! | `Donation(id, n)`                | `DonationEntry`  | n-th donation of a campaign      |
//! | `DonorEntries(id, donor)`        | `Vec<u32>`       | Donation ids made by one donor   |
//! | `DonorAt(id, n)`                 | `Address`        | n-th distinct donor              |
//! | `Request(id, n)`                 | `Request`        | n-th spending request            |
//! | `Vote(id, n, voter)`             | `bool`           | Voter approved request n         |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Every key below `CampaignCount` carries its campaign id, so operations on
//! different campaigns never touch the same ledger entry.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{
    Campaign, CampaignConfig, CampaignState, DonationEntry, LedgerConfig, QuorumBasis, Request,
};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// Largest page any paginated read returns.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Half-open index range `[start, end)` of one page over `total` items.
/// `limit` is clamped to [`MAX_PAGE_SIZE`]; a `start` past the end yields an empty range.
pub fn page_bounds(total: u64, start: u64, limit: u32) -> (u64, u64) {
    let start = start.min(total);
    let end = start
        .saturating_add(u64::from(limit.min(MAX_PAGE_SIZE)))
        .min(total);
    (start, end)
}

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    Token,
    QuorumBasis,
    CampaignCount,
    CampConfig(u64),
    CampState(u64),
    Donation(u64, u32),
    DonorEntries(u64, Address),
    DonorAt(u64, u32),
    Request(u64, u32),
    Vote(u64, u32, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn save_config(env: &Env, config: &LedgerConfig) {
    let instance = env.storage().instance();
    instance.set(&DataKey::Admin, &config.admin);
    instance.set(&DataKey::Token, &config.token);
    instance.set(&DataKey::QuorumBasis, &config.quorum_basis);
    bump_instance(env);
}

/// Load the contract-wide settings, or `NotInitialized` before `init`.
pub fn load_config(env: &Env) -> Result<LedgerConfig, Error> {
    bump_instance(env);
    let instance = env.storage().instance();
    let admin: Address = instance
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)?;
    let token: Address = instance
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)?;
    let quorum_basis: QuorumBasis = instance
        .get(&DataKey::QuorumBasis)
        .unwrap_or(QuorumBasis::DonationEntries);
    Ok(LedgerConfig {
        admin,
        token,
        quorum_basis,
    })
}

pub fn set_quorum_basis(env: &Env, basis: QuorumBasis) {
    env.storage().instance().set(&DataKey::QuorumBasis, &basis);
    bump_instance(env);
}

pub fn load_token(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

/// Reads, increments, and stores the campaign counter.
/// Returns the ID to use for the *current* campaign (pre-increment value).
pub fn get_and_increment_campaign_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::CampaignCount, &(current + 1));
    current
}

pub fn campaign_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn save_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

/// Save the immutable config and the initial state of a new campaign.
pub fn save_new_campaign(env: &Env, config: &CampaignConfig) {
    save_persistent(env, &DataKey::CampConfig(config.id), config);
    save_persistent(env, &DataKey::CampState(config.id), &CampaignState::default());
}

pub fn load_campaign_config(env: &Env, id: u64) -> Result<CampaignConfig, Error> {
    let key = DataKey::CampConfig(id);
    let config: CampaignConfig = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::NotFound)?;
    bump_persistent(env, &key);
    Ok(config)
}

pub fn load_campaign_state(env: &Env, id: u64) -> Result<CampaignState, Error> {
    let key = DataKey::CampState(id);
    let state: CampaignState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::NotFound)?;
    bump_persistent(env, &key);
    Ok(state)
}

pub fn save_campaign_state(env: &Env, id: u64, state: &CampaignState) {
    save_persistent(env, &DataKey::CampState(id), state);
}

/// Combine config and state into the public view.
pub fn assemble_campaign(
    config: CampaignConfig,
    state: CampaignState,
    status: crate::types::CampaignStatus,
) -> Campaign {
    Campaign {
        id: config.id,
        owner: config.owner,
        title: config.title,
        description: config.description,
        image: config.image,
        target: config.target,
        deadline: config.deadline,
        created_at: config.created_at,
        quorum_basis: config.quorum_basis,
        amount_collected: state.amount_collected,
        disbursed: state.disbursed,
        refunded: state.refunded,
        donation_count: state.donation_count,
        donor_count: state.donor_count,
        request_count: state.request_count,
        status,
    }
}

// ── Donations ────────────────────────────────────────────────────────

pub fn save_donation(env: &Env, campaign_id: u64, entry: &DonationEntry) {
    save_persistent(env, &DataKey::Donation(campaign_id, entry.id), entry);
}

pub fn load_donation(env: &Env, campaign_id: u64, entry_id: u32) -> Result<DonationEntry, Error> {
    let key = DataKey::Donation(campaign_id, entry_id);
    let entry: DonationEntry = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::NotFound)?;
    bump_persistent(env, &key);
    Ok(entry)
}

/// Donation ids made by `donor`, in donation order. Empty if they never donated.
pub fn load_donor_entries(env: &Env, campaign_id: u64, donor: &Address) -> Vec<u32> {
    let key = DataKey::DonorEntries(campaign_id, donor.clone());
    match env.storage().persistent().get::<DataKey, Vec<u32>>(&key) {
        Some(entries) => {
            bump_persistent(env, &key);
            entries
        }
        None => Vec::new(env),
    }
}

pub fn save_donor_entries(env: &Env, campaign_id: u64, donor: &Address, entries: &Vec<u32>) {
    save_persistent(env, &DataKey::DonorEntries(campaign_id, donor.clone()), entries);
}

/// Record `donor` as the campaign's `index`-th distinct donor.
pub fn save_donor_at(env: &Env, campaign_id: u64, index: u32, donor: &Address) {
    save_persistent(env, &DataKey::DonorAt(campaign_id, index), donor);
}

pub fn load_donor_at(env: &Env, campaign_id: u64, index: u32) -> Result<Address, Error> {
    let key = DataKey::DonorAt(campaign_id, index);
    let donor: Address = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::NotFound)?;
    bump_persistent(env, &key);
    Ok(donor)
}

pub fn is_donor(env: &Env, campaign_id: u64, donor: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::DonorEntries(campaign_id, donor.clone()))
}

// ── Requests & votes ─────────────────────────────────────────────────

pub fn save_request(env: &Env, campaign_id: u64, request: &Request) {
    save_persistent(env, &DataKey::Request(campaign_id, request.id), request);
}

pub fn load_request(env: &Env, campaign_id: u64, request_id: u32) -> Result<Request, Error> {
    let key = DataKey::Request(campaign_id, request_id);
    let request: Request = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::NotFound)?;
    bump_persistent(env, &key);
    Ok(request)
}

pub fn has_vote(env: &Env, campaign_id: u64, request_id: u32, voter: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Vote(campaign_id, request_id, voter.clone()))
}

pub fn record_vote(env: &Env, campaign_id: u64, request_id: u32, voter: &Address) {
    save_persistent(
        env,
        &DataKey::Vote(campaign_id, request_id, voter.clone()),
        &true,
    );
}
