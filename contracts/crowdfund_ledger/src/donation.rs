//! Donation log: accepting contributions and reading them back.

use soroban_sdk::{Address, Env, Vec};

use crate::amount;
use crate::campaign;
use crate::storage;
use crate::types::{CampaignStatus, DonationEntry};
use crate::vault;
use crate::Error;

/// Accept a donation into an active campaign and return the new entry.
pub fn donate(
    env: &Env,
    campaign_id: u64,
    donor: &Address,
    amount: i128,
) -> Result<DonationEntry, Error> {
    amount::require_positive(amount, Error::InvalidAmount)?;

    let config = storage::load_campaign_config(env, campaign_id)?;
    let mut state = storage::load_campaign_state(env, campaign_id)?;
    if campaign::current_status(env, &config, &state) != CampaignStatus::Active {
        return Err(Error::CampaignClosed);
    }

    let entry = DonationEntry {
        id: state.donation_count,
        donor: donor.clone(),
        amount,
        timestamp: env.ledger().timestamp(),
        refunded: false,
    };

    let mut donor_entries = storage::load_donor_entries(env, campaign_id, donor);
    let first_donation = donor_entries.is_empty();
    let donor_index = state.donor_count;
    if first_donation {
        state.donor_count = increment(state.donor_count)?;
    }
    donor_entries.push_back(entry.id);

    state.amount_collected = amount::add(state.amount_collected, amount)?;
    state.donation_count = increment(state.donation_count)?;

    storage::save_donation(env, campaign_id, &entry);
    storage::save_donor_entries(env, campaign_id, donor, &donor_entries);
    if first_donation {
        storage::save_donor_at(env, campaign_id, donor_index, donor);
    }
    storage::save_campaign_state(env, campaign_id, &state);

    vault::collect(env, donor, amount)?;
    Ok(entry)
}

/// Every donation of a campaign in the order it was accepted.
pub fn history(env: &Env, campaign_id: u64) -> Result<Vec<DonationEntry>, Error> {
    let state = storage::load_campaign_state(env, campaign_id)?;
    let mut entries = Vec::new(env);
    for id in 0..state.donation_count {
        entries.push_back(storage::load_donation(env, campaign_id, id)?);
    }
    Ok(entries)
}

/// At most `limit` donations starting at entry id `start`.
pub fn history_page(
    env: &Env,
    campaign_id: u64,
    start: u32,
    limit: u32,
) -> Result<Vec<DonationEntry>, Error> {
    let state = storage::load_campaign_state(env, campaign_id)?;
    let (from, to) =
        storage::page_bounds(u64::from(state.donation_count), u64::from(start), limit);
    let mut entries = Vec::new(env);
    for id in from as u32..to as u32 {
        entries.push_back(storage::load_donation(env, campaign_id, id)?);
    }
    Ok(entries)
}

/// Sum of `donor`'s entries that have not been refunded.
pub fn outstanding(env: &Env, campaign_id: u64, donor: &Address) -> Result<i128, Error> {
    storage::load_campaign_config(env, campaign_id)?;
    let mut total = 0i128;
    for id in storage::load_donor_entries(env, campaign_id, donor).iter() {
        let entry = storage::load_donation(env, campaign_id, id)?;
        if !entry.refunded {
            total = amount::add(total, entry.amount)?;
        }
    }
    Ok(total)
}

/// Unique donors in order of their first donation.
pub fn donors(env: &Env, campaign_id: u64) -> Result<Vec<Address>, Error> {
    let state = storage::load_campaign_state(env, campaign_id)?;
    let mut donors = Vec::new(env);
    for index in 0..state.donor_count {
        donors.push_back(storage::load_donor_at(env, campaign_id, index)?);
    }
    Ok(donors)
}

/// At most `limit` donors starting at the `start`-th distinct donor.
pub fn donors_page(env: &Env, campaign_id: u64, start: u32, limit: u32) -> Result<Vec<Address>, Error> {
    let state = storage::load_campaign_state(env, campaign_id)?;
    let (from, to) = storage::page_bounds(u64::from(state.donor_count), u64::from(start), limit);
    let mut donors = Vec::new(env);
    for index in from as u32..to as u32 {
        donors.push_back(storage::load_donor_at(env, campaign_id, index)?);
    }
    Ok(donors)
}

fn increment(count: u32) -> Result<u32, Error> {
    count.checked_add(1).ok_or(Error::ArithmeticOverflow)
}
