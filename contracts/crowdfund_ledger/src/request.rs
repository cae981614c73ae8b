//! Spending requests raised by a campaign owner.

use soroban_sdk::{Address, Env, String, Vec};

use crate::amount;
use crate::campaign;
use crate::storage;
use crate::types::{CampaignState, CampaignStatus, Payout, Request};
use crate::Error;

/// Funds raised and not yet committed to a completed request.
pub fn withdrawable(state: &CampaignState) -> Result<i128, Error> {
    amount::sub(state.amount_collected, state.disbursed)
}

/// Open a new request against the campaign's withdrawable balance.
pub fn create(
    env: &Env,
    campaign_id: u64,
    caller: &Address,
    description: String,
    amount: i128,
) -> Result<Request, Error> {
    let config = storage::load_campaign_config(env, campaign_id)?;
    let mut state = storage::load_campaign_state(env, campaign_id)?;
    if *caller != config.owner {
        return Err(Error::NotOwner);
    }
    if amount <= 0 || amount > withdrawable(&state)? {
        return Err(Error::InsufficientFunds);
    }
    if campaign::current_status(env, &config, &state) == CampaignStatus::Failed {
        return Err(Error::CampaignClosed);
    }

    let request = Request {
        id: state.request_count,
        description,
        amount,
        recipient: config.owner,
        completed: false,
        approvals: 0,
        created_at: env.ledger().timestamp(),
        completed_at: None,
    };
    state.request_count = state
        .request_count
        .checked_add(1)
        .ok_or(Error::ArithmeticOverflow)?;

    storage::save_request(env, campaign_id, &request);
    storage::save_campaign_state(env, campaign_id, &state);
    Ok(request)
}

pub fn get(env: &Env, campaign_id: u64, request_id: u32) -> Result<Request, Error> {
    storage::load_campaign_config(env, campaign_id)?;
    storage::load_request(env, campaign_id, request_id)
}

pub fn list(env: &Env, campaign_id: u64) -> Result<Vec<Request>, Error> {
    let state = storage::load_campaign_state(env, campaign_id)?;
    let mut requests = Vec::new(env);
    for id in 0..state.request_count {
        requests.push_back(storage::load_request(env, campaign_id, id)?);
    }
    Ok(requests)
}

/// At most `limit` requests starting at request id `start`.
pub fn list_page(env: &Env, campaign_id: u64, start: u32, limit: u32) -> Result<Vec<Request>, Error> {
    let state = storage::load_campaign_state(env, campaign_id)?;
    let (from, to) = storage::page_bounds(u64::from(state.request_count), u64::from(start), limit);
    let mut requests = Vec::new(env);
    for id in from as u32..to as u32 {
        requests.push_back(storage::load_request(env, campaign_id, id)?);
    }
    Ok(requests)
}

/// Completed requests as payouts, in request order.
pub fn payouts(env: &Env, campaign_id: u64) -> Result<Vec<Payout>, Error> {
    let mut payouts = Vec::new(env);
    for request in list(env, campaign_id)?.iter() {
        if let (true, Some(timestamp)) = (request.completed, request.completed_at) {
            payouts.push_back(Payout {
                request_id: request.id,
                amount: request.amount,
                recipient: request.recipient,
                timestamp,
            });
        }
    }
    Ok(payouts)
}
