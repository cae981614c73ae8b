//! One-shot completion and payout of approved requests.

use soroban_sdk::{Address, Env};

use crate::amount;
use crate::campaign;
use crate::request;
use crate::storage;
use crate::types::{CampaignStatus, Request};
use crate::vault;
use crate::voting;
use crate::Error;

/// Complete an approved request and pay its amount to the campaign owner.
///
/// The request is written as completed before the transfer is issued, and a
/// completed request is rejected with `RequestCompleted`, so each request pays
/// out at most once.
pub fn finalize(
    env: &Env,
    campaign_id: u64,
    request_id: u32,
    caller: &Address,
) -> Result<Request, Error> {
    let config = storage::load_campaign_config(env, campaign_id)?;
    let mut state = storage::load_campaign_state(env, campaign_id)?;
    if *caller != config.owner {
        return Err(Error::NotOwner);
    }

    let mut req = storage::load_request(env, campaign_id, request_id)?;
    if req.completed {
        return Err(Error::RequestCompleted);
    }
    if campaign::current_status(env, &config, &state) != CampaignStatus::Successful {
        return Err(Error::CampaignNotFunded);
    }
    if !voting::quorum_met(req.approvals, voting::electorate(&config, &state)) {
        return Err(Error::QuorumNotMet);
    }
    if req.amount > request::withdrawable(&state)? {
        return Err(Error::InsufficientFunds);
    }

    req.completed = true;
    req.completed_at = Some(env.ledger().timestamp());
    state.disbursed = amount::add(state.disbursed, req.amount)?;
    storage::save_request(env, campaign_id, &req);
    storage::save_campaign_state(env, campaign_id, &state);

    vault::pay(env, &req.recipient, req.amount)?;
    Ok(req)
}
