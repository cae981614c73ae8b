//! Donor approval of spending requests.
//!
//! Voting rights come from donating, not from owning the campaign. The vote
//! set is keyed by donor identity, so a repeat donor still approves once,
//! while the quorum denominator follows the campaign's [`QuorumBasis`].

use soroban_sdk::{Address, Env};

use crate::storage;
use crate::types::{CampaignConfig, CampaignState, QuorumBasis};
use crate::Error;

/// Size of the electorate a request's approvals are measured against.
pub fn electorate(config: &CampaignConfig, state: &CampaignState) -> u32 {
    match config.quorum_basis {
        QuorumBasis::DonationEntries => state.donation_count,
        QuorumBasis::UniqueDonors => state.donor_count,
    }
}

/// Strict majority: more than half of the electorate, rounding the half down.
pub fn quorum_met(approvals: u32, electorate: u32) -> bool {
    approvals > electorate / 2
}

/// Record `voter`'s approval and return the request's new approval count.
pub fn approve(env: &Env, campaign_id: u64, request_id: u32, voter: &Address) -> Result<u32, Error> {
    storage::load_campaign_config(env, campaign_id)?;
    let mut request = storage::load_request(env, campaign_id, request_id)?;
    if request.completed {
        return Err(Error::RequestCompleted);
    }
    if !storage::is_donor(env, campaign_id, voter) {
        return Err(Error::NotEligible);
    }
    if storage::has_vote(env, campaign_id, request_id, voter) {
        return Err(Error::AlreadyVoted);
    }

    request.approvals += 1;
    storage::record_vote(env, campaign_id, request_id, voter);
    storage::save_request(env, campaign_id, &request);
    Ok(request.approvals)
}

pub fn has_voted(env: &Env, campaign_id: u64, request_id: u32, voter: &Address) -> Result<bool, Error> {
    storage::load_request(env, campaign_id, request_id)?;
    Ok(storage::has_vote(env, campaign_id, request_id, voter))
}
