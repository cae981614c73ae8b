//! Campaign creation, status derivation, and read-only views.

use soroban_sdk::{Address, Env, String, Vec};

use crate::amount;
use crate::storage;
use crate::types::{Campaign, CampaignConfig, CampaignState, CampaignStatus};
use crate::Error;

/// Parameters supplied by the owner when opening a campaign.
pub struct NewCampaign {
    pub owner: Address,
    pub title: String,
    pub description: String,
    pub target: i128,
    pub deadline: u64,
    pub image: String,
}

/// Derive the status of a campaign at ledger time `now`.
///
/// Meeting the target is permanent and wins over an elapsed deadline.
pub fn status_at(config: &CampaignConfig, state: &CampaignState, now: u64) -> CampaignStatus {
    if state.amount_collected >= config.target {
        CampaignStatus::Successful
    } else if now >= config.deadline {
        CampaignStatus::Failed
    } else {
        CampaignStatus::Active
    }
}

pub fn current_status(
    env: &Env,
    config: &CampaignConfig,
    state: &CampaignState,
) -> CampaignStatus {
    status_at(config, state, env.ledger().timestamp())
}

/// Validate and store a new campaign, returning its config.
pub fn create(env: &Env, params: NewCampaign) -> Result<CampaignConfig, Error> {
    let ledger_config = storage::load_config(env)?;
    amount::require_positive(params.target, Error::InvalidTarget)?;

    let now = env.ledger().timestamp();
    if params.deadline <= now {
        return Err(Error::InvalidDeadline);
    }

    let config = CampaignConfig {
        id: storage::get_and_increment_campaign_id(env),
        owner: params.owner,
        title: params.title,
        description: params.description,
        image: params.image,
        target: params.target,
        deadline: params.deadline,
        created_at: now,
        quorum_basis: ledger_config.quorum_basis,
    };
    storage::save_new_campaign(env, &config);
    Ok(config)
}

pub fn load(env: &Env, id: u64) -> Result<Campaign, Error> {
    let config = storage::load_campaign_config(env, id)?;
    let state = storage::load_campaign_state(env, id)?;
    let status = current_status(env, &config, &state);
    Ok(storage::assemble_campaign(config, state, status))
}

/// Every campaign in creation order.
pub fn list(env: &Env) -> Result<Vec<Campaign>, Error> {
    let mut campaigns = Vec::new(env);
    for id in 0..storage::campaign_count(env) {
        campaigns.push_back(load(env, id)?);
    }
    Ok(campaigns)
}

/// At most `limit` campaigns starting at id `start`.
pub fn list_page(env: &Env, start: u64, limit: u32) -> Result<Vec<Campaign>, Error> {
    let (from, to) = storage::page_bounds(storage::campaign_count(env), start, limit);
    let mut campaigns = Vec::new(env);
    for id in from..to {
        campaigns.push_back(load(env, id)?);
    }
    Ok(campaigns)
}
