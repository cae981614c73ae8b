//! Refunds for campaigns that missed their target by the deadline.

use soroban_sdk::{Address, Env, Vec};

use crate::amount;
use crate::campaign;
use crate::storage;
use crate::types::CampaignStatus;
use crate::vault;
use crate::Error;

/// Return every unrefunded donation `donor` made to a failed campaign.
///
/// Entries are flagged before the transfer is issued, so a second call finds
/// nothing left and fails with `NoContribution`.
pub fn refund(env: &Env, campaign_id: u64, donor: &Address) -> Result<i128, Error> {
    let config = storage::load_campaign_config(env, campaign_id)?;
    let mut state = storage::load_campaign_state(env, campaign_id)?;
    if campaign::current_status(env, &config, &state) != CampaignStatus::Failed {
        return Err(Error::CampaignNotFailed);
    }

    let mut total = 0i128;
    let mut pending = Vec::new(env);
    for id in storage::load_donor_entries(env, campaign_id, donor).iter() {
        let entry = storage::load_donation(env, campaign_id, id)?;
        if !entry.refunded {
            total = amount::add(total, entry.amount)?;
            pending.push_back(entry);
        }
    }
    if total == 0 {
        return Err(Error::NoContribution);
    }

    for mut entry in pending.iter() {
        entry.refunded = true;
        storage::save_donation(env, campaign_id, &entry);
    }
    state.refunded = amount::add(state.refunded, total)?;
    storage::save_campaign_state(env, campaign_id, &state);

    vault::pay(env, donor, total)?;
    Ok(total)
}
