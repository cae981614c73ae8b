//! # Crowdfund Ledger Contract
//!
//! Milestone-gated crowdfunding. An owner raises funds toward a target before
//! a deadline; donors contribute; raised funds leave the contract only through
//! itemized spending requests approved by a majority of donors, and donors are
//! refunded if the campaign misses its target.
//!
//! | Phase         | Entry Point(s)                                          |
//! |---------------|---------------------------------------------------------|
//! | Bootstrap     | [`CrowdfundLedger::init`], `set_quorum_basis`           |
//! | Campaigns     | `create_campaign`, `get_campaign`, `list_campaigns`     |
//! | Funding       | [`CrowdfundLedger::donate`], `get_donation_history`     |
//! | Refunds       | [`CrowdfundLedger::refund`]                             |
//! | Requests      | `create_request`, `get_request`, `list_requests`        |
//! | Voting        | [`CrowdfundLedger::approve_request`], `has_voted`       |
//! | Payouts       | [`CrowdfundLedger::finalize_request`], `get_payout_history` |
//!
//! ## Architecture
//!
//! Each phase lives in its own module and storage access is delegated to
//! [`storage`]. This file contains only the public entry points and event
//! emissions.
//!
//! Every listing has a `*_page(start, limit)` twin that reads at most 50
//! entries, for logs too large to read in one invocation.
//!
//! Every mutating entry point validates first, then writes, then moves funds,
//! then publishes its event. A failed check returns before any write, and a
//! trapped token transfer reverts the whole invocation.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, Env, String, Vec,
};

mod amount;
mod campaign;
mod donation;
pub mod events;
mod finalize;
mod refund;
mod request;
mod storage;
mod types;
mod vault;
mod voting;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_refund;
#[cfg(test)]
mod test_voting;

use campaign::NewCampaign;
use events::{
    CampaignCreated, DonationReceived, DonationRefunded, FundsReleased, RequestApproved,
    RequestCreated,
};
pub use types::{
    Campaign, CampaignStatus, DonationEntry, LedgerConfig, Payout, QuorumBasis, Request,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotFound           = 1,
    InvalidTarget      = 2,
    InvalidDeadline    = 3,
    CampaignClosed     = 4,
    InsufficientFunds  = 5,
    NotOwner           = 6,
    NotEligible        = 7,
    AlreadyVoted       = 8,
    RequestCompleted   = 9,
    QuorumNotMet       = 10,
    NoContribution     = 11,
    InvalidAmount      = 12,
    CampaignNotFunded  = 13,
    CampaignNotFailed  = 14,
    NotInitialized     = 15,
    AlreadyInitialized = 16,
    NotAuthorized      = 17,
    ArithmeticOverflow = 18,
}

#[contract]
pub struct CrowdfundLedger;

#[contractimpl]
impl CrowdfundLedger {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Initialise the ledger.
    ///
    /// Must be called exactly once after deployment; `admin` must sign.
    /// `token` is the asset every campaign is raised in, and `quorum_basis`
    /// is the default given to new campaigns.
    pub fn init(
        env: Env,
        admin: Address,
        token: Address,
        quorum_basis: QuorumBasis,
    ) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        let config = LedgerConfig {
            admin,
            token,
            quorum_basis,
        };
        storage::save_config(&env, &config);

        env.events().publish((symbol_short!("init"),), config);
        Ok(())
    }

    /// Change the quorum basis given to campaigns created from now on.
    ///
    /// Existing campaigns keep the basis they were created with.
    pub fn set_quorum_basis(env: Env, admin: Address, basis: QuorumBasis) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        if admin != config.admin {
            return Err(Error::NotAuthorized);
        }
        admin.require_auth();

        storage::set_quorum_basis(&env, basis);
        env.events().publish((symbol_short!("quorum"),), basis);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<LedgerConfig, Error> {
        storage::load_config(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Campaigns
    // ─────────────────────────────────────────────────────────

    /// Open a campaign owned by `owner`.
    ///
    /// Fails with `InvalidTarget` for a non-positive target and with
    /// `InvalidDeadline` unless the deadline is after the current ledger time.
    pub fn create_campaign(
        env: Env,
        owner: Address,
        title: String,
        description: String,
        target: i128,
        deadline: u64,
        image: String,
    ) -> Result<u64, Error> {
        owner.require_auth();

        let config = campaign::create(
            &env,
            NewCampaign {
                owner,
                title,
                description,
                target,
                deadline,
                image,
            },
        )?;

        env.events().publish(
            (symbol_short!("created"), config.id),
            CampaignCreated {
                campaign_id: config.id,
                owner: config.owner,
                target: config.target,
                deadline: config.deadline,
            },
        );
        Ok(config.id)
    }

    pub fn get_campaign(env: Env, campaign_id: u64) -> Result<Campaign, Error> {
        campaign::load(&env, campaign_id)
    }

    /// All campaigns in creation order.
    pub fn list_campaigns(env: Env) -> Result<Vec<Campaign>, Error> {
        campaign::list(&env)
    }

    /// At most `limit` campaigns (capped at 50) starting at id `start`.
    pub fn list_campaigns_page(env: Env, start: u64, limit: u32) -> Result<Vec<Campaign>, Error> {
        campaign::list_page(&env, start, limit)
    }

    pub fn get_status(env: Env, campaign_id: u64) -> Result<CampaignStatus, Error> {
        Ok(campaign::load(&env, campaign_id)?.status)
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Donate `amount` to an active campaign; returns the donation entry id.
    ///
    /// Rejected with `CampaignClosed` once the deadline has passed or the
    /// target has been met.
    pub fn donate(env: Env, campaign_id: u64, donor: Address, amount: i128) -> Result<u32, Error> {
        donor.require_auth();

        let entry = donation::donate(&env, campaign_id, &donor, amount)?;

        env.events().publish(
            (symbol_short!("donated"), campaign_id),
            DonationReceived {
                campaign_id,
                entry_id: entry.id,
                donor,
                amount,
            },
        );
        Ok(entry.id)
    }

    pub fn get_donation_history(env: Env, campaign_id: u64) -> Result<Vec<DonationEntry>, Error> {
        donation::history(&env, campaign_id)
    }

    pub fn get_donation_history_page(
        env: Env,
        campaign_id: u64,
        start: u32,
        limit: u32,
    ) -> Result<Vec<DonationEntry>, Error> {
        donation::history_page(&env, campaign_id, start, limit)
    }

    /// Amount `donor` has in the campaign that has not been refunded.
    pub fn get_contribution(env: Env, campaign_id: u64, donor: Address) -> Result<i128, Error> {
        donation::outstanding(&env, campaign_id, &donor)
    }

    /// Unique donors in order of their first donation.
    pub fn get_donors(env: Env, campaign_id: u64) -> Result<Vec<Address>, Error> {
        donation::donors(&env, campaign_id)
    }

    pub fn get_donors_page(
        env: Env,
        campaign_id: u64,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Address>, Error> {
        donation::donors_page(&env, campaign_id, start, limit)
    }

    // ─────────────────────────────────────────────────────────
    // Refunds
    // ─────────────────────────────────────────────────────────

    /// Refund every unrefunded donation `donor` made to a failed campaign.
    pub fn refund(env: Env, campaign_id: u64, donor: Address) -> Result<i128, Error> {
        donor.require_auth();

        let amount = refund::refund(&env, campaign_id, &donor)?;

        env.events().publish(
            (symbol_short!("refunded"), campaign_id),
            DonationRefunded {
                campaign_id,
                donor,
                amount,
            },
        );
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────

    /// Propose spending `amount` of the campaign's withdrawable balance.
    ///
    /// Owner only. The amount is checked against funds raised minus funds
    /// already released by completed requests.
    pub fn create_request(
        env: Env,
        campaign_id: u64,
        caller: Address,
        description: String,
        amount: i128,
    ) -> Result<u32, Error> {
        caller.require_auth();

        let req = request::create(&env, campaign_id, &caller, description, amount)?;

        env.events().publish(
            (symbol_short!("req_new"), campaign_id),
            RequestCreated {
                campaign_id,
                request_id: req.id,
                amount: req.amount,
            },
        );
        Ok(req.id)
    }

    pub fn get_request(env: Env, campaign_id: u64, request_id: u32) -> Result<Request, Error> {
        request::get(&env, campaign_id, request_id)
    }

    pub fn list_requests(env: Env, campaign_id: u64) -> Result<Vec<Request>, Error> {
        request::list(&env, campaign_id)
    }

    pub fn list_requests_page(
        env: Env,
        campaign_id: u64,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Request>, Error> {
        request::list_page(&env, campaign_id, start, limit)
    }

    pub fn get_withdrawable(env: Env, campaign_id: u64) -> Result<i128, Error> {
        let state = storage::load_campaign_state(&env, campaign_id)?;
        request::withdrawable(&state)
    }

    // ─────────────────────────────────────────────────────────
    // Voting
    // ─────────────────────────────────────────────────────────

    /// Approve a request as a donor; returns the new approval count.
    pub fn approve_request(
        env: Env,
        campaign_id: u64,
        request_id: u32,
        voter: Address,
    ) -> Result<u32, Error> {
        voter.require_auth();

        let approvals = voting::approve(&env, campaign_id, request_id, &voter)?;

        env.events().publish(
            (symbol_short!("approved"), campaign_id),
            RequestApproved {
                campaign_id,
                request_id,
                voter,
                approvals,
            },
        );
        Ok(approvals)
    }

    pub fn has_voted(
        env: Env,
        campaign_id: u64,
        request_id: u32,
        voter: Address,
    ) -> Result<bool, Error> {
        voting::has_voted(&env, campaign_id, request_id, &voter)
    }

    /// Minimum approvals a request of this campaign currently needs.
    pub fn approvals_needed(env: Env, campaign_id: u64) -> Result<u32, Error> {
        let config = storage::load_campaign_config(&env, campaign_id)?;
        let state = storage::load_campaign_state(&env, campaign_id)?;
        Ok(voting::electorate(&config, &state) / 2 + 1)
    }

    // ─────────────────────────────────────────────────────────
    // Payouts
    // ─────────────────────────────────────────────────────────

    /// Complete an approved request and pay it to the campaign owner.
    ///
    /// Owner only; requires the campaign to have met its target and the
    /// request to hold a strict majority of the electorate. Returns the
    /// amount paid. A second call fails with `RequestCompleted`.
    pub fn finalize_request(
        env: Env,
        campaign_id: u64,
        request_id: u32,
        caller: Address,
    ) -> Result<i128, Error> {
        caller.require_auth();

        let req = finalize::finalize(&env, campaign_id, request_id, &caller)?;
        let timestamp = req.completed_at.unwrap_or_else(|| env.ledger().timestamp());

        env.events().publish(
            (symbol_short!("released"), campaign_id),
            FundsReleased {
                campaign_id,
                request_id,
                recipient: req.recipient,
                amount: req.amount,
                timestamp,
            },
        );
        Ok(req.amount)
    }

    pub fn get_payout_history(env: Env, campaign_id: u64) -> Result<Vec<Payout>, Error> {
        request::payouts(&env, campaign_id)
    }
}
