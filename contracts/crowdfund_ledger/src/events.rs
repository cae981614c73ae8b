//! Event payloads published by the ledger.
//!
//! Every campaign event is published under the topic `(symbol, campaign_id)`:
//!
//! | Symbol     | Payload            |
//! |------------|--------------------|
//! | `created`  | [`CampaignCreated`]  |
//! | `donated`  | [`DonationReceived`] |
//! | `refunded` | [`DonationRefunded`] |
//! | `req_new`  | [`RequestCreated`]   |
//! | `approved` | [`RequestApproved`]  |
//! | `released` | [`FundsReleased`]    |
//!
//! Together the `donated` and `released` streams rebuild a campaign's full
//! money-in / money-out timeline off-chain.

use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub campaign_id: u64,
    pub owner: Address,
    pub target: i128,
    pub deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub campaign_id: u64,
    pub entry_id: u32,
    pub donor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationRefunded {
    pub campaign_id: u64,
    pub donor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestCreated {
    pub campaign_id: u64,
    pub request_id: u32,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestApproved {
    pub campaign_id: u64,
    pub request_id: u32,
    pub voter: Address,
    pub approvals: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsReleased {
    pub campaign_id: u64,
    pub request_id: u32,
    pub recipient: Address,
    pub amount: i128,
    pub timestamp: u64,
}
