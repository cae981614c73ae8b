extern crate std;

use std::vec::Vec as StdVec;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};

use crate::invariants;
use crate::{CampaignStatus, CrowdfundLedger, CrowdfundLedgerClient, Error, QuorumBasis};

fn setup_with_init() -> (Env, CrowdfundLedgerClient<'static>, token::Client<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CrowdfundLedger, ());
    let client = CrowdfundLedgerClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(admin.clone());
    let token = token::Client::new(&env, &sac.address());
    client.init(&admin, &token.address, &QuorumBasis::DonationEntries);
    (env, client, token)
}

fn open_campaign(env: &Env, client: &CrowdfundLedgerClient, target: i128) -> (u64, u64) {
    let owner = Address::generate(env);
    let deadline = env.ledger().timestamp() + 1_000;
    let id = client.create_campaign(
        &owner,
        &String::from_str(env, "Library"),
        &String::from_str(env, "Books for the village school"),
        &target,
        &deadline,
        &String::from_str(env, ""),
    );
    (id, deadline)
}

fn funded_donor(env: &Env, token: &token::Client, amount: i128) -> Address {
    let donor = Address::generate(env);
    token::StellarAssetClient::new(env, &token.address).mint(&donor, &amount);
    donor
}

#[test]
fn test_refund_after_failed_campaign() {
    let (env, client, token) = setup_with_init();
    let (id, deadline) = open_campaign(&env, &client, 10);
    let donor = funded_donor(&env, &token, 3);
    client.donate(&id, &donor, &3);
    assert_eq!(token.balance(&donor), 0);

    env.ledger().set_timestamp(deadline);
    assert_eq!(client.get_status(&id), CampaignStatus::Failed);

    assert_eq!(client.refund(&id, &donor), 3);
    assert_eq!(token.balance(&donor), 3);
    assert_eq!(token.balance(&client.address), 0);
    assert!(client.get_donation_history(&id).get(0).unwrap().refunded);

    // Second call pays nothing.
    assert_eq!(client.try_refund(&id, &donor), Err(Ok(Error::NoContribution)));
    assert_eq!(token.balance(&donor), 3);

    // The ledger of what was collected is unchanged; refunds are tracked apart.
    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.amount_collected, 3);
    assert_eq!(campaign.refunded, 3);
    let donations: StdVec<_> = client.get_donation_history(&id).iter().collect();
    let requests: StdVec<_> = client.list_requests(&id).iter().collect();
    invariants::assert_all_campaign_invariants(&campaign, &donations, &requests);
}

#[test]
fn test_refund_sums_every_entry_of_the_donor() {
    let (env, client, token) = setup_with_init();
    let (id, deadline) = open_campaign(&env, &client, 1_000);
    let donor = funded_donor(&env, &token, 300);
    let other = funded_donor(&env, &token, 50);
    client.donate(&id, &donor, &100);
    client.donate(&id, &other, &50);
    client.donate(&id, &donor, &200);

    env.ledger().set_timestamp(deadline + 10);
    assert_eq!(client.get_contribution(&id, &donor), 300);
    assert_eq!(client.refund(&id, &donor), 300);
    assert_eq!(client.get_contribution(&id, &donor), 0);

    // The other donor's entry is untouched.
    let history = client.get_donation_history(&id);
    assert!(history.get(0).unwrap().refunded);
    assert!(!history.get(1).unwrap().refunded);
    assert!(history.get(2).unwrap().refunded);
    assert_eq!(client.get_contribution(&id, &other), 50);

    assert_eq!(client.refund(&id, &other), 50);
    assert_eq!(token.balance(&client.address), 0);
}

#[test]
fn test_refund_without_donation_fails() {
    let (env, client, token) = setup_with_init();
    let (id, deadline) = open_campaign(&env, &client, 100);
    let donor = funded_donor(&env, &token, 10);
    client.donate(&id, &donor, &10);
    env.ledger().set_timestamp(deadline);

    let stranger = Address::generate(&env);
    assert_eq!(client.try_refund(&id, &stranger), Err(Ok(Error::NoContribution)));
}

#[test]
fn test_refund_rejected_while_active() {
    let (env, client, token) = setup_with_init();
    let (id, _) = open_campaign(&env, &client, 100);
    let donor = funded_donor(&env, &token, 10);
    client.donate(&id, &donor, &10);

    assert_eq!(client.try_refund(&id, &donor), Err(Ok(Error::CampaignNotFailed)));
    assert_eq!(token.balance(&client.address), 10);
}

#[test]
fn test_refund_rejected_for_successful_campaign() {
    let (env, client, token) = setup_with_init();
    let (id, deadline) = open_campaign(&env, &client, 100);
    let donor = funded_donor(&env, &token, 100);
    client.donate(&id, &donor, &100);

    // Past the deadline, but the target was met first.
    env.ledger().set_timestamp(deadline + 1);
    assert_eq!(client.get_status(&id), CampaignStatus::Successful);
    assert_eq!(client.try_refund(&id, &donor), Err(Ok(Error::CampaignNotFailed)));
}

#[test]
fn test_refund_unknown_campaign_not_found() {
    let (env, client, _) = setup_with_init();
    let donor = Address::generate(&env);
    assert_eq!(client.try_refund(&4, &donor), Err(Ok(Error::NotFound)));
}
