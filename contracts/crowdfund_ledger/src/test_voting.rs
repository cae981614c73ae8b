extern crate std;

use soroban_sdk::{testutils::Address as _, token, Address, Env, String};

use crate::{CrowdfundLedger, CrowdfundLedgerClient, Error, QuorumBasis};

fn setup_with_init() -> (Env, CrowdfundLedgerClient<'static>, token::Client<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CrowdfundLedger, ());
    let client = CrowdfundLedgerClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(admin.clone());
    let token = token::Client::new(&env, &sac.address());
    client.init(&admin, &token.address, &QuorumBasis::DonationEntries);
    (env, client, token, admin)
}

fn open_campaign(env: &Env, client: &CrowdfundLedgerClient, owner: &Address, target: i128) -> u64 {
    client.create_campaign(
        owner,
        &String::from_str(env, "School roof"),
        &String::from_str(env, "Replace the roof before the rains"),
        &target,
        &(env.ledger().timestamp() + 86_400),
        &String::from_str(env, ""),
    )
}

fn donate(
    env: &Env,
    client: &CrowdfundLedgerClient,
    token: &token::Client,
    campaign_id: u64,
    donor: &Address,
    amount: i128,
) {
    token::StellarAssetClient::new(env, &token.address).mint(donor, &amount);
    client.donate(&campaign_id, donor, &amount);
}

fn request(env: &Env, client: &CrowdfundLedgerClient, campaign_id: u64, owner: &Address, amount: i128) -> u32 {
    client.create_request(
        &campaign_id,
        owner,
        &String::from_str(env, "Roofing sheets"),
        &amount,
    )
}

#[test]
fn test_non_donor_cannot_vote() {
    let (env, client, token, _) = setup_with_init();
    let owner = Address::generate(&env);
    let id = open_campaign(&env, &client, &owner, 100);
    let donor = Address::generate(&env);
    donate(&env, &client, &token, id, &donor, 100);
    let r = request(&env, &client, id, &owner, 50);

    let stranger = Address::generate(&env);
    assert_eq!(
        client.try_approve_request(&id, &r, &stranger),
        Err(Ok(Error::NotEligible))
    );
    // Owning the campaign does not confer a vote.
    assert_eq!(
        client.try_approve_request(&id, &r, &owner),
        Err(Ok(Error::NotEligible))
    );
    assert_eq!(client.get_request(&id, &r).approvals, 0);
}

#[test]
fn test_donor_votes_once() {
    let (env, client, token, _) = setup_with_init();
    let owner = Address::generate(&env);
    let id = open_campaign(&env, &client, &owner, 100);
    let donor = Address::generate(&env);
    donate(&env, &client, &token, id, &donor, 100);
    let r = request(&env, &client, id, &owner, 50);

    assert!(!client.has_voted(&id, &r, &donor));
    assert_eq!(client.approve_request(&id, &r, &donor), 1);
    assert!(client.has_voted(&id, &r, &donor));
    assert_eq!(
        client.try_approve_request(&id, &r, &donor),
        Err(Ok(Error::AlreadyVoted))
    );
    assert_eq!(client.get_request(&id, &r).approvals, 1);
}

#[test]
fn test_repeat_donor_still_has_one_vote() {
    let (env, client, token, _) = setup_with_init();
    let owner = Address::generate(&env);
    let id = open_campaign(&env, &client, &owner, 100);
    let donor = Address::generate(&env);
    donate(&env, &client, &token, id, &donor, 30);
    donate(&env, &client, &token, id, &donor, 30);
    donate(&env, &client, &token, id, &donor, 40);
    let r = request(&env, &client, id, &owner, 50);

    assert_eq!(client.approve_request(&id, &r, &donor), 1);
    assert_eq!(
        client.try_approve_request(&id, &r, &donor),
        Err(Ok(Error::AlreadyVoted))
    );
}

#[test]
fn test_vote_on_unknown_request_not_found() {
    let (env, client, token, _) = setup_with_init();
    let owner = Address::generate(&env);
    let id = open_campaign(&env, &client, &owner, 100);
    let donor = Address::generate(&env);
    donate(&env, &client, &token, id, &donor, 10);

    assert_eq!(
        client.try_approve_request(&id, &0, &donor),
        Err(Ok(Error::NotFound))
    );
    assert_eq!(
        client.try_approve_request(&9, &0, &donor),
        Err(Ok(Error::NotFound))
    );
}

#[test]
fn test_quorum_is_strict_majority_of_entries() {
    let (env, client, token, _) = setup_with_init();
    let owner = Address::generate(&env);
    let id = open_campaign(&env, &client, &owner, 30);
    let donors = [
        Address::generate(&env),
        Address::generate(&env),
        Address::generate(&env),
    ];
    for donor in &donors {
        donate(&env, &client, &token, id, donor, 10);
    }
    assert_eq!(client.get_campaign(&id).donation_count, 3);
    assert_eq!(client.approvals_needed(&id), 2);

    let r = request(&env, &client, id, &owner, 20);

    client.approve_request(&id, &r, &donors[0]);
    assert_eq!(
        client.try_finalize_request(&id, &r, &owner),
        Err(Ok(Error::QuorumNotMet))
    );

    client.approve_request(&id, &r, &donors[1]);
    assert_eq!(client.finalize_request(&id, &r, &owner), 20);

    let completed = client.get_request(&id, &r);
    assert!(completed.completed);
    assert!(completed.completed_at.is_some());
    assert_eq!(token.balance(&owner), 20);
    assert_eq!(token.balance(&client.address), 10);
}

#[test]
fn test_finalize_pays_at_most_once() {
    let (env, client, token, _) = setup_with_init();
    let owner = Address::generate(&env);
    let id = open_campaign(&env, &client, &owner, 100);
    let donor = Address::generate(&env);
    donate(&env, &client, &token, id, &donor, 100);
    let r = request(&env, &client, id, &owner, 40);
    client.approve_request(&id, &r, &donor);

    assert_eq!(client.finalize_request(&id, &r, &owner), 40);
    assert_eq!(
        client.try_finalize_request(&id, &r, &owner),
        Err(Ok(Error::RequestCompleted))
    );
    assert_eq!(token.balance(&owner), 40);
    assert_eq!(client.get_campaign(&id).disbursed, 40);
    assert_eq!(client.get_payout_history(&id).len(), 1);
}

#[test]
fn test_completed_request_rejects_votes() {
    let (env, client, token, _) = setup_with_init();
    let owner = Address::generate(&env);
    let id = open_campaign(&env, &client, &owner, 100);
    let d1 = Address::generate(&env);
    let d2 = Address::generate(&env);
    let d3 = Address::generate(&env);
    donate(&env, &client, &token, id, &d1, 40);
    donate(&env, &client, &token, id, &d2, 40);
    donate(&env, &client, &token, id, &d3, 20);
    let r = request(&env, &client, id, &owner, 40);
    client.approve_request(&id, &r, &d1);
    client.approve_request(&id, &r, &d2);
    client.finalize_request(&id, &r, &owner);

    assert_eq!(
        client.try_approve_request(&id, &r, &d3),
        Err(Ok(Error::RequestCompleted))
    );
    assert_eq!(client.get_request(&id, &r).approvals, 2);
}

#[test]
fn test_finalize_only_by_owner() {
    let (env, client, token, _) = setup_with_init();
    let owner = Address::generate(&env);
    let id = open_campaign(&env, &client, &owner, 100);
    let donor = Address::generate(&env);
    donate(&env, &client, &token, id, &donor, 100);
    let r = request(&env, &client, id, &owner, 40);
    client.approve_request(&id, &r, &donor);

    assert_eq!(
        client.try_finalize_request(&id, &r, &donor),
        Err(Ok(Error::NotOwner))
    );
    assert!(!client.get_request(&id, &r).completed);
    assert_eq!(token.balance(&donor), 0);
}

#[test]
fn test_finalize_requires_target_met() {
    let (env, client, token, _) = setup_with_init();
    let owner = Address::generate(&env);
    let id = open_campaign(&env, &client, &owner, 100);
    let donor = Address::generate(&env);
    donate(&env, &client, &token, id, &donor, 60);
    let r = request(&env, &client, id, &owner, 50);
    client.approve_request(&id, &r, &donor);

    assert_eq!(
        client.try_finalize_request(&id, &r, &owner),
        Err(Ok(Error::CampaignNotFunded))
    );
    assert_eq!(token.balance(&client.address), 60);
}

#[test]
fn test_unique_donor_basis_counts_repeat_donors_once() {
    let (env, client, token, admin) = setup_with_init();
    let owner = Address::generate(&env);

    // Campaign opened under the default basis keeps it.
    let by_entries = open_campaign(&env, &client, &owner, 100);
    client.set_quorum_basis(&admin, &QuorumBasis::UniqueDonors);
    let by_donors = open_campaign(&env, &client, &owner, 100);

    for id in [by_entries, by_donors] {
        let repeat = Address::generate(&env);
        let single = Address::generate(&env);
        donate(&env, &client, &token, id, &repeat, 20);
        donate(&env, &client, &token, id, &repeat, 20);
        donate(&env, &client, &token, id, &repeat, 20);
        donate(&env, &client, &token, id, &single, 40);

        let r = request(&env, &client, id, &owner, 50);
        client.approve_request(&id, &r, &repeat);
        client.approve_request(&id, &r, &single);
    }

    assert_eq!(
        client.get_campaign(&by_entries).quorum_basis,
        QuorumBasis::DonationEntries
    );
    assert_eq!(
        client.get_campaign(&by_donors).quorum_basis,
        QuorumBasis::UniqueDonors
    );

    // 2 approvals against 4 entries is not a strict majority.
    assert_eq!(client.approvals_needed(&by_entries), 3);
    assert_eq!(
        client.try_finalize_request(&by_entries, &0, &owner),
        Err(Ok(Error::QuorumNotMet))
    );

    // 2 approvals against 2 donors is.
    assert_eq!(client.approvals_needed(&by_donors), 2);
    assert_eq!(client.finalize_request(&by_donors, &0, &owner), 50);
}

#[test]
fn test_set_quorum_basis_admin_only() {
    let (env, client, _, _) = setup_with_init();
    let stranger = Address::generate(&env);
    assert_eq!(
        client.try_set_quorum_basis(&stranger, &QuorumBasis::UniqueDonors),
        Err(Ok(Error::NotAuthorized))
    );
    assert_eq!(client.get_config().quorum_basis, QuorumBasis::DonationEntries);
}

#[test]
fn test_open_requests_cannot_together_over_disburse() {
    let (env, client, token, _) = setup_with_init();
    let owner = Address::generate(&env);
    let id = open_campaign(&env, &client, &owner, 100);
    let donor = Address::generate(&env);
    donate(&env, &client, &token, id, &donor, 100);

    // Each fits the balance on its own; together they exceed it.
    let first = request(&env, &client, id, &owner, 70);
    let second = request(&env, &client, id, &owner, 60);
    client.approve_request(&id, &first, &donor);
    client.approve_request(&id, &second, &donor);

    assert_eq!(client.finalize_request(&id, &first, &owner), 70);
    assert_eq!(
        client.try_finalize_request(&id, &second, &owner),
        Err(Ok(Error::InsufficientFunds))
    );

    assert!(!client.get_request(&id, &second).completed);
    assert_eq!(client.get_campaign(&id).disbursed, 70);
    assert_eq!(client.get_withdrawable(&id), 30);
    assert_eq!(token.balance(&owner), 70);
    assert_eq!(token.balance(&client.address), 30);
}
