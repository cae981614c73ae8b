#![allow(dead_code)]

extern crate std;

use crate::types::{Campaign, CampaignStatus, DonationEntry, Request};

/// INV-1: `amount_collected` equals the sum of every donation entry, refunded or not.
pub fn assert_collected_matches_donations(campaign: &Campaign, donations: &[DonationEntry]) {
    let sum: i128 = donations.iter().map(|d| d.amount).sum();
    assert_eq!(
        campaign.amount_collected, sum,
        "INV-1 violated: campaign {} collected {} but donations sum to {}",
        campaign.id, campaign.amount_collected, sum
    );
    assert_eq!(
        campaign.donation_count as usize,
        donations.len(),
        "INV-1 violated: campaign {} donation_count out of sync",
        campaign.id
    );
}

/// INV-2: released funds equal the completed requests and never exceed what was raised.
pub fn assert_never_over_disbursed(campaign: &Campaign, requests: &[Request]) {
    let released: i128 = requests
        .iter()
        .filter(|r| r.completed)
        .map(|r| r.amount)
        .sum();
    assert_eq!(
        campaign.disbursed, released,
        "INV-2 violated: campaign {} disbursed {} but completed requests total {}",
        campaign.id, campaign.disbursed, released
    );
    assert!(
        campaign.disbursed <= campaign.amount_collected,
        "INV-2 violated: campaign {} disbursed {} of {} collected",
        campaign.id,
        campaign.disbursed,
        campaign.amount_collected
    );
}

/// INV-3: a request never holds more approvals than there are distinct donors.
pub fn assert_approvals_bounded(campaign: &Campaign, requests: &[Request]) {
    for r in requests {
        assert!(
            r.approvals <= campaign.donor_count,
            "INV-3 violated: request {} has {} approvals from {} donors",
            r.id,
            r.approvals,
            campaign.donor_count
        );
    }
}

/// INV-4: refunds only ever pay back refunded entries, and only on failed campaigns.
pub fn assert_refunds_consistent(campaign: &Campaign, donations: &[DonationEntry]) {
    let refunded: i128 = donations
        .iter()
        .filter(|d| d.refunded)
        .map(|d| d.amount)
        .sum();
    assert_eq!(
        campaign.refunded, refunded,
        "INV-4 violated: campaign {} refunded {} but flagged entries total {}",
        campaign.id, campaign.refunded, refunded
    );
    if refunded > 0 {
        assert_eq!(campaign.status, CampaignStatus::Failed);
    }
}

/// INV-5: status transitions only move forward.
///   Active -> Successful | Failed
///   Successful, Failed -> (none)
pub fn assert_valid_status_transition(from: &CampaignStatus, to: &CampaignStatus) {
    let valid = from == to
        || matches!(
            (from, to),
            (CampaignStatus::Active, CampaignStatus::Successful)
                | (CampaignStatus::Active, CampaignStatus::Failed)
        );
    assert!(
        valid,
        "INV-5 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-6: configuration fields are never rewritten after creation.
pub fn assert_campaign_immutable_fields(original: &Campaign, current: &Campaign) {
    assert_eq!(original.id, current.id, "INV-6 violated: id changed");
    assert_eq!(original.owner, current.owner, "INV-6 violated: owner changed");
    assert_eq!(original.title, current.title, "INV-6 violated: title changed");
    assert_eq!(
        original.description, current.description,
        "INV-6 violated: description changed"
    );
    assert_eq!(original.image, current.image, "INV-6 violated: image changed");
    assert_eq!(original.target, current.target, "INV-6 violated: target changed");
    assert_eq!(
        original.deadline, current.deadline,
        "INV-6 violated: deadline changed"
    );
    assert_eq!(
        original.quorum_basis, current.quorum_basis,
        "INV-6 violated: quorum basis changed"
    );
}

/// INV-7: campaign ids are sequential starting from 0.
pub fn assert_sequential_ids(campaigns: &[Campaign]) {
    for (i, campaign) in campaigns.iter().enumerate() {
        assert_eq!(
            campaign.id, i as u64,
            "INV-7 violated: expected id {}, got {}",
            i, campaign.id
        );
    }
}

/// Run every invariant that can be checked from a campaign and its logs.
pub fn assert_all_campaign_invariants(
    campaign: &Campaign,
    donations: &[DonationEntry],
    requests: &[Request],
) {
    assert_collected_matches_donations(campaign, donations);
    assert_never_over_disbursed(campaign, requests);
    assert_approvals_bounded(campaign, requests);
    assert_refunds_consistent(campaign, donations);
}
