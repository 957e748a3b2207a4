//! The per-tick notifier pass: fetch, classify, render, deliver.

pub mod classify;
pub mod outcome;

use std::collections::HashMap;

use tracing::{info, warn};

use crate::discord::{self, WebhookClient};
use crate::governance::{self, GovernanceUnit, Proposal};
use crate::onchain::rpc::RpcClient;
use crate::onchain::Pubkey;
use crate::registry::RealmInfo;
use classify::{Disposition, ProposalEvent};

/// Per-tick disposition counters, logged once per pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub just_opened: usize,
    pub open_for_some_time: usize,
    pub voting_not_started: usize,
    pub closed: usize,
    pub cancelled: usize,
}

impl TickSummary {
    fn observe(&mut self, disposition: Disposition) {
        match disposition {
            Disposition::JustOpened => self.just_opened += 1,
            Disposition::OpenForSomeTime => self.open_for_some_time += 1,
            Disposition::VotingNotStarted => self.voting_not_started += 1,
            Disposition::Closed => self.closed += 1,
            Disposition::Cancelled => self.cancelled += 1,
            Disposition::Other => {}
        }
    }
}

/// A triggered notification; lives for one tick, consumed by the renderer.
#[derive(Debug, Clone)]
pub struct Notification {
    pub proposal: Proposal,
    pub event: ProposalEvent,
    pub url: String,
}

/// Classify every proposal in the snapshot at `now`.
///
/// Pure with respect to I/O: the caller fetched the snapshot, this decides.
/// Notification order follows governance-unit and proposal fetch order.
pub fn scan_snapshot(
    realm_identifier: &str,
    units: &HashMap<Pubkey, GovernanceUnit>,
    proposals_by_unit: &[Vec<Proposal>],
    now: i64,
) -> (Vec<Notification>, TickSummary) {
    let mut notifications = Vec::new();
    let mut summary = TickSummary::default();

    for proposals in proposals_by_unit {
        for proposal in proposals {
            let Some(unit) = units.get(&proposal.governance) else {
                warn!(
                    proposal = %proposal.address,
                    governance = %proposal.governance,
                    "proposal references unknown governance, skipping"
                );
                continue;
            };

            let (events, disposition) = classify::evaluate(proposal, unit, now);
            summary.observe(disposition);

            if events.is_empty() {
                continue;
            }
            let url = discord::proposal_url(realm_identifier, &proposal.address);
            for event in events {
                notifications.push(Notification {
                    proposal: proposal.clone(),
                    event,
                    url: url.clone(),
                });
            }
        }
    }

    (notifications, summary)
}

/// Run one full pass for the realm: fetch everything, classify against the
/// current wall clock, deliver one message per triggered event. Delivery is
/// sequential and awaited per proposal so channel ordering matches proposal
/// iteration order; a delivery failure aborts the rest of the pass.
pub async fn run_pass(
    rpc: &RpcClient,
    webhook: &WebhookClient,
    realm: &RealmInfo,
    realm_identifier: &str,
) -> anyhow::Result<()> {
    info!(realm = %realm.symbol, "fetching governance accounts");
    let units = governance::fetch_governance_units(rpc, &realm.program_id, &realm.realm_id).await?;

    info!("fetching proposals for all governances");
    let proposals_by_unit =
        governance::fetch_proposals_by_unit(rpc, &realm.program_id, &units).await?;

    info!(realm = %realm.symbol, "scanning proposals");
    let now = chrono::Utc::now().timestamp();
    let (notifications, summary) = scan_snapshot(realm_identifier, &units, &proposals_by_unit, now);

    for notification in &notifications {
        let embed = match notification.event {
            ProposalEvent::Opened => {
                discord::proposal_created(&notification.proposal, &notification.url)
            }
            ProposalEvent::EndingSoon { remaining_seconds } => {
                discord::proposal_ending(&notification.proposal, &notification.url, remaining_seconds)
            }
            ProposalEvent::Closed => {
                discord::proposal_ended(&notification.proposal, &notification.url)
            }
        };
        webhook.send_embeds(std::slice::from_ref(&embed)).await?;
        info!(
            proposal = %notification.proposal.address,
            event = ?notification.event,
            "notification delivered"
        );
    }

    info!(
        open_for_some_time = summary.open_for_some_time,
        just_opened = summary.just_opened,
        voting_not_started = summary.voting_not_started,
        closed = summary.closed,
        cancelled = summary.cancelled,
        "tick complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onchain::accounts::ProposalState;

    fn unit(address: Pubkey, voting_base_time: u32) -> GovernanceUnit {
        GovernanceUnit {
            address,
            voting_base_time,
        }
    }

    fn proposal(
        address: Pubkey,
        governance: Pubkey,
        state: ProposalState,
        voting_at: Option<i64>,
        voting_completed_at: Option<i64>,
    ) -> Proposal {
        Proposal {
            address,
            name: "Fund the treasury".to_string(),
            governance,
            governing_token_mint: Pubkey::new([3u8; 32]),
            state,
            voting_at,
            voting_completed_at,
            yes_vote_weight: 0,
            no_vote_weight: 0,
        }
    }

    #[test]
    fn test_two_unit_snapshot_fires_exactly_once() {
        // Unit A's proposal opened 100s ago, unit B's closed 4,000s ago:
        // exactly one notification, for A.
        let now = 1_700_000_000;
        let gov_a = Pubkey::new([10u8; 32]);
        let gov_b = Pubkey::new([11u8; 32]);
        let units: HashMap<Pubkey, GovernanceUnit> = [
            (gov_a, unit(gov_a, 259_200)),
            (gov_b, unit(gov_b, 259_200)),
        ]
        .into_iter()
        .collect();

        let proposals = vec![
            vec![proposal(
                Pubkey::new([20u8; 32]),
                gov_a,
                ProposalState::Voting,
                Some(now - 100),
                None,
            )],
            vec![proposal(
                Pubkey::new([21u8; 32]),
                gov_b,
                ProposalState::Succeeded,
                Some(now - 300_000),
                Some(now - 4_000),
            )],
        ];

        let (notifications, summary) = scan_snapshot("MYDAO", &units, &proposals, now);

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].event, ProposalEvent::Opened);
        assert_eq!(notifications[0].proposal.address, Pubkey::new([20u8; 32]));
        assert!(notifications[0]
            .url
            .contains(&Pubkey::new([20u8; 32]).to_string()));
        assert_eq!(summary.just_opened, 1);
        assert_eq!(summary.closed, 1);
    }

    #[test]
    fn test_counters_cover_all_dispositions() {
        let now = 1_700_000_000;
        let gov = Pubkey::new([10u8; 32]);
        let units: HashMap<Pubkey, GovernanceUnit> =
            [(gov, unit(gov, 259_200))].into_iter().collect();

        let proposals = vec![vec![
            proposal(Pubkey::new([20u8; 32]), gov, ProposalState::Cancelled, None, None),
            proposal(Pubkey::new([21u8; 32]), gov, ProposalState::Draft, None, None),
            proposal(
                Pubkey::new([22u8; 32]),
                gov,
                ProposalState::Voting,
                Some(now - 50_000),
                None,
            ),
            proposal(
                Pubkey::new([23u8; 32]),
                gov,
                ProposalState::Voting,
                Some(now - 10),
                None,
            ),
            proposal(
                Pubkey::new([24u8; 32]),
                gov,
                ProposalState::Completed,
                Some(now - 400_000),
                Some(now - 100_000),
            ),
        ]];

        let (notifications, summary) = scan_snapshot("MYDAO", &units, &proposals, now);

        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.voting_not_started, 1);
        assert_eq!(summary.open_for_some_time, 1);
        assert_eq!(summary.just_opened, 1);
        assert_eq!(summary.closed, 1);
        // only the just-opened proposal notifies
        assert_eq!(notifications.len(), 1);
    }

    #[test]
    fn test_unknown_governance_is_skipped() {
        let now = 1_700_000_000;
        let units = HashMap::new();
        let proposals = vec![vec![proposal(
            Pubkey::new([20u8; 32]),
            Pubkey::new([10u8; 32]),
            ProposalState::Voting,
            Some(now - 10),
            None,
        )]];

        let (notifications, summary) = scan_snapshot("MYDAO", &units, &proposals, now);
        assert!(notifications.is_empty());
        assert_eq!(summary, TickSummary::default());
    }
}
