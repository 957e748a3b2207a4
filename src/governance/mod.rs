//! Governance domain types and the per-tick account fetch.
//!
//! Wire accounts from `onchain::accounts` are bridged into the two types
//! the notifier consumes: `GovernanceUnit` (the voting-duration policy) and
//! `Proposal`. Proposals for distinct governance units are fetched with one
//! request per unit, fanned out concurrently and joined; a failed sub-fetch
//! aborts the whole tick so the next scheduled one retries from scratch.

use std::collections::HashMap;

use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, info};

use crate::onchain::accounts::{self, AccountDecodeError, ProposalState};
use crate::onchain::rpc::{AccountFilter, RpcClient, RpcError};
use crate::onchain::Pubkey;

/// Offset of the parent pubkey in both account layouts: one account-type
/// byte, then the realm (governances) or the owning governance (proposals).
const PARENT_PUBKEY_OFFSET: usize = 1;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// A sub-organization of the realm that owns proposals and a voting window.
#[derive(Debug, Clone)]
pub struct GovernanceUnit {
    pub address: Pubkey,
    /// Seconds from `voting_at` to the voting deadline.
    pub voting_base_time: u32,
}

impl GovernanceUnit {
    pub fn from_account(address: Pubkey, account: &accounts::GovernanceAccount) -> Self {
        Self {
            address,
            voting_base_time: account.config.voting_base_time,
        }
    }
}

/// One proposal snapshot, the entity under classification.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub address: Pubkey,
    pub name: String,
    pub governance: Pubkey,
    pub governing_token_mint: Pubkey,
    pub state: ProposalState,
    /// When voting opened; `None` until then.
    pub voting_at: Option<i64>,
    /// When voting concluded; set only after `voting_at`.
    pub voting_completed_at: Option<i64>,
    pub yes_vote_weight: u64,
    pub no_vote_weight: u64,
}

impl Proposal {
    /// Bridge a wire account. Yes votes are option 0's weight and no votes
    /// the deny weight, per the single-choice proposal layout.
    pub fn from_account(address: Pubkey, account: accounts::ProposalAccount) -> Self {
        let yes_vote_weight = account
            .options
            .first()
            .map(|option| option.vote_weight)
            .unwrap_or(0);
        Self {
            address,
            name: account.name,
            governance: account.governance,
            governing_token_mint: account.governing_token_mint,
            state: account.state,
            voting_at: account.voting_at,
            voting_completed_at: account.voting_completed_at,
            yes_vote_weight,
            no_vote_weight: account.deny_vote_weight.unwrap_or(0),
        }
    }
}

/// Fetch every governance unit belonging to `realm`, keyed by address.
pub async fn fetch_governance_units(
    rpc: &RpcClient,
    program_id: &Pubkey,
    realm: &Pubkey,
) -> Result<HashMap<Pubkey, GovernanceUnit>, FetchError> {
    let rows = rpc
        .program_accounts(
            program_id,
            &[AccountFilter::pubkey_at(PARENT_PUBKEY_OFFSET, realm)],
        )
        .await?;

    let mut units = HashMap::with_capacity(rows.len());
    for keyed in rows {
        match accounts::decode_governance(&keyed.data) {
            Ok(account) => {
                units.insert(
                    keyed.pubkey,
                    GovernanceUnit::from_account(keyed.pubkey, &account),
                );
            }
            Err(AccountDecodeError::UnsupportedTag(tag)) => {
                debug!(account = %keyed.pubkey, tag, "skipping non-v3 governance account");
            }
            Err(error) => {
                debug!(account = %keyed.pubkey, error = %error, "skipping undecodable governance account");
            }
        }
    }

    info!(realm = %realm, units = units.len(), "fetched governance units");
    Ok(units)
}

/// Fetch the proposals of each governance unit, one concurrent request per
/// unit. The outer ordering follows `units` iteration order.
pub async fn fetch_proposals_by_unit(
    rpc: &RpcClient,
    program_id: &Pubkey,
    units: &HashMap<Pubkey, GovernanceUnit>,
) -> Result<Vec<Vec<Proposal>>, FetchError> {
    let fetches = units
        .keys()
        .map(|governance| fetch_unit_proposals(rpc, program_id, *governance));
    let proposals_by_unit = try_join_all(fetches).await?;

    let total: usize = proposals_by_unit.iter().map(Vec::len).sum();
    info!(governances = units.len(), proposals = total, "fetched proposals");
    Ok(proposals_by_unit)
}

async fn fetch_unit_proposals(
    rpc: &RpcClient,
    program_id: &Pubkey,
    governance: Pubkey,
) -> Result<Vec<Proposal>, FetchError> {
    let rows = rpc
        .program_accounts(
            program_id,
            &[AccountFilter::pubkey_at(PARENT_PUBKEY_OFFSET, &governance)],
        )
        .await?;

    let mut proposals = Vec::with_capacity(rows.len());
    for keyed in rows {
        match accounts::decode_proposal(&keyed.data) {
            Ok(account) => proposals.push(Proposal::from_account(keyed.pubkey, account)),
            Err(AccountDecodeError::UnsupportedTag(tag)) => {
                debug!(account = %keyed.pubkey, tag, "skipping non-v2 proposal account");
            }
            Err(error) => {
                debug!(account = %keyed.pubkey, error = %error, "skipping undecodable proposal account");
            }
        }
    }

    debug!(governance = %governance, proposals = proposals.len(), "fetched unit proposals");
    Ok(proposals)
}
