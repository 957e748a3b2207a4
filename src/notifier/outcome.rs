//! Vote tallies and outcome resolution for closed proposals.
//!
//! Community and council electorates vote on incomparable scales, so the
//! quorum threshold depends on which token mint governed the proposal.

use crate::fmt;
use crate::governance::Proposal;
use crate::onchain::Pubkey;

/// Mint of the primary community voting token.
pub const COMMUNITY_TOKEN_MINT: &str = "Ds52CDgqdWbTWsua1hgT3AuSSy4FNx2Ezge1br3jQ14a";

/// Minimum scaled yes votes for a community-mint proposal to reach quorum.
const COMMUNITY_MIN_YES_VOTES: u64 = 35_000_000;

/// Minimum yes votes for any other (council) mint.
const COUNCIL_MIN_YES_VOTES: u64 = 3;

/// Decimal count of the voting token; raw weights are scaled down by this.
pub const VOTING_TOKEN_DECIMALS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    DefeatedQuorumNotReached,
    Defeated,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Success => "✅ Success",
            Outcome::DefeatedQuorumNotReached => "❌ Defeated - Quorum Not Reached",
            Outcome::Defeated => "❌ Defeated",
        }
    }
}

/// Which electorate voted on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteKind {
    Community,
    Council,
}

impl VoteKind {
    pub fn of(governing_token_mint: &Pubkey) -> Self {
        if governing_token_mint.to_string() == COMMUNITY_TOKEN_MINT {
            VoteKind::Community
        } else {
            VoteKind::Council
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VoteKind::Community => "Community Vote",
            VoteKind::Council => "Council Vote",
        }
    }

    fn min_yes_votes(self) -> u64 {
        match self {
            VoteKind::Community => COMMUNITY_MIN_YES_VOTES,
            VoteKind::Council => COUNCIL_MIN_YES_VOTES,
        }
    }
}

/// Scaled tallies and the resolved outcome of a closed proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteResult {
    pub yes_votes: u64,
    pub no_votes: u64,
    pub kind: VoteKind,
    pub outcome: Outcome,
}

/// Resolve the outcome from the proposal's raw vote weights.
pub fn resolve(proposal: &Proposal) -> VoteResult {
    let yes_votes = fmt::token_amount(proposal.yes_vote_weight, VOTING_TOKEN_DECIMALS);
    let no_votes = fmt::token_amount(proposal.no_vote_weight, VOTING_TOKEN_DECIMALS);
    let kind = VoteKind::of(&proposal.governing_token_mint);

    let quorum_reached = yes_votes >= kind.min_yes_votes();
    let outcome = if yes_votes > no_votes && quorum_reached {
        Outcome::Success
    } else if !quorum_reached {
        Outcome::DefeatedQuorumNotReached
    } else {
        Outcome::Defeated
    };

    VoteResult {
        yes_votes,
        no_votes,
        kind,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onchain::accounts::ProposalState;

    fn proposal(mint: Pubkey, yes_raw: u64, no_raw: u64) -> Proposal {
        Proposal {
            address: Pubkey::new([2u8; 32]),
            name: "Fund the treasury".to_string(),
            governance: Pubkey::new([1u8; 32]),
            governing_token_mint: mint,
            state: ProposalState::Succeeded,
            voting_at: Some(0),
            voting_completed_at: Some(1_000),
            yes_vote_weight: yes_raw,
            no_vote_weight: no_raw,
        }
    }

    fn community_mint() -> Pubkey {
        COMMUNITY_TOKEN_MINT.parse().unwrap()
    }

    #[test]
    fn test_community_success() {
        // 40M yes vs 1M no after scaling by 10^6
        let p = proposal(
            community_mint(),
            40_000_000_000_000,
            1_000_000_000_000,
        );
        let result = resolve(&p);
        assert_eq!(result.yes_votes, 40_000_000);
        assert_eq!(result.no_votes, 1_000_000);
        assert_eq!(result.kind, VoteKind::Community);
        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(result.outcome.label(), "✅ Success");
    }

    #[test]
    fn test_council_quorum_not_reached() {
        // 2 yes votes against a council threshold of 3
        let p = proposal(Pubkey::new([9u8; 32]), 2_000_000, 0);
        let result = resolve(&p);
        assert_eq!(result.yes_votes, 2);
        assert_eq!(result.kind, VoteKind::Council);
        assert_eq!(result.outcome, Outcome::DefeatedQuorumNotReached);
        assert_eq!(
            result.outcome.label(),
            "❌ Defeated - Quorum Not Reached"
        );
    }

    #[test]
    fn test_community_below_quorum_despite_majority() {
        let p = proposal(community_mint(), 10_000_000_000_000, 0);
        assert_eq!(resolve(&p).outcome, Outcome::DefeatedQuorumNotReached);
    }

    #[test]
    fn test_defeated_on_majority_no() {
        // Quorum reached but no votes win
        let p = proposal(
            community_mint(),
            36_000_000_000_000,
            50_000_000_000_000,
        );
        assert_eq!(resolve(&p).outcome, Outcome::Defeated);
    }

    #[test]
    fn test_tie_is_not_success() {
        let p = proposal(Pubkey::new([9u8; 32]), 5_000_000, 5_000_000);
        assert_eq!(resolve(&p).outcome, Outcome::Defeated);
    }

    #[test]
    fn test_vote_kind_labels() {
        assert_eq!(VoteKind::of(&community_mint()), VoteKind::Community);
        assert_eq!(VoteKind::Community.label(), "Community Vote");
        assert_eq!(VoteKind::of(&Pubkey::new([9u8; 32])), VoteKind::Council);
        assert_eq!(VoteKind::Council.label(), "Council Vote");
    }
}
