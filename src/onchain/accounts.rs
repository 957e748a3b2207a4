//! Borsh layouts for SPL-governance (program v3) accounts.
//!
//! Only the fields up to the last one the notifier consumes are declared;
//! decoding reads a prefix of the account and leaves trailing bytes alone,
//! so tail-appended layout revisions don't break us.

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;

use crate::onchain::Pubkey;

/// Account-type tags of the four `GovernanceV2`-family variants
/// (governance, program, mint and token governance). They share one layout.
pub const GOVERNANCE_TAGS: [u8; 4] = [18, 19, 20, 21];

/// Account-type tag of `ProposalV2`.
pub const PROPOSAL_V2_TAG: u8 = 14;

#[derive(Error, Debug)]
pub enum AccountDecodeError {
    #[error("unsupported account tag {0}")]
    UnsupportedTag(u8),
    #[error("truncated or malformed account data: {0}")]
    Borsh(#[from] borsh::io::Error),
    #[error("empty account data")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum VoteThreshold {
    YesVotePercentage(u8),
    QuorumPercentage(u8),
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum VoteTipping {
    Strict,
    Early,
    Disabled,
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct GovernanceConfig {
    pub community_vote_threshold: VoteThreshold,
    pub min_community_weight_to_create_proposal: u64,
    pub min_transaction_hold_up_time: u32,
    /// Voting window in seconds; a proposal's deadline is
    /// `voting_at + voting_base_time`.
    pub voting_base_time: u32,
    pub community_vote_tipping: VoteTipping,
    pub council_vote_threshold: VoteThreshold,
    pub council_veto_vote_threshold: VoteThreshold,
    pub min_council_weight_to_create_proposal: u64,
    pub council_vote_tipping: VoteTipping,
    pub community_veto_vote_threshold: VoteThreshold,
    pub voting_cool_off_time: u32,
    pub deposit_exempt_proposal_count: u8,
}

/// Prefix of a `GovernanceV2`-family account, through `config`.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct GovernanceAccount {
    pub account_type: u8,
    pub realm: Pubkey,
    pub governed_account: Pubkey,
    pub reserved1: u32,
    pub config: GovernanceConfig,
}

/// Proposal lifecycle tag. Unrecognized tags decode as `Unknown` so a
/// program upgrade adding states never fails a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalState {
    Draft,
    SigningOff,
    Voting,
    Succeeded,
    Executing,
    Completed,
    Cancelled,
    Defeated,
    ExecutingWithErrors,
    Vetoed,
    Unknown(u8),
}

impl From<u8> for ProposalState {
    fn from(tag: u8) -> Self {
        match tag {
            0 => ProposalState::Draft,
            1 => ProposalState::SigningOff,
            2 => ProposalState::Voting,
            3 => ProposalState::Succeeded,
            4 => ProposalState::Executing,
            5 => ProposalState::Completed,
            6 => ProposalState::Cancelled,
            7 => ProposalState::Defeated,
            8 => ProposalState::ExecutingWithErrors,
            9 => ProposalState::Vetoed,
            other => ProposalState::Unknown(other),
        }
    }
}

impl ProposalState {
    fn tag(self) -> u8 {
        match self {
            ProposalState::Draft => 0,
            ProposalState::SigningOff => 1,
            ProposalState::Voting => 2,
            ProposalState::Succeeded => 3,
            ProposalState::Executing => 4,
            ProposalState::Completed => 5,
            ProposalState::Cancelled => 6,
            ProposalState::Defeated => 7,
            ProposalState::ExecutingWithErrors => 8,
            ProposalState::Vetoed => 9,
            ProposalState::Unknown(tag) => tag,
        }
    }
}

impl BorshDeserialize for ProposalState {
    fn deserialize_reader<R: borsh::io::Read>(reader: &mut R) -> borsh::io::Result<Self> {
        Ok(u8::deserialize_reader(reader)?.into())
    }
}

impl BorshSerialize for ProposalState {
    fn serialize<W: borsh::io::Write>(&self, writer: &mut W) -> borsh::io::Result<()> {
        self.tag().serialize(writer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum MultiChoiceType {
    FullWeight,
    Weighted,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum VoteType {
    SingleChoice,
    MultiChoice {
        choice_type: MultiChoiceType,
        min_voter_options: u8,
        max_voter_options: u8,
        max_winning_options: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum OptionVoteResult {
    None,
    Succeeded,
    Defeated,
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct ProposalOption {
    pub label: String,
    pub vote_weight: u64,
    pub vote_result: OptionVoteResult,
    pub transactions_executed_count: u16,
    pub transactions_count: u16,
    pub transactions_next_index: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum InstructionExecutionFlags {
    None,
    Ordered,
    UseTransaction,
}

/// Prefix of a `ProposalV2` account, through `name`.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct ProposalAccount {
    pub account_type: u8,
    pub governance: Pubkey,
    pub governing_token_mint: Pubkey,
    pub state: ProposalState,
    pub token_owner_record: Pubkey,
    pub signatories_count: u8,
    pub signatories_signed_off_count: u8,
    pub vote_type: VoteType,
    pub options: Vec<ProposalOption>,
    pub deny_vote_weight: Option<u64>,
    pub reserved1: u8,
    pub abstain_vote_weight: Option<u64>,
    pub start_voting_at: Option<i64>,
    pub draft_at: i64,
    pub signing_off_at: Option<i64>,
    pub voting_at: Option<i64>,
    pub voting_at_slot: Option<u64>,
    pub voting_completed_at: Option<i64>,
    pub executing_at: Option<i64>,
    pub closed_at: Option<i64>,
    pub execution_flags: InstructionExecutionFlags,
    pub max_vote_weight: Option<u64>,
    pub max_voting_time: Option<u32>,
    pub vote_threshold: Option<VoteThreshold>,
    pub reserved: [u8; 64],
    pub name: String,
}

/// Decode a governance-family account, rejecting any other account type.
pub fn decode_governance(data: &[u8]) -> Result<GovernanceAccount, AccountDecodeError> {
    let tag = *data.first().ok_or(AccountDecodeError::Empty)?;
    if !GOVERNANCE_TAGS.contains(&tag) {
        return Err(AccountDecodeError::UnsupportedTag(tag));
    }
    let mut slice = data;
    Ok(GovernanceAccount::deserialize(&mut slice)?)
}

/// Decode a `ProposalV2` account, rejecting any other account type.
pub fn decode_proposal(data: &[u8]) -> Result<ProposalAccount, AccountDecodeError> {
    let tag = *data.first().ok_or(AccountDecodeError::Empty)?;
    if tag != PROPOSAL_V2_TAG {
        return Err(AccountDecodeError::UnsupportedTag(tag));
    }
    let mut slice = data;
    Ok(ProposalAccount::deserialize(&mut slice)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> GovernanceConfig {
        GovernanceConfig {
            community_vote_threshold: VoteThreshold::YesVotePercentage(60),
            min_community_weight_to_create_proposal: 1_000_000,
            min_transaction_hold_up_time: 0,
            voting_base_time: 259_200,
            community_vote_tipping: VoteTipping::Strict,
            council_vote_threshold: VoteThreshold::YesVotePercentage(60),
            council_veto_vote_threshold: VoteThreshold::Disabled,
            min_council_weight_to_create_proposal: 1,
            council_vote_tipping: VoteTipping::Strict,
            community_veto_vote_threshold: VoteThreshold::Disabled,
            voting_cool_off_time: 43_200,
            deposit_exempt_proposal_count: 10,
        }
    }

    fn sample_governance(tag: u8) -> GovernanceAccount {
        GovernanceAccount {
            account_type: tag,
            realm: Pubkey::new([1u8; 32]),
            governed_account: Pubkey::new([2u8; 32]),
            reserved1: 0,
            config: sample_config(),
        }
    }

    fn sample_proposal() -> ProposalAccount {
        ProposalAccount {
            account_type: PROPOSAL_V2_TAG,
            governance: Pubkey::new([4u8; 32]),
            governing_token_mint: Pubkey::new([5u8; 32]),
            state: ProposalState::Voting,
            token_owner_record: Pubkey::new([6u8; 32]),
            signatories_count: 1,
            signatories_signed_off_count: 1,
            vote_type: VoteType::SingleChoice,
            options: vec![ProposalOption {
                label: "Approve".to_string(),
                vote_weight: 42_000_000_000,
                vote_result: OptionVoteResult::None,
                transactions_executed_count: 0,
                transactions_count: 0,
                transactions_next_index: 0,
            }],
            deny_vote_weight: Some(1_000_000),
            reserved1: 0,
            abstain_vote_weight: None,
            start_voting_at: None,
            draft_at: 1_700_000_000,
            signing_off_at: Some(1_700_000_100),
            voting_at: Some(1_700_000_200),
            voting_at_slot: Some(230_000_000),
            voting_completed_at: None,
            executing_at: None,
            closed_at: None,
            execution_flags: InstructionExecutionFlags::None,
            max_vote_weight: None,
            max_voting_time: None,
            vote_threshold: None,
            reserved: [0u8; 64],
            name: "Fund the treasury".to_string(),
        }
    }

    #[test]
    fn test_governance_round_trip_ignores_trailing_bytes() {
        let mut data = borsh::to_vec(&sample_governance(18)).unwrap();
        // reserved_v2 + trailing fields present on real accounts
        data.extend_from_slice(&[0u8; 128]);

        let decoded = decode_governance(&data).unwrap();
        assert_eq!(decoded.realm, Pubkey::new([1u8; 32]));
        assert_eq!(decoded.config.voting_base_time, 259_200);
    }

    #[test]
    fn test_all_governance_family_tags_decode() {
        for tag in GOVERNANCE_TAGS {
            let data = borsh::to_vec(&sample_governance(tag)).unwrap();
            assert_eq!(decode_governance(&data).unwrap().account_type, tag);
        }
    }

    #[test]
    fn test_governance_rejects_other_tags() {
        // RealmV2 carries tag 16
        let mut data = borsh::to_vec(&sample_governance(18)).unwrap();
        data[0] = 16;
        assert!(matches!(
            decode_governance(&data),
            Err(AccountDecodeError::UnsupportedTag(16))
        ));
    }

    #[test]
    fn test_proposal_round_trip_ignores_trailing_bytes() {
        let mut data = borsh::to_vec(&sample_proposal()).unwrap();
        // description_link and veto_vote_weight follow `name` on chain
        data.extend_from_slice(&borsh::to_vec(&"https://example.org/prop".to_string()).unwrap());
        data.extend_from_slice(&borsh::to_vec(&0u64).unwrap());

        let decoded = decode_proposal(&data).unwrap();
        assert_eq!(decoded.name, "Fund the treasury");
        assert_eq!(decoded.state, ProposalState::Voting);
        assert_eq!(decoded.options[0].vote_weight, 42_000_000_000);
        assert_eq!(decoded.deny_vote_weight, Some(1_000_000));
        assert_eq!(decoded.voting_at, Some(1_700_000_200));
    }

    #[test]
    fn test_unknown_proposal_state_decodes() {
        let mut proposal = sample_proposal();
        proposal.state = ProposalState::Unknown(42);
        let data = borsh::to_vec(&proposal).unwrap();

        let decoded = decode_proposal(&data).unwrap();
        assert_eq!(decoded.state, ProposalState::Unknown(42));
    }

    #[test]
    fn test_truncated_proposal_fails_cleanly() {
        let data = borsh::to_vec(&sample_proposal()).unwrap();
        assert!(matches!(
            decode_proposal(&data[..40]),
            Err(AccountDecodeError::Borsh(_))
        ));
    }

    #[test]
    fn test_empty_account_data() {
        assert!(matches!(
            decode_proposal(&[]),
            Err(AccountDecodeError::Empty)
        ));
    }
}
