//! Windowed proposal classification.
//!
//! Nothing is persisted between ticks, so "this transition just happened"
//! is inferred by comparing an on-chain timestamp against wall-clock now,
//! bounded by the poll period plus a fixed 30s of slack for a late-running
//! tick. Widening the slack past the poll period would double-fire.

use crate::governance::{GovernanceUnit, Proposal};
use crate::onchain::accounts::ProposalState;

/// Nominal tick period in seconds. The scheduler polls on this cadence and
/// the trigger windows are sized to match it.
pub const TICK_SECONDS: i64 = 5 * 60;

/// Slack on top of the tick period for scheduler jitter.
pub const TOLERANCE_SECONDS: i64 = 30;

/// Lead time for the deadline warning.
const DAY_SECONDS: i64 = 86_400;

/// True when `t` happened within the last tick period (plus slack).
fn just_occurred(now: i64, t: i64) -> bool {
    (0..=TICK_SECONDS + TOLERANCE_SECONDS).contains(&(now - t))
}

/// A notification-worthy transition observed for one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalEvent {
    /// Voting opened within the last tick window.
    Opened,
    /// The voting deadline is roughly 24 hours out.
    EndingSoon { remaining_seconds: i64 },
    /// Voting concluded within the last tick window.
    Closed,
}

/// Where a proposal landed this tick, for the per-tick counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Cancelled,
    Closed,
    VotingNotStarted,
    JustOpened,
    OpenForSomeTime,
    /// Past the opened window but not in the `Voting` state (finalizing,
    /// vetoed, unknown tags). Not counted.
    Other,
}

/// Classify one proposal at `now`, given its parent unit's voting window.
///
/// Returns zero to two events: the ending-soon check runs independently of
/// the opened check, so a proposal with a voting window just over a day can
/// trigger both on the same tick.
pub fn evaluate(
    proposal: &Proposal,
    unit: &GovernanceUnit,
    now: i64,
) -> (Vec<ProposalEvent>, Disposition) {
    if proposal.state == ProposalState::Cancelled {
        return (Vec::new(), Disposition::Cancelled);
    }

    // Voting over. Notify only when it concluded within the window; either
    // way nothing further can fire for this proposal.
    if let Some(completed_at) = proposal.voting_completed_at {
        let events = if just_occurred(now, completed_at) {
            vec![ProposalEvent::Closed]
        } else {
            Vec::new()
        };
        return (events, Disposition::Closed);
    }

    let Some(voting_at) = proposal.voting_at else {
        return (Vec::new(), Disposition::VotingNotStarted);
    };

    let mut events = Vec::new();
    let disposition = if just_occurred(now, voting_at) {
        events.push(ProposalEvent::Opened);
        Disposition::JustOpened
    } else if proposal.state == ProposalState::Voting {
        Disposition::OpenForSomeTime
    } else {
        Disposition::Other
    };

    // Deadline check, independent of the branches above. It fires once per
    // proposal under periodic polling because the 24-hour mark sweeps
    // through the window exactly once.
    let deadline = voting_at + i64::from(unit.voting_base_time);
    let remaining = deadline - now;
    if remaining > DAY_SECONDS && remaining < DAY_SECONDS + TICK_SECONDS + TOLERANCE_SECONDS {
        events.push(ProposalEvent::EndingSoon {
            remaining_seconds: remaining,
        });
    }

    (events, disposition)
}
