//! Data structures for the recycling-activity approval workflow.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{Address, Amount, Hash};

/// Lifecycle of an activity proposal. `Executed` and `Rejected` are both
/// terminal; a proposal leaves `Proposed` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Proposed,
    Executed,
    Rejected,
}

/// A submitted recycling activity awaiting validator approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityProposal {
    /// Sequential id assigned at creation.
    pub id: u64,
    /// Address that submitted the activity (holds the Proposer role).
    pub proposer: Address,
    /// Holder credited once the proposal executes.
    pub beneficiary: Address,
    /// Reported weight of the recycled material.
    pub weight_kg: u64,
    /// Material label, e.g. "plastico" or "carton".
    pub material: String,
    /// Reward computed at proposal time from the rate table.
    pub computed_tokens: Amount,
    /// Off-chain evidence reference (e.g. an IPFS CID).
    pub evidence: String,
    /// Validators that have approved so far. A validator appears at most once.
    pub approvals: BTreeSet<Address>,
    pub executed: bool,
    pub rejected: bool,
}

impl ActivityProposal {
    pub fn status(&self) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else if self.rejected {
            ProposalStatus::Rejected
        } else {
            ProposalStatus::Proposed
        }
    }

    /// Whether the proposal has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.executed || self.rejected
    }

    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }

    /// BLAKE3 digest of the canonical serialized proposal content.
    pub fn content_hash(&self) -> Hash {
        match bincode::serialize(self) {
            Ok(bytes) => blake3::hash(&bytes).into(),
            Err(_) => [0u8; 32], // Should never happen for valid proposals
        }
    }
}
