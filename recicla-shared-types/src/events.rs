//! Records emitted by the ledger for off-chain monitoring tooling.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, IdentityHash, Role, Timestamp};

/// One emitted record. Events are append-only; consumers read them through
/// the event log and never mutate ledger state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    RoleGranted {
        role: Role,
        account: Address,
    },
    RoleRevoked {
        role: Role,
        account: Address,
    },
    WhitelistAdded {
        account: Address,
        identity: IdentityHash,
    },
    TokensMinted {
        to: Address,
        amount: Amount,
        reason: String,
    },
    TokensBurned {
        from: Address,
        amount: Amount,
        reason: String,
    },
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },
    ProposalCreated {
        id: u64,
        proposer: Address,
        beneficiary: Address,
        weight_kg: u64,
        material: String,
        tokens: Amount,
    },
    ProposalApproved {
        id: u64,
        validator: Address,
        /// Running approval count after this approval.
        approvals: usize,
    },
    ProposalRejected {
        id: u64,
        validator: Address,
        reason: String,
    },
    ProposalExecuted {
        id: u64,
        beneficiary: Address,
        tokens: Amount,
    },
    MaterialRateUpdated {
        material: String,
        rate_per_kg: Amount,
    },
    TokensPurchased {
        buyer: Address,
        paid: Amount,
        tokens: Amount,
        discount: u64,
    },
    SaleStarted {
        start: Timestamp,
        end: Timestamp,
    },
    SaleFinalized {
        total_raised: Amount,
        total_sold: Amount,
        soft_cap_reached: bool,
    },
}
