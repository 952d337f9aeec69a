//! Audit logging functionalities for the Recicla incentive ledger.

use tracing::{event, Level};

use recicla_shared_types::{ActivityProposal, Address, Amount, Role, Timestamp};

/// Logs a role grant performed by the admin.
#[tracing::instrument(level = "info", skip(account))]
pub fn log_role_granted(role: Role, account: &Address) {
    event!(Level::INFO, "Role {:?} granted to {}", role, account);
}

/// Logs a holder entering the whitelist.
#[tracing::instrument(level = "info", skip(account))]
pub fn log_whitelist_added(account: &Address) {
    event!(Level::INFO, "Holder {} added to whitelist", account);
}

/// Logs a newly submitted activity proposal.
#[tracing::instrument(level = "info", skip(proposal))]
pub fn log_proposal_created(proposal: &ActivityProposal) {
    event!(
        Level::INFO,
        "Proposal {} created: {} kg of {}, content hash {}",
        proposal.id,
        proposal.weight_kg,
        proposal.material,
        hex::encode(proposal.content_hash())
    );
}

/// Logs a proposal reaching the approval threshold and minting its reward.
#[tracing::instrument(level = "info", skip(proposal))]
pub fn log_proposal_executed(proposal: &ActivityProposal) {
    event!(
        Level::INFO,
        "Proposal {} executed: {} base units minted to {}",
        proposal.id,
        proposal.computed_tokens,
        proposal.beneficiary
    );
}

/// Logs a proposal being permanently rejected.
#[tracing::instrument(level = "warn", skip(proposal))]
pub fn log_proposal_rejected(proposal: &ActivityProposal, reason: &str) {
    event!(
        Level::WARN,
        "Proposal {} rejected: {}",
        proposal.id,
        reason
    );
}

/// Logs an admitted sale purchase.
#[tracing::instrument(level = "info", skip(buyer))]
pub fn log_tokens_purchased(buyer: &Address, paid: Amount, tokens: Amount) {
    event!(
        Level::INFO,
        "Sale purchase: {} paid {} for {} base units",
        buyer,
        paid,
        tokens
    );
}

/// Logs the sale window opening.
#[tracing::instrument(level = "info")]
pub fn log_sale_started(start: Timestamp, end: Timestamp) {
    event!(Level::INFO, "Sale started, window [{}, {})", start, end);
}

/// Logs sale finalization with its outcome.
#[tracing::instrument(level = "info")]
pub fn log_sale_finalized(total_raised: Amount, soft_cap_reached: bool) {
    event!(
        Level::INFO,
        "Sale finalized: raised {}, soft cap reached: {}",
        total_raised,
        soft_cap_reached
    );
}

/// Logs a contributor reclaiming their payment after a failed raise.
#[tracing::instrument(level = "info", skip(contributor))]
pub fn log_refund_claimed(contributor: &Address, amount: Amount) {
    event!(
        Level::INFO,
        "Refund of {} claimed by {}",
        amount,
        contributor
    );
}
