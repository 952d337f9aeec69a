//! Propose/approve/reject workflow gating every activity mint.

use std::collections::BTreeSet;
use std::collections::HashMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use recicla_shared_types::{ActivityProposal, Address, Event, Role};

use crate::access_control::AccessControlRegistry;
use crate::constants::APPROVAL_THRESHOLD;
use crate::error::{ReciclaError, Result};
use crate::events::EventLog;
use crate::ledger::TokenLedger;
use crate::rates::MaterialRateTable;
use crate::whitelist::Whitelist;

/// Engine over proposal state. A proposal moves Proposed → Executed or
/// Proposed → Rejected exactly once; the executed flag is set *before* the
/// mint call so a re-entrant approval observes a terminal proposal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityProposalEngine {
    proposals: HashMap<u64, ActivityProposal>,
    next_id: u64,
}

impl ActivityProposalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submits a recycling activity for validation. Proposer role only.
    ///
    /// Returns the sequential proposal id.
    #[allow(clippy::too_many_arguments)]
    pub fn propose_activity(
        &mut self,
        registry: &AccessControlRegistry,
        whitelist: &Whitelist,
        rates: &MaterialRateTable,
        events: &mut EventLog,
        caller: Address,
        beneficiary: Address,
        weight_kg: u64,
        material: &str,
        evidence: &str,
    ) -> Result<u64> {
        registry.require_role(caller, Role::Proposer)?;
        if !whitelist.is_whitelisted(beneficiary) {
            return Err(ReciclaError::Validation(format!(
                "beneficiary {beneficiary} is not whitelisted"
            )));
        }
        let computed_tokens = rates.tokens_for(weight_kg, material)?;

        let id = self.next_id;
        self.next_id += 1;
        self.proposals.insert(
            id,
            ActivityProposal {
                id,
                proposer: caller,
                beneficiary,
                weight_kg,
                material: material.to_string(),
                computed_tokens,
                evidence: evidence.to_string(),
                approvals: BTreeSet::new(),
                executed: false,
                rejected: false,
            },
        );

        info!(
            "proposal {} created: {} kg of {} for {}",
            id, weight_kg, material, beneficiary
        );
        events.emit(Event::ProposalCreated {
            id,
            proposer: caller,
            beneficiary,
            weight_kg,
            material: material.to_string(),
            tokens: computed_tokens,
        });
        Ok(id)
    }

    /// Records one validator approval. At the second distinct approval the
    /// proposal executes and the reward is minted in the same operation.
    pub fn approve_activity(
        &mut self,
        registry: &AccessControlRegistry,
        whitelist: &Whitelist,
        ledger: &mut TokenLedger,
        events: &mut EventLog,
        caller: Address,
        id: u64,
    ) -> Result<()> {
        registry.require_role(caller, Role::Validator)?;

        // Precondition pass: nothing below may fail once state is written.
        {
            let proposal = self.get(id)?;
            if proposal.is_terminal() {
                return Err(ReciclaError::State(format!(
                    "proposal {id} is already {:?}",
                    proposal.status()
                )));
            }
            if proposal.approvals.contains(&caller) {
                return Err(ReciclaError::AlreadyDone(format!(
                    "validator {caller} already approved proposal {id}"
                )));
            }
            if proposal.approvals.len() + 1 >= APPROVAL_THRESHOLD {
                ledger.ensure_mintable(
                    whitelist,
                    proposal.beneficiary,
                    proposal.computed_tokens,
                )?;
            }
        }

        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or_else(|| ReciclaError::Validation(format!("unknown proposal id {id}")))?;
        proposal.approvals.insert(caller);
        let approvals = proposal.approvals.len();
        events.emit(Event::ProposalApproved {
            id,
            validator: caller,
            approvals,
        });
        info!(
            "proposal {} approved by {} ({}/{})",
            id, caller, approvals, APPROVAL_THRESHOLD
        );

        if approvals >= APPROVAL_THRESHOLD {
            // Close proposal state before the mint call.
            proposal.executed = true;
            let beneficiary = proposal.beneficiary;
            let tokens = proposal.computed_tokens;
            let reason = format!(
                "recycling activity #{}: {} kg of {}",
                id, proposal.weight_kg, proposal.material
            );
            events.emit(Event::ProposalExecuted {
                id,
                beneficiary,
                tokens,
            });
            ledger.mint_for_activity(whitelist, events, beneficiary, tokens, &reason)?;
        }
        Ok(())
    }

    /// Permanently rejects a pending proposal. No tokens move.
    pub fn reject_activity(
        &mut self,
        registry: &AccessControlRegistry,
        events: &mut EventLog,
        caller: Address,
        id: u64,
        reason: &str,
    ) -> Result<()> {
        registry.require_role(caller, Role::Validator)?;

        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or_else(|| ReciclaError::Validation(format!("unknown proposal id {id}")))?;
        if proposal.is_terminal() {
            return Err(ReciclaError::State(format!(
                "proposal {id} is already {:?}",
                proposal.status()
            )));
        }
        proposal.rejected = true;

        warn!("proposal {} rejected by {}: {}", id, caller, reason);
        events.emit(Event::ProposalRejected {
            id,
            validator: caller,
            reason: reason.to_string(),
        });
        Ok(())
    }

    pub fn proposal(&self, id: u64) -> Option<&ActivityProposal> {
        self.proposals.get(&id)
    }

    /// Number of proposals ever created; the next id to be assigned.
    pub fn proposal_count(&self) -> u64 {
        self.next_id
    }

    fn get(&self, id: u64) -> Result<&ActivityProposal> {
        self.proposals
            .get(&id)
            .ok_or_else(|| ReciclaError::Validation(format!("unknown proposal id {id}")))
    }
}
