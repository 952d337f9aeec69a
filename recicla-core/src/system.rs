//! Single deployable surface wiring the components together.
//!
//! Every public operation takes an explicit `caller` (and `now` where the
//! sale is time-dependent) and runs as one atomic unit: `&mut self`
//! serializes operations, and each one validates before it writes.

use serde::{Deserialize, Serialize};

use recicla_shared_types::{
    ActivityProposal, Address, Amount, Event, IdentityHash, Role, Timestamp,
};

use crate::access_control::AccessControlRegistry;
use crate::activity::ActivityProposalEngine;
use crate::audit_log;
use crate::constants::{DEFAULT_MAX_SUPPLY, SALE_INVENTORY};
use crate::error::Result;
use crate::events::EventLog;
use crate::ledger::TokenLedger;
use crate::rates::MaterialRateTable;
use crate::sale::{SaleConfig, SaleEngine, SalePhase, SaleProgress};
use crate::whitelist::Whitelist;

/// Construction-time configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Receives the Admin role.
    pub admin: Address,
    /// Operator wallet; receives the Proposer, Burner and WhitelistManager
    /// roles.
    pub backend: Address,
    pub max_supply: Amount,
    pub sale: SaleConfig,
}

impl SystemConfig {
    pub fn new(admin: Address, backend: Address) -> Self {
        Self {
            admin,
            backend,
            max_supply: DEFAULT_MAX_SUPPLY,
            sale: SaleConfig::default(),
        }
    }
}

/// The assembled incentive ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReciclaSystem {
    admin: Address,
    backend: Address,
    registry: AccessControlRegistry,
    whitelist: Whitelist,
    rates: MaterialRateTable,
    ledger: TokenLedger,
    activity: ActivityProposalEngine,
    sale: SaleEngine,
    events: EventLog,
}

impl ReciclaSystem {
    /// Builds the system and seeds the operational roles: the admin
    /// administers, the backend wallet proposes activities, manages the
    /// whitelist and burns redemptions. Validators are granted afterwards
    /// through `grant_role`.
    pub fn new(config: SystemConfig) -> Self {
        let mut registry = AccessControlRegistry::new();
        let mut whitelist = Whitelist::new();
        let mut events = EventLog::new();

        let seeded = [
            (Role::Admin, config.admin),
            (Role::Proposer, config.backend),
            (Role::WhitelistManager, config.backend),
            (Role::Burner, config.backend),
        ];
        for (role, account) in seeded {
            registry.seed(role, account);
            events.emit(Event::RoleGranted { role, account });
        }

        // The sale inventory holds pre-minted stock, so it must be eligible
        // to receive a mint.
        whitelist.seed(
            SALE_INVENTORY,
            IdentityHash::from_document("RECICLA-ICO-INVENTORY"),
        );

        Self {
            admin: config.admin,
            backend: config.backend,
            registry,
            whitelist,
            rates: MaterialRateTable::with_defaults(),
            ledger: TokenLedger::new(config.max_supply),
            activity: ActivityProposalEngine::new(),
            sale: SaleEngine::new(config.sale, SALE_INVENTORY),
            events,
        }
    }

    // ==================== roles ====================

    pub fn grant_role(&mut self, caller: Address, role: Role, account: Address) -> Result<()> {
        self.registry
            .grant_role(&mut self.events, caller, role, account)?;
        audit_log::log_role_granted(role, &account);
        Ok(())
    }

    pub fn revoke_role(&mut self, caller: Address, role: Role, account: Address) -> Result<()> {
        self.registry
            .revoke_role(&mut self.events, caller, role, account)
    }

    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.registry.has_role(role, account)
    }

    // ==================== whitelist ====================

    pub fn add_to_whitelist(
        &mut self,
        caller: Address,
        account: Address,
        identity: IdentityHash,
    ) -> Result<()> {
        self.whitelist
            .add_to_whitelist(&self.registry, &mut self.events, caller, account, identity)?;
        audit_log::log_whitelist_added(&account);
        Ok(())
    }

    pub fn add_multiple_to_whitelist(
        &mut self,
        caller: Address,
        accounts: &[Address],
        identities: &[IdentityHash],
    ) -> Result<()> {
        self.whitelist.add_multiple_to_whitelist(
            &self.registry,
            &mut self.events,
            caller,
            accounts,
            identities,
        )
    }

    pub fn is_whitelisted(&self, account: Address) -> bool {
        self.whitelist.is_whitelisted(account)
    }

    // ==================== material rates ====================

    pub fn set_material_rate(
        &mut self,
        caller: Address,
        material: &str,
        rate_per_kg: Amount,
    ) -> Result<()> {
        self.rates
            .set_material_rate(&self.registry, &mut self.events, caller, material, rate_per_kg)
    }

    pub fn tokens_for(&self, weight_kg: u64, material: &str) -> Result<Amount> {
        self.rates.tokens_for(weight_kg, material)
    }

    // ==================== activity workflow ====================

    pub fn propose_activity(
        &mut self,
        caller: Address,
        beneficiary: Address,
        weight_kg: u64,
        material: &str,
        evidence: &str,
    ) -> Result<u64> {
        let id = self.activity.propose_activity(
            &self.registry,
            &self.whitelist,
            &self.rates,
            &mut self.events,
            caller,
            beneficiary,
            weight_kg,
            material,
            evidence,
        )?;
        if let Some(proposal) = self.activity.proposal(id) {
            audit_log::log_proposal_created(proposal);
        }
        Ok(id)
    }

    pub fn approve_activity(&mut self, caller: Address, id: u64) -> Result<()> {
        self.activity.approve_activity(
            &self.registry,
            &self.whitelist,
            &mut self.ledger,
            &mut self.events,
            caller,
            id,
        )?;
        if let Some(proposal) = self.activity.proposal(id) {
            if proposal.executed {
                audit_log::log_proposal_executed(proposal);
            }
        }
        Ok(())
    }

    pub fn reject_activity(&mut self, caller: Address, id: u64, reason: &str) -> Result<()> {
        self.activity
            .reject_activity(&self.registry, &mut self.events, caller, id, reason)?;
        if let Some(proposal) = self.activity.proposal(id) {
            audit_log::log_proposal_rejected(proposal, reason);
        }
        Ok(())
    }

    pub fn proposal(&self, id: u64) -> Option<&ActivityProposal> {
        self.activity.proposal(id)
    }

    pub fn proposal_count(&self) -> u64 {
        self.activity.proposal_count()
    }

    // ==================== ledger ====================

    pub fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> Result<()> {
        self.ledger.transfer(&mut self.events, caller, to, amount)
    }

    pub fn burn_for_redemption(
        &mut self,
        caller: Address,
        from: Address,
        amount: Amount,
        reason: &str,
    ) -> Result<()> {
        self.ledger.burn_for_redemption(
            &self.registry,
            &mut self.events,
            caller,
            from,
            amount,
            reason,
        )
    }

    pub fn balance_of(&self, account: Address) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    pub fn total_minted(&self) -> Amount {
        self.ledger.total_minted()
    }

    pub fn remaining_supply(&self) -> Amount {
        self.ledger.remaining_supply()
    }

    pub fn total_tokens_earned_by(&self, account: Address) -> Amount {
        self.ledger.total_tokens_earned_by(account)
    }

    pub fn total_tokens_spent_by(&self, account: Address) -> Amount {
        self.ledger.total_tokens_spent_by(account)
    }

    pub fn net_balance(&self, account: Address) -> (Amount, Amount, Amount) {
        self.ledger.net_balance(account)
    }

    // ==================== sale ====================

    /// Mints the sale inventory. Admin only; counts against the supply cap.
    pub fn fund_sale(&mut self, caller: Address, amount: Amount) -> Result<()> {
        self.registry.require_role(caller, Role::Admin)?;
        self.ledger.mint_for_activity(
            &self.whitelist,
            &mut self.events,
            SALE_INVENTORY,
            amount,
            "ICO inventory allocation",
        )
    }

    pub fn start_ico(&mut self, caller: Address, now: Timestamp, duration_secs: u64) -> Result<()> {
        self.sale
            .start_ico(&self.registry, &mut self.events, caller, now, duration_secs)?;
        audit_log::log_sale_started(now, now + duration_secs);
        Ok(())
    }

    pub fn buy_tokens(&mut self, caller: Address, payment: Amount, now: Timestamp) -> Result<Amount> {
        let tokens = self
            .sale
            .buy_tokens(&mut self.ledger, &mut self.events, caller, payment, now)?;
        audit_log::log_tokens_purchased(&caller, payment, tokens);
        Ok(tokens)
    }

    pub fn calculate_token_amount(
        &self,
        payment: Amount,
        now: Timestamp,
    ) -> Result<(Amount, Amount, Amount)> {
        self.sale.calculate_token_amount(payment, now)
    }

    pub fn current_discount(&self, now: Timestamp) -> u64 {
        self.sale.current_discount(now)
    }

    pub fn finalize_ico(&mut self, caller: Address, now: Timestamp) -> Result<()> {
        self.sale
            .finalize_ico(&self.registry, &mut self.events, caller, now)?;
        audit_log::log_sale_finalized(self.sale.total_raised(), self.sale.soft_cap_reached());
        Ok(())
    }

    pub fn withdraw_funds(&mut self, caller: Address) -> Result<Amount> {
        self.sale.withdraw_funds(&self.registry, caller)
    }

    pub fn claim_refund(&mut self, caller: Address) -> Result<Amount> {
        let amount = self.sale.claim_refund(caller)?;
        audit_log::log_refund_claimed(&caller, amount);
        Ok(amount)
    }

    pub fn withdraw_unsold_tokens(&mut self, caller: Address) -> Result<Amount> {
        self.sale.withdraw_unsold_tokens(
            &self.registry,
            &mut self.ledger,
            &mut self.events,
            caller,
        )
    }

    pub fn is_ico_active(&self, now: Timestamp) -> bool {
        self.sale.is_active(now)
    }

    pub fn sale_phase(&self) -> SalePhase {
        self.sale.phase()
    }

    pub fn sale_progress(&self) -> SaleProgress {
        self.sale.progress()
    }

    pub fn total_raised(&self) -> Amount {
        self.sale.total_raised()
    }

    pub fn total_tokens_sold(&self) -> Amount {
        self.sale.total_tokens_sold()
    }

    pub fn contribution_of(&self, account: Address) -> Amount {
        self.sale.contribution_of(account)
    }

    pub fn sale_time_remaining(&self, now: Timestamp) -> u64 {
        self.sale.time_remaining(now)
    }

    // ==================== events & persistence ====================

    pub fn events(&self) -> &[Event] {
        self.events.all()
    }

    pub fn events_since(&self, index: usize) -> &[Event] {
        self.events.since(index)
    }

    pub fn export_events_json(&self) -> serde_json::Result<String> {
        self.events.export_json()
    }

    /// Serializes the whole system for the hosting environment to persist.
    pub fn snapshot(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    /// Restores a system from a previous [`ReciclaSystem::snapshot`].
    pub fn restore(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn backend(&self) -> Address {
        self.backend
    }
}
