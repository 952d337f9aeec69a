//! Balances, supply cap, and cumulative earned/spent accounting.

use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use recicla_shared_types::{Address, Amount, Event, Role};

use crate::access_control::AccessControlRegistry;
use crate::error::{ReciclaError, Result};
use crate::events::EventLog;
use crate::whitelist::Whitelist;

/// The REC token ledger.
///
/// `total_minted` only ever grows and never exceeds `max_supply`;
/// `total_supply` tracks the circulating amount (minted minus burned) and
/// always equals the sum of every balance. All mutating operations check
/// every precondition before the first write, so a failed call leaves the
/// ledger exactly as it was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenLedger {
    max_supply: Amount,
    total_minted: Amount,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    total_earned: HashMap<Address, Amount>,
    total_spent: HashMap<Address, Amount>,
}

impl TokenLedger {
    pub fn new(max_supply: Amount) -> Self {
        Self {
            max_supply,
            total_minted: 0,
            total_supply: 0,
            balances: HashMap::new(),
            total_earned: HashMap::new(),
            total_spent: HashMap::new(),
        }
    }

    /// Checks the mint preconditions without mutating anything. The approval
    /// engine calls this before closing proposal state so that the follow-up
    /// mint cannot fail halfway through an execution.
    pub(crate) fn ensure_mintable(
        &self,
        whitelist: &Whitelist,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        if amount == 0 {
            return Err(ReciclaError::Validation(
                "mint amount must be greater than zero".to_string(),
            ));
        }
        if !whitelist.is_whitelisted(to) {
            return Err(ReciclaError::Validation(format!(
                "recipient {to} is not whitelisted"
            )));
        }
        match self.total_minted.checked_add(amount) {
            Some(minted) if minted <= self.max_supply => Ok(()),
            _ => Err(ReciclaError::Validation(format!(
                "minting {amount} would exceed the max supply of {}",
                self.max_supply
            ))),
        }
    }

    /// Credits freshly minted tokens for a validated recycling activity.
    /// Only reachable through the approval engine and system wiring.
    pub(crate) fn mint_for_activity(
        &mut self,
        whitelist: &Whitelist,
        events: &mut EventLog,
        to: Address,
        amount: Amount,
        reason: &str,
    ) -> Result<()> {
        self.ensure_mintable(whitelist, to, amount)?;

        self.total_minted += amount;
        self.total_supply += amount;
        *self.balances.entry(to).or_insert(0) += amount;
        *self.total_earned.entry(to).or_insert(0) += amount;

        info!("minted {} to {}: {}", amount, to, reason);
        events.emit(Event::TokensMinted {
            to,
            amount,
            reason: reason.to_string(),
        });
        Ok(())
    }

    /// Burns tokens when a holder redeems a reward. Burner role only.
    pub fn burn_for_redemption(
        &mut self,
        registry: &AccessControlRegistry,
        events: &mut EventLog,
        caller: Address,
        from: Address,
        amount: Amount,
        reason: &str,
    ) -> Result<()> {
        registry.require_role(caller, Role::Burner)?;
        if amount == 0 {
            return Err(ReciclaError::Validation(
                "burn amount must be greater than zero".to_string(),
            ));
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(ReciclaError::InsufficientBalance {
                account: from,
                requested: amount,
                available,
            });
        }

        *self.balances.entry(from).or_insert(0) -= amount;
        self.total_supply -= amount;
        *self.total_spent.entry(from).or_insert(0) += amount;

        info!("burned {} from {}: {}", amount, from, reason);
        events.emit(Event::TokensBurned {
            from,
            amount,
            reason: reason.to_string(),
        });
        Ok(())
    }

    /// Conservation-preserving transfer between holders.
    pub fn transfer(
        &mut self,
        events: &mut EventLog,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        if amount == 0 {
            return Err(ReciclaError::Validation(
                "transfer amount must be greater than zero".to_string(),
            ));
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(ReciclaError::InsufficientBalance {
                account: from,
                requested: amount,
                available,
            });
        }

        *self.balances.entry(from).or_insert(0) -= amount;
        *self.balances.entry(to).or_insert(0) += amount;

        events.emit(Event::Transfer {
            from,
            to,
            value: amount,
        });
        Ok(())
    }

    pub fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn total_minted(&self) -> Amount {
        self.total_minted
    }

    pub fn max_supply(&self) -> Amount {
        self.max_supply
    }

    pub fn remaining_supply(&self) -> Amount {
        self.max_supply - self.total_minted
    }

    /// Cumulative tokens ever earned through recycling.
    pub fn total_tokens_earned_by(&self, account: Address) -> Amount {
        self.total_earned.get(&account).copied().unwrap_or(0)
    }

    /// Cumulative tokens ever spent on redemptions.
    pub fn total_tokens_spent_by(&self, account: Address) -> Amount {
        self.total_spent.get(&account).copied().unwrap_or(0)
    }

    /// (earned, spent, current balance) for one holder.
    pub fn net_balance(&self, account: Address) -> (Amount, Amount, Amount) {
        (
            self.total_tokens_earned_by(account),
            self.total_tokens_spent_by(account),
            self.balance_of(account),
        )
    }

    /// Sum of every balance; equals `total_supply` at all times.
    pub fn balance_sum(&self) -> Amount {
        self.balances.values().sum()
    }
}
