//! Time- and cap-bounded discounted token sale.

use std::collections::HashMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use recicla_shared_types::{Address, Amount, Event, Role, Timestamp};

use crate::access_control::AccessControlRegistry;
use crate::constants::{
    COIN, DEFAULT_DISCOUNT_WINDOW_SECS, DEFAULT_HARD_CAP, DEFAULT_MAX_PURCHASE_TOKENS,
    DEFAULT_MIN_PURCHASE_TOKENS, DEFAULT_SOFT_CAP, DEFAULT_TOKEN_PRICE,
};
use crate::error::{ReciclaError, Result};
use crate::events::EventLog;
use crate::ledger::TokenLedger;

/// One early-bird window. `window_secs` is measured from the end of the
/// previous tier; after the last window the last tier's percentage applies
/// through the end of the sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub window_secs: u64,
    pub percent: u64,
}

/// Explicit tier configuration rather than hard-coded day boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSchedule {
    tiers: Vec<DiscountTier>,
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        Self {
            tiers: vec![
                DiscountTier {
                    window_secs: DEFAULT_DISCOUNT_WINDOW_SECS,
                    percent: 15,
                },
                DiscountTier {
                    window_secs: DEFAULT_DISCOUNT_WINDOW_SECS,
                    percent: 10,
                },
                DiscountTier {
                    window_secs: DEFAULT_DISCOUNT_WINDOW_SECS,
                    percent: 5,
                },
            ],
        }
    }
}

impl DiscountSchedule {
    pub fn new(tiers: Vec<DiscountTier>) -> Self {
        Self { tiers }
    }

    /// Bonus percentage for a purchase `elapsed` seconds after the sale
    /// started. Each tier covers `[previous end, previous end + window)`.
    pub fn discount_at(&self, elapsed: u64) -> u64 {
        let mut end = 0u64;
        for tier in &self.tiers {
            end = end.saturating_add(tier.window_secs);
            if elapsed < end {
                return tier.percent;
            }
        }
        self.tiers.last().map(|tier| tier.percent).unwrap_or(0)
    }
}

/// Construction-time sale parameters. Purchase bounds are denominated in
/// tokens before the bonus is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Native units paid per whole token.
    pub token_price: Amount,
    pub soft_cap: Amount,
    pub hard_cap: Amount,
    pub min_purchase: Amount,
    pub max_purchase: Amount,
    pub discounts: DiscountSchedule,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            token_price: DEFAULT_TOKEN_PRICE,
            soft_cap: DEFAULT_SOFT_CAP,
            hard_cap: DEFAULT_HARD_CAP,
            min_purchase: DEFAULT_MIN_PURCHASE_TOKENS,
            max_purchase: DEFAULT_MAX_PURCHASE_TOKENS,
            discounts: DiscountSchedule::default(),
        }
    }
}

/// Sale lifecycle label. It only changes through explicit operations:
/// `start_ico` and `finalize_ico`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalePhase {
    NotStarted,
    Active,
    Finalized,
}

/// Point-in-time progress summary for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleProgress {
    pub total_raised: Amount,
    pub total_tokens_sold: Amount,
    pub contributors: usize,
}

/// The discounted sale over a pre-funded token inventory account.
///
/// Payments are tracked per contributor so that a failed raise can be
/// refunded exactly; `total_raised` never exceeds the hard cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleEngine {
    config: SaleConfig,
    inventory: Address,
    phase: SalePhase,
    start_time: Timestamp,
    end_time: Timestamp,
    total_raised: Amount,
    total_tokens_sold: Amount,
    soft_cap_reached: bool,
    /// Native units held for withdrawal or refunds.
    funds_balance: Amount,
    contributions: HashMap<Address, Amount>,
}

impl SaleEngine {
    pub fn new(config: SaleConfig, inventory: Address) -> Self {
        Self {
            config,
            inventory,
            phase: SalePhase::NotStarted,
            start_time: 0,
            end_time: 0,
            total_raised: 0,
            total_tokens_sold: 0,
            soft_cap_reached: false,
            funds_balance: 0,
            contributions: HashMap::new(),
        }
    }

    /// Opens the sale window. Admin only, once.
    pub fn start_ico(
        &mut self,
        registry: &AccessControlRegistry,
        events: &mut EventLog,
        caller: Address,
        now: Timestamp,
        duration_secs: u64,
    ) -> Result<()> {
        registry.require_role(caller, Role::Admin)?;
        if self.phase != SalePhase::NotStarted {
            return Err(ReciclaError::State(format!(
                "sale cannot start from {:?}",
                self.phase
            )));
        }
        if duration_secs == 0 {
            return Err(ReciclaError::Validation(
                "sale duration must be greater than zero".to_string(),
            ));
        }
        self.phase = SalePhase::Active;
        self.start_time = now;
        self.end_time = now + duration_secs;

        info!("sale started: [{}, {})", self.start_time, self.end_time);
        events.emit(Event::SaleStarted {
            start: self.start_time,
            end: self.end_time,
        });
        Ok(())
    }

    /// Admits one purchase. The whole call fails with no partial fill when
    /// any bound is violated. Returns the total tokens credited.
    pub fn buy_tokens(
        &mut self,
        ledger: &mut TokenLedger,
        events: &mut EventLog,
        buyer: Address,
        payment: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        if !self.is_active(now) {
            return Err(ReciclaError::State(
                "sale is not currently active".to_string(),
            ));
        }
        if payment == 0 {
            return Err(ReciclaError::Validation(
                "payment must be greater than zero".to_string(),
            ));
        }
        let (base, _bonus, total) = self.calculate_token_amount(payment, now)?;
        if base < self.config.min_purchase || base > self.config.max_purchase {
            return Err(ReciclaError::Validation(format!(
                "purchase of {base} tokens is outside [{}, {}]",
                self.config.min_purchase, self.config.max_purchase
            )));
        }
        if self.total_raised + payment > self.config.hard_cap {
            return Err(ReciclaError::Validation(format!(
                "payment of {payment} would push the raise past the hard cap of {}",
                self.config.hard_cap
            )));
        }

        // The inventory transfer is the only cross-component write; it is
        // atomic itself and happens before any sale counter moves.
        ledger.transfer(events, self.inventory, buyer, total)?;

        self.total_raised += payment;
        self.total_tokens_sold += total;
        self.funds_balance += payment;
        *self.contributions.entry(buyer).or_insert(0) += payment;
        if self.total_raised >= self.config.soft_cap {
            self.soft_cap_reached = true;
        }

        let discount = self.current_discount(now);
        info!(
            "purchase: {} paid {}, received {} tokens ({}% bonus tier)",
            buyer, payment, total, discount
        );
        events.emit(Event::TokensPurchased {
            buyer,
            paid: payment,
            tokens: total,
            discount,
        });
        Ok(total)
    }

    /// Pure preview of `(base, bonus, total)` for a payment made at `now`.
    /// Computes exactly what `buy_tokens` would credit at the same instant.
    pub fn calculate_token_amount(
        &self,
        payment: Amount,
        now: Timestamp,
    ) -> Result<(Amount, Amount, Amount)> {
        let price = self.config.token_price;
        if price == 0 {
            return Err(ReciclaError::Validation(
                "token price must be greater than zero".to_string(),
            ));
        }
        // Scale the whole and fractional parts of the price division
        // separately; payment * COIN alone overflows u128 for payments a
        // few hundred units above the scale factor.
        let base = (payment / price).checked_mul(COIN).and_then(|whole| {
            (payment % price)
                .checked_mul(COIN)
                .and_then(|frac| whole.checked_add(frac / price))
        });
        let total = base.and_then(|base| {
            base.checked_mul(self.current_discount(now) as Amount)
                .map(|product| product / 100)
                .and_then(|bonus| base.checked_add(bonus).map(|total| (base, bonus, total)))
        });
        total.ok_or_else(|| {
            ReciclaError::Validation(format!("payment of {payment} is too large to price"))
        })
    }

    /// Bonus percentage in effect at `now`; zero before the sale starts.
    pub fn current_discount(&self, now: Timestamp) -> u64 {
        if self.phase == SalePhase::NotStarted || now < self.start_time {
            return 0;
        }
        self.config.discounts.discount_at(now - self.start_time)
    }

    /// Closes the sale. Valid once the window has elapsed or the hard cap
    /// is reached. Admin only.
    pub fn finalize_ico(
        &mut self,
        registry: &AccessControlRegistry,
        events: &mut EventLog,
        caller: Address,
        now: Timestamp,
    ) -> Result<()> {
        registry.require_role(caller, Role::Admin)?;
        match self.phase {
            SalePhase::NotStarted => {
                return Err(ReciclaError::State("sale has not started".to_string()))
            }
            SalePhase::Finalized => {
                return Err(ReciclaError::State("sale is already finalized".to_string()))
            }
            SalePhase::Active => {}
        }
        if now < self.end_time && self.total_raised < self.config.hard_cap {
            return Err(ReciclaError::State(
                "sale is still active and the hard cap is not reached".to_string(),
            ));
        }
        self.phase = SalePhase::Finalized;

        if !self.soft_cap_reached {
            warn!(
                "sale finalized below soft cap: raised {} of {}",
                self.total_raised, self.config.soft_cap
            );
        }
        events.emit(Event::SaleFinalized {
            total_raised: self.total_raised,
            total_sold: self.total_tokens_sold,
            soft_cap_reached: self.soft_cap_reached,
        });
        Ok(())
    }

    /// Drains the raised funds to the admin. Only after a successful raise.
    pub fn withdraw_funds(
        &mut self,
        registry: &AccessControlRegistry,
        caller: Address,
    ) -> Result<Amount> {
        registry.require_role(caller, Role::Admin)?;
        self.require_finalized()?;
        if !self.soft_cap_reached {
            return Err(ReciclaError::State(
                "soft cap not reached; funds are reserved for refunds".to_string(),
            ));
        }
        if self.funds_balance == 0 {
            return Err(ReciclaError::AlreadyDone(
                "funds already withdrawn".to_string(),
            ));
        }
        let amount = self.funds_balance;
        self.funds_balance = 0;
        info!("admin withdrew {} raised units", amount);
        Ok(amount)
    }

    /// Returns exactly the contributor's recorded payment, once, when the
    /// raise failed.
    pub fn claim_refund(&mut self, caller: Address) -> Result<Amount> {
        self.require_finalized()?;
        if self.soft_cap_reached {
            return Err(ReciclaError::State(
                "soft cap reached; refunds are not available".to_string(),
            ));
        }
        let recorded = self.contributions.get(&caller).copied().unwrap_or(0);
        if recorded == 0 {
            return Err(ReciclaError::AlreadyDone(format!(
                "no refundable payment recorded for {caller}"
            )));
        }
        self.contributions.insert(caller, 0);
        self.funds_balance -= recorded;
        info!("refunded {} to {}", recorded, caller);
        Ok(recorded)
    }

    /// Sweeps the unsold token inventory back to the admin. Returns the
    /// amount moved.
    pub fn withdraw_unsold_tokens(
        &mut self,
        registry: &AccessControlRegistry,
        ledger: &mut TokenLedger,
        events: &mut EventLog,
        caller: Address,
    ) -> Result<Amount> {
        registry.require_role(caller, Role::Admin)?;
        self.require_finalized()?;
        let remaining = ledger.balance_of(self.inventory);
        if remaining > 0 {
            ledger.transfer(events, self.inventory, caller, remaining)?;
        }
        Ok(remaining)
    }

    /// Whether purchases are currently admitted.
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.phase == SalePhase::Active && now >= self.start_time && now < self.end_time
    }

    pub fn phase(&self) -> SalePhase {
        self.phase
    }

    pub fn total_raised(&self) -> Amount {
        self.total_raised
    }

    pub fn total_tokens_sold(&self) -> Amount {
        self.total_tokens_sold
    }

    pub fn soft_cap_reached(&self) -> bool {
        self.soft_cap_reached
    }

    pub fn contribution_of(&self, account: Address) -> Amount {
        self.contributions.get(&account).copied().unwrap_or(0)
    }

    pub fn progress(&self) -> SaleProgress {
        SaleProgress {
            total_raised: self.total_raised,
            total_tokens_sold: self.total_tokens_sold,
            contributors: self.contributions.values().filter(|paid| **paid > 0).count(),
        }
    }

    /// Seconds left in the sale window, zero once it has passed.
    pub fn time_remaining(&self, now: Timestamp) -> u64 {
        if self.phase != SalePhase::Active {
            return 0;
        }
        self.end_time.saturating_sub(now)
    }

    pub fn config(&self) -> &SaleConfig {
        &self.config
    }

    fn require_finalized(&self) -> Result<()> {
        if self.phase != SalePhase::Finalized {
            return Err(ReciclaError::State("sale is not finalized".to_string()));
        }
        Ok(())
    }
}
