//! Recicla Incentive Ledger Core
//!
//! This crate implements the accounting, approval workflow, and token sale
//! for the Recicla university recycling program: a capped-supply incentive
//! token whose minting is gated by a two-validator approval process, plus a
//! discounted, capped token sale with a refund path.

pub mod access_control;
pub mod activity;
pub mod audit_log;
pub mod constants;
pub mod error;
pub mod events;
pub mod ledger;
pub mod rates;
pub mod sale;
pub mod system;
pub mod whitelist;

pub use access_control::AccessControlRegistry;
pub use activity::ActivityProposalEngine;
pub use error::{ReciclaError, Result};
pub use events::EventLog;
pub use ledger::TokenLedger;
pub use rates::MaterialRateTable;
pub use sale::{DiscountSchedule, DiscountTier, SaleConfig, SaleEngine, SalePhase, SaleProgress};
pub use system::{ReciclaSystem, SystemConfig};
pub use whitelist::Whitelist;

// Re-export commonly used types
pub use recicla_shared_types::*;
