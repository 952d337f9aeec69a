//! Per-material token conversion rates.

use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use recicla_shared_types::{Address, Amount, Event, Role};

use crate::access_control::AccessControlRegistry;
use crate::constants::{COIN, DEFAULT_MATERIAL_RATES};
use crate::error::{ReciclaError, Result};
use crate::events::EventLog;

/// Material label → reward per kilogram, in base units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialRateTable {
    rates: HashMap<String, Amount>,
}

impl MaterialRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-seeded with the program's standard materials.
    pub fn with_defaults() -> Self {
        let rates = DEFAULT_MATERIAL_RATES
            .iter()
            .map(|(material, tokens)| (material.to_string(), *tokens as Amount * COIN))
            .collect();
        Self { rates }
    }

    /// Sets or updates a material rate. Admin only.
    pub fn set_material_rate(
        &mut self,
        registry: &AccessControlRegistry,
        events: &mut EventLog,
        caller: Address,
        material: &str,
        rate_per_kg: Amount,
    ) -> Result<()> {
        registry.require_role(caller, Role::Admin)?;
        if rate_per_kg == 0 {
            return Err(ReciclaError::Validation(format!(
                "rate for material '{material}' must be greater than zero"
            )));
        }
        self.rates.insert(material.to_string(), rate_per_kg);
        info!("material rate updated: {} -> {} per kg", material, rate_per_kg);
        events.emit(Event::MaterialRateUpdated {
            material: material.to_string(),
            rate_per_kg,
        });
        Ok(())
    }

    pub fn rate_of(&self, material: &str) -> Option<Amount> {
        self.rates.get(material).copied()
    }

    /// Pure conversion. An unknown material is a hard error, never a silent
    /// zero reward.
    pub fn tokens_for(&self, weight_kg: u64, material: &str) -> Result<Amount> {
        if weight_kg == 0 {
            return Err(ReciclaError::Validation(
                "weight must be greater than zero".to_string(),
            ));
        }
        let rate = self.rate_of(material).ok_or_else(|| {
            ReciclaError::Validation(format!("no rate configured for material '{material}'"))
        })?;
        rate.checked_mul(weight_kg as Amount).ok_or_else(|| {
            ReciclaError::Validation(format!(
                "{weight_kg} kg of '{material}' overflows the reward amount"
            ))
        })
    }
}
