//! Role grants, revocations and permission checks.

use std::collections::{HashMap, HashSet};

use log::info;
use serde::{Deserialize, Serialize};

use recicla_shared_types::{Address, Event, Role};

use crate::error::{ReciclaError, Result};
use crate::events::EventLog;

/// Single shared registry of role assignments. Every restricted operation
/// asks this registry before touching state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessControlRegistry {
    roles: HashMap<Role, HashSet<Address>>,
}

impl AccessControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `role` to `account`. Admin only.
    pub fn grant_role(
        &mut self,
        events: &mut EventLog,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<()> {
        self.require_role(caller, Role::Admin)?;
        self.roles.entry(role).or_default().insert(account);
        info!("role {:?} granted to {}", role, account);
        events.emit(Event::RoleGranted { role, account });
        Ok(())
    }

    /// Revokes `role` from `account`. Admin only.
    pub fn revoke_role(
        &mut self,
        events: &mut EventLog,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<()> {
        self.require_role(caller, Role::Admin)?;
        let removed = self
            .roles
            .get_mut(&role)
            .map(|set| set.remove(&account))
            .unwrap_or(false);
        if removed {
            info!("role {:?} revoked from {}", role, account);
            events.emit(Event::RoleRevoked { role, account });
        }
        Ok(())
    }

    /// Pure query: does `account` hold `role`?
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.roles
            .get(&role)
            .map(|set| set.contains(&account))
            .unwrap_or(false)
    }

    /// Fails with an authorization error unless `caller` holds `role`.
    pub fn require_role(&self, caller: Address, role: Role) -> Result<()> {
        if self.has_role(role, caller) {
            Ok(())
        } else {
            Err(ReciclaError::Authorization { caller, role })
        }
    }

    /// Direct assignment used while wiring the system at construction time.
    pub(crate) fn seed(&mut self, role: Role, account: Address) {
        self.roles.entry(role).or_default().insert(account);
    }
}
