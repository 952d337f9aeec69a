//! KYC-gated eligibility set for token holders.

use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use recicla_shared_types::{Address, Event, IdentityHash, Role};

use crate::access_control::AccessControlRegistry;
use crate::error::{ReciclaError, Result};
use crate::events::EventLog;

/// Registered holders and their opaque identity commitments.
///
/// Identity hashes are stored as handed over; the same hash may appear under
/// several addresses (known open question, kept as observed).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Whitelist {
    entries: HashMap<Address, IdentityHash>,
}

impl Whitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one holder. Whitelist-manager only. Re-registering an
    /// address updates its identity hash.
    pub fn add_to_whitelist(
        &mut self,
        registry: &AccessControlRegistry,
        events: &mut EventLog,
        caller: Address,
        account: Address,
        identity: IdentityHash,
    ) -> Result<()> {
        registry.require_role(caller, Role::WhitelistManager)?;
        self.entries.insert(account, identity);
        info!("whitelisted {} (identity {})", account, identity);
        events.emit(Event::WhitelistAdded { account, identity });
        Ok(())
    }

    /// Batch registration. The two slices must pair up one to one.
    pub fn add_multiple_to_whitelist(
        &mut self,
        registry: &AccessControlRegistry,
        events: &mut EventLog,
        caller: Address,
        accounts: &[Address],
        identities: &[IdentityHash],
    ) -> Result<()> {
        registry.require_role(caller, Role::WhitelistManager)?;
        if accounts.len() != identities.len() {
            return Err(ReciclaError::Validation(format!(
                "whitelist batch mismatch: {} accounts, {} identity hashes",
                accounts.len(),
                identities.len()
            )));
        }
        for (account, identity) in accounts.iter().zip(identities) {
            self.entries.insert(*account, *identity);
            events.emit(Event::WhitelistAdded {
                account: *account,
                identity: *identity,
            });
        }
        info!("whitelisted {} holders in one batch", accounts.len());
        Ok(())
    }

    pub fn is_whitelisted(&self, account: Address) -> bool {
        self.entries.contains_key(&account)
    }

    pub fn identity_of(&self, account: Address) -> Option<&IdentityHash> {
        self.entries.get(&account)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct entry used while wiring the system at construction time.
    pub(crate) fn seed(&mut self, account: Address, identity: IdentityHash) {
        self.entries.insert(account, identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_length_mismatch_is_rejected() {
        let manager = Address([1; 20]);
        let mut registry = AccessControlRegistry::new();
        registry.seed(Role::Admin, manager);
        registry.seed(Role::WhitelistManager, manager);
        let mut whitelist = Whitelist::new();
        let mut events = EventLog::new();

        let err = whitelist
            .add_multiple_to_whitelist(
                &registry,
                &mut events,
                manager,
                &[Address([2; 20]), Address([3; 20])],
                &[IdentityHash::from_document("DNI-1")],
            )
            .unwrap_err();
        assert!(matches!(err, ReciclaError::Validation(_)));
        assert!(whitelist.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn same_identity_hash_may_back_two_addresses() {
        // Known open question: no dedup across addresses.
        let manager = Address([1; 20]);
        let mut registry = AccessControlRegistry::new();
        registry.seed(Role::WhitelistManager, manager);
        let mut whitelist = Whitelist::new();
        let mut events = EventLog::new();

        let identity = IdentityHash::from_document("DNI-1");
        for account in [Address([2; 20]), Address([3; 20])] {
            whitelist
                .add_to_whitelist(&registry, &mut events, manager, account, identity)
                .unwrap();
        }
        assert_eq!(whitelist.len(), 2);
        assert_eq!(whitelist.identity_of(Address([2; 20])), Some(&identity));
    }
}
