//! Shared data types for the Recicla incentive ledger.

use serde::{Deserialize, Serialize};

pub mod activity;
pub mod events;

pub use activity::{ActivityProposal, ProposalStatus};
pub use events::Event;

/// A 32-byte BLAKE3 digest.
pub type Hash = [u8; 32];

/// Token amounts in base units (`10^18` base units per whole REC).
pub type Amount = u128;

/// Wall-clock seconds since the Unix epoch.
pub type Timestamp = u64;

/// A holder address, 20 bytes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Address(pub [u8; 20]);

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Address {
    /// Converts the Address to a byte array.
    pub fn to_bytes(&self) -> [u8; 20] {
        self.0
    }

    /// Creates an Address from a byte array.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Opaque identity commitment stored for a whitelisted holder.
///
/// The ledger never inspects the underlying document; it only stores the
/// digest handed over at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityHash(pub Hash);

impl IdentityHash {
    /// Derives the commitment from an off-chain document reference
    /// (e.g. a national ID string held by the registrar).
    pub fn from_document(document: &str) -> Self {
        IdentityHash(blake3::hash(document.as_bytes()).into())
    }
}

impl std::fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Permission tags checked before every restricted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// System administrator: role management, rates, sale lifecycle.
    Admin,
    /// May submit recycling-activity proposals.
    Proposer,
    /// May approve or reject activity proposals.
    Validator,
    /// May burn tokens when rewards are redeemed.
    Burner,
    /// May register holders on the whitelist.
    WhitelistManager,
}
