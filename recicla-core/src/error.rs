use thiserror::Error;

use recicla_shared_types::{Address, Amount, Role};

/// Every failed operation aborts with one of these, leaving state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReciclaError {
    #[error("caller {caller} is missing the {role:?} role")]
    Authorization { caller: Address, role: Role },

    #[error("invalid state: {0}")]
    State(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("insufficient balance for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        account: Address,
        requested: Amount,
        available: Amount,
    },

    #[error("already done: {0}")]
    AlreadyDone(String),
}

pub type Result<T> = std::result::Result<T, ReciclaError>;
