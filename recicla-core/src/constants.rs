use recicla_shared_types::{Address, Amount};

/// Base units per whole REC token (18 decimal places).
pub const COIN: Amount = 1_000_000_000_000_000_000;

/// Distinct validator approvals required before a proposal executes.
pub const APPROVAL_THRESHOLD: usize = 2;

/// Default ceiling on total tokens ever minted.
pub const DEFAULT_MAX_SUPPLY: Amount = 10_000_000 * COIN;

/// Default sale price: 0.1 native units per whole token.
pub const DEFAULT_TOKEN_PRICE: Amount = COIN / 10;

/// Default minimum viable raise.
pub const DEFAULT_SOFT_CAP: Amount = 50_000 * COIN;

/// Default maximum permitted raise.
pub const DEFAULT_HARD_CAP: Amount = 500_000 * COIN;

/// Smallest token amount a single purchase may convert to.
pub const DEFAULT_MIN_PURCHASE_TOKENS: Amount = 100 * COIN;

/// Largest token amount a single purchase may convert to.
pub const DEFAULT_MAX_PURCHASE_TOKENS: Amount = 100_000 * COIN;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Default length of each discount tier window.
pub const DEFAULT_DISCOUNT_WINDOW_SECS: u64 = 7 * SECONDS_PER_DAY;

/// Materials configured at construction, in whole tokens per kilogram.
pub const DEFAULT_MATERIAL_RATES: &[(&str, u64)] = &[
    ("plastico", 15),
    ("papel", 8),
    ("vidrio", 10),
    ("metal", 20),
    ("carton", 8),
    ("organico", 5),
];

/// Internal account holding the token inventory offered through the sale.
pub const SALE_INVENTORY: Address = Address(*b"RECICLA-ICO-RESERVED");
