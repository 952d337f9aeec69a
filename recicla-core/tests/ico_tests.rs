use recicla_core::constants::{COIN, SALE_INVENTORY, SECONDS_PER_DAY};
use recicla_core::{
    Address, Amount, ReciclaError, ReciclaSystem, SaleConfig, SalePhase, SystemConfig,
};

fn addr(n: u8) -> Address {
    Address([n; 20])
}

const ADMIN: u8 = 1;
const BACKEND: u8 = 2;
const BUYER_1: u8 = 20;
const BUYER_2: u8 = 21;

const START: u64 = 1_700_000_000;
const DURATION: u64 = 21 * SECONDS_PER_DAY;
const END: u64 = START + DURATION;

fn setup_with(sale: SaleConfig) -> ReciclaSystem {
    env_logger::builder().is_test(true).try_init().unwrap_or(());
    let mut config = SystemConfig::new(addr(ADMIN), addr(BACKEND));
    config.sale = sale;
    let mut system = ReciclaSystem::new(config);
    system.fund_sale(addr(ADMIN), 1_000_000 * COIN).unwrap();
    system.start_ico(addr(ADMIN), START, DURATION).unwrap();
    system
}

fn setup() -> ReciclaSystem {
    setup_with(SaleConfig::default())
}

#[test]
fn test_first_tier_purchase_credits_base_plus_bonus() {
    let mut system = setup();

    // Payment of 10 at price 0.1 in the 15% tier: 100 base + 15 bonus.
    let now = START + 3_600;
    assert_eq!(system.current_discount(now), 15);
    let credited = system.buy_tokens(addr(BUYER_1), 10 * COIN, now).unwrap();

    assert_eq!(credited, 115 * COIN);
    assert_eq!(system.balance_of(addr(BUYER_1)), 115 * COIN);
    assert_eq!(system.total_raised(), 10 * COIN);
    assert_eq!(system.total_tokens_sold(), 115 * COIN);
    assert_eq!(system.contribution_of(addr(BUYER_1)), 10 * COIN);
    assert_eq!(system.sale_progress().contributors, 1);
}

#[test]
fn test_preview_matches_live_credit_in_every_tier() {
    let mut system = setup();

    let offsets: [u64; 3] = [3_600, 8 * SECONDS_PER_DAY, 15 * SECONDS_PER_DAY];
    let expected_discounts: [u64; 3] = [15, 10, 5];
    for (offset, expected) in offsets.into_iter().zip(expected_discounts) {
        let now = START + offset;
        assert_eq!(system.current_discount(now), expected);

        let (base, bonus, total) = system.calculate_token_amount(10 * COIN, now).unwrap();
        assert_eq!(base, 100 * COIN);
        assert_eq!(bonus, expected as u128 * COIN);

        let before = system.balance_of(addr(BUYER_1));
        let credited = system.buy_tokens(addr(BUYER_1), 10 * COIN, now).unwrap();
        assert_eq!(credited, total);
        assert_eq!(system.balance_of(addr(BUYER_1)) - before, total);
    }
}

#[test]
fn test_purchase_bounds_are_enforced_on_the_base_amount() {
    let mut system = setup();
    let now = START + 100;

    // 5 units convert to 50 tokens, under the 100-token minimum.
    let err = system.buy_tokens(addr(BUYER_1), 5 * COIN, now).unwrap_err();
    assert!(matches!(err, ReciclaError::Validation(_)));

    // 20 000 units convert to 200 000 tokens, over the 100 000 maximum.
    let err = system
        .buy_tokens(addr(BUYER_1), 20_000 * COIN, now)
        .unwrap_err();
    assert!(matches!(err, ReciclaError::Validation(_)));

    assert_eq!(system.total_raised(), 0);
    assert_eq!(system.balance_of(addr(BUYER_1)), 0);
}

#[test]
fn test_large_in_bounds_purchase_is_priced_exactly() {
    let mut system = setup();
    let now = START + 100;

    // 9 000 units at price 0.1 in the 15% tier: 90 000 base + 13 500 bonus.
    let credited = system.buy_tokens(addr(BUYER_1), 9_000 * COIN, now).unwrap();
    assert_eq!(credited, 103_500 * COIN);
    assert_eq!(system.balance_of(addr(BUYER_1)), 103_500 * COIN);
    assert_eq!(system.total_raised(), 9_000 * COIN);
}

#[test]
fn test_unpriceable_payment_is_a_validation_error() {
    let mut system = setup();
    let now = START + 100;

    let err = system
        .calculate_token_amount(Amount::MAX, now)
        .unwrap_err();
    assert!(matches!(err, ReciclaError::Validation(_)));

    let err = system.buy_tokens(addr(BUYER_1), Amount::MAX, now).unwrap_err();
    assert!(matches!(err, ReciclaError::Validation(_)));
    assert_eq!(system.total_raised(), 0);
    assert_eq!(system.balance_of(addr(BUYER_1)), 0);
}

#[test]
fn test_sale_window_is_enforced() {
    let mut system = setup();

    let err = system
        .buy_tokens(addr(BUYER_1), 10 * COIN, START - 10)
        .unwrap_err();
    assert!(matches!(err, ReciclaError::State(_)));

    let err = system.buy_tokens(addr(BUYER_1), 10 * COIN, END).unwrap_err();
    assert!(matches!(err, ReciclaError::State(_)));

    assert!(system.is_ico_active(START));
    assert!(!system.is_ico_active(END));
    assert_eq!(system.sale_time_remaining(START), DURATION);
}

#[test]
fn test_purchase_pushing_past_hard_cap_is_rejected_in_full() {
    let mut system = setup_with(SaleConfig {
        soft_cap: 5 * COIN,
        hard_cap: 20 * COIN,
        ..SaleConfig::default()
    });
    let now = START + 100;

    system.buy_tokens(addr(BUYER_1), 15 * COIN, now).unwrap();
    let err = system
        .buy_tokens(addr(BUYER_2), 10 * COIN, now)
        .unwrap_err();
    assert!(matches!(err, ReciclaError::Validation(_)));

    // No partial credit, no partial payment retained.
    assert_eq!(system.total_raised(), 15 * COIN);
    assert_eq!(system.balance_of(addr(BUYER_2)), 0);
    assert_eq!(system.contribution_of(addr(BUYER_2)), 0);
}

#[test]
fn test_finalize_requires_window_end_or_hard_cap() {
    let mut system = setup();

    let err = system.finalize_ico(addr(ADMIN), START + 100).unwrap_err();
    assert!(matches!(err, ReciclaError::State(_)));

    system.finalize_ico(addr(ADMIN), END + 1).unwrap();
    assert_eq!(system.sale_phase(), SalePhase::Finalized);

    let err = system.finalize_ico(addr(ADMIN), END + 2).unwrap_err();
    assert!(matches!(err, ReciclaError::State(_)));
}

#[test]
fn test_finalize_early_once_hard_cap_reached() {
    let mut system = setup_with(SaleConfig {
        soft_cap: 5 * COIN,
        hard_cap: 10 * COIN,
        ..SaleConfig::default()
    });
    let now = START + 100;

    system.buy_tokens(addr(BUYER_1), 10 * COIN, now).unwrap();
    system.finalize_ico(addr(ADMIN), now + 1).unwrap();
    assert_eq!(system.sale_phase(), SalePhase::Finalized);
    assert!(system.sale_progress().total_raised == 10 * COIN);
}

#[test]
fn test_failed_raise_refunds_each_contributor_exactly_once() {
    // Default soft cap of 50 000 is far above this single purchase.
    let mut system = setup();
    system
        .buy_tokens(addr(BUYER_1), 10 * COIN, START + 100)
        .unwrap();
    system.finalize_ico(addr(ADMIN), END + 1).unwrap();

    let err = system.withdraw_funds(addr(ADMIN)).unwrap_err();
    assert!(matches!(err, ReciclaError::State(_)));

    let refunded = system.claim_refund(addr(BUYER_1)).unwrap();
    assert_eq!(refunded, 10 * COIN);
    assert_eq!(system.contribution_of(addr(BUYER_1)), 0);

    let err = system.claim_refund(addr(BUYER_1)).unwrap_err();
    assert!(matches!(err, ReciclaError::AlreadyDone(_)));

    // Someone who never paid has nothing recorded either.
    let err = system.claim_refund(addr(BUYER_2)).unwrap_err();
    assert!(matches!(err, ReciclaError::AlreadyDone(_)));
}

#[test]
fn test_successful_raise_pays_out_the_admin_and_blocks_refunds() {
    let mut system = setup_with(SaleConfig {
        soft_cap: 10 * COIN,
        ..SaleConfig::default()
    });
    system
        .buy_tokens(addr(BUYER_1), 10 * COIN, START + 100)
        .unwrap();
    system.finalize_ico(addr(ADMIN), END + 1).unwrap();

    let err = system.claim_refund(addr(BUYER_1)).unwrap_err();
    assert!(matches!(err, ReciclaError::State(_)));

    let err = system.withdraw_funds(addr(BUYER_1)).unwrap_err();
    assert!(matches!(err, ReciclaError::Authorization { .. }));

    assert_eq!(system.withdraw_funds(addr(ADMIN)).unwrap(), 10 * COIN);
    let err = system.withdraw_funds(addr(ADMIN)).unwrap_err();
    assert!(matches!(err, ReciclaError::AlreadyDone(_)));
}

#[test]
fn test_unsold_inventory_returns_to_the_admin() {
    let mut system = setup_with(SaleConfig {
        soft_cap: 10 * COIN,
        ..SaleConfig::default()
    });
    system
        .buy_tokens(addr(BUYER_1), 10 * COIN, START + 100)
        .unwrap();
    system.finalize_ico(addr(ADMIN), END + 1).unwrap();

    let sold = system.total_tokens_sold();
    let swept = system.withdraw_unsold_tokens(addr(ADMIN)).unwrap();
    assert_eq!(swept, 1_000_000 * COIN - sold);
    assert_eq!(system.balance_of(addr(ADMIN)), swept);
    assert_eq!(system.balance_of(SALE_INVENTORY), 0);

    // A second sweep simply finds nothing.
    assert_eq!(system.withdraw_unsold_tokens(addr(ADMIN)).unwrap(), 0);
}

#[test]
fn test_sale_lifecycle_is_linear() {
    let mut config = SystemConfig::new(addr(ADMIN), addr(BACKEND));
    config.sale = SaleConfig::default();
    let mut system = ReciclaSystem::new(config);
    assert_eq!(system.sale_phase(), SalePhase::NotStarted);

    // Only the admin may open the window.
    let err = system.start_ico(addr(BUYER_1), START, DURATION).unwrap_err();
    assert!(matches!(err, ReciclaError::Authorization { .. }));

    system.start_ico(addr(ADMIN), START, DURATION).unwrap();
    let err = system.start_ico(addr(ADMIN), START, DURATION).unwrap_err();
    assert!(matches!(err, ReciclaError::State(_)));
}

#[test]
fn test_underfunded_inventory_aborts_the_purchase() {
    let mut config = SystemConfig::new(addr(ADMIN), addr(BACKEND));
    config.sale = SaleConfig::default();
    let mut system = ReciclaSystem::new(config);
    system.fund_sale(addr(ADMIN), 10 * COIN).unwrap();
    system.start_ico(addr(ADMIN), START, DURATION).unwrap();

    // 10 units buy 115 tokens, but only 10 are in stock.
    let err = system
        .buy_tokens(addr(BUYER_1), 10 * COIN, START + 100)
        .unwrap_err();
    assert!(matches!(err, ReciclaError::InsufficientBalance { .. }));
    assert_eq!(system.total_raised(), 0);
    assert_eq!(system.total_tokens_sold(), 0);
    assert_eq!(system.balance_of(addr(BUYER_1)), 0);
}
