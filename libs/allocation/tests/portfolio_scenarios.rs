//! End-to-end deposit and withdrawal scenarios over a mixed portfolio

use allocation::math::{percentage, PRECISION_1E18};
use allocation::{
    compute_deposit_allocation, compute_direct_withdrawal, compute_withdrawal_allocation,
    mint_amount, AllocationError, AssetBalance, AssetOutput, DepositOffer, PortfolioAccountant,
    PortfolioToken, PositionBook, PositionHandle, PositionSnapshot, PositionValuationAdapter,
    UnderlyingLayout, U256,
};
use config::{FeeConfig, PortfolioConfig};

const WRAPPER: PositionHandle = PositionHandle::new(4_242);

fn u(value: u64) -> U256 {
    U256::from(value)
}

fn e18(value: u64) -> U256 {
    U256::from(value) * PRECISION_1E18
}

/// One whole share at 18 decimals
fn one() -> U256 {
    U256::from(PRECISION_1E18)
}

fn mixed_book() -> PositionBook {
    let book = PositionBook::new();
    book.insert(
        WRAPPER,
        "USDT",
        "WBNB",
        u(1_000),
        PositionSnapshot::Reserves {
            amount0: u(4_000),
            amount1: u(8_000),
        },
    );
    book
}

fn mixed_vault() -> Vec<AssetBalance> {
    vec![
        AssetBalance::direct("BTCB", u(100)),
        AssetBalance::lp_position("PW-USDT-WBNB", WRAPPER, u(1_000)),
    ]
}

fn accountant(entry_fee_bps: u32, exit_fee_bps: u32) -> PortfolioAccountant {
    let config = PortfolioConfig {
        fees: FeeConfig {
            entry_fee_bps,
            exit_fee_bps,
        },
        ..PortfolioConfig::default()
    };
    PortfolioAccountant::new(config).unwrap()
}

#[test_log::test]
fn test_deposit_binds_on_scarcest_asset() {
    let vault = vec![
        AssetBalance::direct("ETH", u(100)),
        AssetBalance::direct("BTC", u(200)),
    ];
    let offer = DepositOffer::matching(&vault, &[u(60), u(100)]).unwrap();

    let result = compute_deposit_allocation(&vault, &offer).unwrap();
    assert_eq!(result.accepted_amounts, vec![u(50), u(100)]);
    assert_eq!(result.binding_index, Some(1));
    assert_eq!(mint_amount(&result.least_proportion, u(1_000)).unwrap(), u(500));
}

#[test_log::test]
fn test_withdrawal_values_wrapper_through_book() {
    let book = mixed_book();
    let adapter = PositionValuationAdapter::new(&book);

    let payout = compute_withdrawal_allocation(&mixed_vault(), u(250), u(1_000), &adapter).unwrap();

    assert_eq!(payout.len(), 2);
    assert_eq!(payout.outputs[0].output, AssetOutput::Direct { amount: u(25) });
    assert_eq!(
        payout.outputs[1].output,
        AssetOutput::LpPosition {
            handle: WRAPPER,
            wrapper_shares: u(250),
            amount0: u(1_000),
            amount1: u(2_000),
        }
    );
}

#[test]
fn test_vault_share_of_wrapper_in_basis_points() {
    // vault holds a quarter of the wrapper supply
    let book = mixed_book();
    book.set_total_supply(WRAPPER, u(4_000));
    let adapter = PositionValuationAdapter::new(&book);

    assert_eq!(percentage(u(1_000), u(4_000)).unwrap(), 2_500);

    let payout = compute_withdrawal_allocation(&mixed_vault(), u(500), u(1_000), &adapter).unwrap();
    match payout.outputs[1].output {
        AssetOutput::LpPosition {
            wrapper_shares,
            amount0,
            amount1,
            ..
        } => {
            assert_eq!(wrapper_shares, u(500));
            assert_eq!(amount0, u(500));
            assert_eq!(amount1, u(1_000));
        }
        other => panic!("expected LP output, got {:?}", other),
    }
}

#[test]
fn test_reserves_moving_between_queries_reprices_payout() {
    let book = mixed_book();
    let adapter = PositionValuationAdapter::new(&book);
    let vault = mixed_vault();

    let before = compute_withdrawal_allocation(&vault, u(100), u(1_000), &adapter).unwrap();
    book.update_snapshot(
        WRAPPER,
        PositionSnapshot::Reserves {
            amount0: u(2_000),
            amount1: u(16_000),
        },
    );
    let after = compute_withdrawal_allocation(&vault, u(100), u(1_000), &adapter).unwrap();

    assert_ne!(before, after);
    assert_eq!(before.outputs[0], after.outputs[0]);
}

#[test]
fn test_missing_position_surfaces_not_found() {
    let book = PositionBook::new();
    let adapter = PositionValuationAdapter::new(&book);

    let err = compute_withdrawal_allocation(&mixed_vault(), u(1), u(1_000), &adapter).unwrap_err();
    assert_eq!(err, AllocationError::PositionNotFound(WRAPPER));
}

#[test]
fn test_direct_withdrawal_rejects_lp_holdings() {
    let err = compute_direct_withdrawal(&mixed_vault(), u(1), u(1_000)).unwrap_err();
    assert_eq!(err, AllocationError::PositionNotFound(WRAPPER));
}

#[test]
fn test_redeem_above_supply_rejected() {
    let vault = vec![AssetBalance::direct("ETH", u(100))];
    let err = compute_direct_withdrawal(&vault, u(1_001), u(1_000)).unwrap_err();
    assert_eq!(
        err,
        AllocationError::InsufficientSupply {
            requested: u(1_001),
            available: u(1_000)
        }
    );
}

#[test_log::test]
fn test_first_deposit_mints_initial_amount_less_entry_fee() {
    let accountant = accountant(200, 0);
    let vault = vec![
        AssetBalance::direct("ETH", U256::zero()),
        AssetBalance::direct("BTC", U256::zero()),
    ];
    let offer = DepositOffer::matching(&vault, &[e18(3), e18(1)]).unwrap();

    let quote = accountant
        .quote_deposit(&vault, &offer, U256::zero(), U256::zero(), U256::zero())
        .unwrap();

    assert!(quote.allocation.is_first_deposit());
    assert_eq!(quote.allocation.accepted_amounts, vec![e18(3), e18(1)]);
    assert_eq!(quote.gross_mint, e18(100));
    assert_eq!(quote.fee_shares, e18(2));
    assert_eq!(quote.user_mint, e18(98));
    assert_eq!(quote.least_proportion_scaled, one());
}

#[test]
fn test_follow_on_deposit_respects_min_mint() {
    let accountant = accountant(0, 0);
    let vault = vec![
        AssetBalance::direct("ETH", e18(100)),
        AssetBalance::direct("BTC", e18(200)),
    ];
    let offer = DepositOffer::matching(&vault, &[e18(10), e18(20)]).unwrap();

    let quote = accountant
        .quote_deposit(&vault, &offer, e18(100), U256::zero(), e18(10))
        .unwrap();
    assert_eq!(quote.user_mint, e18(10));
    assert_eq!(quote.least_proportion_scaled, one() / 10u64);

    let err = accountant
        .quote_deposit(&vault, &offer, e18(100), U256::zero(), e18(11))
        .unwrap_err();
    assert_eq!(
        err,
        AllocationError::SlippageExceeded {
            expected_min: e18(11),
            actual: e18(10)
        }
    );
}

#[test_log::test]
fn test_withdrawal_quote_with_exit_fee_and_wrapper() {
    let accountant = accountant(0, 100);
    let book = mixed_book();
    let adapter = PositionValuationAdapter::new(&book);

    let quote = accountant
        .quote_withdrawal(&mixed_vault(), u(1_000), u(1_000), u(1_000), &adapter)
        .unwrap();

    // 1% of 1000 shares kept as fee
    assert_eq!(quote.fee_shares, u(10));
    assert_eq!(quote.net_redeemed, u(990));
    assert_eq!(quote.remaining_balance, U256::zero());
    assert_eq!(quote.allocation.outputs[0].output, AssetOutput::Direct { amount: u(99) });
    assert_eq!(
        quote.allocation.outputs[1].output,
        AssetOutput::LpPosition {
            handle: WRAPPER,
            wrapper_shares: u(990),
            amount0: u(3_960),
            amount1: u(7_920),
        }
    );
}

#[test]
fn test_partial_withdrawal_cannot_leave_dust_balance() {
    let accountant = accountant(0, 0);
    let vault = vec![AssetBalance::direct("ETH", e18(10))];
    let holder = e18(1);
    // leaves 0.005 shares, under the 0.01 minimum
    let redeem = holder - one() / 200u64;

    let err = accountant
        .quote_direct_withdrawal(&vault, redeem, e18(100), holder)
        .unwrap_err();
    assert_eq!(
        err,
        AllocationError::BelowMinimumHolding {
            balance: one() / 200u64,
            minimum: one() / 100u64
        }
    );

    let full = accountant
        .quote_direct_withdrawal(&vault, holder, e18(100), holder)
        .unwrap();
    assert_eq!(full.allocation.direct_amounts(), vec![Some(one() / 10u64)]);
}

#[test]
fn test_layout_for_mixed_portfolio() {
    let tokens = vec![
        PortfolioToken::Token("BTCB".into()),
        PortfolioToken::PositionWrapper {
            wrapper: "PW-USDT-WBNB".into(),
            token0: "USDT".into(),
            token1: "WBNB".into(),
        },
    ];
    let layout = UnderlyingLayout::build(&tokens).unwrap();

    assert_eq!(layout.underlying_tokens.len(), 3);
    assert_eq!(layout.portfolio_token_index, vec![0, 1, 1]);
    assert_eq!(layout.is_external_position, vec![false, true, true]);
    assert_eq!(layout.is_token_external_position, vec![false, true]);
    assert_eq!(layout.position_wrapper_index, vec![1]);
    assert_eq!(layout.index0, vec![1]);
    assert_eq!(layout.index1, vec![2]);
}
