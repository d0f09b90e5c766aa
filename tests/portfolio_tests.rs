use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crisis_market::error::EngineError;
use crisis_market::market::MarketState;
use crisis_market::model::company::Company;
use crisis_market::model::trade::TradeSide;
use crisis_market::ohlc::JitterBand;
use crisis_market::portfolio::PortfolioLedger;
use crisis_market::price_walk::PriceWalk;

/// Market with prehistory 1 so every latest price equals the start price and
/// trades settle at known values.
fn fixed_market(roster: Vec<Company>) -> MarketState {
    MarketState::new(
        &mut ChaCha8Rng::seed_from_u64(0),
        roster,
        1,
        PriceWalk::default(),
        JitterBand::DAILY,
        JitterBand::SHOCK,
    )
}

fn apple_market() -> MarketState {
    fixed_market(vec![Company::new("Apple", "AAPL", 150.25)])
}

#[test]
fn buy_then_sell_round_trip_restores_balance_and_shares() {
    let market = apple_market();
    let mut ledger = PortfolioLedger::new(10_000.0, market.companies());

    let receipt = ledger.buy(&market, "Apple", 1, 0).unwrap();
    assert!((receipt.price - 150.25).abs() < 1e-9);
    assert!((receipt.balance - 9_849.75).abs() < 1e-9);
    assert_eq!(receipt.shares_held, 1);
    assert!((ledger.balance() - 9_849.75).abs() < 1e-9);
    assert_eq!(ledger.shares_held("Apple"), 1);

    let receipt = ledger.sell(&market, "Apple", 1, 0).unwrap();
    assert!((receipt.balance - 10_000.0).abs() < 1e-9);
    assert_eq!(receipt.shares_held, 0);
    assert_eq!(ledger.shares_held("Apple"), 0);
}

#[test]
fn insufficient_funds_leaves_state_untouched() {
    let market = apple_market();
    let mut ledger = PortfolioLedger::new(10.0, market.companies());

    let err = ledger.buy(&market, "Apple", 1, 0).unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientFunds {
            needed: 150.25,
            balance: 10.0
        }
    );
    assert!((ledger.balance() - 10.0).abs() < 1e-9);
    assert_eq!(ledger.shares_held("Apple"), 0);
    assert!(ledger.trade_log().is_empty());
}

#[test]
fn selling_more_than_held_is_rejected() {
    let market = apple_market();
    let mut ledger = PortfolioLedger::new(10_000.0, market.companies());
    ledger.buy(&market, "Apple", 1, 0).unwrap();

    let err = ledger.sell(&market, "Apple", 2, 0).unwrap_err();
    assert_eq!(err, EngineError::InsufficientShares { wanted: 2, held: 1 });
    assert_eq!(ledger.shares_held("Apple"), 1);
    assert!((ledger.balance() - 9_849.75).abs() < 1e-9);
}

#[test]
fn zero_quantity_and_unknown_company_are_rejected() {
    let market = apple_market();
    let mut ledger = PortfolioLedger::new(10_000.0, market.companies());

    assert_eq!(
        ledger.buy(&market, "Apple", 0, 0).unwrap_err(),
        EngineError::InvalidQuantity(0)
    );
    assert_eq!(
        ledger.sell(&market, "Apple", 0, 0).unwrap_err(),
        EngineError::InvalidQuantity(0)
    );
    assert_eq!(
        ledger.buy(&market, "Lehman", 1, 0).unwrap_err(),
        EngineError::UnknownCompany("Lehman".to_string())
    );
    assert!((ledger.balance() - 10_000.0).abs() < 1e-9);
}

#[test]
fn trading_at_unchanged_prices_is_zero_sum_on_net_worth() {
    let market = fixed_market(vec![
        Company::new("Apple", "AAPL", 150.25),
        Company::new("Intel", "INTC", 55.60),
    ]);
    let mut ledger = PortfolioLedger::new(10_000.0, market.companies());

    ledger.buy(&market, "Apple", 3, 0).unwrap();
    ledger.buy(&market, "Intel", 5, 0).unwrap();
    ledger.sell(&market, "Apple", 1, 0).unwrap();
    ledger.buy(&market, "Intel", 2, 0).unwrap();
    ledger.sell(&market, "Intel", 4, 0).unwrap();

    // Balance equals starting capital plus the independently recomputed
    // signed cash flows.
    let expected_balance = 10_000.0 - 3.0 * 150.25 - 5.0 * 55.60 + 150.25 - 2.0 * 55.60
        + 4.0 * 55.60;
    assert!((ledger.balance() - expected_balance).abs() < 1e-9);

    // Mark-to-market at the unchanged trade prices: no value created or
    // destroyed by trading itself.
    assert!((ledger.net_worth(&market) - 10_000.0).abs() < 1e-9);
    assert_eq!(ledger.shares_held("Apple"), 2);
    assert_eq!(ledger.shares_held("Intel"), 3);
}

#[test]
fn net_worth_marks_holdings_to_latest_prices() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut market = apple_market();
    let mut ledger = PortfolioLedger::new(10_000.0, market.companies());
    ledger.buy(&market, "Apple", 2, 0).unwrap();

    market.apply_shock(&mut rng, 0.5);
    let latest = market.latest_price("Apple").unwrap();
    let expected = ledger.balance() + 2.0 * latest;
    assert!((ledger.net_worth(&market) - expected).abs() < 1e-9);
}

#[test]
fn trade_log_records_every_settled_trade_in_order() {
    let market = apple_market();
    let mut ledger = PortfolioLedger::new(10_000.0, market.companies());
    ledger.buy(&market, "Apple", 1, 3).unwrap();
    ledger.sell(&market, "Apple", 1, 4).unwrap();
    let _ = ledger.buy(&market, "Apple", 0, 5); // rejected, must not log

    let log = ledger.trade_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].side, TradeSide::Buy);
    assert_eq!(log[0].day, 3);
    assert!((log[0].price - 150.25).abs() < 1e-9);
    assert_eq!(log[1].side, TradeSide::Sell);
    assert_eq!(log[1].day, 4);
}
