use std::collections::HashMap;

use chrono::Utc;

use crate::error::EngineError;
use crate::market::MarketState;
use crate::model::company::Company;
use crate::model::trade::{TradeRecord, TradeSide};

/// Default lot size: the reference game trades exactly one share per action.
pub const DEFAULT_LOT: u32 = 1;

/// What a successful trade settled to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeReceipt {
    pub price: f64,
    pub balance: f64,
    pub shares_held: u32,
}

/// Cash balance and per-company share counts for the active player, plus the
/// append-only trade log.
///
/// Invariants: balance and share counts never go negative; a failed trade
/// mutates nothing.
#[derive(Debug, Clone)]
pub struct PortfolioLedger {
    balance: f64,
    shares: HashMap<String, u32>,
    trade_log: Vec<TradeRecord>,
}

impl PortfolioLedger {
    pub fn new(starting_balance: f64, roster: &[Company]) -> Self {
        let shares = roster.iter().map(|c| (c.name.clone(), 0)).collect();
        Self {
            balance: starting_balance,
            shares,
            trade_log: Vec::new(),
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn shares_held(&self, company: &str) -> u32 {
        self.shares.get(company).copied().unwrap_or(0)
    }

    pub fn trade_log(&self) -> &[TradeRecord] {
        &self.trade_log
    }

    /// Buy `qty` shares at the company's latest price. Debits cash and
    /// credits shares atomically; all checks run before any mutation.
    pub fn buy(
        &mut self,
        market: &MarketState,
        company: &str,
        qty: u32,
        day: usize,
    ) -> Result<TradeReceipt, EngineError> {
        let price = self.validate(market, company, qty)?;
        let cost = price * qty as f64;
        if self.balance < cost {
            return Err(EngineError::InsufficientFunds {
                needed: cost,
                balance: self.balance,
            });
        }

        self.balance -= cost;
        let held = self.shares.entry(company.to_string()).or_insert(0);
        *held += qty;
        let receipt = TradeReceipt {
            price,
            balance: self.balance,
            shares_held: *held,
        };
        self.record(day, company, TradeSide::Buy, qty, price);
        Ok(receipt)
    }

    /// Sell `qty` held shares at the company's latest price.
    pub fn sell(
        &mut self,
        market: &MarketState,
        company: &str,
        qty: u32,
        day: usize,
    ) -> Result<TradeReceipt, EngineError> {
        let price = self.validate(market, company, qty)?;
        let held = self.shares.get(company).copied().unwrap_or(0);
        if held < qty {
            return Err(EngineError::InsufficientShares {
                wanted: qty,
                held,
            });
        }

        self.balance += price * qty as f64;
        let held = self.shares.entry(company.to_string()).or_insert(0);
        *held -= qty;
        let receipt = TradeReceipt {
            price,
            balance: self.balance,
            shares_held: *held,
        };
        self.record(day, company, TradeSide::Sell, qty, price);
        Ok(receipt)
    }

    /// Mark-to-market net worth: cash plus held shares at latest prices.
    pub fn net_worth(&self, market: &MarketState) -> f64 {
        let mut total = self.balance;
        for company in market.companies() {
            let held = self.shares_held(&company.name);
            if held == 0 {
                continue;
            }
            if let Ok(price) = market.latest_price(&company.name) {
                total += held as f64 * price;
            }
        }
        total
    }

    fn validate(
        &self,
        market: &MarketState,
        company: &str,
        qty: u32,
    ) -> Result<f64, EngineError> {
        if qty == 0 {
            return Err(EngineError::InvalidQuantity(qty));
        }
        market.latest_price(company)
    }

    fn record(&mut self, day: usize, company: &str, side: TradeSide, qty: u32, price: f64) {
        self.trade_log.push(TradeRecord {
            day,
            company: company.to_string(),
            side,
            qty,
            price,
            executed_at: Utc::now(),
        });
    }
}
