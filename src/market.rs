use std::collections::HashMap;

use rand::Rng;

use crate::error::EngineError;
use crate::model::candle::Candle;
use crate::model::company::Company;
use crate::ohlc::{derive_candle, JitterBand};
use crate::price_walk::{round2, PriceWalk, MIN_PRICE};

/// Per-company price book: the append-only daily close history and the
/// index-aligned candle history.
#[derive(Debug, Clone)]
struct CompanyBook {
    history: Vec<f64>,
    candles: Vec<Candle>,
}

/// Owns every company's price and candle history for the whole session.
///
/// All companies advance together as one simulated day; there is no
/// per-company day offset.
#[derive(Debug, Clone)]
pub struct MarketState {
    roster: Vec<Company>,
    books: HashMap<String, CompanyBook>,
    walk: PriceWalk,
    candle_jitter: JitterBand,
    shock_jitter: JitterBand,
}

impl MarketState {
    /// Build the market and seed each company's pre-game price trail so the
    /// first chart render is non-trivial.
    pub fn new<R: Rng>(
        rng: &mut R,
        roster: Vec<Company>,
        prehistory_days: usize,
        walk: PriceWalk,
        candle_jitter: JitterBand,
        shock_jitter: JitterBand,
    ) -> Self {
        let mut books = HashMap::with_capacity(roster.len());
        for company in &roster {
            let history = walk.seed_history(rng, company.start_price, prehistory_days.max(1));
            let mut candles = Vec::with_capacity(history.len());
            for (i, &close) in history.iter().enumerate() {
                let prev = if i == 0 { close } else { history[i - 1] };
                candles.push(derive_candle(rng, prev, close, candle_jitter));
            }
            books.insert(company.name.clone(), CompanyBook { history, candles });
        }
        Self {
            roster,
            books,
            walk,
            candle_jitter,
            shock_jitter,
        }
    }

    pub fn companies(&self) -> &[Company] {
        &self.roster
    }

    /// Advance every company by one simulated day: append the next walk step
    /// and its candle.
    pub fn advance_day<R: Rng>(&mut self, rng: &mut R) {
        for company in &self.roster {
            let book = self
                .books
                .get_mut(&company.name)
                .expect("roster and books share keys");
            let last = *book.history.last().expect("history is never empty");
            let next = self.walk.next_price(rng, last);
            book.history.push(next);
            book.candles
                .push(derive_candle(rng, last, next, self.candle_jitter));
        }
    }

    /// Retroactively distort the day just played: rewrite every company's
    /// latest close to `latest * multiplier` (2 dp, clamped to a cent) and
    /// rebuild the latest candle with widened downside jitter. The day
    /// counter is untouched.
    pub fn apply_shock<R: Rng>(&mut self, rng: &mut R, multiplier: f64) {
        for company in &self.roster {
            let book = self
                .books
                .get_mut(&company.name)
                .expect("roster and books share keys");
            let last_idx = book.history.len() - 1;
            let shocked = round2(book.history[last_idx] * multiplier).max(MIN_PRICE);
            book.history[last_idx] = shocked;

            let prev_close = if book.candles.len() >= 2 {
                book.candles[book.candles.len() - 2].close
            } else {
                shocked
            };
            let candle_idx = book.candles.len() - 1;
            book.candles[candle_idx] = derive_candle(rng, prev_close, shocked, self.shock_jitter);
        }
    }

    pub fn latest_price(&self, company: &str) -> Result<f64, EngineError> {
        let book = self.book(company)?;
        Ok(*book.history.last().expect("history is never empty"))
    }

    pub fn price_at(&self, company: &str, day_index: usize) -> Result<f64, EngineError> {
        let book = self.book(company)?;
        book.history
            .get(day_index)
            .copied()
            .ok_or(EngineError::IndexOutOfRange {
                index: day_index,
                len: book.history.len(),
            })
    }

    /// Full close-price history for charting.
    pub fn history(&self, company: &str) -> Result<&[f64], EngineError> {
        Ok(&self.book(company)?.history)
    }

    /// Full candle history, index-aligned with [`MarketState::history`].
    pub fn candles(&self, company: &str) -> Result<&[Candle], EngineError> {
        Ok(&self.book(company)?.candles)
    }

    /// Number of recorded entries per company (pre-history included).
    pub fn recorded_days(&self) -> usize {
        self.roster
            .first()
            .and_then(|c| self.books.get(&c.name))
            .map(|b| b.history.len())
            .unwrap_or(0)
    }

    fn book(&self, company: &str) -> Result<&CompanyBook, EngineError> {
        self.books
            .get(company)
            .ok_or_else(|| EngineError::UnknownCompany(company.to_string()))
    }
}
