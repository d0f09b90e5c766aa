use rand::Rng;

use crate::config::Config;
use crate::error::EngineError;
use crate::leaderboard::LeaderboardStore;
use crate::market::MarketState;
use crate::model::trade::TradeSide;
use crate::ohlc::JitterBand;
use crate::portfolio::{PortfolioLedger, TradeReceipt, DEFAULT_LOT};
use crate::price_walk::PriceWalk;
use crate::scenario::{CrisisEvent, CrisisSchedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Finished,
}

/// Final figures computed when the session settles.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub username: String,
    pub net_worth: f64,
    /// Net worth minus the starting balance; this is the leaderboard score.
    pub profit_loss: f64,
}

/// What one `advance()` call did, reported back to the presentation layer as
/// an explicit return value.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    /// An ordinary day was played.
    Advanced { day: usize },
    /// The day was played and a scripted crisis distorted it.
    CrisisStruck { day: usize, event: CrisisEvent },
    /// The day bound was reached; the session settled instead of advancing.
    Finished(Settlement),
}

/// The one owned aggregate behind the whole game: market, ledger, clock,
/// crisis schedule, and leaderboard, sequenced by the phase machine
/// `NotStarted -> InProgress -> Finished`.
///
/// Single-threaded by design: every public operation is atomic with respect
/// to the single active session, and the presentation layer only reads
/// snapshots through the accessors.
pub struct Session<R: Rng> {
    market: MarketState,
    ledger: PortfolioLedger,
    schedule: CrisisSchedule,
    leaderboard: LeaderboardStore,
    starting_balance: f64,
    total_days: usize,
    day: usize,
    phase: Phase,
    username: Option<String>,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Build a fresh session: seeds every company's pre-history and zeroes
    /// the ledger. The leaderboard is loaded state carried across sessions.
    pub fn new(config: &Config, leaderboard: LeaderboardStore, mut rng: R) -> Self {
        let walk = PriceWalk::new(config.market.daily_move_pct);
        let candle_jitter = JitterBand {
            high: config.market.candle_jitter,
            low: config.market.candle_jitter,
        };
        let shock_jitter = JitterBand {
            high: config.market.shock_jitter_high,
            low: config.market.shock_jitter_low,
        };
        let market = MarketState::new(
            &mut rng,
            config.market.companies.clone(),
            config.market.prehistory_days,
            walk,
            candle_jitter,
            shock_jitter,
        );
        let ledger = PortfolioLedger::new(config.session.starting_balance, &config.market.companies);
        Self {
            market,
            ledger,
            schedule: config.crisis_schedule(),
            leaderboard,
            starting_balance: config.session.starting_balance,
            total_days: config.session.total_days,
            day: 0,
            phase: Phase::NotStarted,
            username: None,
            rng,
        }
    }

    /// Begin play for `username`. Leaderboard entries are written at
    /// settlement only, so an abandoned session leaves no trace.
    pub fn start(&mut self, username: &str) -> Result<(), EngineError> {
        let name = username.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyUsername);
        }
        match self.phase {
            Phase::Finished => Err(EngineError::SessionFinished),
            Phase::InProgress => Ok(()),
            Phase::NotStarted => {
                self.username = Some(name.to_string());
                self.phase = Phase::InProgress;
                tracing::info!(username = %name, total_days = self.total_days, "session started");
                Ok(())
            }
        }
    }

    /// Play one day, or settle when the day bound has been reached.
    pub fn advance(&mut self) -> Result<DayOutcome, EngineError> {
        match self.phase {
            Phase::NotStarted => return Err(EngineError::SessionNotStarted),
            Phase::Finished => return Err(EngineError::SessionFinished),
            Phase::InProgress => {}
        }

        if self.day >= self.total_days {
            return Ok(DayOutcome::Finished(self.settle()));
        }

        self.market.advance_day(&mut self.rng);
        self.day += 1;

        if let Some(event) = self.schedule.event_for_day(self.day).cloned() {
            self.market.apply_shock(&mut self.rng, event.price_shock);
            tracing::info!(
                day = self.day,
                headline = %event.headline,
                price_shock = event.price_shock,
                "crisis event fired"
            );
            return Ok(DayOutcome::CrisisStruck {
                day: self.day,
                event,
            });
        }

        tracing::debug!(day = self.day, "day advanced");
        Ok(DayOutcome::Advanced { day: self.day })
    }

    /// Trade a single lot (one share) of `company`.
    pub fn trade(&mut self, company: &str, side: TradeSide) -> Result<TradeReceipt, EngineError> {
        self.trade_qty(company, side, DEFAULT_LOT)
    }

    pub fn trade_qty(
        &mut self,
        company: &str,
        side: TradeSide,
        qty: u32,
    ) -> Result<TradeReceipt, EngineError> {
        match self.phase {
            Phase::NotStarted => return Err(EngineError::SessionNotStarted),
            Phase::Finished => return Err(EngineError::SessionFinished),
            Phase::InProgress => {}
        }
        let receipt = match side {
            TradeSide::Buy => self.ledger.buy(&self.market, company, qty, self.day)?,
            TradeSide::Sell => self.ledger.sell(&self.market, company, qty, self.day)?,
        };
        tracing::debug!(
            company,
            side = side.as_label(),
            qty,
            price = receipt.price,
            balance = receipt.balance,
            "trade settled"
        );
        Ok(receipt)
    }

    /// Administrative "force crash" hook, independent of the scripted events.
    pub fn force_shock(&mut self, multiplier: f64) -> Result<(), EngineError> {
        match self.phase {
            Phase::NotStarted => return Err(EngineError::SessionNotStarted),
            Phase::Finished => return Err(EngineError::SessionFinished),
            Phase::InProgress => {}
        }
        self.market.apply_shock(&mut self.rng, multiplier);
        tracing::warn!(multiplier, "manual market shock applied");
        Ok(())
    }

    fn settle(&mut self) -> Settlement {
        let username = self
            .username
            .clone()
            .unwrap_or_else(|| "anonymous".to_string());
        let net_worth = self.ledger.net_worth(&self.market);
        let profit_loss = net_worth - self.starting_balance;
        self.phase = Phase::Finished;

        // Persistence is best effort: a full disk must not wedge the game.
        if let Err(e) = self.leaderboard.record(&username, profit_loss) {
            tracing::warn!(error = %e, "failed to persist leaderboard entry");
        }
        tracing::info!(
            username = %username,
            net_worth,
            profit_loss,
            "session settled"
        );
        Settlement {
            username,
            net_worth,
            profit_loss,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn day(&self) -> usize {
        self.day
    }

    pub fn total_days(&self) -> usize {
        self.total_days
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn starting_balance(&self) -> f64 {
        self.starting_balance
    }

    pub fn net_worth(&self) -> f64 {
        self.ledger.net_worth(&self.market)
    }

    pub fn market(&self) -> &MarketState {
        &self.market
    }

    pub fn ledger(&self) -> &PortfolioLedger {
        &self.ledger
    }

    pub fn leaderboard(&self) -> &LeaderboardStore {
        &self.leaderboard
    }

    pub fn leaderboard_mut(&mut self) -> &mut LeaderboardStore {
        &mut self.leaderboard
    }

    pub fn schedule(&self) -> &CrisisSchedule {
        &self.schedule
    }
}
