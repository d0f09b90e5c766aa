use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A scripted crisis beat: fires once, after the given day has been played.
/// `price_shock` < 1.0 is a crash, > 1.0 a recovery, exactly 1.0 a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisEvent {
    pub day: usize,
    pub headline: String,
    pub body: String,
    pub price_shock: f64,
}

/// Stateless day -> event lookup. At most one event per day; repeated lookups
/// for the same day are idempotent (not re-displaying an event is the
/// presentation layer's job).
#[derive(Debug, Clone, Default)]
pub struct CrisisSchedule {
    events: BTreeMap<usize, CrisisEvent>,
}

impl CrisisSchedule {
    pub fn new(events: Vec<CrisisEvent>) -> Self {
        let mut map = BTreeMap::new();
        for event in events {
            map.insert(event.day, event);
        }
        Self { events: map }
    }

    pub fn event_for_day(&self, day: usize) -> Option<&CrisisEvent> {
        self.events.get(&day)
    }

    pub fn events(&self) -> impl Iterator<Item = &CrisisEvent> {
        self.events.values()
    }

    /// The 2008 financial-crisis script the game ships with.
    pub fn default_2008() -> Self {
        Self::new(vec![
            CrisisEvent {
                day: 5,
                headline: "Housing Bubble Bursts".to_string(),
                body: "Subprime mortgage crisis triggers massive foreclosures. Major banks \
                       report billions in losses as housing prices plummet nationwide."
                    .to_string(),
                price_shock: 0.85,
            },
            CrisisEvent {
                day: 10,
                headline: "Lehman Brothers Collapses".to_string(),
                body: "Investment banking giant Lehman Brothers files for bankruptcy. Credit \
                       markets freeze as panic spreads through Wall Street."
                    .to_string(),
                price_shock: 0.70,
            },
            CrisisEvent {
                day: 15,
                headline: "Government Bailout Package".to_string(),
                body: "Federal Reserve announces emergency $700 billion bailout package. \
                       Markets show signs of stabilization but uncertainty remains high."
                    .to_string(),
                price_shock: 1.15,
            },
        ])
    }
}

/// Headlines the frontend rotates through its news ticker. Pure presentation
/// data; the engine never reads these.
pub const TICKER_MESSAGES: &[&str] = &[
    "Dow Jones drops 777 points in single session",
    "Bear Stearns acquired by JPMorgan for $2 per share",
    "A New Phase in Finance Crisis as Investors Run to Safety - NYT",
    "AIG receives $85 billion government bailout",
    "Foreclosure rates hit record highs nationwide",
    "Worst Crisis Since 1930s, with No End Yet in Sight - WSJ",
    "Unemployment rises to 6.1%, highest in 5 years",
    "Credit markets remain frozen as banks hoard cash",
    "U.S. Loses 533,000 Jobs in Biggest Drop Since 1974 - NYT",
    "Crisis spreads globally as European banks report losses",
    "Oil prices volatile amid economic uncertainty",
    "Major corporations announce massive layoffs",
    "Europe cuts interest rate to 3.25% - The Times",
];

/// Endgame verdict tiers keyed on profit/loss, shown when the session settles.
pub fn endgame_verdict(profit_loss: f64) -> (&'static str, &'static str) {
    if profit_loss > 5000.0 {
        (
            "Crisis Survivor",
            "Incredible! You navigated the 2008 financial crisis at a profit. Strategic \
             trading through one of history's worst crashes proves you can thrive in chaos.",
        )
    } else if profit_loss > 0.0 {
        (
            "Steady Hand",
            "Well done! You weathered the storm and came out ahead. While others panicked, \
             you kept your composure and preserved your capital through the meltdown.",
        )
    } else if profit_loss > -5000.0 {
        (
            "Bruised but Breathing",
            "You took losses but survived the 2008 crisis with most of your capital intact. \
             Many weren't so fortunate during this historic market collapse.",
        )
    } else {
        (
            "Casualty of Crisis",
            "The crisis hit hard. Don't feel bad: seasoned Wall Street veterans lost \
             billions during the 2008 meltdown. Learn from the experience!",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_script_fires_on_the_scripted_days_only() {
        let schedule = CrisisSchedule::default_2008();
        for day in 0..=20 {
            let event = schedule.event_for_day(day);
            match day {
                5 | 10 | 15 => assert!(event.is_some(), "day {} should fire", day),
                _ => assert!(event.is_none(), "day {} should be quiet", day),
            }
        }
        assert!((schedule.event_for_day(10).unwrap().price_shock - 0.70).abs() < 1e-9);
        assert!((schedule.event_for_day(15).unwrap().price_shock - 1.15).abs() < 1e-9);
    }

    #[test]
    fn lookup_is_idempotent() {
        let schedule = CrisisSchedule::default_2008();
        let first = schedule.event_for_day(5).cloned();
        let second = schedule.event_for_day(5).cloned();
        assert_eq!(first, second);
    }

    #[test]
    fn later_event_for_the_same_day_wins() {
        let schedule = CrisisSchedule::new(vec![
            CrisisEvent {
                day: 3,
                headline: "First".to_string(),
                body: String::new(),
                price_shock: 0.9,
            },
            CrisisEvent {
                day: 3,
                headline: "Second".to_string(),
                body: String::new(),
                price_shock: 0.8,
            },
        ]);
        assert_eq!(schedule.event_for_day(3).unwrap().headline, "Second");
    }

    #[test]
    fn verdict_tiers() {
        assert_eq!(endgame_verdict(6000.0).0, "Crisis Survivor");
        assert_eq!(endgame_verdict(1.0).0, "Steady Hand");
        assert_eq!(endgame_verdict(-1000.0).0, "Bruised but Breathing");
        assert_eq!(endgame_verdict(-9000.0).0, "Casualty of Crisis");
    }
}
