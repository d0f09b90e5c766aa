/// One simulated day's open/high/low/close summary for a single company.
///
/// Invariant: `high >= max(open, close)` and `low <= min(open, close)`,
/// with all four values positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Whether the OHLC bounds are internally consistent.
    pub fn bounds_hold(&self) -> bool {
        self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
            && self.low > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullish_and_bearish() {
        let up = Candle {
            open: 100.0,
            high: 106.0,
            low: 99.0,
            close: 105.0,
        };
        assert!(up.is_bullish());
        assert!(up.bounds_hold());

        let down = Candle {
            open: 100.0,
            high: 101.0,
            low: 90.0,
            close: 95.0,
        };
        assert!(!down.is_bullish());
        assert!(down.bounds_hold());
    }

    #[test]
    fn bounds_violations_are_detected() {
        let bad_high = Candle {
            open: 100.0,
            high: 99.0,
            low: 90.0,
            close: 95.0,
        };
        assert!(!bad_high.bounds_hold());

        let non_positive_low = Candle {
            open: 0.02,
            high: 0.05,
            low: -1.0,
            close: 0.01,
        };
        assert!(!non_positive_low.bounds_hold());
    }
}
