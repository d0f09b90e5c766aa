use rand::Rng;

use crate::model::candle::Candle;
use crate::price_walk::MIN_PRICE;

/// Cosmetic wick noise added around a candle's body. High-side and low-side
/// magnitudes are independent so the crisis-shock path can exaggerate the
/// downside wick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterBand {
    pub high: f64,
    pub low: f64,
}

impl JitterBand {
    /// Symmetric wick noise for an ordinary trading day.
    pub const DAILY: JitterBand = JitterBand { high: 5.0, low: 5.0 };

    /// Asymmetric noise used when a crisis shock rewrites the day: a tighter
    /// top wick and a wider bottom wick.
    pub const SHOCK: JitterBand = JitterBand { high: 3.0, low: 8.0 };
}

/// Derive the candle for a (previous close, new close) pair.
///
/// For the very first candle of a company's pre-history, pass the seed price
/// as both arguments so open == close.
pub fn derive_candle<R: Rng>(
    rng: &mut R,
    prev_close: f64,
    new_close: f64,
    jitter: JitterBand,
) -> Candle {
    let body_high = prev_close.max(new_close);
    let body_low = prev_close.min(new_close);
    let high = body_high + sample_jitter(rng, jitter.high);
    let low = body_low - sample_jitter(rng, jitter.low);

    // Re-clamp so the bounds hold even with degenerate jitter config, and the
    // wick never dips below one cent.
    Candle {
        open: prev_close,
        high: high.max(body_high),
        low: low.min(body_low).max(MIN_PRICE.min(body_low)),
        close: new_close,
    }
}

fn sample_jitter<R: Rng>(rng: &mut R, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    rng.gen_range(0.0..max)
}
