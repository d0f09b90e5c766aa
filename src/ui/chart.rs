use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::model::candle::Candle;

/// Candlestick chart for one company's daily history.
pub struct CandleChart<'a> {
    title: String,
    candles: &'a [Candle],
}

impl<'a> CandleChart<'a> {
    pub fn new(title: impl Into<String>, candles: &'a [Candle]) -> Self {
        Self {
            title: title.into(),
            candles,
        }
    }
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.candles.is_empty() || inner.height < 3 || inner.width < 4 {
            return;
        }

        let chart_height = inner.height as usize;
        let chart_width = inner.width as usize;

        // Each candle takes one column; show the most recent ones that fit.
        let visible = if self.candles.len() > chart_width {
            &self.candles[self.candles.len() - chart_width..]
        } else {
            self.candles
        };

        let min = visible.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let max = visible
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = if (max - min) < 0.01 { 1.0 } else { max - min };

        let to_row = |price: f64| -> u16 {
            let normalized = (price - min) / range;
            let row = (chart_height - 1) as f64 * (1.0 - normalized);
            inner.y + (row as usize).min(chart_height - 1) as u16
        };

        for (i, candle) in visible.iter().enumerate() {
            let x = inner.x + i as u16;
            if x >= inner.x + inner.width {
                break;
            }
            let color = if candle.is_bullish() {
                Color::Green
            } else {
                Color::Red
            };
            let wick_top = to_row(candle.high);
            let wick_bottom = to_row(candle.low);
            let body_top = to_row(candle.open.max(candle.close));
            let body_bottom = to_row(candle.open.min(candle.close));

            let mut y = wick_top;
            while y <= wick_bottom {
                let glyph = if y >= body_top && y <= body_bottom {
                    "█"
                } else {
                    "│"
                };
                buf.set_string(x, y, glyph, Style::default().fg(color));
                y += 1;
            }
        }

        buf.set_string(
            inner.x,
            inner.y,
            format!("{:.2}", max),
            Style::default().fg(Color::DarkGray),
        );
        buf.set_string(
            inner.x,
            inner.y + inner.height - 1,
            format!("{:.2}", min),
            Style::default().fg(Color::DarkGray),
        );
    }
}

/// Close-price line chart, used for the all-companies overlay view.
pub struct PriceLines<'a> {
    title: String,
    series: Vec<(&'a str, &'a [f64])>,
}

impl<'a> PriceLines<'a> {
    pub fn new(title: impl Into<String>, series: Vec<(&'a str, &'a [f64])>) -> Self {
        Self {
            title: title.into(),
            series,
        }
    }
}

const LINE_COLORS: &[Color] = &[
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Blue,
    Color::Red,
    Color::LightCyan,
    Color::LightYellow,
    Color::LightGreen,
    Color::LightMagenta,
    Color::LightBlue,
    Color::LightRed,
];

impl Widget for PriceLines<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.series.is_empty() || inner.height < 3 || inner.width < 4 {
            return;
        }

        let chart_height = inner.height as usize;
        let chart_width = inner.width as usize;

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (_, prices) in &self.series {
            for &p in prices.iter().rev().take(chart_width) {
                min = min.min(p);
                max = max.max(p);
            }
        }
        if !min.is_finite() || !max.is_finite() {
            return;
        }
        let range = if (max - min) < 0.01 { 1.0 } else { max - min };

        for (series_idx, (_, prices)) in self.series.iter().enumerate() {
            let color = LINE_COLORS[series_idx % LINE_COLORS.len()];
            let visible = if prices.len() > chart_width {
                &prices[prices.len() - chart_width..]
            } else {
                prices
            };
            for (i, &price) in visible.iter().enumerate() {
                let x = inner.x + i as u16;
                if x >= inner.x + inner.width {
                    break;
                }
                let normalized = (price - min) / range;
                let row = ((chart_height - 1) as f64 * (1.0 - normalized)) as usize;
                let y = inner.y + row.min(chart_height - 1) as u16;
                buf.set_string(x, y, "●", Style::default().fg(color));
            }
        }

        buf.set_string(
            inner.x,
            inner.y,
            format!("{:.2}", max),
            Style::default().fg(Color::DarkGray),
        );
        buf.set_string(
            inner.x,
            inner.y + inner.height - 1,
            format!("{:.2}", min),
            Style::default().fg(Color::DarkGray),
        );
    }
}
