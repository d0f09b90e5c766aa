pub mod candle;
pub mod company;
pub mod trade;
