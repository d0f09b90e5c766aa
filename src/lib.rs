pub mod config;
pub mod error;
pub mod input;
pub mod leaderboard;
pub mod market;
pub mod model;
pub mod ohlc;
pub mod portfolio;
pub mod price_walk;
pub mod scenario;
pub mod session;
pub mod ui;
