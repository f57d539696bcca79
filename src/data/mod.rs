//! Page fetching and dataset assembly
//!
//! Proxy-backed fetching of nba.com pages, HTML table extraction, and the
//! reshaping of per-team rows into one record per game.

pub mod dataset;
pub mod proxy;
pub mod scrapers;
pub mod table;

pub use proxy::ProxyClient;
