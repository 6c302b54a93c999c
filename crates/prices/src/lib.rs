//! Price enrichment for extracted holdings.
//!
//! The resolver consumes a [`QuoteSource`] (one lookup per identifier) and
//! puts a persistent cache and a rate limiter in front of it. Lookups that
//! fail are logged and left unresolved; enrichment never aborts a run.

pub mod cache;
pub mod error;
pub mod rate_limiter;
pub mod resolver;

pub use cache::{CachedPrice, PriceCache};
pub use error::PriceError;
pub use rate_limiter::RateLimiter;
pub use resolver::{apply_prices, CachedResolver, PriceResolver, QuoteSource, StaticPriceSource};
