//! Data loading for the price dashboard.
//!
//! - [`models`]: canonical daily bars and request parameters
//! - [`providers`]: the [`DataProvider`](providers::DataProvider) seam and the Yahoo chart provider
//! - [`cache`]: [`CachedLoader`], the explicit memoizing loader the pipeline talks to

pub mod cache;
pub mod models;
pub mod providers;

pub use cache::{CacheKey, CachedLoader, EvictionPolicy};
