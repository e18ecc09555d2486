//! CDN API client implementations

mod cachefly;

pub use cachefly::CacheflyProvider;
