// src/cache/mod.rs

pub mod clock;
pub mod simple_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use simple_cache::SimpleCache;
