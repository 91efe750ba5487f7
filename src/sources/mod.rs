//! Time and randomness sources.
//!
//! Everything in the admission and routing path reads time and draws random
//! numbers through these traits, so tests can pin both down.
//!
//! # Data Flow
//! ```text
//! clock.rs  → Clock::now()            → limiter refill, health deadlines, call latency
//! random.rs → RandomSource::next_*()  → weighted selection, cooldown jitter
//! ```

pub mod clock;
pub mod random;

pub use clock::{Clock, ManualClock, SystemClock};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
