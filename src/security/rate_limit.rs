//! Global token-bucket rate limiting.
//!
//! The bucket holds a fractional balance capped at `capacity` and refills
//! continuously at `rate` tokens per second. Every call refills first, then
//! tries to take one whole token.
//!
//! Two strategies share the same arithmetic ([`TokenBucket::try_acquire`]):
//! - [`MutexLimiter`]: the balance and its timestamp live behind one mutex.
//! - [`LockFreeLimiter`]: the `(balance, timestamp)` pair is an immutable
//!   snapshot behind a single atomically swapped pointer. A caller builds the
//!   successor snapshot and publishes it with compare-and-swap, retrying if
//!   another caller won the race. The two fields are never written separately,
//!   so elapsed time is never counted twice and no token is spent twice.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::sources::Clock;

/// Floor for the derived burst capacity.
const MIN_DEFAULT_CAPACITY: f64 = 10.0;

/// Share of one second's rate allowed as burst.
const DEFAULT_BURST_RATIO: f64 = 0.1;

/// Default burst capacity for a given rate: 10% of one second's worth, at least 10.
pub fn default_capacity(rate: f64) -> f64 {
    (rate * DEFAULT_BURST_RATIO).max(MIN_DEFAULT_CAPACITY)
}

/// Which concurrency strategy guards the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimiterStrategy {
    /// Single mutex around the read-modify-write.
    Mutex,
    /// Compare-and-swap on one atomically published snapshot.
    #[default]
    LockFree,
}

/// Point-in-time view of a limiter, for admin endpoints and logs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimiterSnapshot {
    pub rate: f64,
    pub capacity: f64,
    /// Balance as it would be after refilling up to now.
    pub tokens: f64,
}

/// An admission gate.
pub trait Admission: Send + Sync + Debug {
    /// Decide whether one request may proceed. Mutates the bucket either way.
    fn admit(&self) -> bool;

    /// Current balance without consuming anything.
    fn snapshot(&self) -> LimiterSnapshot;
}

/// Bucket balance at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TokenBucket {
    tokens: f64,
    last_update: Duration,
}

impl TokenBucket {
    fn full(capacity: f64, now: Duration) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    fn refilled(&self, now: Duration, capacity: f64, refill_rate: f64) -> f64 {
        let elapsed = now.saturating_sub(self.last_update).as_secs_f64();
        (self.tokens + elapsed * refill_rate).min(capacity)
    }

    /// Refill for the elapsed time and try to take one token.
    ///
    /// Returns the successor state and whether a token was taken. The
    /// timestamp advances even on rejection so the next call does not count
    /// the same interval again.
    fn try_acquire(&self, now: Duration, capacity: f64, refill_rate: f64) -> (Self, bool) {
        // A caller that read the clock before a faster one published must not
        // move the timestamp backwards.
        let now = now.max(self.last_update);
        let tokens = self.refilled(now, capacity, refill_rate);

        if tokens >= 1.0 {
            (
                Self {
                    tokens: tokens - 1.0,
                    last_update: now,
                },
                true,
            )
        } else {
            (
                Self {
                    tokens,
                    last_update: now,
                },
                false,
            )
        }
    }
}

fn validate(rate: f64, capacity: f64) -> Result<(), GatewayError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(GatewayError::InvalidRate(rate));
    }
    if !capacity.is_finite() || capacity < 1.0 {
        return Err(GatewayError::InvalidCapacity(capacity));
    }
    Ok(())
}

/// Token bucket serialized by a mutex.
#[derive(Debug)]
pub struct MutexLimiter {
    rate: f64,
    capacity: f64,
    bucket: Mutex<TokenBucket>,
    clock: Arc<dyn Clock>,
}

impl MutexLimiter {
    pub fn new(rate: f64, capacity: f64, clock: Arc<dyn Clock>) -> Result<Self, GatewayError> {
        validate(rate, capacity)?;
        Ok(Self {
            rate,
            capacity,
            bucket: Mutex::new(TokenBucket::full(capacity, clock.now())),
            clock,
        })
    }
}

impl Admission for MutexLimiter {
    fn admit(&self) -> bool {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        let (next, admitted) = bucket.try_acquire(self.clock.now(), self.capacity, self.rate);
        *bucket = next;
        admitted
    }

    fn snapshot(&self) -> LimiterSnapshot {
        let bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        LimiterSnapshot {
            rate: self.rate,
            capacity: self.capacity,
            tokens: bucket.refilled(self.clock.now(), self.capacity, self.rate),
        }
    }
}

/// Token bucket updated by compare-and-swap on a single published snapshot.
#[derive(Debug)]
pub struct LockFreeLimiter {
    rate: f64,
    capacity: f64,
    bucket: ArcSwap<TokenBucket>,
    clock: Arc<dyn Clock>,
}

impl LockFreeLimiter {
    pub fn new(rate: f64, capacity: f64, clock: Arc<dyn Clock>) -> Result<Self, GatewayError> {
        validate(rate, capacity)?;
        Ok(Self {
            rate,
            capacity,
            bucket: ArcSwap::from_pointee(TokenBucket::full(capacity, clock.now())),
            clock,
        })
    }
}

impl Admission for LockFreeLimiter {
    fn admit(&self) -> bool {
        loop {
            let current = self.bucket.load();
            let (next, admitted) = current.try_acquire(self.clock.now(), self.capacity, self.rate);
            let previous = self.bucket.compare_and_swap(&*current, Arc::new(next));
            if Arc::ptr_eq(&*previous, &*current) {
                return admitted;
            }
        }
    }

    fn snapshot(&self) -> LimiterSnapshot {
        let bucket = self.bucket.load();
        LimiterSnapshot {
            rate: self.rate,
            capacity: self.capacity,
            tokens: bucket.refilled(self.clock.now(), self.capacity, self.rate),
        }
    }
}

/// Build a limiter with the requested strategy.
///
/// `capacity` defaults to [`default_capacity`] when `None`.
pub fn build_limiter(
    strategy: LimiterStrategy,
    rate: f64,
    capacity: Option<f64>,
    clock: Arc<dyn Clock>,
) -> Result<Box<dyn Admission>, GatewayError> {
    let capacity = capacity.unwrap_or_else(|| default_capacity(rate));
    let limiter: Box<dyn Admission> = match strategy {
        LimiterStrategy::Mutex => Box::new(MutexLimiter::new(rate, capacity, clock)?),
        LimiterStrategy::LockFree => Box::new(LockFreeLimiter::new(rate, capacity, clock)?),
    };
    tracing::debug!(?strategy, rate, capacity, "Rate limiter initialized");
    Ok(limiter)
}
