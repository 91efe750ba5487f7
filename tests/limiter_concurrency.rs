//! Contention tests for both limiter strategies.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gateway_sim::security::{build_limiter, Admission, LimiterStrategy};
use gateway_sim::sources::{Clock, ManualClock, SystemClock};

const STRATEGIES: [LimiterStrategy; 2] = [LimiterStrategy::Mutex, LimiterStrategy::LockFree];

fn hammer(limiter: Arc<dyn Admission>, threads: usize, calls_per_thread: usize) -> usize {
    let admitted = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let limiter = limiter.clone();
            let admitted = admitted.clone();
            thread::spawn(move || {
                for _ in 0..calls_per_thread {
                    if limiter.admit() {
                        admitted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    admitted.load(Ordering::Relaxed)
}

#[test]
fn test_frozen_clock_admits_exactly_capacity_under_contention() {
    for strategy in STRATEGIES {
        let clock = Arc::new(ManualClock::new());
        let limiter: Arc<dyn Admission> =
            Arc::from(build_limiter(strategy, 100.0, Some(50.0), clock).unwrap());

        let admitted = hammer(limiter, 16, 200);
        assert_eq!(admitted, 50, "{strategy:?}");
    }
}

#[test]
fn test_fractional_capacity_floors_under_contention() {
    for strategy in STRATEGIES {
        let clock = Arc::new(ManualClock::new());
        let limiter: Arc<dyn Admission> =
            Arc::from(build_limiter(strategy, 100.0, Some(12.75), clock).unwrap());

        assert_eq!(hammer(limiter, 8, 100), 12, "{strategy:?}");
    }
}

#[test]
fn test_wall_clock_window_bound() {
    let rate = 2_000.0;
    let capacity = 20.0;

    for strategy in STRATEGIES {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        let limiter: Arc<dyn Admission> =
            Arc::from(build_limiter(strategy, rate, Some(capacity), clock.clone()).unwrap());

        let started = Instant::now();
        let admitted = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                let admitted = admitted.clone();
                thread::spawn(move || {
                    while started.elapsed() < Duration::from_millis(250) {
                        if limiter.admit() {
                            admitted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // The bucket started full when the clock was created, just before `started`.
        let window = clock.now().as_secs_f64();
        let bound = (capacity + rate * window).ceil() as usize;
        let admitted = admitted.load(Ordering::Relaxed);
        assert!(admitted <= bound, "{strategy:?}: {admitted} > {bound}");
        // Contention should not starve the bucket either.
        assert!(admitted as f64 >= rate * 0.25 * 0.5, "{strategy:?}: only {admitted}");
    }
}
