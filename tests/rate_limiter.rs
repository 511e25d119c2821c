use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use crpt_api_client::rate_limit::{FixedWindowRateLimiter, TimeUnit};

fn hammer(limiter: &Arc<FixedWindowRateLimiter>, threads: usize, calls: usize, pause: Duration) -> usize {
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let limiter = Arc::clone(limiter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut granted = 0;
                for _ in 0..calls {
                    if limiter.try_acquire() {
                        granted += 1;
                    }
                    if !pause.is_zero() {
                        thread::sleep(pause);
                    }
                }
                granted
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .sum()
}

#[test]
fn concurrent_burst_is_capped_by_threshold() {
    let limiter = Arc::new(FixedWindowRateLimiter::from_time_unit(TimeUnit::Minutes, 25));

    let granted = hammer(&limiter, 32, 200, Duration::ZERO);

    assert_eq!(granted, 25, "one window, one threshold");
    assert_eq!(limiter.permits_used(), 25);
    assert!(!limiter.try_acquire(), "window stays exhausted");
}

#[test]
fn twenty_threads_over_one_second_of_100ms_windows() {
    let limiter = Arc::new(FixedWindowRateLimiter::new(5, Duration::from_millis(100)));
    let barrier = Arc::new(Barrier::new(20));

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let deadline = Instant::now() + Duration::from_secs(1);
                let mut granted = 0_usize;
                while Instant::now() < deadline {
                    for _ in 0..50 {
                        if limiter.try_acquire() {
                            granted += 1;
                        }
                    }
                    thread::sleep(Duration::from_millis(2));
                }
                granted
            })
        })
        .collect();
    let granted: usize = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .sum();

    let rolls = limiter.stats().window_rolls;
    assert!(granted <= 5 * 11, "at most 11 windows fit in one second, got {granted}");
    assert!(granted >= 5 * 9, "at least 9 windows were saturated, got {granted}");
    assert!(
        u64::try_from(granted).expect("fits") <= 5 * (rolls + 1),
        "no window admitted more than the threshold: {granted} over {rolls} rolls"
    );
}

#[test]
fn zero_threshold_admits_nothing_under_load() {
    let limiter = Arc::new(FixedWindowRateLimiter::new(0, Duration::from_millis(10)));

    let granted = hammer(&limiter, 8, 20, Duration::from_millis(1));

    assert_eq!(granted, 0);
    assert_eq!(limiter.stats().admitted, 0);
}

#[test]
fn permit_is_available_after_a_full_window() {
    let limiter = FixedWindowRateLimiter::new(1, Duration::from_millis(50));

    assert!(limiter.try_acquire(), "first permit");
    assert!(!limiter.try_acquire(), "exhausted");
    thread::sleep(Duration::from_millis(60));
    assert!(limiter.try_acquire(), "window rolled");
}
