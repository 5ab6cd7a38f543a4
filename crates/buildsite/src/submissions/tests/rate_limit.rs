use std::time::{Duration, Instant};

use crate::submissions::rate_limit::{
    InMemoryRateLimiter, RateDecision, RateLimitKey, SubmissionLimiter, MAX_SUBMISSIONS,
    SUBMISSION_WINDOW,
};

fn key() -> RateLimitKey {
    RateLimitKey::derive("anna@bau.de", Some("198.51.100.7"))
}

#[test]
fn fourth_attempt_in_window_is_limited() {
    let limiter = InMemoryRateLimiter::default();
    let start = Instant::now();

    for attempt in 1..=MAX_SUBMISSIONS {
        let at = start + Duration::from_secs(u64::from(attempt) * 60);
        assert_eq!(
            limiter.register_attempt_at(&key(), at),
            RateDecision::Allowed { attempts: attempt }
        );
    }

    let fourth = start + Duration::from_secs(5 * 60);
    assert_eq!(limiter.register_attempt_at(&key(), fourth), RateDecision::Limited);
}

#[test]
fn counter_resets_after_window() {
    let limiter = InMemoryRateLimiter::default();
    let start = Instant::now();

    for _ in 0..MAX_SUBMISSIONS {
        limiter.register_attempt_at(&key(), start);
    }
    assert_eq!(limiter.register_attempt_at(&key(), start), RateDecision::Limited);

    let later = start + SUBMISSION_WINDOW + Duration::from_secs(1);
    assert_eq!(
        limiter.register_attempt_at(&key(), later),
        RateDecision::Allowed { attempts: 1 }
    );
}

#[test]
fn identities_are_counted_separately() {
    let limiter = InMemoryRateLimiter::with_policy(SUBMISSION_WINDOW, 1);
    let now = Instant::now();
    let other = RateLimitKey::derive("anna@bau.de", Some("203.0.113.50"));

    assert!(matches!(
        limiter.register_attempt_at(&key(), now),
        RateDecision::Allowed { .. }
    ));
    assert!(matches!(
        limiter.register_attempt_at(&other, now),
        RateDecision::Allowed { .. }
    ));
    assert_eq!(limiter.register_attempt_at(&key(), now), RateDecision::Limited);
}

#[test]
fn stale_identities_are_pruned_when_the_table_grows() {
    let limiter = InMemoryRateLimiter::default();
    let start = Instant::now();
    for index in 0..1024 {
        let key = RateLimitKey::derive(&format!("user{index}@example.com"), None);
        limiter.register_attempt_at(&key, start);
    }
    assert_eq!(limiter.tracked_identities(), 1024);

    let later = start + SUBMISSION_WINDOW + Duration::from_secs(1);
    limiter.register_attempt_at(&key(), later);
    assert_eq!(limiter.tracked_identities(), 1);
}

#[tokio::test]
async fn async_interface_uses_the_same_counter() {
    let limiter = InMemoryRateLimiter::with_policy(SUBMISSION_WINDOW, 2);

    assert_eq!(
        limiter.register_attempt(&key()).await.expect("in-memory never fails"),
        RateDecision::Allowed { attempts: 1 }
    );
    assert_eq!(
        limiter.register_attempt(&key()).await.expect("in-memory never fails"),
        RateDecision::Allowed { attempts: 2 }
    );
    assert_eq!(
        limiter.register_attempt(&key()).await.expect("in-memory never fails"),
        RateDecision::Limited
    );
}
