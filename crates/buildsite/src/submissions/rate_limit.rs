use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;

/// Submissions accepted per identity within [`SUBMISSION_WINDOW`].
pub const MAX_SUBMISSIONS: u32 = 3;
pub const SUBMISSION_WINDOW: Duration = Duration::from_secs(15 * 60);

const PRUNE_THRESHOLD: usize = 1024;

/// Identity a submission is counted against: lowercased email plus the
/// forwarded client address (or `unknown`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey(String);

impl RateLimitKey {
    pub fn derive(email: &str, forwarded_for: Option<&str>) -> Self {
        let address = forwarded_for
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .unwrap_or("unknown");
        Self(format!("{}:{address}", email.trim().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { attempts: u32 },
    Limited,
}

#[derive(Debug, thiserror::Error)]
pub enum LimiterError {
    #[error("rate limit backend unavailable: {0}")]
    Backend(String),
}

/// Counts submission attempts per identity.
#[async_trait]
pub trait SubmissionLimiter: Send + Sync {
    async fn register_attempt(&self, key: &RateLimitKey) -> Result<RateDecision, LimiterError>;
}

#[derive(Debug, Clone, Copy)]
struct RateEntry {
    count: u32,
    last_attempt: Instant,
}

/// Single-process limiter. The window restarts once the last accepted
/// attempt is older than the window; rejected attempts do not extend it.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    entries: Mutex<HashMap<RateLimitKey, RateEntry>>,
    window: Duration,
    max_attempts: u32,
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::with_policy(SUBMISSION_WINDOW, MAX_SUBMISSIONS)
    }
}

impl InMemoryRateLimiter {
    pub fn with_policy(window: Duration, max_attempts: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            window,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn register_attempt_at(&self, key: &RateLimitKey, now: Instant) -> RateDecision {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if entries.len() >= PRUNE_THRESHOLD {
            let window = self.window;
            entries.retain(|_, entry| now.saturating_duration_since(entry.last_attempt) <= window);
        }

        let entry = entries.entry(key.clone()).or_insert(RateEntry {
            count: 0,
            last_attempt: now,
        });

        if now.saturating_duration_since(entry.last_attempt) > self.window {
            entry.count = 1;
            entry.last_attempt = now;
            return RateDecision::Allowed { attempts: 1 };
        }

        if entry.count >= self.max_attempts {
            return RateDecision::Limited;
        }

        entry.count += 1;
        entry.last_attempt = now;
        RateDecision::Allowed {
            attempts: entry.count,
        }
    }

    pub fn tracked_identities(&self) -> usize {
        match self.entries.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

#[async_trait]
impl SubmissionLimiter for InMemoryRateLimiter {
    async fn register_attempt(&self, key: &RateLimitKey) -> Result<RateDecision, LimiterError> {
        Ok(self.register_attempt_at(key, Instant::now()))
    }
}

/// Limiter shared across instances through Redis. Each identity gets a
/// counter whose TTL is set on its first attempt, so the window is fixed
/// from that attempt. `INCR` and `EXPIRE ... NX` run in one `MULTI`
/// transaction: a counter can never exist without a TTL, and a key left
/// without one is repaired by the next attempt. Requires Redis 7.0 or newer.
pub struct RedisRateLimiter {
    client: redis::Client,
    connection: OnceCell<ConnectionManager>,
    prefix: String,
    window: Duration,
    max_attempts: u32,
}

impl fmt::Debug for RedisRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisRateLimiter")
            .field("prefix", &self.prefix)
            .field("window", &self.window)
            .field("max_attempts", &self.max_attempts)
            .field("connected", &self.connection.initialized())
            .finish_non_exhaustive()
    }
}

impl RedisRateLimiter {
    /// Parse the URL without connecting; the connection is opened on first use
    /// and reused afterwards.
    pub fn open(url: &str, prefix: &str) -> Result<Self, LimiterError> {
        let client = redis::Client::open(url).map_err(backend)?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
            prefix: prefix.to_string(),
            window: SUBMISSION_WINDOW,
            max_attempts: MAX_SUBMISSIONS,
        })
    }

    fn counter_key(&self, key: &RateLimitKey) -> String {
        format!("{}:submissions:{}", self.prefix, key.as_str())
    }

    fn attempt_pipeline(&self, counter: &str) -> redis::Pipeline {
        let mut pipe = redis::pipe();
        pipe.atomic()
            .incr(counter, 1_u32)
            .cmd("EXPIRE")
            .arg(counter)
            .arg(self.window.as_secs())
            .arg("NX")
            .ignore();
        pipe
    }

    async fn connection(&self) -> Result<ConnectionManager, LimiterError> {
        let manager = self
            .connection
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await
            .map_err(backend)?;
        Ok(manager.clone())
    }
}

fn backend(err: redis::RedisError) -> LimiterError {
    LimiterError::Backend(err.to_string())
}

#[async_trait]
impl SubmissionLimiter for RedisRateLimiter {
    async fn register_attempt(&self, key: &RateLimitKey) -> Result<RateDecision, LimiterError> {
        let mut conn = self.connection().await?;
        let counter = self.counter_key(key);
        let (count,): (u32,) = self
            .attempt_pipeline(&counter)
            .query_async(&mut conn)
            .await
            .map_err(backend)?;

        if count > self.max_attempts {
            Ok(RateDecision::Limited)
        } else {
            Ok(RateDecision::Allowed { attempts: count })
        }
    }
}
