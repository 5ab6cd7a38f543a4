use async_trait::async_trait;
use buildsite::config::RateLimitConfig;
use buildsite::submissions::{
    InMemoryRateLimiter, LimiterError, RateDecision, RateLimitKey, RedisRateLimiter,
    SubmissionLimiter,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

const REDIS_KEY_PREFIX: &str = "buildsite";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Limiter selected at startup: Redis when configured, otherwise per-process memory.
#[derive(Debug)]
pub(crate) enum SubmissionLimiterBackend {
    Memory(InMemoryRateLimiter),
    Redis(RedisRateLimiter),
}

impl SubmissionLimiterBackend {
    pub(crate) fn from_config(config: &RateLimitConfig) -> Result<Self, LimiterError> {
        match config.redis_url.as_deref() {
            Some(url) => Ok(Self::Redis(RedisRateLimiter::open(url, REDIS_KEY_PREFIX)?)),
            None => Ok(Self::Memory(InMemoryRateLimiter::default())),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Redis(_) => "redis",
        }
    }
}

#[async_trait]
impl SubmissionLimiter for SubmissionLimiterBackend {
    async fn register_attempt(&self, key: &RateLimitKey) -> Result<RateDecision, LimiterError> {
        match self {
            Self::Memory(limiter) => limiter.register_attempt(key).await,
            Self::Redis(limiter) => limiter.register_attempt(key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_without_redis_url() {
        let backend = SubmissionLimiterBackend::from_config(&RateLimitConfig { redis_url: None })
            .expect("memory backend builds");
        assert_eq!(backend.name(), "memory");
    }

    #[test]
    fn redis_backend_when_url_configured() {
        let config = RateLimitConfig {
            redis_url: Some("redis://127.0.0.1:6379/0".to_string()),
        };
        let backend = SubmissionLimiterBackend::from_config(&config).expect("url parses");
        assert_eq!(backend.name(), "redis");
    }

    #[tokio::test]
    async fn memory_backend_limits_fourth_attempt() {
        let backend = SubmissionLimiterBackend::from_config(&RateLimitConfig { redis_url: None })
            .expect("memory backend builds");
        let key = RateLimitKey::derive("lena@example.com", Some("192.0.2.1"));

        for _ in 0..3 {
            assert!(matches!(
                backend.register_attempt(&key).await,
                Ok(RateDecision::Allowed { .. })
            ));
        }
        assert!(matches!(
            backend.register_attempt(&key).await,
            Ok(RateDecision::Limited)
        ));
    }
}
