//! The review-required flag is read on every track submission, so it is
//! cached in-process with a short freshness window instead of hitting
//! `platform_settings` each time.

use std::future::Future;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use crate::api::format::truthy;
use crate::config;
use crate::db::{self, DbError};

pub const REVIEW_SETTING_KEY: &str = "review_required";

struct CachedFlag {
    value: bool,
    fetched_at: Instant,
}

/// Single-value cache with a freshness window. The lock guards only the
/// slot, never the refresh itself, so a slow database read cannot block
/// readers of a still-fresh value.
pub struct FlagCache {
    ttl: Duration,
    slot: Mutex<Option<CachedFlag>>,
}

impl FlagCache {
    pub fn new(ttl: Duration) -> Self {
        FlagCache {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// The cached value, or None once the freshness window has lapsed.
    pub fn get(&self) -> Option<bool> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.value)
    }

    pub fn store(&self, value: bool) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(CachedFlag {
            value,
            fetched_at: Instant::now(),
        });
    }

    /// Serve the cached value while fresh, otherwise run `refresh` and cache
    /// its result. Two callers racing past an expired entry may both
    /// refresh; the last writer wins, which is harmless for a flag read.
    pub async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<bool, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }
        let value = refresh().await?;
        self.store(value);
        Ok(value)
    }
}

fn review_flag_cache() -> &'static FlagCache {
    static CACHE: OnceLock<FlagCache> = OnceLock::new();
    CACHE.get_or_init(|| {
        FlagCache::new(Duration::from_secs(
            config::config().moderation.settings_cache_ttl_secs,
        ))
    })
}

/// Whether new track submissions must pass the moderation queue. An absent
/// setting row means review is off.
pub async fn review_required() -> Result<bool, DbError> {
    review_flag_cache().get_or_refresh(fetch_review_flag).await
}

async fn fetch_review_flag() -> Result<bool, DbError> {
    let pool = db::pool().await?;
    let value: Option<String> =
        sqlx::query_scalar("SELECT value FROM platform_settings WHERE key = $1")
            .bind(REVIEW_SETTING_KEY)
            .fetch_optional(&pool)
            .await?;
    Ok(value.as_deref().map(truthy).unwrap_or(false))
}
