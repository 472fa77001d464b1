//! Time-boxed report cache.
//!
//! Re-runs the pipeline at most once per TTL. When a refresh fails and an
//! earlier dataset exists, that dataset stays available and the failure is
//! reported alongside it; with nothing cached the failure goes to the caller.

use crate::{
    config::SlaConfig,
    error::{SlaError, SlaResult},
    pipeline::{prepare, Dataset},
    source::TicketSource,
};
use chrono::{NaiveDateTime, TimeDelta};

/// What a call to [`ReportCache::refresh`] did.
#[derive(Debug)]
pub enum RefreshStatus {
    /// The source was fetched and the pipeline re-run.
    Fresh,
    /// The cached dataset is still within its TTL.
    Cached,
    /// Refresh failed; the previous dataset is being served.
    Stale(SlaError),
}

struct CacheEntry {
    dataset:    Dataset,
    fetched_at: NaiveDateTime,
}

pub struct ReportCache {
    ttl:   TimeDelta,
    entry: Option<CacheEntry>,
}

impl ReportCache {
    pub fn new(ttl_secs: u64) -> Self {
        let ttl_secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self {
            ttl:   TimeDelta::try_seconds(ttl_secs).unwrap_or(TimeDelta::MAX),
            entry: None,
        }
    }

    pub fn from_config(config: &SlaConfig) -> Self {
        Self::new(config.cache_ttl_secs)
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.entry.as_ref().map(|e| &e.dataset)
    }

    pub fn fetched_at(&self) -> Option<NaiveDateTime> {
        self.entry.as_ref().map(|e| e.fetched_at)
    }

    pub fn is_fresh(&self, now: NaiveDateTime) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| now.signed_duration_since(e.fetched_at) < self.ttl)
    }

    /// Force the next refresh to hit the source.
    pub fn invalidate(&mut self) {
        if let Some(entry) = self.entry.as_mut() {
            entry.fetched_at = NaiveDateTime::MIN;
        }
    }

    /// Make sure a dataset measured no earlier than `now - ttl` is cached.
    /// `now` doubles as the reference instant for a re-run pipeline.
    pub fn refresh(
        &mut self,
        source: &dyn TicketSource,
        config: &SlaConfig,
        now: NaiveDateTime,
    ) -> SlaResult<RefreshStatus> {
        if self.is_fresh(now) {
            return Ok(RefreshStatus::Cached);
        }

        match source.fetch().and_then(|raw| prepare(raw, now, config)) {
            Ok(dataset) => {
                log::info!("refreshed {} tickets from {}", dataset.len(), source.name());
                self.entry = Some(CacheEntry {
                    dataset,
                    fetched_at: now,
                });
                Ok(RefreshStatus::Fresh)
            }
            Err(e) if self.entry.is_some() => {
                log::warn!("refresh from {} failed, serving cached dataset: {e}", source.name());
                Ok(RefreshStatus::Stale(e))
            }
            Err(e) => Err(e),
        }
    }
}
