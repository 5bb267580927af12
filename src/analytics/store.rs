use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::analytics::AnalyticsMetrics;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Age after which a snapshot counts as missing. `None` keeps it forever.
    pub ttl: Option<Duration>,
    /// Users tracked at once; the least recently touched one is evicted past it.
    pub max_users: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl: Some(Duration::from_secs(3600)),
            max_users: 10_000,
        }
    }
}

impl StoreConfig {
    pub fn unbounded() -> Self {
        Self {
            ttl: None,
            max_users: usize::MAX,
        }
    }
}

struct Slot {
    metrics: AnalyticsMetrics,
    stored_at: Instant,
}

struct UserSlots {
    slots: HashMap<String, Slot>,
    last_access: Instant,
}

impl UserSlots {
    fn new(now: Instant) -> Self {
        Self {
            slots: HashMap::new(),
            last_access: now,
        }
    }
}

/// In-memory snapshots keyed by user, then by `"{range}-{period}"`.
pub struct AnalyticsStore {
    config: StoreConfig,
    users: Mutex<HashMap<String, UserSlots>>,
}

impl AnalyticsStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            users: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub async fn get(&self, user_id: &str, key: &str) -> Option<AnalyticsMetrics> {
        let now = Instant::now();
        let mut guard = self.users.lock().await;
        let user = guard.get_mut(user_id)?;
        user.last_access = now;
        self.live_slot(user, key, now).map(|slot| slot.metrics.clone())
    }

    pub async fn put(&self, user_id: &str, key: &str, metrics: AnalyticsMetrics) {
        let now = Instant::now();
        let mut guard = self.users.lock().await;
        let user = guard
            .entry(user_id.to_string())
            .or_insert_with(|| UserSlots::new(now));
        user.last_access = now;
        user.slots.insert(
            key.to_string(),
            Slot {
                metrics,
                stored_at: now,
            },
        );
        self.enforce_bound(&mut guard, user_id);
    }

    /// Returns the live snapshot for `key`, storing `make()` first when there
    /// is none. Runs under the store lock so concurrent callers see one value.
    pub async fn get_or_insert_with<F>(&self, user_id: &str, key: &str, make: F) -> AnalyticsMetrics
    where
        F: FnOnce() -> AnalyticsMetrics,
    {
        let now = Instant::now();
        let mut guard = self.users.lock().await;
        let user = guard
            .entry(user_id.to_string())
            .or_insert_with(|| UserSlots::new(now));
        user.last_access = now;

        if let Some(slot) = self.live_slot(user, key, now) {
            tracing::debug!(user_id, key, "analytics store hit");
            return slot.metrics.clone();
        }

        tracing::debug!(user_id, key, "analytics store miss");
        let metrics = make();
        user.slots.insert(
            key.to_string(),
            Slot {
                metrics: metrics.clone(),
                stored_at: now,
            },
        );
        self.enforce_bound(&mut guard, user_id);
        metrics
    }

    pub async fn clear(&self) {
        let mut guard = self.users.lock().await;
        guard.clear();
    }

    /// Drops every expired snapshot and any user left without one.
    pub async fn purge_expired(&self) -> usize {
        let Some(ttl) = self.config.ttl else {
            return 0;
        };
        let now = Instant::now();
        let mut guard = self.users.lock().await;
        let mut removed = 0usize;
        for user in guard.values_mut() {
            let before = user.slots.len();
            user.slots
                .retain(|_, slot| now.duration_since(slot.stored_at) < ttl);
            removed += before - user.slots.len();
        }
        guard.retain(|_, user| !user.slots.is_empty());
        removed
    }

    /// Snapshots currently held, expired ones included until purged.
    pub async fn len(&self) -> usize {
        let guard = self.users.lock().await;
        guard.values().map(|user| user.slots.len()).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn user_count(&self) -> usize {
        let guard = self.users.lock().await;
        guard.len()
    }

    fn live_slot<'a>(&self, user: &'a mut UserSlots, key: &str, now: Instant) -> Option<&'a Slot> {
        let expired = match (self.config.ttl, user.slots.get(key)) {
            (Some(ttl), Some(slot)) => now.duration_since(slot.stored_at) >= ttl,
            _ => false,
        };
        if expired {
            user.slots.remove(key);
            return None;
        }
        user.slots.get(key)
    }

    fn enforce_bound(&self, users: &mut HashMap<String, UserSlots>, keep: &str) {
        while users.len() > self.config.max_users.max(1) {
            let oldest = users
                .iter()
                .filter(|(user_id, _)| user_id.as_str() != keep)
                .min_by_key(|(_, user)| user.last_access)
                .map(|(user_id, _)| user_id.clone());
            match oldest {
                Some(user_id) => {
                    users.remove(&user_id);
                    tracing::info!(user_id = %user_id, "evicted analytics snapshots");
                }
                None => break,
            }
        }
    }
}
