//! In-memory, time-bounded forecast cache keyed by city.
//!
//! Entries live for the process only; nothing is written to disk.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::types::WeatherData;

/// How long a forecast is reused unless configured otherwise
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct CachedForecast {
    data: WeatherData,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct WeatherCache {
    ttl: Duration,
    entries: HashMap<String, CachedForecast>,
}

/// Cities differing only in case or surrounding whitespace share an entry.
pub fn cache_key(city: &str) -> String {
    city.trim().to_lowercase()
}

impl WeatherCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh forecast for `city`, if any
    pub fn get(&self, city: &str) -> Option<&WeatherData> {
        self.get_at(city, Instant::now())
    }

    fn get_at(&self, city: &str, now: Instant) -> Option<&WeatherData> {
        self.entries
            .get(&cache_key(city))
            .filter(|cached| now.duration_since(cached.stored_at) < self.ttl)
            .map(|cached| &cached.data)
    }

    pub fn put(&mut self, city: &str, data: WeatherData) {
        self.entries.insert(
            cache_key(city),
            CachedForecast {
                data,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop stale entries. Returns how many were removed.
    pub fn expire(&mut self) -> usize {
        self.expire_at(Instant::now())
    }

    fn expire_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, cached| now.duration_since(cached.stored_at) < ttl);
        before - self.entries.len()
    }

    /// Forget one city so the next fetch goes to the network
    pub fn invalidate(&mut self, city: &str) -> bool {
        self.entries.remove(&cache_key(city)).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
