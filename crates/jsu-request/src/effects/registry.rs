//! Shared set of fingerprints whose requests have not finished yet.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::core::Fingerprint;

#[derive(Debug)]
struct Entry {
    token: u64,
    since: Instant,
}

/// In-flight fingerprint set.
///
/// Construct one per logical client and share it through an `Arc`; every
/// admitted request holds an [`InFlightGuard`] that removes its fingerprint
/// exactly once.
#[derive(Debug, Default)]
pub struct InFlightRegistry {
    entries: Mutex<HashMap<Fingerprint, Entry>>,
    next_token: AtomicU64,
    ttl: Option<Duration>,
}

impl InFlightRegistry {
    pub fn new() -> Self { Self::default() }

    /// Registry whose entries stop blocking duplicates after `ttl`.
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    pub fn ttl(&self) -> Option<Duration> { self.ttl }

    /// Admit `fingerprint` unless an identical request is in flight.
    pub fn try_acquire(self: &Arc<Self>, fingerprint: Fingerprint) -> Option<InFlightGuard> {
        let mut entries = self.lock();
        if let Some(entry) = entries.get(&fingerprint) {
            match self.ttl {
                Some(ttl) if entry.since.elapsed() >= ttl => {
                    tracing::warn!(
                        fingerprint = %fingerprint,
                        age_ms = entry.since.elapsed().as_millis() as u64,
                        "evicting stale in-flight fingerprint"
                    );
                }
                _ => return None,
            }
        }

        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        entries.insert(
            fingerprint.clone(),
            Entry {
                token,
                since: Instant::now(),
            },
        );
        Some(InFlightGuard {
            registry: Arc::clone(self),
            fingerprint,
            token,
            released: false,
        })
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool { self.lock().contains_key(fingerprint) }

    pub fn len(&self) -> usize { self.lock().len() }

    pub fn is_empty(&self) -> bool { self.lock().is_empty() }

    fn release(&self, fingerprint: &Fingerprint, token: u64) {
        let mut entries = self.lock();
        // An evicted entry may have been replaced by a newer request.
        if entries.get(fingerprint).is_some_and(|e| e.token == token) {
            entries.remove(fingerprint);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Fingerprint, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Proof of admission. Releases the fingerprint on [`release`](Self::release) or drop.
#[derive(Debug)]
pub struct InFlightGuard {
    registry: Arc<InFlightRegistry>,
    fingerprint: Fingerprint,
    token: u64,
    released: bool,
}

impl InFlightGuard {
    pub fn fingerprint(&self) -> &Fingerprint { &self.fingerprint }

    pub fn release(mut self) { self.release_once(); }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.registry.release(&self.fingerprint, self.token);
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) { self.release_once(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint;
    use crate::data::{Body, Method};

    fn key(url: &str) -> Fingerprint { fingerprint(Method::Get, url, &Body::Empty, &[], "_") }

    #[test]
    fn test_second_acquire_is_rejected() {
        let registry = Arc::new(InFlightRegistry::new());
        let first = registry.try_acquire(key("http://a")).unwrap();
        assert!(registry.try_acquire(key("http://a")).is_none());
        assert!(registry.try_acquire(key("http://b")).is_some());
        drop(first);
    }

    #[test]
    fn test_release_frees_fingerprint() {
        let registry = Arc::new(InFlightRegistry::new());
        let guard = registry.try_acquire(key("http://a")).unwrap();
        assert!(registry.contains(&key("http://a")));
        guard.release();
        assert!(registry.is_empty());
        assert!(registry.try_acquire(key("http://a")).is_some());
    }

    #[test]
    fn test_drop_releases_fingerprint() {
        let registry = Arc::new(InFlightRegistry::new());
        {
            let _guard = registry.try_acquire(key("http://a")).unwrap();
            assert_eq!(registry.len(), 1);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_expired_entry_is_replaced() {
        let registry = Arc::new(InFlightRegistry::with_ttl(Some(Duration::ZERO)));
        let stale = registry.try_acquire(key("http://a")).unwrap();
        let fresh = registry.try_acquire(key("http://a")).unwrap();

        // The stale guard must not remove the newer request's entry.
        stale.release();
        assert!(registry.contains(&key("http://a")));
        fresh.release();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_no_ttl_never_expires() {
        let registry = Arc::new(InFlightRegistry::new());
        let _guard = registry.try_acquire(key("http://a")).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert!(registry.try_acquire(key("http://a")).is_none());
    }
}
