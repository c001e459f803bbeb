//! Companion state storage for runtime state.
//!
//! One `CompanionState` per companion id, created lazily at the baseline.
//! `update` holds the DashMap entry lock for the whole closure, so each
//! handler's check-and-set on one companion is atomic while other companions
//! proceed in parallel.

use dashmap::DashMap;

use squadlink_domain::{CompanionId, CompanionState};

/// Owned, in-memory store of companion behavior state.
#[derive(Debug, Default)]
pub struct CompanionStateStore {
    inner: DashMap<CompanionId, CompanionState>,
}

impl CompanionStateStore {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Run `f` with exclusive access to the companion's state, creating it on
    /// first reference.
    pub fn update<R>(&self, id: &CompanionId, f: impl FnOnce(&mut CompanionState) -> R) -> R {
        let mut entry = self.inner.entry(id.clone()).or_default();
        f(entry.value_mut())
    }

    /// Current state of a companion. Untracked companions read as baseline
    /// without being inserted.
    pub fn snapshot(&self, id: &CompanionId) -> CompanionState {
        self.inner
            .get(id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Ids of every companion referenced since startup, sorted.
    pub fn tracked_ids(&self) -> Vec<CompanionId> {
        let mut ids: Vec<CompanionId> = self.inner.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Restore every tracked companion to the baseline. Idempotent; companions
    /// stay tracked.
    pub fn reset(&self) {
        for mut entry in self.inner.iter_mut() {
            *entry.value_mut() = CompanionState::default();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn untracked_snapshot_is_baseline_and_not_inserted() {
        let store = CompanionStateStore::new();
        let state = store.snapshot(&CompanionId::from("ghost"));
        assert!(state.is_baseline());
        assert!(store.is_empty());
    }

    #[test]
    fn update_creates_lazily_and_persists() {
        let store = CompanionStateStore::new();
        let id = CompanionId::default();

        let was_following = store.update(&id, |state| {
            let before = state.is_following;
            state.is_following = true;
            before
        });

        assert!(!was_following);
        assert!(store.snapshot(&id).is_following);
        assert_eq!(store.tracked_ids(), vec![id]);
    }

    #[test]
    fn reset_restores_baseline_and_is_idempotent() {
        let store = CompanionStateStore::new();
        let alpha = CompanionId::from("alpha");
        let bravo = CompanionId::from("bravo");
        store.update(&alpha, |s| s.is_waiting = true);
        store.update(&bravo, |s| s.current_target = Some("enemy".into()));

        store.reset();
        store.reset();

        assert!(store.snapshot(&alpha).is_baseline());
        assert!(store.snapshot(&bravo).is_baseline());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn tracked_ids_are_sorted() {
        let store = CompanionStateStore::new();
        store.update(&CompanionId::from("charlie"), |_| ());
        store.update(&CompanionId::from("alpha"), |_| ());
        let ids: Vec<String> = store
            .tracked_ids()
            .into_iter()
            .map(|id| id.into_inner())
            .collect();
        assert_eq!(ids, vec!["alpha", "charlie"]);
    }

    #[tokio::test]
    async fn concurrent_toggles_on_one_companion_are_atomic() {
        let store = Arc::new(CompanionStateStore::new());
        let id = CompanionId::default();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store.update(&id, |state| {
                    if state.is_following {
                        false
                    } else {
                        state.is_following = true;
                        true
                    }
                })
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
