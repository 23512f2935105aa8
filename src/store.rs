//! In-memory contest storage.
//!
//! Each contest sits behind its own mutex, so results for one contest are applied one
//! at a time while different contests never wait on each other. Every write goes
//! through [`ContestStore::transact`], which commits only when the whole cascade
//! succeeds.

use crate::models::{Contest, ContestError, ContestId, ContestStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, TryLockError};
use std::time::{Duration, Instant};

/// Per-contest entry: contest data + last activity time (for auto-cleanup).
struct ContestEntry {
    contest: Contest,
    last_activity: Instant,
}

/// Short listing view of a contest.
#[derive(Clone, Debug, Serialize)]
pub struct ContestSummary {
    pub id: ContestId,
    pub name: String,
    pub status: ContestStatus,
    pub teams: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct ContestStore {
    contests: RwLock<HashMap<ContestId, Arc<Mutex<ContestEntry>>>>,
}

impl ContestStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: ContestId) -> Result<Arc<Mutex<ContestEntry>>, ContestError> {
        let map = self.contests.read().map_err(|_| ContestError::LockPoisoned)?;
        map.get(&id).cloned().ok_or(ContestError::ContestNotFound)
    }

    /// Store a new contest and return a copy of it.
    pub fn insert(&self, contest: Contest) -> Result<Contest, ContestError> {
        let mut map = self.contests.write().map_err(|_| ContestError::LockPoisoned)?;
        let snapshot = contest.clone();
        map.insert(
            contest.id,
            Arc::new(Mutex::new(ContestEntry {
                contest,
                last_activity: Instant::now(),
            })),
        );
        Ok(snapshot)
    }

    /// Snapshot of a contest. Touching it refreshes its last activity.
    pub fn get(&self, id: ContestId) -> Result<Contest, ContestError> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().map_err(|_| ContestError::LockPoisoned)?;
        guard.last_activity = Instant::now();
        Ok(guard.contest.clone())
    }

    /// Run `f` on a working copy of the contest while holding its lock. The copy replaces
    /// the stored contest only if `f` succeeds.
    pub fn transact<T, F>(&self, id: ContestId, f: F) -> Result<T, ContestError>
    where
        F: FnOnce(&mut Contest) -> Result<T, ContestError>,
    {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().map_err(|_| ContestError::LockPoisoned)?;
        guard.last_activity = Instant::now();
        let mut working = guard.contest.clone();
        let out = f(&mut working)?;
        guard.contest = working;
        Ok(out)
    }

    /// Delete a contest with everything it owns.
    pub fn remove(&self, id: ContestId) -> Result<(), ContestError> {
        let mut map = self.contests.write().map_err(|_| ContestError::LockPoisoned)?;
        map.remove(&id).map(|_| ()).ok_or(ContestError::ContestNotFound)
    }

    pub fn list(&self) -> Result<Vec<ContestSummary>, ContestError> {
        let map = self.contests.read().map_err(|_| ContestError::LockPoisoned)?;
        let mut out = Vec::with_capacity(map.len());
        for entry in map.values() {
            let guard = entry.lock().map_err(|_| ContestError::LockPoisoned)?;
            let c = &guard.contest;
            out.push(ContestSummary {
                id: c.id,
                name: c.name.clone(),
                status: c.status,
                teams: c.teams.len(),
                created_at: c.created_at,
            });
        }
        out.sort_by_key(|s| s.created_at);
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.contests.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove contests not touched for `ttl`. Contests busy in a transaction are kept.
    pub fn evict_inactive(&self, ttl: Duration) -> Result<usize, ContestError> {
        let mut map = self.contests.write().map_err(|_| ContestError::LockPoisoned)?;
        let before = map.len();
        map.retain(|_, entry| match entry.try_lock() {
            Ok(e) => e.last_activity.elapsed() < ttl,
            Err(TryLockError::WouldBlock) => true,
            Err(TryLockError::Poisoned(_)) => false,
        });
        Ok(before - map.len())
    }
}
