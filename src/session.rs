use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{levels::LevelLog, recommend::LearnerProfile, shelf::SavedSet};

pub type SessionId = Uuid;

/// Everything that belongs to one user's interactive session.
#[derive(Debug, Default)]
pub struct Session {
    pub saved: SavedSet,
    pub levels: LevelLog,
    pub recommendations: RecommendationMemo,
}

/// Successful recommendations of a session, keyed by book title and learner profile.
#[derive(Debug, Default)]
pub struct RecommendationMemo {
    entries: HashMap<(String, LearnerProfile), String>,
}

impl RecommendationMemo {
    pub fn get(&self, book_title: &str, profile: &LearnerProfile) -> Option<&str> {
        self.entries
            .get(&(book_title.to_string(), profile.clone()))
            .map(String::as_str)
    }

    pub fn insert(&mut self, book_title: String, profile: LearnerProfile, recommendation: String) {
        self.entries.insert((book_title, profile), recommendation);
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    last_access: DateTime<Utc>,
}

/// Owns the state of every live session.
///
/// Each session sits behind its own lock, so sessions never contend with each other.
/// A session that has not been accessed for longer than the idle timeout is dropped.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    fn is_expired(&self, last_access: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        (now - last_access)
            .to_std()
            .map_or(false, |idle| idle > self.idle_timeout)
    }

    pub async fn create(&self) -> SessionId {
        self.create_at(Utc::now()).await
    }

    #[tracing::instrument(skip_all)]
    async fn create_at(&self, now: DateTime<Utc>) -> SessionId {
        let id = Uuid::now_v7();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry.last_access, now));

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Idle sessions evicted");
        }

        sessions.insert(
            id,
            SessionEntry {
                handle: Arc::new(Mutex::new(Session::default())),
                last_access: now,
            },
        );

        tracing::debug!(%id, "Session created");

        id
    }

    /// Returns the session and marks it as accessed, unless it is unknown or has expired.
    pub async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.get_at(id, Utc::now()).await
    }

    async fn get_at(&self, id: &SessionId, now: DateTime<Utc>) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;

        if self.is_expired(entry.last_access, now) {
            sessions.remove(id);

            tracing::debug!(%id, "Expired session evicted");

            return None;
        }

        entry.last_access = now;

        Some(entry.handle.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookRecord;

    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn sessions_are_isolated() {
        let registry = SessionRegistry::new(IDLE_TIMEOUT);
        let first = registry.create().await;
        let second = registry.create().await;

        registry
            .get(&first)
            .await
            .unwrap()
            .lock()
            .await
            .saved
            .add(BookRecord::new(Some("A".into()), None, None, None, None));

        assert_eq!(registry.get(&first).await.unwrap().lock().await.saved.all().len(), 1);
        assert!(registry.get(&second).await.unwrap().lock().await.saved.all().is_empty());
    }

    #[tokio::test]
    async fn unknown_session_is_none() {
        let registry = SessionRegistry::new(IDLE_TIMEOUT);

        assert!(registry.get(&Uuid::now_v7()).await.is_none());
    }

    #[tokio::test]
    async fn idle_session_expires() {
        let registry = SessionRegistry::new(IDLE_TIMEOUT);
        let created_at = Utc::now();
        let id = registry.create_at(created_at).await;

        let later = created_at + chrono::Duration::seconds(61);

        assert!(registry.get_at(&id, later).await.is_none());
        assert!(registry.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn access_keeps_session_alive() {
        let registry = SessionRegistry::new(IDLE_TIMEOUT);
        let created_at = Utc::now();
        let id = registry.create_at(created_at).await;

        let touched_at = created_at + chrono::Duration::seconds(50);
        assert!(registry.get_at(&id, touched_at).await.is_some());

        let later = created_at + chrono::Duration::seconds(100);
        assert!(registry.get_at(&id, later).await.is_some());
    }

    #[tokio::test]
    async fn creating_a_session_evicts_idle_ones() {
        let registry = SessionRegistry::new(IDLE_TIMEOUT);
        let created_at = Utc::now();
        let stale = registry.create_at(created_at).await;

        let fresh = registry
            .create_at(created_at + chrono::Duration::seconds(120))
            .await;

        let sessions = registry.sessions.read().await;
        assert!(!sessions.contains_key(&stale));
        assert!(sessions.contains_key(&fresh));
    }

    #[test]
    fn memo_is_keyed_by_title_and_profile() {
        let mut memo = RecommendationMemo::default();
        let profile = LearnerProfile {
            topic: "Python".into(),
            current_level: String::new(),
            target_level: String::new(),
            constraints: String::new(),
        };
        let other_profile = LearnerProfile {
            topic: "Statistics".into(),
            ..profile.clone()
        };

        memo.insert("A".into(), profile.clone(), "Because".into());

        assert_eq!(memo.get("A", &profile), Some("Because"));
        assert_eq!(memo.get("A", &other_profile), None);
        assert_eq!(memo.get("B", &profile), None);
    }
}
