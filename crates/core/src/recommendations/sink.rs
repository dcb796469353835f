//! Persistence of computed recommendations

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::types::RecommendationResult;
use crate::errors::ApplicationError;
use crate::session::SessionId;

/// One stored recommendation; `rank` is its 1-based display position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecommendation {
    pub session_id: SessionId,
    pub rank: u32,
    pub recorded_at: DateTime<Utc>,
    pub result: RecommendationResult,
}

impl StoredRecommendation {
    pub fn ranked(
        session_id: &SessionId,
        results: &[RecommendationResult],
        recorded_at: DateTime<Utc>,
    ) -> Vec<Self> {
        results
            .iter()
            .zip(1u32..)
            .map(|(result, rank)| Self {
                session_id: session_id.clone(),
                rank,
                recorded_at,
                result: result.clone(),
            })
            .collect()
    }
}

#[async_trait]
pub trait RecommendationSink: Send + Sync {
    /// Replaces whatever was stored for the session.
    async fn store(
        &self,
        session_id: &SessionId,
        recommendations: Vec<StoredRecommendation>,
    ) -> Result<(), ApplicationError>;

    async fn load(&self, session_id: &SessionId)
        -> Result<Vec<StoredRecommendation>, ApplicationError>;
}

/// Sessions kept by [`InMemoryRecommendationSink::new`].
pub const DEFAULT_MAX_STORED_SESSIONS: usize = 10_000;

#[derive(Debug, Default)]
struct SessionStore {
    sessions: HashMap<SessionId, (AgeKey, Vec<StoredRecommendation>)>,
    by_age: BTreeSet<(AgeKey, SessionId)>,
    next_sequence: u64,
}

/// `recorded_at`, then store order for equal timestamps.
type AgeKey = (DateTime<Utc>, u64);

/// Bounded per-session store. Once more than `max_sessions` sessions are
/// held, the one with the oldest `recorded_at` is evicted; ties go to the
/// one stored first.
#[derive(Debug)]
pub struct InMemoryRecommendationSink {
    max_sessions: usize,
    store: RwLock<SessionStore>,
}

impl Default for InMemoryRecommendationSink {
    fn default() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_STORED_SESSIONS)
    }
}

impl InMemoryRecommendationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self { max_sessions: max_sessions.max(1), store: RwLock::new(SessionStore::default()) }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub async fn session_count(&self) -> usize {
        self.store.read().await.sessions.len()
    }
}

#[async_trait]
impl RecommendationSink for InMemoryRecommendationSink {
    async fn store(
        &self,
        session_id: &SessionId,
        mut recommendations: Vec<StoredRecommendation>,
    ) -> Result<(), ApplicationError> {
        if let Some(foreign) = recommendations.iter().find(|row| &row.session_id != session_id) {
            return Err(ApplicationError::Persistence(format!(
                "recommendation for session `{}` cannot be stored under `{session_id}`",
                foreign.session_id
            )));
        }

        recommendations.sort_by_key(|row| row.rank);
        let recorded_at =
            recommendations.iter().map(|row| row.recorded_at).max().unwrap_or_else(Utc::now);

        let mut store = self.store.write().await;
        if let Some((previous_age, _)) = store.sessions.remove(session_id) {
            store.by_age.remove(&(previous_age, session_id.clone()));
        }
        let age = (recorded_at, store.next_sequence);
        store.next_sequence += 1;
        store.by_age.insert((age, session_id.clone()));
        store.sessions.insert(session_id.clone(), (age, recommendations));

        while store.sessions.len() > self.max_sessions {
            let Some((_, evicted)) = store.by_age.pop_first() else {
                break;
            };
            store.sessions.remove(&evicted);
            debug!(
                event_name = "recommendation.session_evicted",
                session_id = %evicted,
                max_sessions = self.max_sessions,
                "oldest stored session evicted"
            );
        }

        Ok(())
    }

    async fn load(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<StoredRecommendation>, ApplicationError> {
        let store = self.store.read().await;
        Ok(store.sessions.get(session_id).map(|(_, rows)| rows.clone()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::package::{PackageId, PriceTier};

    fn result(id: &str) -> RecommendationResult {
        RecommendationResult {
            package_id: PackageId(id.to_string()),
            package_code: id.to_ascii_uppercase(),
            package_name: format!("Package {id}"),
            price_tier: PriceTier::Basic,
            final_price: 2_000,
            match_score: 50,
            reasoning: vec!["category match".to_string()],
        }
    }

    #[tokio::test]
    async fn store_replaces_previous_rows_for_session() {
        let sink = InMemoryRecommendationSink::new();
        let session = SessionId::new();
        let other = SessionId::new();
        let now = Utc::now();

        let first = StoredRecommendation::ranked(&session, &[result("a"), result("b")], now);
        sink.store(&session, first).await.expect("first store");
        sink.store(&other, StoredRecommendation::ranked(&other, &[result("c")], now))
            .await
            .expect("other store");
        sink.store(&session, StoredRecommendation::ranked(&session, &[result("d")], now))
            .await
            .expect("second store");

        let stored = sink.load(&session).await.expect("load");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].result.package_id, PackageId("d".to_string()));
        assert_eq!(stored[0].rank, 1);
        assert_eq!(sink.load(&other).await.expect("load other").len(), 1);
    }

    #[tokio::test]
    async fn ranks_follow_display_order() {
        let sink = InMemoryRecommendationSink::new();
        let session = SessionId::new();

        let rows = StoredRecommendation::ranked(
            &session,
            &[result("a"), result("b"), result("c")],
            Utc::now(),
        );
        sink.store(&session, rows).await.expect("store");

        let ranks: Vec<_> = sink
            .load(&session)
            .await
            .expect("load")
            .into_iter()
            .map(|row| (row.rank, row.result.package_id.0))
            .collect();
        assert_eq!(
            ranks,
            vec![(1, "a".to_string()), (2, "b".to_string()), (3, "c".to_string())]
        );
    }

    #[tokio::test]
    async fn rows_for_another_session_are_rejected() {
        let sink = InMemoryRecommendationSink::new();
        let session = SessionId::new();
        let other = SessionId::new();

        let error = sink
            .store(&session, StoredRecommendation::ranked(&other, &[result("a")], Utc::now()))
            .await
            .unwrap_err();

        assert!(matches!(error, ApplicationError::Persistence(_)));
        assert!(sink.load(&session).await.expect("load").is_empty());
    }

    #[tokio::test]
    async fn oldest_session_is_evicted_past_capacity() {
        let sink = InMemoryRecommendationSink::with_max_sessions(2);
        let start = Utc::now();
        let sessions: Vec<_> = (0..3).map(|_| SessionId::new()).collect();

        for (offset, session) in sessions.iter().enumerate() {
            let recorded_at = start + chrono::Duration::seconds(offset as i64);
            let rows = StoredRecommendation::ranked(session, &[result("a")], recorded_at);
            sink.store(session, rows).await.expect("store");
        }

        assert_eq!(sink.session_count().await, 2);
        assert!(sink.load(&sessions[0]).await.expect("load oldest").is_empty());
        assert_eq!(sink.load(&sessions[1]).await.expect("load").len(), 1);
        assert_eq!(sink.load(&sessions[2]).await.expect("load newest").len(), 1);
    }

    #[tokio::test]
    async fn restoring_a_session_refreshes_its_age() {
        let sink = InMemoryRecommendationSink::with_max_sessions(2);
        let start = Utc::now();
        let first = SessionId::new();
        let second = SessionId::new();
        let third = SessionId::new();

        let at = |seconds: i64| start + chrono::Duration::seconds(seconds);
        sink.store(&first, StoredRecommendation::ranked(&first, &[result("a")], at(0)))
            .await
            .expect("store first");
        sink.store(&second, StoredRecommendation::ranked(&second, &[result("b")], at(1)))
            .await
            .expect("store second");
        sink.store(&first, StoredRecommendation::ranked(&first, &[result("c")], at(2)))
            .await
            .expect("store first again");
        sink.store(&third, StoredRecommendation::ranked(&third, &[result("d")], at(3)))
            .await
            .expect("store third");

        assert!(sink.load(&second).await.expect("load second").is_empty());
        let kept = sink.load(&first).await.expect("load first");
        assert_eq!(kept[0].result.package_id, PackageId("c".to_string()));
        assert_eq!(sink.session_count().await, 2);
    }

    #[tokio::test]
    async fn many_fresh_sessions_stay_within_capacity() {
        let sink = InMemoryRecommendationSink::with_max_sessions(100);
        let now = Utc::now();
        let mut sessions = Vec::new();

        for _ in 0..1_000 {
            let session = SessionId::new();
            let rows = StoredRecommendation::ranked(&session, &[result("a"), result("b")], now);
            sink.store(&session, rows).await.expect("store");
            sessions.push(session);
        }

        assert_eq!(sink.session_count().await, 100);
        assert!(sink.load(&sessions[899]).await.expect("load evicted").is_empty());
        assert_eq!(sink.load(&sessions[900]).await.expect("load kept").len(), 2);
    }
}
