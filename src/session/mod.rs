//! Server-side review sessions keyed by an opaque token.
//!
//! The token travels in the `x-session-token` header, with a cookie as fallback for browsers.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap, HeaderName};
use axum::response::AppendHeaders;
use tokio::sync::RwLock;

use crate::review::ReviewSession;

/// Header name carrying the session token.
pub const SESSION_HEADER: &str = "x-session-token";

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "faltas_session";

/// Headers handing a session token back to the client.
pub type SessionHeaders = AppendHeaders<[(HeaderName, String); 2]>;

struct SessionEntry {
    session: ReviewSession,
    expires_at: Instant,
}

/// In-memory session storage with per-entry expiry.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Store a session under a fresh token.
    pub async fn create(&self, session: ReviewSession) -> String {
        let purged = self.purge_expired().await;
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }

        let token = uuid::Uuid::new_v4().to_string();
        self.set(&token, session).await;
        token
    }

    /// Get a live session. Expired entries are treated as missing.
    pub async fn get(&self, token: &str) -> Option<ReviewSession> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.session.clone())
    }

    /// Store or replace a session, restarting its expiry.
    pub async fn set(&self, token: &str, session: ReviewSession) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            token.to_string(),
            SessionEntry {
                session,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Run `apply` against a live session under the write lock and restart its expiry.
    ///
    /// Submits on the same token are applied one after the other, so a repeated submit sees
    /// the cursor already moved by the first. Returns `None` for a missing or expired token.
    pub async fn update<R>(
        &self,
        token: &str,
        apply: impl FnOnce(&mut ReviewSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let entry = sessions
            .get_mut(token)
            .filter(|entry| entry.expires_at > now)?;

        let result = apply(&mut entry.session);
        entry.expires_at = now + self.ttl;
        Some(result)
    }

    /// Drop every expired session and return how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let now = Instant::now();
        sessions.retain(|_, entry| entry.expires_at > now);
        before - sessions.len()
    }
}

/// Read the session token from the request headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(token) = from_header {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Response headers returning `token` to the client.
pub fn session_headers(token: &str) -> SessionHeaders {
    AppendHeaders([
        (HeaderName::from_static(SESSION_HEADER), token.to_string()),
        (
            header::SET_COOKIE,
            format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, token
            ),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use crate::models::AbsenceRecord;
    use crate::review::{Decision, DecisionOutcome};
    use crate::store::ResponseLedger;

    fn session() -> ReviewSession {
        let supervisors: BTreeSet<String> = ["JOAO".to_string()].into_iter().collect();
        let absences = vec![AbsenceRecord {
            employee_id: "1".to_string(),
            employee_name: "Ana".to_string(),
            supervisor: "JOAO".to_string(),
            date: "03/03/2025".to_string(),
            weekday: "Segunda".to_string(),
        }];
        ReviewSession::start("JOAO", &supervisors, absences, &[]).unwrap()
    }

    #[tokio::test]
    async fn test_create_get_set() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(session()).await;

        assert_eq!(store.get(&token).await, Some(session()));
        assert!(store.get("unknown").await.is_none());

        let empty = ReviewSession::start(
            "JOAO",
            &["JOAO".to_string()].into_iter().collect(),
            Vec::new(),
            &[],
        )
        .unwrap();
        store.set(&token, empty.clone()).await;
        assert_eq!(store.get(&token).await, Some(empty));
    }

    #[tokio::test]
    async fn test_expired_sessions_are_missing() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create(session()).await;

        assert!(store.get(&token).await.is_none());
        assert_eq!(store.purge_expired().await, 1);
    }

    #[tokio::test]
    async fn test_update_missing_or_expired_token() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create(session()).await;

        assert!(store.update(&token, |s| s.cursor()).await.is_none());
        assert!(store.update("unknown", |s| s.cursor()).await.is_none());
    }

    #[tokio::test]
    async fn test_repeated_submits_write_one_row() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let ledger = Arc::new(ResponseLedger::new(temp_dir.path().join("respostas.csv")));
        let store = Arc::new(SessionStore::new(Duration::from_secs(60)));
        let token = store.create(session()).await;
        let now = chrono::NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();

        let submits: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                let ledger = ledger.clone();
                let token = token.clone();
                tokio::spawn(async move {
                    store
                        .update(&token, |s| s.decide(Decision::Confirm, now, &ledger))
                        .await
                        .unwrap()
                        .unwrap()
                })
            })
            .collect();

        let mut recorded = 0;
        for submit in submits {
            match submit.await.unwrap() {
                DecisionOutcome::Recorded(_) => recorded += 1,
                outcome => assert_eq!(outcome, DecisionOutcome::AlreadyComplete),
            }
        }

        assert_eq!(recorded, 1);
        assert_eq!(ledger.load_all().unwrap().len(), 1);
        assert_eq!(store.get(&token).await.unwrap().cursor(), 1);
    }

    #[test]
    fn test_token_from_header_then_cookie() {
        let mut headers = HeaderMap::new();
        assert!(token_from_headers(&headers).is_none());

        headers.insert(
            header::COOKIE,
            "theme=dark; faltas_session=abc-123".parse().unwrap(),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc-123"));

        headers.insert(SESSION_HEADER, "from-header".parse().unwrap());
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-header"));
    }
}
