//! Per-user conversation state and the in-memory session store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::step::FormKind;

/// Mutable state of one user's active form.
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub form: FormKind,
    /// Index into the form's step list.
    pub step: usize,
    /// Accepted answers keyed by step field name.
    pub answers: HashMap<&'static str, String>,
    /// Expected 4-digit confirmation code, set when the phone step is
    /// accepted. Never regenerated on a mismatch.
    pub confirm_code: Option<String>,
    last_activity: Instant,
}

impl ConversationState {
    pub fn new(form: FormKind) -> Self {
        Self {
            form,
            step: 0,
            answers: HashMap::new(),
            confirm_code: None,
            last_activity: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }
}

/// Decides whether an idle conversation should be dropped.
///
/// Injected into the store so abandonment cleanup can change without
/// touching the flow engine.
pub trait EvictionPolicy: Send + Sync {
    fn is_expired(&self, idle: Duration) -> bool;
}

/// Default policy: state lives until the process restarts.
pub struct NeverExpire;

impl EvictionPolicy for NeverExpire {
    fn is_expired(&self, _idle: Duration) -> bool {
        false
    }
}

/// Drop conversations idle for longer than the given duration.
pub struct IdleTimeout(pub Duration);

impl EvictionPolicy for IdleTimeout {
    fn is_expired(&self, idle: Duration) -> bool {
        idle > self.0
    }
}

/// In-memory store of active conversations, keyed by Telegram user id.
pub struct SessionStore {
    sessions: RwLock<HashMap<i64, ConversationState>>,
    policy: Box<dyn EvictionPolicy>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_policy(Box::new(NeverExpire))
    }

    pub fn with_policy(policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// Get a user's active conversation, if any. An expired conversation
    /// is removed and reported as absent.
    pub async fn get(&self, user_id: i64) -> Option<ConversationState> {
        let expired = {
            let sessions = self.sessions.read().await;
            let state = sessions.get(&user_id)?;
            self.policy.is_expired(state.idle_for())
        };
        if expired {
            self.sessions.write().await.remove(&user_id);
            tracing::debug!(user_id, "Evicted expired conversation on access");
            return None;
        }
        self.sessions.read().await.get(&user_id).cloned()
    }

    /// Store a user's conversation, replacing any prior form in progress.
    pub async fn put(&self, user_id: i64, mut state: ConversationState) {
        state.touch();
        self.sessions.write().await.insert(user_id, state);
    }

    /// Drop a user's conversation unconditionally.
    pub async fn clear(&self, user_id: i64) {
        self.sessions.write().await.remove(&user_id);
    }

    /// Remove all expired conversations. Returns how many were dropped.
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, state| !self.policy.is_expired(state.idle_for()));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a periodic sweep of expired conversations.
pub fn spawn_sweep_task(store: Arc<SessionStore>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let dropped = store.sweep().await;
            if dropped > 0 {
                tracing::info!(dropped, "Swept abandoned conversations");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_clear() {
        let store = SessionStore::new();
        assert!(store.get(1).await.is_none());

        store.put(1, ConversationState::new(FormKind::Quiz)).await;
        let state = store.get(1).await.unwrap();
        assert_eq!(state.form, FormKind::Quiz);
        assert_eq!(state.step, 0);

        store.clear(1).await;
        assert!(store.get(1).await.is_none());
    }

    #[tokio::test]
    async fn put_replaces_prior_form() {
        let store = SessionStore::new();
        let mut consult = ConversationState::new(FormKind::Consult);
        consult.answers.insert("name", "Alice".into());
        consult.step = 1;
        store.put(7, consult).await;

        store.put(7, ConversationState::new(FormKind::Quiz)).await;
        let state = store.get(7).await.unwrap();
        assert_eq!(state.form, FormKind::Quiz);
        assert_eq!(state.step, 0);
        assert!(state.answers.is_empty());
    }

    #[tokio::test]
    async fn states_are_isolated_per_user() {
        let store = SessionStore::new();
        store.put(1, ConversationState::new(FormKind::Consult)).await;
        store.put(2, ConversationState::new(FormKind::Quiz)).await;

        assert_eq!(store.get(1).await.unwrap().form, FormKind::Consult);
        assert_eq!(store.get(2).await.unwrap().form, FormKind::Quiz);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn never_expire_keeps_state() {
        let store = SessionStore::new();
        store.put(1, ConversationState::new(FormKind::Consult)).await;
        assert_eq!(store.sweep().await, 0);
        assert!(store.get(1).await.is_some());
    }

    #[tokio::test]
    async fn zero_idle_timeout_evicts_on_access() {
        let store = SessionStore::with_policy(Box::new(IdleTimeout(Duration::ZERO)));
        store.put(1, ConversationState::new(FormKind::Consult)).await;
        // Any elapsed time exceeds a zero TTL.
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(store.get(1).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn sweep_drops_only_expired() {
        let store = SessionStore::with_policy(Box::new(IdleTimeout(Duration::from_millis(20))));
        store.put(1, ConversationState::new(FormKind::Consult)).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        store.put(2, ConversationState::new(FormKind::Quiz)).await;

        assert_eq!(store.sweep().await, 1);
        assert!(store.get(2).await.is_some());
    }
}
