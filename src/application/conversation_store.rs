//! ConversationStore - per-user, per-mode bounded turn history.
//!
//! Histories live in memory only. The map is behind a read-write lock and
//! each (user, mode) history has its own mutex, so appends to one key are
//! serialized while different keys proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::command::ConversationMode;
use crate::domain::conversation::{BoundedHistory, ConversationTurn, MAX_HISTORY_LENGTH};
use crate::domain::foundation::UserId;
use crate::ports::Message;

type HistoryKey = (UserId, ConversationMode);

/// Owner of all conversation histories.
#[derive(Debug)]
pub struct ConversationStore {
    histories: RwLock<HashMap<HistoryKey, Arc<Mutex<BoundedHistory>>>>,
    capacity: usize,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_LENGTH)
    }

    /// Creates a store whose histories hold at most `capacity` turns.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            histories: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    async fn history(&self, key: &HistoryKey) -> Option<Arc<Mutex<BoundedHistory>>> {
        self.histories.read().await.get(key).cloned()
    }

    async fn history_or_create(&self, key: HistoryKey) -> Arc<Mutex<BoundedHistory>> {
        if let Some(history) = self.history(&key).await {
            return history;
        }
        let capacity = self.capacity;
        self.histories
            .write()
            .await
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(BoundedHistory::new(capacity))))
            .clone()
    }

    /// Appends a turn, trimming the history to capacity.
    pub async fn append_turn(&self, user_id: &UserId, mode: ConversationMode, turn: ConversationTurn) {
        let history = self.history_or_create((user_id.clone(), mode)).await;
        history.lock().await.push(turn);
    }

    /// System prompt (when given) followed by the stored history.
    ///
    /// Read-only: two calls without an append in between return equal prompts.
    pub async fn build_prompt(
        &self,
        user_id: &UserId,
        mode: ConversationMode,
        system_prompt: Option<&str>,
    ) -> Vec<Message> {
        let mut prompt: Vec<Message> = system_prompt.map(Message::system).into_iter().collect();

        if let Some(history) = self.history(&(user_id.clone(), mode)).await {
            prompt.extend(history.lock().await.iter().map(Message::from));
        }

        prompt
    }

    /// Drops the history for one (user, mode).
    pub async fn clear(&self, user_id: &UserId, mode: ConversationMode) {
        self.histories.write().await.remove(&(user_id.clone(), mode));
    }

    /// Copy of the stored turns.
    pub async fn turns(&self, user_id: &UserId, mode: ConversationMode) -> Vec<ConversationTurn> {
        match self.history(&(user_id.clone(), mode)).await {
            Some(history) => history.lock().await.iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Number of stored turns.
    pub async fn len(&self, user_id: &UserId, mode: ConversationMode) -> usize {
        match self.history(&(user_id.clone(), mode)).await {
            Some(history) => history.lock().await.len(),
            None => 0,
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::TUTOR_SYSTEM_PROMPT;
    use crate::ports::MessageRole;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn sixty_appends_leave_newest_fifty() {
        let store = ConversationStore::new();
        let alice = user("alice");

        for i in 0..60 {
            store
                .append_turn(&alice, ConversationMode::Tutor, ConversationTurn::user_text(format!("q{}", i)))
                .await;
        }

        let turns = store.turns(&alice, ConversationMode::Tutor).await;
        assert_eq!(turns.len(), 50);
        assert_eq!(turns[0].text(), "q10");
        assert_eq!(turns[49].text(), "q59");
    }

    #[tokio::test]
    async fn prompt_is_system_then_capped_history() {
        let store = ConversationStore::with_capacity(3);
        let alice = user("alice");
        for i in 0..5 {
            store
                .append_turn(&alice, ConversationMode::Tutor, ConversationTurn::user_text(i.to_string()))
                .await;
        }

        let prompt = store
            .build_prompt(&alice, ConversationMode::Tutor, Some(TUTOR_SYSTEM_PROMPT))
            .await;

        assert_eq!(prompt.len(), 4);
        assert_eq!(prompt[0].role, MessageRole::System);
        let texts: Vec<String> = prompt[1..].iter().filter_map(Message::plain_text).collect();
        assert_eq!(texts, vec!["2", "3", "4"]);
    }

    #[tokio::test]
    async fn build_prompt_is_idempotent() {
        let store = ConversationStore::new();
        let alice = user("alice");
        store
            .append_turn(&alice, ConversationMode::Standard, ConversationTurn::user_text("hi"))
            .await;
        store
            .append_turn(&alice, ConversationMode::Standard, ConversationTurn::assistant("hello"))
            .await;

        let first = store.build_prompt(&alice, ConversationMode::Standard, None).await;
        let second = store.build_prompt(&alice, ConversationMode::Standard, None).await;
        assert_eq!(first, second);
        assert_eq!(store.len(&alice, ConversationMode::Standard).await, 2);
    }

    #[tokio::test]
    async fn histories_are_isolated_by_user_and_mode() {
        let store = ConversationStore::new();
        let alice = user("alice");
        let bob = user("bob");

        store
            .append_turn(&alice, ConversationMode::Tutor, ConversationTurn::user_text("a-tutor"))
            .await;
        store
            .append_turn(&alice, ConversationMode::Standard, ConversationTurn::user_text("a-std"))
            .await;
        store
            .append_turn(&bob, ConversationMode::Tutor, ConversationTurn::user_text("b-tutor"))
            .await;

        let texts = |turns: Vec<ConversationTurn>| turns.iter().map(|t| t.text()).collect::<Vec<_>>();
        assert_eq!(texts(store.turns(&alice, ConversationMode::Tutor).await), vec!["a-tutor"]);
        assert_eq!(texts(store.turns(&alice, ConversationMode::Standard).await), vec!["a-std"]);
        assert_eq!(texts(store.turns(&bob, ConversationMode::Tutor).await), vec!["b-tutor"]);
        assert!(store.turns(&bob, ConversationMode::Standard).await.is_empty());
    }

    #[tokio::test]
    async fn clear_drops_only_one_key() {
        let store = ConversationStore::new();
        let alice = user("alice");
        store
            .append_turn(&alice, ConversationMode::Tutor, ConversationTurn::user_text("t"))
            .await;
        store
            .append_turn(&alice, ConversationMode::Standard, ConversationTurn::user_text("s"))
            .await;

        store.clear(&alice, ConversationMode::Tutor).await;

        assert_eq!(store.len(&alice, ConversationMode::Tutor).await, 0);
        assert_eq!(store.len(&alice, ConversationMode::Standard).await, 1);
        assert!(store
            .build_prompt(&alice, ConversationMode::Tutor, None)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn concurrent_appends_to_one_key_are_all_kept() {
        let store = Arc::new(ConversationStore::new());
        let alice = user("alice");

        let tasks: Vec<_> = (0..40)
            .map(|i| {
                let store = store.clone();
                let alice = alice.clone();
                tokio::spawn(async move {
                    store
                        .append_turn(&alice, ConversationMode::Tutor, ConversationTurn::user_text(i.to_string()))
                        .await;
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.len(&alice, ConversationMode::Tutor).await, 40);
    }
}
