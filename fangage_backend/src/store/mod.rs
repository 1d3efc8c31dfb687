pub mod models;
pub mod seed;

use anyhow::{anyhow, Result};
use std::sync::{Arc, RwLock};

use models::{LogRecord, MediaRecord, PostRecord, SessionState, UserRecord};

/// The second seed user doubles as the demo account when an operation needs a
/// user and no session is active.
const DEFAULT_USER_INDEX: usize = 1;

/// Everything the dashboard serves lives in this struct. Nothing is persisted;
/// a restart brings the store back to its seeded shape.
#[derive(Debug, Default)]
pub struct StoreState {
    users: Vec<UserRecord>,
    posts: Vec<PostRecord>,
    media: Vec<MediaRecord>,
    logs: Vec<LogRecord>,
    session: SessionState,
}

impl StoreState {
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn default_user(&self) -> Option<&UserRecord> {
        self.users.get(DEFAULT_USER_INDEX)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn replace_session(&mut self, session: SessionState) {
        self.session = session;
    }

    pub fn clear_session(&mut self) {
        self.session = SessionState::default();
    }

    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    pub fn post_by_id(&self, id: &str) -> Option<&PostRecord> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Newest entries sit at the front of the list.
    pub fn insert_post(&mut self, post: PostRecord) {
        self.posts.insert(0, post);
    }

    /// Swaps the stored post with the same id in place, keeping list order.
    /// Returns false when no post carries that id.
    pub fn replace_post(&mut self, post: PostRecord) -> bool {
        match self.posts.iter_mut().find(|slot| slot.id == post.id) {
            Some(slot) => {
                *slot = post;
                true
            }
            None => false,
        }
    }

    pub fn remove_post(&mut self, id: &str) -> bool {
        let before = self.posts.len();
        self.posts.retain(|post| post.id != id);
        self.posts.len() != before
    }

    pub fn media(&self) -> &[MediaRecord] {
        &self.media
    }

    pub fn media_by_id(&self, id: &str) -> Option<&MediaRecord> {
        self.media.iter().find(|item| item.id == id)
    }

    pub fn insert_media(&mut self, item: MediaRecord) {
        self.media.insert(0, item);
    }

    pub fn logs(&self) -> &[LogRecord] {
        &self.logs
    }

    pub fn push_log(&mut self, entry: LogRecord) {
        self.logs.insert(0, entry);
    }
}

#[derive(Clone, Default)]
pub struct ContentStore {
    state: Arc<RwLock<StoreState>>,
}

impl ContentStore {
    /// A store with no users, posts, media, or logs.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store loaded with the demo fixtures every fresh server starts from.
    pub fn with_seed_data() -> Self {
        let state = StoreState {
            users: seed::seed_users(),
            posts: seed::seed_posts(),
            media: seed::seed_media(),
            logs: seed::seed_logs(),
            session: SessionState::default(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn with_state<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StoreState) -> T,
    {
        let guard = self
            .state
            .read()
            .map_err(|_| anyhow!("content store lock poisoned"))?;
        Ok(f(&guard))
    }

    pub fn with_state_mut<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreState) -> T,
    {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow!("content store lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

#[cfg(test)]
mod tests {
    use super::models::{PostRecord, PostStatus};
    use super::*;
    use chrono::Utc;

    fn sample_post(id: &str) -> PostRecord {
        PostRecord {
            id: id.into(),
            user_id: "u2".into(),
            title: format!("Post {id}"),
            content: "body".into(),
            status: PostStatus::Draft,
            scheduled_at: None,
            tags: Vec::new(),
            media_urls: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn seeded_store_has_demo_fixtures() {
        let store = ContentStore::with_seed_data();
        store
            .with_state(|state| {
                assert_eq!(state.users().len(), 2);
                assert_eq!(state.posts().len(), 3);
                assert_eq!(state.media().len(), 3);
                assert_eq!(state.logs().len(), 3);
                assert!(!state.session().authenticated);
            })
            .expect("read state");
    }

    #[test]
    fn default_user_is_the_creator_seed() {
        let store = ContentStore::with_seed_data();
        let email = store
            .with_state(|state| state.default_user().map(|user| user.email.clone()))
            .expect("read state");
        assert_eq!(email.as_deref(), Some("creator@fangage.com"));
    }

    #[test]
    fn inserts_prepend_newest_first() {
        let store = ContentStore::empty();
        store
            .with_state_mut(|state| {
                state.insert_post(sample_post("a"));
                state.insert_post(sample_post("b"));
            })
            .expect("write state");
        let ids = store
            .with_state(|state| {
                state
                    .posts()
                    .iter()
                    .map(|post| post.id.clone())
                    .collect::<Vec<_>>()
            })
            .expect("read state");
        assert_eq!(ids, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn replace_post_keeps_position() {
        let store = ContentStore::empty();
        store
            .with_state_mut(|state| {
                state.insert_post(sample_post("a"));
                state.insert_post(sample_post("b"));
                let mut updated = sample_post("a");
                updated.title = "Renamed".into();
                assert!(state.replace_post(updated));
            })
            .expect("write state");
        store
            .with_state(|state| {
                assert_eq!(state.posts()[1].id, "a");
                assert_eq!(state.posts()[1].title, "Renamed");
            })
            .expect("read state");
    }

    #[test]
    fn replace_and_remove_miss_on_unknown_id() {
        let store = ContentStore::empty();
        store
            .with_state_mut(|state| {
                assert!(!state.replace_post(sample_post("ghost")));
                assert!(!state.remove_post("ghost"));
            })
            .expect("write state");
    }

    #[test]
    fn remove_post_drops_only_the_target() {
        let store = ContentStore::empty();
        store
            .with_state_mut(|state| {
                state.insert_post(sample_post("a"));
                state.insert_post(sample_post("b"));
                assert!(state.remove_post("a"));
                assert_eq!(state.posts().len(), 1);
                assert_eq!(state.posts()[0].id, "b");
            })
            .expect("write state");
    }
}
