use crate::logs::LogService;
use crate::store::models::{LogOutcome, PostRecord, PostStatus};
use crate::store::ContentStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostService {
    store: ContentStore,
    logs: LogService,
}

impl PostService {
    pub fn new(store: ContentStore, logs: LogService) -> Self {
        Self { store, logs }
    }

    pub fn list_posts(&self) -> Result<Vec<PostView>> {
        self.store.with_state(|state| {
            state
                .posts()
                .iter()
                .cloned()
                .map(PostView::from_record)
                .collect()
        })
    }

    pub fn get_post(&self, id: &str) -> Result<Option<PostView>> {
        self.store
            .with_state(|state| state.post_by_id(id).cloned().map(PostView::from_record))
    }

    /// A post is Scheduled only when the input carries BOTH a date and a
    /// time; anything less stays a Draft. The author defaults to the session
    /// user, then to the seed creator account.
    pub fn create_post(&self, input: CreatePostInput) -> Result<PostView> {
        if input.title.trim().is_empty() {
            anyhow::bail!("post title may not be empty");
        }

        let scheduled_at = match (input.schedule_date, input.schedule_time) {
            (Some(date), Some(time)) => Some(Utc.from_utc_datetime(&date.and_time(time))),
            _ => None,
        };
        let status = if scheduled_at.is_some() {
            PostStatus::Scheduled
        } else {
            PostStatus::Draft
        };

        let user_id = match input.user_id {
            Some(id) => id,
            None => self
                .store
                .with_state(|state| {
                    state
                        .session()
                        .user
                        .as_ref()
                        .map(|user| user.id.clone())
                        .or_else(|| state.default_user().map(|user| user.id.clone()))
                })?
                .context("user roster is empty")?,
        };

        let record = PostRecord {
            id: Uuid::new_v4().to_string(),
            user_id,
            title: input.title,
            content: input.content,
            status,
            scheduled_at,
            tags: input.tags,
            media_urls: input.media_urls,
            created_at: Utc::now(),
        };
        let view = PostView::from_record(record.clone());
        self.store.with_state_mut(|state| state.insert_post(record))?;
        self.logs.append(
            "Create Post",
            LogOutcome::Success,
            format!("Created post: {}", view.title),
        )?;
        Ok(view)
    }

    /// Full replacement of the stored post. `created_at` survives from the
    /// original record and a missing `user_id` keeps the stored author.
    /// Updates are silent: no audit entry, unlike create.
    pub fn update_post(&self, id: &str, input: UpdatePostInput) -> Result<Option<PostView>> {
        if input.title.trim().is_empty() {
            anyhow::bail!("post title may not be empty");
        }
        self.store.with_state_mut(move |state| {
            let (created_at, stored_user_id) = match state.post_by_id(id) {
                Some(existing) => (existing.created_at, existing.user_id.clone()),
                None => return None,
            };
            let record = PostRecord {
                id: id.to_string(),
                user_id: input.user_id.unwrap_or(stored_user_id),
                title: input.title,
                content: input.content,
                status: input.status,
                scheduled_at: input.scheduled_at,
                tags: input.tags,
                media_urls: input.media_urls,
                created_at,
            };
            let view = PostView::from_record(record.clone());
            state.replace_post(record);
            Some(view)
        })
    }

    /// Removes the post when present; deleting an unknown id is a silent
    /// no-op. Returns whether anything was removed.
    pub fn delete_post(&self, id: &str) -> Result<bool> {
        self.store.with_state_mut(|state| state.remove_post(id))
    }

    pub fn status_counts(&self) -> Result<PostStats> {
        self.store.with_state(|state| {
            let mut stats = PostStats::default();
            for post in state.posts() {
                match post.status {
                    PostStatus::Scheduled => stats.scheduled += 1,
                    PostStatus::Published => stats.published += 1,
                    PostStatus::Draft => stats.drafts += 1,
                    PostStatus::Failed => stats.failed += 1,
                }
            }
            stats
        })
    }

    /// Scheduled posts only, soonest first.
    pub fn upcoming(&self, limit: usize) -> Result<Vec<PostView>> {
        self.store.with_state(|state| {
            let mut posts: Vec<PostRecord> = state
                .posts()
                .iter()
                .filter(|post| post.status == PostStatus::Scheduled)
                .cloned()
                .collect();
            posts.sort_by_key(|post| post.scheduled_at.unwrap_or(DateTime::UNIX_EPOCH));
            posts
                .into_iter()
                .take(limit)
                .map(PostView::from_record)
                .collect()
        })
    }

    /// The schedule table: Scheduled and Published posts ordered by their
    /// scheduled time, with missing timestamps sorting to the front.
    pub fn schedule_entries(&self) -> Result<Vec<PostView>> {
        self.store.with_state(|state| {
            let mut posts: Vec<PostRecord> = state
                .posts()
                .iter()
                .filter(|post| {
                    matches!(post.status, PostStatus::Scheduled | PostStatus::Published)
                })
                .cloned()
                .collect();
            posts.sort_by_key(|post| post.scheduled_at.unwrap_or(DateTime::UNIX_EPOCH));
            posts.into_iter().map(PostView::from_record).collect()
        })
    }

    /// Posts created per day over the last seven days, oldest day first,
    /// labeled with the short weekday name.
    pub fn weekly_activity(&self) -> Result<Vec<DayActivity>> {
        self.store.with_state(|state| {
            let today = Utc::now().date_naive();
            (0..7i64)
                .rev()
                .map(|offset| {
                    let day = today - Duration::days(offset);
                    let posts = state
                        .posts()
                        .iter()
                        .filter(|post| post.created_at.date_naive() == day)
                        .count();
                    DayActivity {
                        day: day.format("%a").to_string(),
                        posts,
                    }
                })
                .collect()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub media_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub schedule_date: Option<NaiveDate>,
    #[serde(default)]
    pub schedule_time: Option<NaiveTime>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostInput {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub status: PostStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PostStats {
    pub scheduled: usize,
    pub published: usize,
    pub drafts: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayActivity {
    pub day: String,
    pub posts: usize,
}

impl PostView {
    fn from_record(record: PostRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            content: record.content,
            status: record.status,
            scheduled_at: record.scheduled_at,
            tags: record.tags,
            media_urls: record.media_urls,
            created_at: record.created_at,
        }
    }
}
