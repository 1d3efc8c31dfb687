use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutcome {
    Success,
    Error,
    Warning,
}

/// Immutable seed data; the running system never creates users.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostRecord {
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

/// Uploaded media keeps its bytes in memory; the `url` is only valid for the
/// lifetime of the process. Seeded items reference external URLs and carry
/// no bytes.
#[derive(Debug, Clone)]
pub struct MediaRecord {
    pub id: String,
    pub url: String,
    pub name: String,
    pub kind: MediaKind,
    pub size: String,
    pub uploaded_at: DateTime<Utc>,
    pub mime: Option<String>,
    pub data: Option<Bytes>,
}

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub id: String,
    pub action: String,
    pub outcome: LogOutcome,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

/// The single global session. There is no multi-session support.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<UserRecord>,
    pub authenticated: bool,
    pub token: Option<String>,
}
