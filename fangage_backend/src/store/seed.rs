//! Demo seed data loaded into every fresh store. Mirrors the fixture set the
//! dashboard was designed around: two users, a published/scheduled/draft post
//! trio, a small media library, and a few audit entries.

use chrono::{DateTime, Duration, Utc};

use super::models::{
    LogOutcome, LogRecord, MediaKind, MediaRecord, PostRecord, PostStatus, UserRecord, UserRole,
};

pub fn seed_users() -> Vec<UserRecord> {
    vec![
        UserRecord {
            id: "u1".into(),
            email: "admin@fangage.com".into(),
            name: "Admin User".into(),
            role: UserRole::Admin,
            avatar_url: Some("https://picsum.photos/seed/admin/200/200".into()),
        },
        UserRecord {
            id: "u2".into(),
            email: "creator@fangage.com".into(),
            name: "Jane Creator".into(),
            role: UserRole::User,
            avatar_url: Some("https://picsum.photos/seed/jane/200/200".into()),
        },
    ]
}

pub fn seed_posts() -> Vec<PostRecord> {
    vec![
        PostRecord {
            id: "p1".into(),
            user_id: "u2".into(),
            title: "New Merch Drop!".into(),
            content: "Check out the new summer collection dropping this Friday. #summer #vibes"
                .into(),
            status: PostStatus::Published,
            scheduled_at: Some(days_ago(1)),
            tags: vec!["summer".into(), "merch".into()],
            media_urls: vec!["https://picsum.photos/seed/merch/800/600".into()],
            created_at: days_ago(2),
        },
        PostRecord {
            id: "p2".into(),
            user_id: "u2".into(),
            title: "Weekly Vlog Teaser".into(),
            content: "Editing the new vlog. It is going to be insane.".into(),
            status: PostStatus::Scheduled,
            scheduled_at: Some(days_ahead(1)),
            tags: vec!["vlog".into(), "bts".into()],
            media_urls: vec!["https://picsum.photos/seed/vlog/800/600".into()],
            created_at: Utc::now(),
        },
        PostRecord {
            id: "p3".into(),
            user_id: "u2".into(),
            title: "Draft Idea: Q&A".into(),
            content: "Thinking of doing a live Q&A next week. Leave questions below!".into(),
            status: PostStatus::Draft,
            scheduled_at: None,
            tags: vec!["qna".into(), "live".into()],
            media_urls: Vec::new(),
            created_at: Utc::now(),
        },
    ]
}

pub fn seed_media() -> Vec<MediaRecord> {
    vec![
        MediaRecord {
            id: "m1".into(),
            url: "https://picsum.photos/seed/1/400/400".into(),
            name: "img_001.jpg".into(),
            kind: MediaKind::Image,
            size: "2.4 MB".into(),
            uploaded_at: days_ago(26),
            mime: Some("image/jpeg".into()),
            data: None,
        },
        MediaRecord {
            id: "m2".into(),
            url: "https://picsum.photos/seed/2/400/400".into(),
            name: "img_002.jpg".into(),
            kind: MediaKind::Image,
            size: "1.8 MB".into(),
            uploaded_at: days_ago(25),
            mime: Some("image/jpeg".into()),
            data: None,
        },
        MediaRecord {
            id: "m3".into(),
            url: "https://picsum.photos/seed/3/400/400".into(),
            name: "video_teaser.mp4".into(),
            kind: MediaKind::Video,
            size: "15.2 MB".into(),
            uploaded_at: days_ago(22),
            mime: Some("video/mp4".into()),
            data: None,
        },
    ]
}

pub fn seed_logs() -> Vec<LogRecord> {
    vec![
        LogRecord {
            id: "l3".into(),
            action: "User Login".into(),
            outcome: LogOutcome::Success,
            details: "User u2 logged in.".into(),
            timestamp: Utc::now() - Duration::milliseconds(100_000),
        },
        LogRecord {
            id: "l2".into(),
            action: "Post Publish".into(),
            outcome: LogOutcome::Error,
            details: "Failed to publish Post #p4 due to API timeout.".into(),
            timestamp: Utc::now() - Duration::milliseconds(5_000_000),
        },
        LogRecord {
            id: "l1".into(),
            action: "System Backup".into(),
            outcome: LogOutcome::Success,
            details: "Database backup completed successfully.".into(),
            timestamp: Utc::now() - Duration::milliseconds(10_000_000),
        },
    ]
}

fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

fn days_ahead(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
