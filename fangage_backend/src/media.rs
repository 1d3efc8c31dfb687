use crate::store::models::{MediaKind, MediaRecord};
use crate::store::ContentStore;
use anyhow::{anyhow, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

#[derive(Clone)]
pub struct MediaService {
    store: ContentStore,
}

impl MediaService {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    /// Keeps the upload in memory and hands back a transient URL under
    /// `/media/{id}/raw`. Nothing touches disk; the reference dies with the
    /// process. Kind comes from the declared MIME type, not the bytes.
    pub fn register_media(&self, input: MediaUpload) -> Result<MediaView> {
        if input.data.is_empty() {
            return Err(anyhow!("file data may not be empty"));
        }

        let id = Uuid::new_v4().to_string();
        let name = input
            .name
            .as_deref()
            .map(sanitize_filename)
            .unwrap_or_else(|| "upload".to_string());
        let kind = match input.mime.as_deref() {
            Some(mime) if mime.starts_with("video") => MediaKind::Video,
            _ => MediaKind::Image,
        };
        let record = MediaRecord {
            id: id.clone(),
            url: format!("/media/{id}/raw"),
            name,
            kind,
            size: format_size_label(input.data.len()),
            uploaded_at: Utc::now(),
            mime: input.mime,
            data: Some(input.data),
        };
        let view = MediaView::from_record(&record);
        self.store
            .with_state_mut(|state| state.insert_media(record))?;
        Ok(view)
    }

    pub fn list_media(&self) -> Result<Vec<MediaView>> {
        self.store.with_state(|state| {
            state.media().iter().map(MediaView::from_record).collect()
        })
    }

    /// Bytes and declared MIME for serving the raw upload. Seed items carry
    /// external URLs and no bytes, so they come back as `None` too.
    pub fn open_media(&self, id: &str) -> Result<Option<MediaContent>> {
        self.store.with_state(|state| {
            state.media_by_id(id).and_then(|item| {
                item.data.clone().map(|data| MediaContent {
                    mime: item
                        .mime
                        .clone()
                        .unwrap_or_else(|| "application/octet-stream".into()),
                    data,
                })
            })
        })
    }
}

#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub name: Option<String>,
    pub mime: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaView {
    pub id: String,
    pub url: String,
    pub name: String,
    pub kind: MediaKind,
    pub size: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MediaContent {
    pub mime: String,
    pub data: Bytes,
}

impl MediaView {
    fn from_record(record: &MediaRecord) -> Self {
        Self {
            id: record.id.clone(),
            url: record.url.clone(),
            name: record.name.clone(),
            kind: record.kind,
            size: record.size.clone(),
            uploaded_at: record.uploaded_at,
        }
    }
}

fn format_size_label(bytes: usize) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|file| file.to_str())
        .unwrap_or("upload")
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_service() -> MediaService {
        MediaService::new(ContentStore::with_seed_data())
    }

    fn upload(name: &str, mime: &str, data: &'static [u8]) -> MediaUpload {
        MediaUpload {
            name: Some(name.into()),
            mime: Some(mime.into()),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn kind_follows_the_declared_mime() {
        let service = setup_service();
        let video = service
            .register_media(upload("clip.mp4", "video/mp4", b"mp4 bytes"))
            .expect("register video");
        assert_eq!(video.kind, MediaKind::Video);

        let image = service
            .register_media(upload("pic.png", "image/png", b"png bytes"))
            .expect("register image");
        assert_eq!(image.kind, MediaKind::Image);

        let untyped = service
            .register_media(MediaUpload {
                name: Some("blob".into()),
                mime: None,
                data: Bytes::from_static(b"bytes"),
            })
            .expect("register untyped");
        assert_eq!(untyped.kind, MediaKind::Image);
    }

    #[test]
    fn size_label_is_megabytes_with_two_decimals() {
        assert_eq!(format_size_label(1024 * 1024), "1.00 MB");
        assert_eq!(format_size_label(1536 * 1024), "1.50 MB");
        assert_eq!(format_size_label(512), "0.00 MB");
    }

    #[test]
    fn empty_uploads_are_rejected() {
        let service = setup_service();
        let err = service
            .register_media(MediaUpload {
                name: Some("empty.png".into()),
                mime: Some("image/png".into()),
                data: Bytes::new(),
            })
            .expect_err("reject empty upload");
        assert!(err.to_string().contains("may not be empty"));
    }

    #[test]
    fn uploads_are_listed_newest_first() {
        let service = setup_service();
        service
            .register_media(upload("first.png", "image/png", b"one"))
            .expect("register");
        let second = service
            .register_media(upload("second.png", "image/png", b"two"))
            .expect("register");

        let media = service.list_media().expect("list media");
        assert_eq!(media[0].id, second.id);
        assert_eq!(media.len(), 5);
    }

    #[test]
    fn url_points_at_the_raw_endpoint() {
        let service = setup_service();
        let view = service
            .register_media(upload("pic.png", "image/png", b"png"))
            .expect("register");
        assert_eq!(view.url, format!("/media/{}/raw", view.id));
    }

    #[test]
    fn open_media_returns_bytes_with_the_declared_mime() {
        let service = setup_service();
        let view = service
            .register_media(upload("pic.png", "image/png", b"the pixels"))
            .expect("register");

        let content = service
            .open_media(&view.id)
            .expect("open media")
            .expect("content exists");
        assert_eq!(content.mime, "image/png");
        assert_eq!(content.data.as_ref(), b"the pixels");
    }

    #[test]
    fn seed_items_and_unknown_ids_have_no_raw_bytes() {
        let service = setup_service();
        assert!(service.open_media("m1").expect("open media").is_none());
        assert!(service.open_media("nope").expect("open media").is_none());
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("../../evil name!.png"), "evil_name_.png");
        assert_eq!(sanitize_filename("ok-file_01.jpg"), "ok-file_01.jpg");
    }
}
