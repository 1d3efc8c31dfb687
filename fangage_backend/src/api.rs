use crate::caption::{CaptionClient, DEFAULT_TONE};
use crate::config::FangageConfig;
use crate::logs::{LogEntryView, LogService};
use crate::media::{MediaService, MediaUpload, MediaView};
use crate::posts::{
    CreatePostInput, DayActivity, PostService, PostStats, PostView, UpdatePostInput,
};
use crate::sessions::{SessionService, SessionView, UserView};
use crate::store::models::UserRole;
use crate::store::ContentStore;
use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: FangageConfig,
    pub store: ContentStore,
    pub captions: CaptionClient,
}

/// Tries to bind to the given port, or finds the next available port
async fn find_available_port(start_port: u16) -> Result<(TcpListener, u16)> {
    const MAX_PORT_ATTEMPTS: u16 = 100;

    for offset in 0..MAX_PORT_ATTEMPTS {
        let port = start_port + offset;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok((listener, port)),
            Err(e) => {
                if offset == 0 {
                    tracing::debug!(port, error = %e, "Port in use, trying next port");
                }
                continue;
            }
        }
    }

    anyhow::bail!(
        "Could not find available port in range {}-{}",
        start_port,
        start_port + MAX_PORT_ATTEMPTS - 1
    )
}

pub async fn serve_http(config: FangageConfig, store: ContentStore) -> Result<()> {
    let http_client = reqwest::Client::builder()
        .user_agent("Fangage/0.1.0")
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .context("failed to build shared HTTP client")?;
    let captions = CaptionClient::new(config.caption.clone(), http_client);

    let state = AppState {
        config: config.clone(),
        store,
        captions,
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/session", get(current_session))
        .route("/session/login", post(login))
        .route("/session/logout", post(logout))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/stats", get(post_stats))
        .route("/posts/upcoming", get(upcoming_posts))
        .route("/posts/schedule", get(schedule_posts))
        .route("/posts/activity", get(weekly_activity))
        .route(
            "/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/media", get(list_media).post(upload_media))
        .route("/media/:id/raw", get(raw_media))
        .route("/captions", post(generate_caption))
        .route("/admin/users", get(admin_users))
        .route("/admin/logs", get(admin_logs))
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024)) // 50MB limit for uploads
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state.clone());

    // Try to bind to the configured port, or find the next available port
    let (listener, actual_port) = find_available_port(config.api_port).await?;
    let addr = SocketAddr::from(([0, 0, 0, 0], actual_port));

    if actual_port != config.api_port {
        tracing::warn!(
            requested_port = config.api_port,
            actual_port = actual_port,
            "Configured port was in use, bound to next available port"
        );
    }

    tracing::info!(?addr, "HTTP server listening");
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    let service = SessionService::new(state.store.clone(), LogService::new(state.store.clone()));
    let session = service.current_session()?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        api_port: state.config.api_port,
        authenticated: session.authenticated,
    }))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<SessionView> {
    tokio::time::sleep(state.config.simulated_latency).await;

    // The address decides the seat: anything mentioning admin gets the
    // admin account, everything else the creator account.
    let role = if payload.email.contains("admin") {
        UserRole::Admin
    } else {
        UserRole::User
    };

    let service = SessionService::new(state.store.clone(), LogService::new(state.store.clone()));
    let session = service.authenticate(&payload.email, role)?;
    Ok(Json(session))
}

async fn logout(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let service = SessionService::new(state.store.clone(), LogService::new(state.store.clone()));
    service.end_session()?;
    Ok(StatusCode::OK)
}

async fn current_session(State(state): State<AppState>) -> ApiResult<SessionView> {
    let service = SessionService::new(state.store.clone(), LogService::new(state.store.clone()));
    Ok(Json(service.current_session()?))
}

async fn list_posts(State(state): State<AppState>) -> ApiResult<Vec<PostView>> {
    let service = PostService::new(state.store.clone(), LogService::new(state.store.clone()));
    Ok(Json(service.list_posts()?))
}

async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostInput>,
) -> Result<(StatusCode, Json<PostView>), ApiError> {
    tokio::time::sleep(state.config.simulated_latency).await;

    let service = PostService::new(state.store.clone(), LogService::new(state.store.clone()));
    match service.create_post(payload) {
        Ok(post) => Ok((StatusCode::CREATED, Json(post))),
        Err(err) if err.to_string().contains("may not be empty") => {
            Err(ApiError::BadRequest(err.to_string()))
        }
        Err(err) => Err(ApiError::Internal(err)),
    }
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PostView> {
    let service = PostService::new(state.store.clone(), LogService::new(state.store.clone()));
    match service.get_post(&id)? {
        Some(post) => Ok(Json(post)),
        None => Err(ApiError::NotFound(format!("post {id} not found"))),
    }
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePostInput>,
) -> ApiResult<PostView> {
    let service = PostService::new(state.store.clone(), LogService::new(state.store.clone()));
    match service.update_post(&id, payload) {
        Ok(Some(post)) => Ok(Json(post)),
        Ok(None) => Err(ApiError::NotFound(format!("post {id} not found"))),
        Err(err) if err.to_string().contains("may not be empty") => {
            Err(ApiError::BadRequest(err.to_string()))
        }
        Err(err) => Err(ApiError::Internal(err)),
    }
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let service = PostService::new(state.store.clone(), LogService::new(state.store.clone()));
    // Deleting an unknown id is a silent no-op, so this always answers 200.
    service.delete_post(&id)?;
    Ok(StatusCode::OK)
}

async fn post_stats(State(state): State<AppState>) -> ApiResult<PostStats> {
    let service = PostService::new(state.store.clone(), LogService::new(state.store.clone()));
    Ok(Json(service.status_counts()?))
}

async fn upcoming_posts(
    State(state): State<AppState>,
    Query(params): Query<UpcomingParams>,
) -> ApiResult<Vec<PostView>> {
    let service = PostService::new(state.store.clone(), LogService::new(state.store.clone()));
    let limit = params.limit.unwrap_or(3).min(50);
    Ok(Json(service.upcoming(limit)?))
}

async fn schedule_posts(State(state): State<AppState>) -> ApiResult<Vec<PostView>> {
    let service = PostService::new(state.store.clone(), LogService::new(state.store.clone()));
    Ok(Json(service.schedule_entries()?))
}

async fn weekly_activity(State(state): State<AppState>) -> ApiResult<Vec<DayActivity>> {
    let service = PostService::new(state.store.clone(), LogService::new(state.store.clone()));
    Ok(Json(service.weekly_activity()?))
}

async fn list_media(State(state): State<AppState>) -> ApiResult<Vec<MediaView>> {
    let service = MediaService::new(state.store.clone());
    Ok(Json(service.list_media()?))
}

async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MediaView>), ApiError> {
    let service = MediaService::new(state.store.clone());
    let mut file_bytes = None;
    let mut filename = None;
    let mut mime = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Internal(anyhow::Error::new(err)))?
    {
        if let Some(name) = field.name() {
            if name == "file" {
                filename = field.file_name().map(|s| s.to_string());
                mime = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::Internal(anyhow::Error::new(err)))?;
                file_bytes = Some(bytes);
                break;
            }
        }
    }

    let data = file_bytes.ok_or_else(|| ApiError::BadRequest("missing file field".into()))?;
    match service.register_media(MediaUpload {
        name: filename,
        mime,
        data,
    }) {
        Ok(view) => Ok((StatusCode::CREATED, Json(view))),
        Err(err) if err.to_string().contains("may not be empty") => {
            Err(ApiError::BadRequest(err.to_string()))
        }
        Err(err) => Err(ApiError::Internal(err)),
    }
}

async fn raw_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let service = MediaService::new(state.store.clone());
    let Some(content) = service.open_media(&id)? else {
        return Err(ApiError::NotFound(format!("media {id} not found")));
    };

    let mut response = Response::new(Body::from(content.data));
    if let Ok(value) = HeaderValue::from_str(&content.mime) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    Ok(response)
}

async fn generate_caption(
    State(state): State<AppState>,
    Json(payload): Json<CaptionRequest>,
) -> Json<CaptionResponse> {
    let tone = payload.tone.unwrap_or_else(|| DEFAULT_TONE.to_string());
    let caption = state.captions.generate(&payload.topic, &tone).await;
    Json(CaptionResponse { caption })
}

async fn admin_users(State(state): State<AppState>) -> ApiResult<Vec<UserView>> {
    require_admin(&state)?;
    let service = SessionService::new(state.store.clone(), LogService::new(state.store.clone()));
    Ok(Json(service.list_users()?))
}

async fn admin_logs(State(state): State<AppState>) -> ApiResult<Vec<LogEntryView>> {
    require_admin(&state)?;
    let service = LogService::new(state.store.clone());
    Ok(Json(service.recent()?))
}

/// Admin routes check the stored session role and nothing else.
fn require_admin(state: &AppState) -> Result<(), ApiError> {
    let service = SessionService::new(state.store.clone(), LogService::new(state.store.clone()));
    let session = service.current_session().map_err(ApiError::Internal)?;
    if !session.authenticated {
        return Err(ApiError::Unauthorized("login required".into()));
    }
    match session.user {
        Some(user) if user.role == UserRole::Admin => Ok(()),
        _ => Err(ApiError::Forbidden("admin role required".into())),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    api_port: u16,
    authenticated: bool,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    /// Accepted and ignored; no credential verification happens.
    #[serde(rename = "password", default)]
    _password: String,
}

#[derive(Debug, Deserialize)]
struct UpcomingParams {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct CaptionRequest {
    topic: String,
    #[serde(default)]
    tone: Option<String>,
}

#[derive(Debug, Serialize)]
struct CaptionResponse {
    caption: String,
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl ApiError {
    fn into_response_parts(self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse { message: msg }),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse { message: msg })
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse { message: msg }),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse { message: msg }),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: "internal server error".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_response_parts();
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}
