use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::catalog::location_options;
use crate::errors::AppError;
use crate::listing::engine::{ListingSnapshot, ListingState};
use crate::listing::filter::FilterState;
use crate::listing::page::ListingLayout;
use crate::listing::session::SessionInput;
use crate::listing::sort::SortMode;
use crate::state::AppState;
use crate::views::jobs::JobDetailView;
use crate::views::listing::ListingView;

/// Query string of `GET /api/v1/jobs`. Fields are spelled out rather than
/// flattened so numbers parse from the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub search: String,
    pub location: String,
    pub experience: String,
    pub salary: String,
    pub sort: SortMode,
    pub page: Option<usize>,
    pub view: ListingLayout,
}

impl ListingQuery {
    fn state(self) -> ListingState {
        ListingState {
            filters: FilterState {
                search: self.search,
                location: self.location,
                experience: self.experience,
                salary: self.salary,
            },
            sort: self.sort,
            page: self.page.unwrap_or(1),
        }
    }
}

#[derive(Serialize)]
pub struct JobsResponse {
    #[serde(flatten)]
    pub view: ListingView,
    /// Jobs the backend holds, which can exceed the loaded collection.
    pub reported_total: u64,
    pub load_error: Option<String>,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub loaded: usize,
    pub reported_total: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSessionRequest {
    pub view: ListingLayout,
    pub state: Option<ListingState>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub view: ListingView,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<JobsResponse>, AppError> {
    let data = state.catalog.data().await;
    let page_size = query.view.page_size();
    let snapshot = ListingSnapshot::compute(&data.records, query.state(), page_size);

    Ok(Json(JobsResponse {
        view: ListingView::new(&snapshot, location_options(&data.records)),
        reported_total: data.reported_total,
        load_error: data.load_error,
    }))
}

/// POST /api/v1/jobs/reload
pub async fn handle_reload_jobs(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let records = state
        .catalog
        .reload(&state.gateway, state.config.catalog_limit)
        .await?;
    state.sessions.broadcast(records.clone()).await;

    let data = state.catalog.data().await;
    info!("Catalog reloaded with {} jobs", records.len());
    Ok(Json(ReloadResponse {
        loaded: records.len(),
        reported_total: data.reported_total,
    }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobDetailView>, AppError> {
    let job = state.gateway.get_job(id).await?;
    Ok(Json(JobDetailView::from(&job)))
}

/// POST /api/v1/listing/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let (session_id, snapshot) = state
        .sessions
        .create(
            state.catalog.records(),
            req.view.page_size(),
            req.state.unwrap_or_default(),
            debounce(&state),
        )
        .await;

    info!(
        "Opened listing session {session_id} ({} live)",
        state.sessions.count().await
    );
    Ok((
        StatusCode::CREATED,
        Json(session_response(&state, session_id, &snapshot).await),
    ))
}

/// GET /api/v1/listing/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    Ok(Json(session_response(&state, id, &snapshot).await))
}

/// POST /api/v1/listing/sessions/:id/input
pub async fn handle_session_input(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SessionInput>,
) -> Result<Json<SessionResponse>, AppError> {
    let snapshot = state.sessions.send(id, input).await?;
    Ok(Json(session_response(&state, id, &snapshot).await))
}

/// DELETE /api/v1/listing/sessions/:id
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        info!("Closed listing session {id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Listing session {id} not found")))
    }
}

async fn session_response(
    state: &AppState,
    session_id: Uuid,
    snapshot: &ListingSnapshot,
) -> SessionResponse {
    SessionResponse {
        session_id,
        view: ListingView::new(snapshot, state.catalog.location_options().await),
    }
}

fn debounce(state: &AppState) -> Duration {
    Duration::from_millis(state.config.search_debounce_ms)
}
