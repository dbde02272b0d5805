use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::cv::analysis::{
    improvement_views, CvInfoView, ImprovementView, InsightsView, NO_IMPROVEMENTS_TEXT,
};
use crate::cv::matching::MatchView;
use crate::errors::AppError;
use crate::gateway::GatewayError;
use crate::models::cv::{CvInsights, CvRecord, ImprovementsResponse, MatchRequest};
use crate::state::AppState;
use crate::views::text::format_date;
use crate::views::Section;

const PDF_MIME: &str = "application/pdf";
pub const PDF_ONLY_TEXT: &str = "Vui lòng chỉ upload file PDF";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub cv_id: i64,
    pub filename: Option<String>,
    pub cv_info: Option<CvInfoView>,
}

#[derive(Debug, Serialize)]
pub struct ImprovementsView {
    pub items: Vec<ImprovementView>,
    pub empty_text: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CvAnalysisView {
    pub cv_id: i64,
    pub filename: Option<String>,
    pub uploaded_at: String,
    pub info: Option<CvInfoView>,
    pub insights: Section<InsightsView>,
    pub improvements: Section<ImprovementsView>,
}

impl CvAnalysisView {
    /// Insights and improvements fail independently of each other and of the
    /// CV record itself.
    pub fn new(
        cv: &CvRecord,
        insights: Result<CvInsights, GatewayError>,
        improvements: Result<ImprovementsResponse, GatewayError>,
    ) -> Self {
        let info = cv.cv_info.as_ref();
        Self {
            cv_id: cv.id,
            filename: cv.filename.clone(),
            uploaded_at: format_date(cv.upload_timestamp.as_deref()),
            info: info.map(CvInfoView::from),
            insights: Section::from_result("CV insights", insights)
                .map(|insights| InsightsView::new(&insights, info)),
            improvements: Section::from_result("CV improvements", improvements).map(|resp| {
                let items = improvement_views(&resp.improvements);
                ImprovementsView {
                    empty_text: items.is_empty().then_some(NO_IMPROVEMENTS_TEXT),
                    items,
                }
            }),
        }
    }
}

/// Accepts a declared PDF content type or a `.pdf` file name.
pub fn is_pdf(filename: &str, content_type: Option<&str>) -> bool {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().eq_ignore_ascii_case(PDF_MIME))
        .unwrap_or(false);
    let by_extension = FsPath::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    declared || by_extension
}

/// POST /api/v1/cvs
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("cv.pdf").to_string();
        if !is_pdf(&filename, field.content_type()) {
            return Err(AppError::Validation(PDF_ONLY_TEXT.to_string()));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    info!("Uploading CV '{}' ({} bytes)", filename, data.len());
    let uploaded = state
        .gateway
        .upload_cv(&filename, PDF_MIME, data)
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;
    info!("CV uploaded with id {}", uploaded.cv_id);

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            cv_id: uploaded.cv_id,
            filename: uploaded.filename,
            cv_info: uploaded.cv_info.as_ref().map(CvInfoView::from),
        }),
    ))
}

/// GET /api/v1/cvs/:id
pub async fn handle_cv_analysis(
    State(state): State<AppState>,
    Path(cv_id): Path<i64>,
) -> Result<Json<CvAnalysisView>, AppError> {
    let gateway = &state.gateway;
    let cv = gateway
        .list_cvs()
        .await?
        .into_iter()
        .find(|cv| cv.id == cv_id)
        .ok_or_else(|| AppError::NotFound(format!("CV {cv_id} not found")))?;

    let (insights, improvements) =
        tokio::join!(gateway.cv_insights(cv_id), gateway.improve_cv(cv_id));

    Ok(Json(CvAnalysisView::new(&cv, insights, improvements)))
}

/// POST /api/v1/cvs/:id/matches
pub async fn handle_cv_matches(
    State(state): State<AppState>,
    Path(cv_id): Path<i64>,
) -> Result<Json<MatchView>, AppError> {
    let request = MatchRequest {
        cv_id,
        filters: serde_json::Map::new(),
        model: state.config.match_model.clone(),
    };
    let response = state.gateway.match_jobs(&request).await?;
    if response.matched_jobs.is_empty() {
        warn!("No matching jobs for CV {cv_id}");
    }
    Ok(Json(MatchView::new(&response.matched_jobs)))
}

/// GET /api/v1/cvs/:id/document
pub async fn handle_cv_document(
    State(state): State<AppState>,
    Path(cv_id): Path<i64>,
) -> Result<Response, AppError> {
    let document = state.gateway.preview_document(cv_id).await?;
    Ok(([(header::CONTENT_TYPE, document.content_type)], document.bytes).into_response())
}
