//! Admin dashboard: headline statistics, analytics charts, and the CV, job
//! and application tables. Every section loads on its own.

pub mod analytics;
pub mod stats;
pub mod tables;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;

use crate::dashboard::analytics::{AnalyticsView, NO_ANALYSIS_TEXT};
use crate::dashboard::stats::{fetch_applications, DashboardStats};
use crate::dashboard::tables::{application_rows, ApplicationRow, CvRow, JobRow};
use crate::errors::AppError;
use crate::gateway::JobSource;
use crate::models::analytics::ChartInsightRequest;
use crate::state::AppState;
use crate::views::Section;

pub const LATEST_JOBS: usize = 10;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub analytics: Section<AnalyticsView>,
    pub cvs: Section<Vec<CvRow>>,
    pub jobs: Section<Vec<JobRow>>,
    pub applications: Section<Vec<ApplicationRow>>,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub analysis: String,
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let gateway = &state.gateway;
    let (cvs, total, jobs, analytics) = tokio::join!(
        gateway.list_cvs(),
        gateway.list_jobs(1),
        gateway.list_jobs(LATEST_JOBS),
        gateway.job_analytics(),
    );

    // The headline numbers degrade to zero rather than failing.
    let total_jobs = match &total {
        Ok(page) => page.reported_total(),
        Err(e) => {
            warn!("Failed to load job total: {e}");
            0
        }
    };

    let (stats, applications) = match &cvs {
        Ok(cvs) => {
            let ids: Vec<i64> = cvs.iter().map(|cv| cv.id).collect();
            let per_cv = fetch_applications(
                state.applications.clone(),
                &ids,
                state.config.stats_concurrency,
            )
            .await;
            (
                DashboardStats::new(cvs.len(), total_jobs, &per_cv),
                Section::Ready {
                    data: application_rows(cvs, &per_cv),
                },
            )
        }
        Err(e) => (
            DashboardStats::new(0, total_jobs, &[]),
            Section::Failed {
                message: e.to_string(),
            },
        ),
    };

    Json(DashboardView {
        stats,
        analytics: Section::from_result("job analytics", analytics).map(AnalyticsView::from),
        cvs: Section::from_result("CVs", cvs).map(|cvs| cvs.iter().map(CvRow::from).collect()),
        jobs: Section::from_result("latest jobs", jobs)
            .map(|page| page.jobs.iter().map(JobRow::from).collect()),
        applications,
    })
}

/// POST /api/v1/dashboard/insights
pub async fn handle_chart_insights(
    State(state): State<AppState>,
    Json(req): Json<ChartInsightRequest>,
) -> Result<Json<InsightResponse>, AppError> {
    let insight = state.gateway.chart_insights(&req).await?;
    let analysis = insight
        .analysis
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| NO_ANALYSIS_TEXT.to_string());
    Ok(Json(InsightResponse { analysis }))
}
