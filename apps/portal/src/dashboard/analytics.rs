use serde::Serialize;
use serde_json::{json, Value};

use crate::models::analytics::{Bucket, ChartInsightRequest, DeadlineStats, JobAnalytics};

/// Salary ranges shown in the salary chart and the top-salary table.
pub const SALARY_TOP_N: usize = 10;

pub const NO_ANALYSIS_TEXT: &str = "Không thể tạo phân tích.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Doughnut,
    Pie,
}

/// One distribution chart, ready for any charting library.
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub chart_type: &'static str,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
    /// Body to post to the insights endpoint when the user asks for analysis.
    pub insight_request: ChartInsightRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryRow {
    pub rank: usize,
    pub label: String,
    pub count: u64,
    /// Share of all jobs, one decimal ("12.5").
    pub percentage: String,
    /// Top three rows are highlighted.
    pub highlight: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsView {
    pub total_jobs: u64,
    pub charts: Vec<ChartView>,
    pub top_salaries: Vec<SalaryRow>,
    pub deadline_stats: DeadlineStats,
}

impl From<JobAnalytics> for AnalyticsView {
    fn from(analytics: JobAnalytics) -> Self {
        let salary_top: Vec<Bucket> = analytics
            .salary_distribution
            .iter()
            .take(SALARY_TOP_N)
            .cloned()
            .collect();

        let charts = vec![
            chart(
                "top_jobs",
                "title",
                ChartKind::Bar,
                &analytics.top_job_titles,
                &analytics.top_job_titles,
            ),
            chart(
                "top_companies",
                "company",
                ChartKind::Bar,
                &analytics.top_companies,
                &analytics.top_companies,
            ),
            chart(
                "location",
                "location",
                ChartKind::Doughnut,
                &analytics.location_distribution,
                &analytics.location_distribution,
            ),
            chart(
                "job_type",
                "type",
                ChartKind::Pie,
                &analytics.job_type_distribution,
                &analytics.job_type_distribution,
            ),
            chart(
                "experience",
                "experience",
                ChartKind::Bar,
                &analytics.experience_distribution,
                &analytics.experience_distribution,
            ),
            // Only the top ranges are drawn; analysis sees them all.
            chart(
                "salary",
                "salary",
                ChartKind::HorizontalBar,
                &salary_top,
                &analytics.salary_distribution,
            ),
        ];

        Self {
            total_jobs: analytics.total_jobs,
            top_salaries: salary_rows(&salary_top, analytics.total_jobs),
            charts,
            deadline_stats: analytics.deadline_stats,
        }
    }
}

fn chart(
    chart_type: &'static str,
    label_key: &str,
    kind: ChartKind,
    shown: &[Bucket],
    analysed: &[Bucket],
) -> ChartView {
    ChartView {
        chart_type,
        kind,
        labels: shown.iter().map(|b| b.label.clone()).collect(),
        counts: shown.iter().map(|b| b.count).collect(),
        insight_request: ChartInsightRequest {
            chart_type: chart_type.to_string(),
            data: buckets_as_backend_rows(label_key, analysed),
        },
    }
}

/// Re-keys buckets the way the backend named them (`{"title": .., "count": ..}`).
fn buckets_as_backend_rows(label_key: &str, buckets: &[Bucket]) -> Value {
    Value::Array(
        buckets
            .iter()
            .map(|b| {
                let mut row = serde_json::Map::new();
                row.insert(label_key.to_string(), json!(b.label));
                row.insert("count".to_string(), json!(b.count));
                Value::Object(row)
            })
            .collect(),
    )
}

pub fn salary_rows(buckets: &[Bucket], total_jobs: u64) -> Vec<SalaryRow> {
    buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| SalaryRow {
            rank: i + 1,
            label: bucket.label.clone(),
            count: bucket.count,
            percentage: percentage(bucket.count, total_jobs),
            highlight: i < 3,
        })
        .collect()
}

fn percentage(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", count as f64 / total as f64 * 100.0)
}
