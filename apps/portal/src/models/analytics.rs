use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `{label, count}` pair. The backend names the label after the dimension
/// (`title`, `company`, `location`, ...), all of which are accepted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(
        default,
        alias = "title",
        alias = "company",
        alias = "location",
        alias = "type",
        alias = "experience",
        alias = "salary",
        alias = "skill"
    )]
    pub label: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeadlineStats {
    #[serde(default)]
    pub expiring_7_days: u64,
    #[serde(default)]
    pub expiring_30_days: u64,
    #[serde(default)]
    pub total_with_deadline: u64,
}

/// Body of `GET /jobs/analytics`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobAnalytics {
    #[serde(default)]
    pub total_jobs: u64,
    #[serde(default)]
    pub top_job_titles: Vec<Bucket>,
    #[serde(default)]
    pub top_companies: Vec<Bucket>,
    #[serde(default)]
    pub location_distribution: Vec<Bucket>,
    #[serde(default)]
    pub job_type_distribution: Vec<Bucket>,
    #[serde(default)]
    pub experience_distribution: Vec<Bucket>,
    #[serde(default)]
    pub salary_distribution: Vec<Bucket>,
    #[serde(default)]
    pub top_skills: Vec<Bucket>,
    #[serde(default)]
    pub deadline_stats: DeadlineStats,
}

/// Body sent to `POST /jobs/analytics/insights`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartInsightRequest {
    pub chart_type: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartInsight {
    #[serde(default)]
    pub analysis: Option<String>,
}
