use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{lenient_text, split_list};

/// A job posting as served by `GET /jobs` and `GET /jobs/{id}`.
///
/// Listing responses carry the summary columns; the detail endpoint fills in
/// the rest. Records are never mutated after they are fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_title: Option<String>,
    /// Company name. The backend calls this column `name`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Free text, usually `"region: city1;city2"` segments.
    #[serde(default, deserialize_with = "lenient_text")]
    pub work_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub work_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub skills: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_tags: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,

    // Detail fields
    #[serde(default, deserialize_with = "lenient_text")]
    pub candidate_requirements: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub benefits: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub number_of_hires: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company_logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company_scale: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company_field: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_url: Option<String>,
}

impl JobRecord {
    pub fn title(&self) -> &str {
        self.job_title.as_deref().unwrap_or("")
    }

    pub fn company(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn location(&self) -> &str {
        self.work_location.as_deref().unwrap_or("")
    }

    pub fn salary_text(&self) -> &str {
        self.salary.as_deref().unwrap_or("")
    }

    pub fn experience_text(&self) -> &str {
        self.experience.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.job_description.as_deref().unwrap_or("")
    }

    /// Recency key in epoch seconds. Numeric timestamps are used as-is, date
    /// and datetime strings are converted, anything else counts as 0.
    pub fn recency(&self) -> i64 {
        self.timestamp.as_deref().map(parse_recency).unwrap_or(0)
    }

    pub fn skill_list(&self) -> Vec<String> {
        self.skills.as_deref().map(split_list).unwrap_or_default()
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.job_tags.as_deref().map(split_list).unwrap_or_default()
    }
}

fn parse_recency(raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return n;
    }
    if let Ok(f) = raw.parse::<f64>() {
        return if f.is_finite() { f as i64 } else { 0 };
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp();
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return dt.and_utc().timestamp();
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

/// Body of `GET /jobs?limit=N`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobsPage {
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
    /// Number of jobs in the backend, independent of `limit`.
    #[serde(default)]
    pub total: Option<u64>,
}

impl JobsPage {
    pub fn reported_total(&self) -> u64 {
        self.total.unwrap_or(self.jobs.len() as u64)
    }
}
