use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{lenient_list, lenient_text};

/// One entry of `GET /cvs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub upload_timestamp: Option<String>,
    #[serde(default)]
    pub cv_info: Option<CvInfo>,
}

/// Structured CV content extracted by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvInfo {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub career_objective: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(default)]
    pub education: Vec<EducationItem>,
    #[serde(default)]
    pub portfolio: Option<Value>,
    #[serde(default)]
    pub certifications: Option<Value>,
    #[serde(default)]
    pub projects: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub responsibilities: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub school: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub university: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub major: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub period: Option<String>,
}

/// Body of `POST /upload-cv`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedCv {
    pub cv_id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub filename: Option<String>,
    #[serde(default)]
    pub cv_info: Option<CvInfo>,
}

/// Body of `GET /cv/{id}/insights`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CvInsights {
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default)]
    pub market_fit: MarketFit,
    #[serde(default)]
    pub completeness: CompletenessFlags,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketFit {
    /// 0.0 – 1.0
    #[serde(default)]
    pub skill_match_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletenessFlags {
    #[serde(default)]
    pub has_portfolio: bool,
    #[serde(default)]
    pub has_certifications: bool,
    #[serde(default)]
    pub has_projects: bool,
}

/// One suggestion from `POST /cv/improve`. Older backends send the text as
/// `improvement` instead of `suggestion`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Improvement {
    #[serde(default, deserialize_with = "lenient_text")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub suggestion: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub improvement: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub impact: Option<String>,
}

impl Improvement {
    pub fn text(&self) -> Option<&str> {
        self.suggestion
            .as_deref()
            .or(self.improvement.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImprovementsResponse {
    #[serde(default)]
    pub improvements: Vec<Improvement>,
}

/// Body sent to `POST /match`.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRequest {
    pub cv_id: i64,
    pub filters: serde_json::Map<String, Value>,
    pub model: String,
}

/// One ranked job from `POST /match`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchedJob {
    pub job_id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company_name: Option<String>,
    /// 0.0 – 1.0
    #[serde(default)]
    pub match_score: f64,
    #[serde(default, deserialize_with = "lenient_list")]
    pub matched_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub why_match: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub work_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub matched_jobs: Vec<MatchedJob>,
}

/// One row of `GET /applications/{cv_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub applied_at: Option<String>,
}

/// `GET /applications/{cv_id}` has shipped both as a bare array and wrapped in
/// an envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApplicationsPayload {
    List(Vec<Application>),
    Envelope {
        #[serde(default)]
        applications: Vec<Application>,
    },
}

impl ApplicationsPayload {
    pub fn into_vec(self) -> Vec<Application> {
        match self {
            ApplicationsPayload::List(apps) => apps,
            ApplicationsPayload::Envelope { applications } => applications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_applications_bare_array() {
        let payload: ApplicationsPayload =
            serde_json::from_value(json!([{ "id": 1, "status": "pending" }])).unwrap();
        assert_eq!(payload.into_vec().len(), 1);
    }

    #[test]
    fn test_applications_envelope() {
        let payload: ApplicationsPayload = serde_json::from_value(json!({
            "cv_id": 4,
            "total": 2,
            "applications": [{ "id": 1 }, { "id": 2, "job_title": "QA" }]
        }))
        .unwrap();
        let apps = payload.into_vec();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[1].job_title.as_deref(), Some("QA"));
    }

    #[test]
    fn test_improvement_text_prefers_suggestion() {
        let imp: Improvement = serde_json::from_value(json!({
            "section": "skills",
            "suggestion": "Add Docker",
            "improvement": "ignored"
        }))
        .unwrap();
        assert_eq!(imp.text(), Some("Add Docker"));

        let imp: Improvement =
            serde_json::from_value(json!({ "improvement": "Quantify results" })).unwrap();
        assert_eq!(imp.text(), Some("Quantify results"));
    }

    #[test]
    fn test_insights_defaults_when_fields_missing() {
        let insights: CvInsights = serde_json::from_value(json!({ "quality_score": 6.5 })).unwrap();
        assert_eq!(insights.quality_score, 6.5);
        assert_eq!(insights.market_fit.skill_match_rate, 0.0);
        assert!(!insights.completeness.has_projects);
        assert!(insights.strengths.is_empty());
    }

    #[test]
    fn test_cv_info_skills_accept_string() {
        let cv: CvRecord = serde_json::from_value(json!({
            "id": 3,
            "filename": "cv.pdf",
            "cv_info": { "name": "Lan", "skills": "Rust, Go" }
        }))
        .unwrap();
        let info = cv.cv_info.unwrap();
        assert_eq!(info.skills, vec!["Rust", "Go"]);
        assert!(info.experience.is_empty());
    }
}
