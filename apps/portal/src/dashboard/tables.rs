use serde::Serialize;

use crate::dashboard::stats::CvApplications;
use crate::listing::filter::NEGOTIABLE;
use crate::models::cv::{Application, CvRecord};
use crate::models::job::JobRecord;
use crate::views::text::{format_date, or_fallback, truncate_chars, NOT_AVAILABLE};

const TABLE_SKILLS: usize = 3;
const TABLE_LOCATION_CHARS: usize = 30;

#[derive(Debug, Clone, Serialize)]
pub struct CvRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// First three skills, `...` when there are more.
    pub skills: String,
    /// Every skill, for the cell tooltip.
    pub all_skills: String,
    pub uploaded_at: String,
}

impl From<&CvRecord> for CvRow {
    fn from(cv: &CvRecord) -> Self {
        let info = cv.cv_info.clone().unwrap_or_default();
        let mut skills = info
            .skills
            .iter()
            .take(TABLE_SKILLS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if info.skills.len() > TABLE_SKILLS {
            skills.push_str("...");
        }

        Self {
            id: cv.id,
            name: or_fallback(info.name.as_deref(), NOT_AVAILABLE),
            email: or_fallback(info.email.as_deref(), NOT_AVAILABLE),
            phone: or_fallback(info.phone.as_deref(), NOT_AVAILABLE),
            skills: if skills.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                skills
            },
            all_skills: info.skills.join(", "),
            uploaded_at: format_date(cv.upload_timestamp.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub short_location: String,
    pub salary: String,
    pub experience: String,
    pub deadline: String,
}

impl From<&JobRecord> for JobRow {
    fn from(job: &JobRecord) -> Self {
        let location = or_fallback(job.work_location.as_deref(), NOT_AVAILABLE);
        Self {
            id: job.id,
            title: or_fallback(job.job_title.as_deref(), NOT_AVAILABLE),
            company: or_fallback(job.name.as_deref(), NOT_AVAILABLE),
            short_location: truncate_chars(&location, TABLE_LOCATION_CHARS),
            location,
            salary: or_fallback(job.salary.as_deref(), NEGOTIABLE),
            experience: or_fallback(job.experience.as_deref(), NOT_AVAILABLE),
            deadline: or_fallback(job.deadline.as_deref(), NOT_AVAILABLE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Anything other than `pending` or `approved` is shown as rejected.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("pending") => ApplicationStatus::Pending,
            Some("approved") => ApplicationStatus::Approved,
            _ => ApplicationStatus::Rejected,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Đang chờ",
            ApplicationStatus::Approved => "Chấp nhận",
            ApplicationStatus::Rejected => "Từ chối",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationRow {
    pub id: i64,
    pub cv_id: i64,
    pub candidate: String,
    pub job_title: String,
    pub company: String,
    pub status: ApplicationStatus,
    pub status_label: &'static str,
    pub applied_at: String,
}

impl ApplicationRow {
    fn new(app: &Application, cv_id: i64, candidate: Option<&str>) -> Self {
        let status = ApplicationStatus::from_raw(app.status.as_deref());
        Self {
            id: app.id,
            cv_id,
            candidate: or_fallback(candidate, NOT_AVAILABLE),
            job_title: or_fallback(app.job_title.as_deref(), NOT_AVAILABLE),
            company: or_fallback(app.company_name.as_deref(), NOT_AVAILABLE),
            status,
            status_label: status.label(),
            applied_at: format_date(app.applied_at.as_deref()),
        }
    }
}

/// Every application, in CV order, joined with the owning CV's candidate name.
pub fn application_rows(cvs: &[CvRecord], per_cv: &[CvApplications]) -> Vec<ApplicationRow> {
    per_cv
        .iter()
        .flat_map(|entry| {
            let candidate = cvs
                .iter()
                .find(|cv| cv.id == entry.cv_id)
                .and_then(|cv| cv.cv_info.as_ref())
                .and_then(|info| info.name.as_deref());
            entry
                .applications
                .iter()
                .map(move |app| ApplicationRow::new(app, entry.cv_id, candidate))
        })
        .collect()
}
