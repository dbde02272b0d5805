use serde::Serialize;

use crate::listing::filter::NEGOTIABLE;
use crate::models::job::JobRecord;
use crate::views::text::{or_fallback, truncate_chars, NOT_AVAILABLE};

const UNKNOWN_LOCATION: &str = "Không xác định";
const DEFAULT_WORK_TYPE: &str = "Full time";
const NO_EXPERIENCE_REQUIRED: &str = "Không yêu cầu";

const SHORT_LOCATION_CHARS: usize = 40;
const SHORT_DESCRIPTION_CHARS: usize = 150;

/// A job as shown in grids, lists and the homepage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobCard {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub company_logo: Option<String>,
    pub location: String,
    pub short_location: String,
    pub work_type: String,
    pub experience: String,
    pub salary: String,
    pub short_description: String,
    pub deadline: String,
}

impl From<&JobRecord> for JobCard {
    fn from(job: &JobRecord) -> Self {
        let location = or_fallback(job.work_location.as_deref(), UNKNOWN_LOCATION);
        Self {
            id: job.id,
            title: or_fallback(job.job_title.as_deref(), NOT_AVAILABLE),
            company: or_fallback(job.name.as_deref(), NOT_AVAILABLE),
            company_logo: job.company_logo.clone().filter(|s| !s.trim().is_empty()),
            short_location: short_location(&location),
            location,
            work_type: or_fallback(job.work_type.as_deref(), DEFAULT_WORK_TYPE),
            experience: or_fallback(job.experience.as_deref(), NO_EXPERIENCE_REQUIRED),
            salary: or_fallback(job.salary.as_deref(), NEGOTIABLE),
            short_description: truncate_chars(job.description(), SHORT_DESCRIPTION_CHARS),
            deadline: or_fallback(job.deadline.as_deref(), NOT_AVAILABLE),
        }
    }
}

/// First city of a `"region: city1;city2"` location, cut to 40 characters.
/// Locations without a `:` are kept whole before cutting.
pub fn short_location(location: &str) -> String {
    let first = match location.split_once(':') {
        Some((cities, _)) => cities.split(';').next().unwrap_or(cities).trim(),
        None => location,
    };
    truncate_chars(first, SHORT_LOCATION_CHARS)
}

/// The job detail page.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetailView {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub company_logo: Option<String>,
    pub location: String,
    pub salary: String,
    pub experience: String,
    pub deadline: String,
    pub level: String,
    pub number_of_hires: String,
    pub education: String,
    pub work_type: String,
    pub description: Option<String>,
    pub candidate_requirements: Option<String>,
    pub benefits: Option<String>,
    pub company_scale: String,
    pub company_field: String,
    pub company_address: String,
    pub company_url: Option<String>,
    pub job_url: Option<String>,
    pub skills: Vec<String>,
    pub tags: Vec<String>,
}

impl From<&JobRecord> for JobDetailView {
    fn from(job: &JobRecord) -> Self {
        let na = |value: &Option<String>| or_fallback(value.as_deref(), NOT_AVAILABLE);
        let present = |value: &Option<String>| value.clone().filter(|s| !s.trim().is_empty());

        Self {
            id: job.id,
            title: na(&job.job_title),
            company: na(&job.name),
            company_logo: present(&job.company_logo),
            location: na(&job.work_location),
            salary: or_fallback(job.salary.as_deref(), NEGOTIABLE),
            experience: na(&job.experience),
            deadline: na(&job.deadline),
            level: na(&job.level),
            number_of_hires: na(&job.number_of_hires),
            education: na(&job.education),
            work_type: na(&job.work_type),
            description: present(&job.job_description),
            candidate_requirements: present(&job.candidate_requirements),
            benefits: present(&job.benefits),
            company_scale: na(&job.company_scale),
            company_field: na(&job.company_field),
            company_address: na(&job.company_address),
            company_url: present(&job.company_url),
            job_url: present(&job.job_url),
            skills: job.skill_list(),
            tags: job.tag_list(),
        }
    }
}
