use serde::Serialize;

use crate::listing::filter::NEGOTIABLE;
use crate::models::cv::MatchedJob;
use crate::views::text::{or_fallback, truncate_chars, NOT_AVAILABLE};

pub const TOP_MATCHES: usize = 5;
pub const NO_MATCHES_TEXT: &str = "Không tìm thấy việc làm phù hợp";

const MATCHED_SKILLS_SHOWN: usize = 5;
const DESCRIPTION_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchClass {
    #[serde(rename = "match-excellent")]
    Excellent,
    #[serde(rename = "match-good")]
    Good,
    #[serde(rename = "match-fair")]
    Fair,
    #[serde(rename = "match-low")]
    Low,
}

impl MatchClass {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => MatchClass::Excellent,
            60..=79 => MatchClass::Good,
            40..=59 => MatchClass::Fair,
            _ => MatchClass::Low,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchCard {
    pub job_id: i64,
    /// 1-based rank for the top matches, absent for the rest.
    pub rank: Option<usize>,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub deadline: String,
    pub description: Option<String>,
    pub percentage: u32,
    pub class: MatchClass,
    /// Up to five skills, comma separated. Empty when none matched.
    pub matched_skills: String,
    /// Only carried on top matches.
    pub why_match: Option<String>,
}

impl MatchCard {
    fn new(job: &MatchedJob, rank: Option<usize>) -> Self {
        let percentage = match_percentage(job.match_score);
        Self {
            job_id: job.job_id,
            rank,
            title: or_fallback(job.job_title.as_deref(), "Không có tiêu đề"),
            company: or_fallback(job.company_name.as_deref(), "Công ty"),
            location: or_fallback(job.work_location.as_deref(), "Không xác định"),
            salary: or_fallback(job.salary.as_deref(), NEGOTIABLE),
            deadline: or_fallback(job.deadline.as_deref(), NOT_AVAILABLE),
            description: job
                .job_description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(|d| truncate_chars(d, DESCRIPTION_CHARS)),
            percentage,
            class: MatchClass::from_percentage(percentage),
            matched_skills: job
                .matched_skills
                .iter()
                .take(MATCHED_SKILLS_SHOWN)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            why_match: rank.and_then(|_| {
                job.why_match
                    .as_deref()
                    .filter(|w| !w.trim().is_empty())
                    .map(str::to_string)
            }),
        }
    }
}

/// `match_score` (0–1) as a rounded percentage.
pub fn match_percentage(score: f64) -> u32 {
    if !score.is_finite() {
        return 0;
    }
    (score * 100.0).round().clamp(0.0, u32::MAX as f64) as u32
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub top: Vec<MatchCard>,
    pub remaining: Vec<MatchCard>,
    pub empty_text: Option<&'static str>,
}

impl MatchView {
    /// Keeps the backend's ranking; the first five become the top list.
    pub fn new(jobs: &[MatchedJob]) -> Self {
        let split = jobs.len().min(TOP_MATCHES);
        let (top, remaining) = jobs.split_at(split);
        Self {
            top: top
                .iter()
                .enumerate()
                .map(|(i, job)| MatchCard::new(job, Some(i + 1)))
                .collect(),
            remaining: remaining.iter().map(|job| MatchCard::new(job, None)).collect(),
            empty_text: jobs.is_empty().then_some(NO_MATCHES_TEXT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_match(job_id: i64, score: f64) -> MatchedJob {
        MatchedJob {
            job_id,
            match_score: score,
            why_match: Some("Strong Rust background".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(match_percentage(0.876), 88);
        assert_eq!(match_percentage(0.0), 0);
        assert_eq!(match_percentage(1.0), 100);
        assert_eq!(match_percentage(-0.3), 0);
        assert_eq!(match_percentage(f64::NAN), 0);
    }

    #[test]
    fn test_match_class_boundaries() {
        assert_eq!(MatchClass::from_percentage(80), MatchClass::Excellent);
        assert_eq!(MatchClass::from_percentage(79), MatchClass::Good);
        assert_eq!(MatchClass::from_percentage(60), MatchClass::Good);
        assert_eq!(MatchClass::from_percentage(40), MatchClass::Fair);
        assert_eq!(MatchClass::from_percentage(39), MatchClass::Low);
    }

    #[test]
    fn test_top_five_split() {
        let jobs: Vec<MatchedJob> = (1..=8).map(|id| make_match(id, 0.9 - id as f64 * 0.05)).collect();
        let view = MatchView::new(&jobs);
        assert_eq!(view.top.len(), 5);
        assert_eq!(view.remaining.len(), 3);
        assert_eq!(view.top[0].rank, Some(1));
        assert_eq!(view.top[4].rank, Some(5));
        assert!(view.top[0].why_match.is_some());
        assert_eq!(view.remaining[0].job_id, 6);
        assert!(view.remaining[0].rank.is_none());
        assert!(view.remaining[0].why_match.is_none());
        assert!(view.empty_text.is_none());
    }

    #[test]
    fn test_fewer_than_five_and_empty() {
        let view = MatchView::new(&[make_match(1, 0.5)]);
        assert_eq!(view.top.len(), 1);
        assert!(view.remaining.is_empty());

        let view = MatchView::new(&[]);
        assert_eq!(view.empty_text, Some(NO_MATCHES_TEXT));
    }

    #[test]
    fn test_card_fallbacks_and_skills() {
        let job = MatchedJob {
            job_id: 4,
            match_score: 0.42,
            matched_skills: ["Rust", "Go", "SQL", "Docker", "K8s", "AWS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            job_description: Some("x".repeat(200)),
            ..Default::default()
        };
        let card = MatchCard::new(&job, None);
        assert_eq!(card.matched_skills, "Rust, Go, SQL, Docker, K8s");
        assert_eq!(card.location, "Không xác định");
        assert_eq!(card.salary, "Thỏa thuận");
        assert_eq!(card.deadline, "N/A");
        assert_eq!(card.class, MatchClass::Fair);
        assert_eq!(card.description.as_deref().map(|d| d.chars().count()), Some(153));
    }
}
