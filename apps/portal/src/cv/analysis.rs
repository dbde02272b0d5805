use serde::Serialize;
use serde_json::Value;

use crate::models::cv::{
    CompletenessFlags, CvInfo, CvInsights, EducationItem, ExperienceItem, Improvement,
};
use crate::views::text::{or_fallback, NOT_AVAILABLE};

pub const NO_INFO_TEXT: &str = "Không có thông tin";
pub const NO_IMPROVEMENTS_TEXT: &str = "Không có gợi ý cải thiện";

const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
    Weak,
}

impl Rating {
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Rating::Excellent
        } else if score >= 7.0 {
            Rating::Good
        } else if score >= 5.0 {
            Rating::Average
        } else if score >= 3.0 {
            Rating::NeedsImprovement
        } else {
            Rating::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Xuất Sắc",
            Rating::Good => "Tốt",
            Rating::Average => "Trung Bình",
            Rating::NeedsImprovement => "Cần Cải Thiện",
            Rating::Weak => "Yếu",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Rating::Excellent => "🌟",
            Rating::Good => "✅",
            Rating::Average => "⚠️",
            Rating::NeedsImprovement => "⚡",
            Rating::Weak => "❌",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Rating::Excellent | Rating::Good => "#10b981",
            Rating::Average => "#f59e0b",
            Rating::NeedsImprovement | Rating::Weak => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreClass {
    #[serde(rename = "score-green")]
    Green,
    #[serde(rename = "score-yellow")]
    Yellow,
    #[serde(rename = "score-red")]
    Red,
}

impl ScoreClass {
    pub fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            ScoreClass::Green
        } else if score >= 5.0 {
            ScoreClass::Yellow
        } else {
            ScoreClass::Red
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    Quality,
    MarketFit,
    Completeness,
}

impl ScoreKind {
    /// One of three texts per kind: strong (≥7), middling (≥5), weak.
    pub fn explanation(self, score: f64) -> &'static str {
        let tier = match ScoreClass::from_score(score) {
            ScoreClass::Green => 0,
            ScoreClass::Yellow => 1,
            ScoreClass::Red => 2,
        };
        let texts: [&'static str; 3] = match self {
            ScoreKind::Quality => [
                "CV của bạn có chất lượng tốt với cấu trúc rõ ràng, nội dung chuyên nghiệp và trình bày đẹp mắt.",
                "CV của bạn ở mức trung bình. Cần cải thiện cấu trúc, nội dung và cách trình bày để tăng cơ hội được tuyển dụng.",
                "CV của bạn cần cải thiện đáng kể về cấu trúc, nội dung và trình bày để thu hút nhà tuyển dụng.",
            ],
            ScoreKind::MarketFit => [
                "Kỹ năng và kinh nghiệm của bạn rất phù hợp với nhu cầu thị trường hiện tại. Bạn có nhiều cơ hội việc làm.",
                "Kỹ năng của bạn khá phù hợp với thị trường. Nên bổ sung thêm kỹ năng hot để tăng cơ hội.",
                "Kỹ năng của bạn chưa thực sự phù hợp với nhu cầu thị trường. Nên học thêm các kỹ năng đang được tìm kiếm nhiều.",
            ],
            ScoreKind::Completeness => [
                "CV của bạn rất đầy đủ với tất cả thông tin cần thiết. Nhà tuyển dụng có thể đánh giá toàn diện năng lực của bạn.",
                "CV của bạn có đủ thông tin cơ bản nhưng còn thiếu một số phần quan trọng. Nên bổ sung để hoàn thiện hơn.",
                "CV của bạn thiếu nhiều thông tin quan trọng. Cần bổ sung đầy đủ để tăng cơ hội được xem xét.",
            ],
        };
        texts[tier]
    }
}

/// A 0–10 score with everything needed to draw its card.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreCard {
    pub score: f64,
    /// One decimal ("7.5").
    pub display: String,
    pub class: ScoreClass,
    pub rating: Rating,
    pub rating_label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub explanation: &'static str,
}

impl ScoreCard {
    pub fn new(kind: ScoreKind, score: f64) -> Self {
        let score = if score.is_finite() { score } else { 0.0 };
        let rating = Rating::from_score(score);
        Self {
            score,
            display: format!("{score:.1}"),
            class: ScoreClass::from_score(score),
            rating,
            rating_label: rating.label(),
            icon: rating.icon(),
            color: rating.color(),
            explanation: kind.explanation(score),
        }
    }
}

/// One point per filled part of the CV, capped at 10. Without CV info the
/// score is 0 whatever the backend flags say.
pub fn completeness_score(info: Option<&CvInfo>, flags: &CompletenessFlags) -> f64 {
    let Some(info) = info else {
        return 0.0;
    };

    let checks = [
        has_text(info.name.as_deref()),
        has_text(info.email.as_deref()),
        has_text(info.phone.as_deref()),
        has_text(info.career_objective.as_deref()),
        !info.skills.is_empty(),
        !info.experience.is_empty(),
        !info.education.is_empty(),
        flags.has_portfolio || has_value(info.portfolio.as_ref()),
        flags.has_certifications || has_value(info.certifications.as_ref()),
        flags.has_projects || has_value(info.projects.as_ref()),
    ];

    let points = checks.iter().filter(|present| **present).count() as f64;
    points.clamp(0.0, MAX_SCORE)
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Empty strings, arrays and objects count as absent.
fn has_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(Value::Number(_)) => true,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightsView {
    pub quality: ScoreCard,
    pub market_fit: ScoreCard,
    pub completeness: ScoreCard,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl InsightsView {
    pub fn new(insights: &CvInsights, info: Option<&CvInfo>) -> Self {
        Self {
            quality: ScoreCard::new(ScoreKind::Quality, insights.quality_score),
            market_fit: ScoreCard::new(
                ScoreKind::MarketFit,
                insights.market_fit.skill_match_rate * MAX_SCORE,
            ),
            completeness: ScoreCard::new(
                ScoreKind::Completeness,
                completeness_score(info, &insights.completeness),
            ),
            strengths: insights.strengths.clone(),
            weaknesses: insights.weaknesses.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceView {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: Option<String>,
}

impl From<&ExperienceItem> for ExperienceView {
    fn from(item: &ExperienceItem) -> Self {
        let title = item.position.as_deref().or(item.title.as_deref());
        let duration = date_span(item.start_date.as_deref(), item.end_date.as_deref())
            .or_else(|| first_text(&[item.duration.as_deref(), item.period.as_deref()]));
        Self {
            title: or_fallback(title, "Vị trí"),
            company: or_fallback(item.company.as_deref(), "Công ty"),
            duration: duration.unwrap_or_else(|| "Thời gian".to_string()),
            description: first_text(&[
                item.description.as_deref(),
                item.responsibilities.as_deref(),
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EducationView {
    pub degree: String,
    pub school: String,
    pub year: String,
    pub major: Option<String>,
}

impl From<&EducationItem> for EducationView {
    fn from(item: &EducationItem) -> Self {
        let degree = first_text(&[item.degree.as_deref(), item.major.as_deref()]);
        let school = first_text(&[item.school.as_deref(), item.university.as_deref()]);
        let year = date_span(item.start_date.as_deref(), item.end_date.as_deref())
            .or_else(|| first_text(&[item.year.as_deref(), item.period.as_deref()]));
        Self {
            degree: degree.unwrap_or_else(|| "Bằng cấp".to_string()),
            school: school.unwrap_or_else(|| "Trường".to_string()),
            year: year.unwrap_or_else(|| "Năm".to_string()),
            major: first_text(&[item.major.as_deref()]),
        }
    }
}

/// `start - end`, with `N/A` for a missing start and `Present` for a missing
/// end. `None` when neither date is known.
fn date_span(start: Option<&str>, end: Option<&str>) -> Option<String> {
    if !has_text(start) && !has_text(end) {
        return None;
    }
    Some(format!(
        "{} - {}",
        or_fallback(start, NOT_AVAILABLE),
        or_fallback(end, "Present")
    ))
}

fn first_text(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct CvInfoView {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub career_objective: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceView>,
    pub education: Vec<EducationView>,
}

impl From<&CvInfo> for CvInfoView {
    fn from(info: &CvInfo) -> Self {
        Self {
            name: or_fallback(info.name.as_deref(), NOT_AVAILABLE),
            email: or_fallback(info.email.as_deref(), NOT_AVAILABLE),
            phone: or_fallback(info.phone.as_deref(), NOT_AVAILABLE),
            career_objective: or_fallback(info.career_objective.as_deref(), NO_INFO_TEXT),
            skills: info.skills.clone(),
            experience: info.experience.iter().map(ExperienceView::from).collect(),
            education: info.education.iter().map(EducationView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Unknown or missing priorities are treated as medium.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|p| p.trim().to_lowercase()).as_deref() {
            Some("high") => Priority::High,
            Some("low") => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImprovementView {
    pub number: usize,
    pub section: String,
    pub priority: Priority,
    pub text: String,
    pub reason: Option<String>,
    pub impact: Option<String>,
}

pub fn improvement_views(improvements: &[Improvement]) -> Vec<ImprovementView> {
    improvements
        .iter()
        .enumerate()
        .map(|(i, imp)| ImprovementView {
            number: i + 1,
            section: or_fallback(imp.section.as_deref(), "Cải thiện"),
            priority: Priority::from_raw(imp.priority.as_deref()),
            text: or_fallback(imp.text(), NOT_AVAILABLE),
            reason: first_text(&[imp.reason.as_deref()]),
            impact: first_text(&[imp.impact.as_deref()]),
        })
        .collect()
}
