use serde::{Deserialize, Serialize};

use crate::models::job::JobRecord;

/// The negotiable salary sentinel as offered in the salary filter.
pub const NEGOTIABLE: &str = "Thỏa thuận";

/// Both diacritic placements seen in the data (ỏa / oả), lowercased.
const NEGOTIABLE_SPELLINGS: [&str; 2] = ["thỏa thuận", "thoả thuận"];

/// Active filter values. An empty string means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search: String,
    pub location: String,
    pub experience: String,
    pub salary: String,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.location.is_empty()
            && self.experience.is_empty()
            && self.salary.is_empty()
    }
}

/// Returns the records passing every active filter, in input order.
pub fn apply_filters<'a>(records: &'a [JobRecord], filters: &FilterState) -> Vec<&'a JobRecord> {
    if filters.is_empty() {
        return records.iter().collect();
    }
    let search = normalize_search(&filters.search);
    records
        .iter()
        .filter(|job| matches(job, filters, &search))
        .collect()
}

/// Lowercased, trimmed search term as typed into the search box.
pub fn normalize_search(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `search` must already be normalised with [`normalize_search`].
pub fn matches(job: &JobRecord, filters: &FilterState, search: &str) -> bool {
    if !search.is_empty() {
        let hit = [job.title(), job.company(), job.description()]
            .iter()
            .any(|field| field.to_lowercase().contains(search));
        if !hit {
            return false;
        }
    }

    // Flat substring match on the raw location text, not a city lookup.
    if !filters.location.is_empty() && !job.location().contains(&filters.location) {
        return false;
    }

    if !filters.experience.is_empty() && !job.experience_text().contains(&filters.experience) {
        return false;
    }

    if !filters.salary.is_empty() && !salary_matches(job.salary_text(), &filters.salary) {
        return false;
    }

    true
}

fn salary_matches(salary: &str, wanted: &str) -> bool {
    if is_negotiable_filter(wanted) {
        let salary = salary.to_lowercase();
        NEGOTIABLE_SPELLINGS.iter().any(|s| salary.contains(s))
    } else {
        salary.contains(wanted)
    }
}

/// Only the exact option value turns on sentinel matching. Any other text,
/// including the alternate spelling, is a plain substring filter.
fn is_negotiable_filter(wanted: &str) -> bool {
    wanted == NEGOTIABLE
}
