use std::cmp::Reverse;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::job::JobRecord;

static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("valid salary number regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    SalaryHigh,
    SalaryLow,
}

/// First contiguous run of ASCII digits in a salary text, or 0 when there is
/// none. "15-20 triệu" yields 15; "Thỏa thuận" yields 0. Runs too long for a
/// u64 saturate.
pub fn extract_salary_number(salary: &str) -> u64 {
    FIRST_NUMBER
        .find(salary)
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Stable sort of `items` by `mode`; equal keys keep their input order.
/// `key` projects each item onto its record.
pub fn sort_by_mode<'r, T, F>(items: &mut [T], mode: SortMode, key: F)
where
    F: Fn(&T) -> &'r JobRecord,
{
    // Keys are parsed from free text, so compute each once.
    match mode {
        SortMode::Newest => items.sort_by_cached_key(|item| Reverse(key(item).recency())),
        SortMode::Oldest => items.sort_by_cached_key(|item| key(item).recency()),
        SortMode::SalaryHigh => items.sort_by_cached_key(|item| Reverse(salary_key(key(item)))),
        SortMode::SalaryLow => items.sort_by_cached_key(|item| salary_key(key(item))),
    }
}

pub fn sort_records(records: &mut [&JobRecord], mode: SortMode) {
    sort_by_mode(records, mode, |record| *record);
}

fn salary_key(job: &JobRecord) -> u64 {
    extract_salary_number(job.salary_text())
}
