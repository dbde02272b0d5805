use serde::Serialize;

use crate::listing::engine::{ListingSnapshot, ListingState};
use crate::listing::page::{page_range, PagerWindow};
use crate::views::jobs::JobCard;
use crate::views::text::group_thousands;

pub const NO_RESULTS_TEXT: &str = "Không tìm thấy việc làm phù hợp";

#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub cards: Vec<JobCard>,
    pub matched_total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub pager: PagerWindow,
    pub count_text: String,
    pub no_results: bool,
    pub state: ListingState,
    pub location_options: Vec<String>,
}

impl ListingView {
    pub fn new(snapshot: &ListingSnapshot, location_options: Vec<String>) -> Self {
        Self {
            cards: snapshot.items.iter().map(JobCard::from).collect(),
            matched_total: snapshot.matched_total,
            page: snapshot.page,
            page_size: snapshot.page_size,
            total_pages: snapshot.total_pages,
            pager: PagerWindow::new(snapshot.page, snapshot.total_pages),
            count_text: count_text(snapshot.page, snapshot.page_size, snapshot.matched_total),
            no_results: snapshot.no_results(),
            state: snapshot.state.clone(),
            location_options,
        }
    }
}

/// "Hiển thị a-b trong n việc làm" for the visible slice. A page past the end
/// shows `0-0`.
pub fn count_text(page: usize, page_size: usize, total: usize) -> String {
    if total == 0 {
        return NO_RESULTS_TEXT.to_string();
    }
    let (start, end) = page_range(total, page, page_size)
        .map(|range| (range.start + 1, range.end))
        .unwrap_or((0, 0));
    format!(
        "Hiển thị {start}-{end} trong {} việc làm",
        group_thousands(total as u64)
    )
}
