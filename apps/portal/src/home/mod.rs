//! Homepage: job total, a random featured selection and the most recent jobs.
//! The three fetches run concurrently and fail independently.

use axum::{extract::State, Json};
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::gateway::JobSource;
use crate::models::job::JobRecord;
use crate::state::AppState;
use crate::views::jobs::JobCard;
use crate::views::text::group_thousands;
use crate::views::Section;

pub const FEATURED_POOL: usize = 100;
pub const FEATURED_COUNT: usize = 8;
pub const RECENT_COUNT: usize = 6;

#[derive(Debug, Serialize)]
pub struct JobTotal {
    pub total: u64,
    /// "3.237+"
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub total: Section<JobTotal>,
    pub featured: Section<Vec<JobCard>>,
    pub recent: Section<Vec<JobCard>>,
}

pub async fn load_home(source: &dyn JobSource) -> HomeView {
    let (total, featured, recent) = tokio::join!(
        source.list_jobs(1),
        source.list_jobs(FEATURED_POOL),
        source.list_jobs(RECENT_COUNT),
    );

    HomeView {
        total: Section::from_result("job total", total).map(|page| {
            let total = page.reported_total();
            JobTotal {
                total,
                display: format!("{}+", group_thousands(total)),
            }
        }),
        featured: Section::from_result("featured jobs", featured).map(|page| {
            pick_featured(&page.jobs, FEATURED_COUNT, &mut rand::thread_rng())
        }),
        recent: Section::from_result("recent jobs", recent)
            .map(|page| page.jobs.iter().map(JobCard::from).collect()),
    }
}

/// Up to `count` distinct records chosen uniformly at random.
pub fn pick_featured<R: rand::Rng + ?Sized>(
    jobs: &[JobRecord],
    count: usize,
    rng: &mut R,
) -> Vec<JobCard> {
    jobs.choose_multiple(rng, count).map(JobCard::from).collect()
}

/// GET /api/v1/home
pub async fn handle_home(State(state): State<AppState>) -> Json<HomeView> {
    Json(load_home(&state.gateway).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::models::job::JobsPage;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    struct FakeSource {
        fail_limit: Option<usize>,
    }

    #[async_trait]
    impl JobSource for FakeSource {
        async fn list_jobs(&self, limit: usize) -> Result<JobsPage, GatewayError> {
            if self.fail_limit == Some(limit) {
                return Err(GatewayError::Status {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                });
            }
            Ok(JobsPage {
                jobs: make_jobs(limit.min(40) as i64),
                total: Some(3237),
            })
        }
    }

    fn make_jobs(n: i64) -> Vec<JobRecord> {
        (1..=n)
            .map(|id| JobRecord {
                id,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_pick_featured_is_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let jobs = make_jobs(40);
        let picked = pick_featured(&jobs, FEATURED_COUNT, &mut rng);
        assert_eq!(picked.len(), 8);
        let ids: HashSet<i64> = picked.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 8);

        let few = make_jobs(3);
        assert_eq!(pick_featured(&few, FEATURED_COUNT, &mut rng).len(), 3);
    }

    #[tokio::test]
    async fn test_home_sections() {
        let home = load_home(&FakeSource { fail_limit: None }).await;
        let total = home.total.data().unwrap();
        assert_eq!(total.total, 3237);
        assert_eq!(total.display, "3.237+");
        assert_eq!(home.featured.data().unwrap().len(), 8);
        assert_eq!(home.recent.data().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_one_failed_section_leaves_others() {
        let home = load_home(&FakeSource {
            fail_limit: Some(FEATURED_POOL),
        })
        .await;
        assert!(!home.featured.is_ready());
        assert!(home.total.is_ready());
        assert!(home.recent.is_ready());
    }
}
