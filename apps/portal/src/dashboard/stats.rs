use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::gateway::ApplicationSource;
use crate::models::cv::Application;

/// Applications of one CV. A failed fetch counts as zero applications.
#[derive(Debug, Clone)]
pub struct CvApplications {
    pub cv_id: i64,
    pub applications: Vec<Application>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_cvs: usize,
    pub total_jobs: u64,
    pub total_applications: usize,
    /// Match logs are not tracked by the backend.
    pub total_matches: u64,
    /// CVs whose applications could not be fetched.
    pub failed_lookups: usize,
}

impl DashboardStats {
    pub fn new(total_cvs: usize, total_jobs: u64, per_cv: &[CvApplications]) -> Self {
        Self {
            total_cvs,
            total_jobs,
            total_applications: per_cv.iter().map(|c| c.applications.len()).sum(),
            total_matches: 0,
            failed_lookups: per_cv.iter().filter(|c| c.error.is_some()).count(),
        }
    }
}

/// Fetches the applications of every CV with at most `concurrency` requests
/// in flight. Results come back in the order of `cv_ids`.
pub async fn fetch_applications(
    source: Arc<dyn ApplicationSource>,
    cv_ids: &[i64],
    concurrency: usize,
) -> Vec<CvApplications> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut set = JoinSet::new();

    for (index, &cv_id) in cv_ids.iter().enumerate() {
        let source = source.clone();
        let semaphore = semaphore.clone();
        set.spawn(async move {
            // The semaphore is never closed, so a permit always arrives.
            let _permit = semaphore.acquire_owned().await;
            (index, source.applications(cv_id).await)
        });
    }

    let mut slots: Vec<Option<CvApplications>> = vec![None; cv_ids.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, result)) => {
                let cv_id = cv_ids[index];
                slots[index] = Some(match result {
                    Ok(applications) => {
                        debug!("CV {} has {} applications", cv_id, applications.len());
                        CvApplications {
                            cv_id,
                            applications,
                            error: None,
                        }
                    }
                    Err(e) => {
                        warn!("Failed to load applications for CV {cv_id}: {e}");
                        CvApplications {
                            cv_id,
                            applications: Vec::new(),
                            error: Some(e.to_string()),
                        }
                    }
                });
            }
            Err(e) => error!("Application fetch task failed: {e}"),
        }
    }

    slots
        .into_iter()
        .zip(cv_ids)
        .map(|(slot, &cv_id)| {
            slot.unwrap_or_else(|| CvApplications {
                cv_id,
                applications: Vec::new(),
                error: Some("Application fetch task failed".to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// CV `n` has `n` applications; CV ids divisible by 5 fail.
    #[derive(Default)]
    struct FakeApplications {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ApplicationSource for FakeApplications {
        async fn applications(&self, cv_id: i64) -> Result<Vec<Application>, GatewayError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10 * (cv_id as u64 % 3 + 1))).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if cv_id % 5 == 0 {
                return Err(GatewayError::Status {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                });
            }
            Ok((0..cv_id)
                .map(|id| Application {
                    id,
                    ..Default::default()
                })
                .collect())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fan_out_is_bounded_and_ordered() {
        let source = Arc::new(FakeApplications::default());
        let cv_ids: Vec<i64> = (1..=12).collect();

        let results = fetch_applications(source.clone(), &cv_ids, 3).await;

        assert!(source.peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(
            results.iter().map(|r| r.cv_id).collect::<Vec<_>>(),
            cv_ids,
            "results must follow CV order"
        );
        assert_eq!(results[3].applications.len(), 4);
        assert!(results[4].error.is_some());
        assert!(results[4].applications.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_count_as_zero() {
        let source = Arc::new(FakeApplications::default());
        let results = fetch_applications(source, &[1, 2, 5, 10], 8).await;
        let stats = DashboardStats::new(4, 120, &results);
        assert_eq!(stats.total_applications, 3);
        assert_eq!(stats.failed_lookups, 2);
        assert_eq!(stats.total_matches, 0);
    }

    #[tokio::test]
    async fn test_no_cvs() {
        let source = Arc::new(FakeApplications::default());
        assert!(fetch_applications(source, &[], 4).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_concurrency_still_progresses() {
        let source = Arc::new(FakeApplications::default());
        let results = fetch_applications(source, &[1, 2], 0).await;
        assert_eq!(results.len(), 2);
    }
}
