use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::gateway::{GatewayError, JobSource};
use crate::models::job::JobRecord;

/// The backing job collection shared by every listing.
///
/// Loaded once at startup from `GET /jobs?limit=N`. Readers take an
/// `Arc<[JobRecord]>` snapshot and never see a half-replaced collection.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<RwLock<CatalogData>>,
}

#[derive(Debug, Clone)]
pub struct CatalogData {
    pub records: Arc<[JobRecord]>,
    /// Job count reported by the backend, which can exceed `records.len()`.
    pub reported_total: u64,
    /// Why the last load failed, if it did.
    pub load_error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Default for CatalogData {
    fn default() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            reported_total: 0,
            load_error: None,
            loaded_at: None,
        }
    }
}

impl Catalog {
    /// Initial load. A failed fetch leaves an empty collection plus the error,
    /// so listings still run and report no results.
    pub async fn load(source: &dyn JobSource, limit: usize) -> Self {
        let data = match fetch(source, limit).await {
            Ok(data) => data,
            Err(e) => {
                error!("Failed to load job catalog: {e}");
                CatalogData {
                    load_error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        };
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    /// Fetches again and swaps the collection in. On failure the previous
    /// collection stays in place and the error is returned.
    pub async fn reload(
        &self,
        source: &dyn JobSource,
        limit: usize,
    ) -> Result<Arc<[JobRecord]>, GatewayError> {
        let data = fetch(source, limit).await.map_err(|e| {
            error!("Failed to reload job catalog: {e}");
            e
        })?;
        let records = data.records.clone();
        *self.inner.write().await = data;
        Ok(records)
    }

    pub async fn records(&self) -> Arc<[JobRecord]> {
        self.inner.read().await.records.clone()
    }

    pub async fn data(&self) -> CatalogData {
        self.inner.read().await.clone()
    }

    pub async fn location_options(&self) -> Vec<String> {
        location_options(&self.inner.read().await.records)
    }
}

async fn fetch(source: &dyn JobSource, limit: usize) -> Result<CatalogData, GatewayError> {
    let page = source.list_jobs(limit).await?;
    let reported_total = page.reported_total();
    let records: Arc<[JobRecord]> = page.jobs.into();
    info!(
        "Loaded {} jobs into catalog (backend reports {})",
        records.len(),
        reported_total
    );
    Ok(CatalogData {
        records,
        reported_total,
        load_error: None,
        loaded_at: Some(Utc::now()),
    })
}

/// City names for the location filter: the part of each `work_location`
/// before the first `:`, split on `;`, de-duplicated and sorted.
pub fn location_options(records: &[JobRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|job| job.work_location.as_deref())
        .flat_map(|location| {
            location
                .split(':')
                .next()
                .unwrap_or("")
                .split(';')
                .map(str::trim)
                .filter(|city| !city.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobsPage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeSource {
        jobs: Vec<JobRecord>,
        total: Option<u64>,
        fail: AtomicBool,
    }

    impl FakeSource {
        fn new(n: i64) -> Self {
            Self {
                jobs: (1..=n)
                    .map(|id| JobRecord {
                        id,
                        ..Default::default()
                    })
                    .collect(),
                total: Some(500),
                fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl JobSource for FakeSource {
        async fn list_jobs(&self, limit: usize) -> Result<JobsPage, GatewayError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(GatewayError::Status {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                });
            }
            Ok(JobsPage {
                jobs: self.jobs.iter().take(limit).cloned().collect(),
                total: self.total,
            })
        }
    }

    fn with_location(location: &str) -> JobRecord {
        JobRecord {
            work_location: Some(location.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_respects_limit_and_total() {
        let source = FakeSource::new(10);
        let catalog = Catalog::load(&source, 4).await;
        let data = catalog.data().await;
        assert_eq!(data.records.len(), 4);
        assert_eq!(data.reported_total, 500);
        assert!(data.load_error.is_none());
        assert!(data.loaded_at.is_some());
    }

    #[tokio::test]
    async fn test_failed_load_holds_empty_collection() {
        let source = FakeSource::new(3);
        source.fail.store(true, Ordering::SeqCst);
        let catalog = Catalog::load(&source, 10).await;
        let data = catalog.data().await;
        assert!(data.records.is_empty());
        assert!(data.load_error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_records() {
        let source = FakeSource::new(3);
        let catalog = Catalog::load(&source, 10).await;
        source.fail.store(true, Ordering::SeqCst);
        assert!(catalog.reload(&source, 10).await.is_err());
        assert_eq!(catalog.records().await.len(), 3);
    }

    #[tokio::test]
    async fn test_reload_swaps_collection() {
        let source = FakeSource::new(3);
        source.fail.store(true, Ordering::SeqCst);
        let catalog = Catalog::load(&source, 10).await;
        source.fail.store(false, Ordering::SeqCst);
        let records = catalog.reload(&source, 10).await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(catalog.data().await.load_error.is_none());
    }

    #[test]
    fn test_location_options() {
        let records = vec![
            with_location("Hà Nội;Hồ Chí Minh: Quận 1"),
            with_location("Đà Nẵng: Hải Châu"),
            with_location("Hà Nội: Cầu Giấy"),
            with_location(""),
            JobRecord::default(),
        ];
        assert_eq!(
            location_options(&records),
            vec!["Hà Nội", "Hồ Chí Minh", "Đà Nẵng"]
        );
    }
}
