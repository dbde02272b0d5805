//! Shared header and footer markup. Pages ask for both at once; the two files
//! load concurrently and a missing one does not block the other.

use std::path::{Path, PathBuf};

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

const HEADER_FILE: &str = "header.html";
const FOOTER_FILE: &str = "footer.html";

#[derive(Debug, Serialize, PartialEq)]
pub struct Partials {
    pub header: Option<String>,
    pub footer: Option<String>,
}

pub async fn load_partials(frontend_dir: &Path) -> Partials {
    let components = frontend_dir.join("components");
    let (header, footer) = tokio::join!(
        read_partial(components.join(HEADER_FILE)),
        read_partial(components.join(FOOTER_FILE)),
    );
    Partials { header, footer }
}

async fn read_partial(path: PathBuf) -> Option<String> {
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Some(html),
        Err(e) => {
            warn!("Failed to load partial {}: {e}", path.display());
            None
        }
    }
}

/// GET /api/v1/layout
pub async fn handle_layout(State(state): State<AppState>) -> Json<Partials> {
    Json(load_partials(Path::new(&state.config.frontend_dir)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("components")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_loads_both_partials() {
        let dir = scratch_dir();
        let components = dir.path().join("components");
        std::fs::write(components.join(HEADER_FILE), "<header/>").unwrap();
        std::fs::write(components.join(FOOTER_FILE), "<footer/>").unwrap();

        let partials = load_partials(dir.path()).await;
        assert_eq!(partials.header.as_deref(), Some("<header/>"));
        assert_eq!(partials.footer.as_deref(), Some("<footer/>"));
    }

    #[tokio::test]
    async fn test_missing_footer_keeps_header() {
        let dir = scratch_dir();
        std::fs::write(dir.path().join("components").join(HEADER_FILE), "<header/>").unwrap();

        let partials = load_partials(dir.path()).await;
        assert_eq!(partials.header.as_deref(), Some("<header/>"));
        assert!(partials.footer.is_none());
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let partials = load_partials(Path::new("/nonexistent/portal-frontend")).await;
        assert_eq!(
            partials,
            Partials {
                header: None,
                footer: None
            }
        );
    }
}
