//! View-models handed to the renderer. Nothing here builds markup: each type
//! carries display-ready text so templates stay free of logic.

pub mod jobs;
pub mod listing;
pub mod text;

use std::fmt::Display;

use serde::Serialize;
use tracing::warn;

/// One independently loaded part of a page. A failed section carries a
/// message and leaves its siblings alone.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready { data: T },
    Failed { message: String },
}

impl<T> Section<T> {
    /// Logs the failure under `name` before turning it into a section.
    pub fn from_result<E: Display>(name: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Section::Ready { data },
            Err(e) => {
                warn!("Failed to load {name}: {e}");
                Section::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Section<U> {
        match self {
            Section::Ready { data } => Section::Ready { data: f(data) },
            Section::Failed { message } => Section::Failed { message },
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Section::Ready { data } => Some(data),
            Section::Failed { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready { .. })
    }
}
