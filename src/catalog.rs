//! Read-only course catalog.
//!
//! The catalog is fetched once per process from a local JSON file or an HTTP
//! URL, then only ever read.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{CatalogPayload, Course};

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode catalog: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// `http://` and `https://` locations are fetched, anything else is a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    departments: Vec<String>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Fetches and decodes the catalog. Nothing is kept on failure.
    pub async fn load(source: &CatalogSource) -> Result<Self, LoadError> {
        tracing::info!("Loading course catalog from {}", source);

        let body = match source {
            CatalogSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
            CatalogSource::Url(url) => {
                reqwest::get(url)
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
        };

        let catalog = Self::from_json(&body)?;
        tracing::info!(
            "Loaded {} courses across {} departments",
            catalog.len(),
            catalog.departments.len()
        );
        Ok(catalog)
    }

    pub fn from_json(body: &str) -> Result<Self, LoadError> {
        let payload: CatalogPayload = serde_json::from_str(body)?;
        Ok(Self::from_courses(payload.courses))
    }

    pub fn from_courses(courses: Vec<Course>) -> Self {
        let departments = courses
            .iter()
            .map(|c| c.department.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut by_id = HashMap::with_capacity(courses.len());
        for (i, course) in courses.iter().enumerate() {
            // first occurrence wins on duplicate ids
            by_id.entry(course.id.clone()).or_insert(i);
        }

        Self {
            courses,
            departments,
            by_id,
        }
    }

    /// All courses in source order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.by_id.get(id).map(|&i| &self.courses[i])
    }

    /// Distinct departments, sorted.
    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

/// Lifecycle of the one catalog fetch.
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    #[default]
    Loading,
    Loaded(Catalog),
    /// Holds the load error message. No partial catalog is kept.
    Failed(String),
}

impl CatalogState {
    pub fn from_result(result: Result<Catalog, LoadError>) -> Self {
        match result {
            Ok(catalog) => Self::Loaded(catalog),
            Err(e) => {
                tracing::error!("Error loading courses: {}", e);
                Self::Failed(e.to_string())
            }
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            Self::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }
}
