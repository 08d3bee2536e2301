//! File-backed plan storage.
//!
//! Stands in for the storage collaborator: one pretty-printed JSON file
//! per plan under a directory, named after the (sanitized) plan name.

use std::fs;
use std::path::{Path, PathBuf};

use super::TripPlan;

/// Errors from plan storage.
#[derive(Debug, thiserror::Error)]
pub enum PlanStoreError {
    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Plan file did not parse
    #[error("plan file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No plan with the given name
    #[error("no saved plan named {0:?}")]
    NotFound(String),
}

/// Directory of saved plans.
#[derive(Debug, Clone)]
pub struct PlanStore {
    dir: PathBuf,
}

impl PlanStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created lazily on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save a plan, overwriting any previous one with the same name.
    pub fn save(&self, plan: &TripPlan) -> Result<PathBuf, PlanStoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&plan.name);
        let json = serde_json::to_string_pretty(plan)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Load a plan by name.
    pub fn load(&self, name: &str) -> Result<TripPlan, PlanStoreError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(PlanStoreError::NotFound(name.to_string()));
        }
        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// List saved plan names, sorted.
    pub fn list(&self) -> Result<Vec<String>, PlanStoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize(name)))
    }
}

/// Reduce a plan name to a safe filename stem.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

/// Path helper exposed for diagnostics.
impl AsRef<Path> for PlanStore {
    fn as_ref(&self) -> &Path {
        &self.dir
    }
}
