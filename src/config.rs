//! Runtime configuration: environment settings and grade-map overrides.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::proficiency::{EducationalLevel, GradeMap};

/// Settings read from the environment (after `.env` has been loaded).
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_file_path: PathBuf,
    pub results_api_token: Option<String>,
    pub grade_map_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            log_file_path: non_empty("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs/proficiency_rater.log")),
            results_api_token: non_empty("RESULTS_API_TOKEN"),
            grade_map_path: non_empty("GRADE_MAP_PATH").map(PathBuf::from),
        }
    }
}

/// Extra grade labels for schools whose class names are not in the built-in map.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "Turma Especial": "Anos Finais",
///   "Multisseriada A": "Anos Iniciais"
/// }
/// ```
pub struct GradeMapConfig {
    entries: HashMap<String, EducationalLevel>,
}

impl GradeMapConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read grade map '{}'", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid grade map '{}'", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: HashMap<String, EducationalLevel> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Built-in grade map with these entries layered on top.
    pub fn into_grade_map(self) -> GradeMap {
        GradeMap::default().with_overrides(self.entries)
    }
}
