//! Scan report types.

use std::path::PathBuf;

use folio_core::project::ProjectUpdate;
use serde::{Deserialize, Serialize};

use crate::readme::sanitize_url;

/// Coarse facts about the repository, independent of its README.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSignals {
    /// Most common file extensions (with leading dot), most frequent first.
    pub top_extensions: Vec<String>,
    /// Distinct `package.json` dependencies.
    pub dependency_count: usize,
    /// Whether a README was found.
    pub has_readme: bool,
}

/// Suggested project fields for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Repository the report describes.
    pub github_url: String,
    /// First prose paragraph of the README.
    pub description: Option<String>,
    /// Likely deployment URL found in the README.
    pub live_url: Option<String>,
    /// Screenshot-looking image, relative to the repository root.
    pub screenshot_path_in_repo: Option<String>,
    /// Detected technologies.
    pub tech_used: Vec<String>,
    /// Bullets from a lessons-learned section.
    #[serde(rename = "whatILearned")]
    pub what_i_learned: Vec<String>,
    /// Feature bullets.
    pub highlights: Vec<String>,
    /// Repository-level signals.
    pub repo_signals: RepoSignals,
    /// Where the clone was left, when it was kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_clone_path: Option<PathBuf>,
}

impl ScanReport {
    /// An empty report for `github_url`.
    #[must_use]
    pub fn empty(github_url: impl Into<String>) -> Self {
        Self {
            github_url: github_url.into(),
            description: None,
            live_url: None,
            screenshot_path_in_repo: None,
            tech_used: Vec::new(),
            what_i_learned: Vec::new(),
            highlights: Vec::new(),
            repo_signals: RepoSignals::default(),
            temp_clone_path: None,
        }
    }

    /// Fields to write into the project catalog.
    #[must_use]
    pub fn to_project_update(&self, screenshot_url: Option<String>) -> ProjectUpdate {
        ProjectUpdate {
            description: self.description.clone(),
            live_url: self.live_url.as_deref().and_then(sanitize_url),
            screenshot_url,
            tech_used: self.tech_used.clone(),
            highlights: self.highlights.clone(),
            what_i_learned: self.what_i_learned.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_page_field_names() {
        let mut report = ScanReport::empty("https://github.com/example/cube");
        report.what_i_learned = vec!["Damping".into()];
        let value = serde_json::to_value(&report).expect("serialize");

        assert_eq!(value["githubUrl"], "https://github.com/example/cube");
        assert!(value["description"].is_null());
        assert!(value["screenshotPathInRepo"].is_null());
        assert_eq!(value["whatILearned"][0], "Damping");
        assert_eq!(value["repoSignals"]["hasReadme"], false);
        assert!(value.get("tempClonePath").is_none());
    }

    #[test]
    fn update_sanitizes_live_url() {
        let mut report = ScanReport::empty("u");
        report.live_url = Some("https://cube.example.app).".into());
        report.highlights = vec!["Spin it".into()];
        let update = report.to_project_update(Some("project-screenshots/cube.png".into()));
        assert_eq!(update.live_url.as_deref(), Some("https://cube.example.app"));
        assert_eq!(update.screenshot_url.as_deref(), Some("project-screenshots/cube.png"));
        assert_eq!(update.highlights, vec!["Spin it".to_string()]);
    }
}
