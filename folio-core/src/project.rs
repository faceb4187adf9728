//! Project records behind the portfolio's project pages.
//!
//! The catalog is a JSON array of [`Project`]s keyed by `slug`. Pages look a
//! project up by slug and render only the sections that have content; the
//! repo scanner feeds [`ProjectUpdate`]s back into the catalog.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FolioError, Result};
use crate::prompt_log::write_atomic;

/// One portfolio project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// URL key, unique within the catalog.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// One-paragraph summary.
    #[serde(default)]
    pub description: String,
    /// Source repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    /// Deployed app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    /// Screenshot, relative to the site's public root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
    /// Short labels under the title.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Technologies, shown as chips.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tech_used: Vec<String>,
    /// Lessons, one per bullet.
    #[serde(default, rename = "whatILearned", skip_serializing_if = "Vec::is_empty")]
    pub what_i_learned: Vec<String>,
    /// Feature bullets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

/// Fields a repo scan may overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectUpdate {
    /// New description; applied only when explicitly requested.
    pub description: Option<String>,
    /// New live URL.
    pub live_url: Option<String>,
    /// New screenshot URL.
    pub screenshot_url: Option<String>,
    /// Replacement tech list; ignored when empty.
    pub tech_used: Vec<String>,
    /// Replacement highlights; ignored when empty.
    pub highlights: Vec<String>,
    /// Replacement lessons; ignored when empty.
    pub what_i_learned: Vec<String>,
}

/// A titled block on the project page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section<'a> {
    /// Bulleted list.
    List {
        /// Heading.
        title: &'static str,
        /// Bullets.
        items: &'a [String],
    },
    /// Tech chips.
    Chips {
        /// Heading.
        title: &'static str,
        /// Chip labels.
        items: &'a [String],
    },
    /// Screenshot image.
    Image {
        /// Heading.
        title: &'static str,
        /// Image URL.
        url: &'a str,
    },
}

/// What the project page shows for a slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectView<'a> {
    /// The project exists.
    Found(&'a Project),
    /// No project has the slug; the page shows a "not found" fallback.
    NotFound,
}

impl Project {
    /// Tags joined for the subtitle line, or `None` if there are none.
    #[must_use]
    pub fn tag_line(&self) -> Option<String> {
        (!self.tags.is_empty()).then(|| self.tags.join(" • "))
    }

    /// Page sections with content, in display order.
    #[must_use]
    pub fn sections(&self) -> Vec<Section<'_>> {
        let mut sections = Vec::with_capacity(4);
        if !self.highlights.is_empty() {
            sections.push(Section::List {
                title: "Highlights",
                items: &self.highlights,
            });
        }
        if let Some(url) = self.screenshot_url.as_deref().filter(|u| !u.is_empty()) {
            sections.push(Section::Image {
                title: "Screenshot",
                url,
            });
        }
        if !self.tech_used.is_empty() {
            sections.push(Section::Chips {
                title: "Tech used",
                items: &self.tech_used,
            });
        }
        if !self.what_i_learned.is_empty() {
            sections.push(Section::List {
                title: "What I learned",
                items: &self.what_i_learned,
            });
        }
        sections
    }

    /// Apply `update`, touching the description only if `update_description`.
    ///
    /// Returns the names of the fields that changed.
    pub fn apply(&mut self, update: &ProjectUpdate, update_description: bool) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if update_description {
            match update.description.as_ref().filter(|d| !d.is_empty()) {
                Some(description) if *description != self.description => {
                    self.description.clone_from(description);
                    changed.push("description");
                }
                _ => {}
            }
        }
        if set_if_some(&mut self.live_url, update.live_url.as_ref()) {
            changed.push("liveUrl");
        }
        if set_if_some(&mut self.screenshot_url, update.screenshot_url.as_ref()) {
            changed.push("screenshotUrl");
        }
        if set_if_nonempty(&mut self.tech_used, &update.tech_used) {
            changed.push("techUsed");
        }
        if set_if_nonempty(&mut self.highlights, &update.highlights) {
            changed.push("highlights");
        }
        if set_if_nonempty(&mut self.what_i_learned, &update.what_i_learned) {
            changed.push("whatILearned");
        }
        changed
    }
}

fn set_if_some(field: &mut Option<String>, value: Option<&String>) -> bool {
    match value.filter(|v| !v.is_empty()) {
        Some(v) if field.as_ref() != Some(v) => {
            *field = Some(v.clone());
            true
        }
        _ => false,
    }
}

fn set_if_nonempty(field: &mut Vec<String>, value: &[String]) -> bool {
    if value.is_empty() || field.as_slice() == value {
        return false;
    }
    *field = value.to_vec();
    true
}

// ---------------------------------------------------------------------------
// ProjectCatalog
// ---------------------------------------------------------------------------

/// All projects, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
}

impl ProjectCatalog {
    /// Build a catalog, rejecting duplicate slugs.
    ///
    /// # Errors
    /// [`FolioError::Config`] if two projects share a slug.
    pub fn new(projects: Vec<Project>) -> Result<Self> {
        for (i, project) in projects.iter().enumerate() {
            if projects[..i].iter().any(|p| p.slug == project.slug) {
                return Err(FolioError::Config(format!("duplicate project slug '{}'", project.slug)));
            }
        }
        Ok(Self { projects })
    }

    /// Parse a JSON array of projects.
    ///
    /// # Errors
    /// [`FolioError::Serialization`] on malformed JSON, or
    /// [`FolioError::Config`] on duplicate slugs.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Read the catalog file.
    ///
    /// # Errors
    /// [`FolioError::Io`] if the file can't be read, otherwise as
    /// [`Self::from_json`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let catalog = Self::from_json(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), projects = catalog.len(), "Project catalog loaded");
        Ok(catalog)
    }

    /// Write the catalog as 2-space indented JSON with a trailing newline.
    ///
    /// # Errors
    /// [`FolioError::Io`] or [`FolioError::Serialization`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        write_atomic(path.as_ref(), json.as_bytes())
    }

    /// Number of projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Projects in display order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Project with `slug`.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    /// Page view for `slug`.
    #[must_use]
    pub fn view(&self, slug: &str) -> ProjectView<'_> {
        self.find(slug).map_or(ProjectView::NotFound, ProjectView::Found)
    }

    /// Apply a scan-derived update to the project with `slug`.
    ///
    /// # Errors
    /// [`FolioError::ProjectNotFound`] if no project has `slug`.
    pub fn apply_update(
        &mut self,
        slug: &str,
        update: &ProjectUpdate,
        update_description: bool,
    ) -> Result<Vec<&'static str>> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.slug == slug)
            .ok_or_else(|| FolioError::ProjectNotFound(slug.to_string()))?;
        let changed = project.apply(update, update_description);
        info!(slug, fields = ?changed, "Project updated");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {
            "slug": "llm-doc-embeddings",
            "name": "LLM Text Document Embeddings",
            "description": "Parse and load text files into a Postgres vector DB.",
            "githubUrl": "https://github.com/example/llm-doc-embeddings",
            "tags": ["RAG", "Postgres"],
            "techUsed": ["TypeScript"],
            "highlights": ["Indexes a directory."]
        },
        { "slug": "bare", "name": "Bare" }
    ]"#;

    fn catalog() -> ProjectCatalog {
        ProjectCatalog::from_json(CATALOG).expect("catalog")
    }

    #[test]
    fn find_and_view() {
        let c = catalog();
        assert_eq!(c.len(), 2);
        assert!(matches!(c.view("bare"), ProjectView::Found(p) if p.name == "Bare"));
        assert_eq!(c.view("missing"), ProjectView::NotFound);
    }

    #[test]
    fn sections_skip_empty_blocks() {
        let c = catalog();
        let project = c.find("llm-doc-embeddings").expect("project");
        let titles: Vec<_> = project
            .sections()
            .iter()
            .map(|s| match s {
                Section::List { title, .. } | Section::Chips { title, .. } | Section::Image { title, .. } => *title,
            })
            .collect();
        assert_eq!(titles, vec!["Highlights", "Tech used"]);
        assert_eq!(project.tag_line().as_deref(), Some("RAG • Postgres"));

        let bare = c.find("bare").expect("bare");
        assert!(bare.sections().is_empty());
        assert_eq!(bare.tag_line(), None);
    }

    #[test]
    fn duplicate_slugs_rejected() {
        let json = r#"[{ "slug": "a", "name": "A" }, { "slug": "a", "name": "B" }]"#;
        assert!(matches!(ProjectCatalog::from_json(json), Err(FolioError::Config(_))));
    }

    #[test]
    fn update_respects_description_flag() {
        let mut c = catalog();
        let update = ProjectUpdate {
            description: Some("Scanned description".into()),
            live_url: Some("https://example.github.io/llm-doc-embeddings/".into()),
            tech_used: vec!["TypeScript".into(), "Postgres".into()],
            ..ProjectUpdate::default()
        };

        let changed = c.apply_update("llm-doc-embeddings", &update, false).expect("update");
        assert_eq!(changed, vec!["liveUrl", "techUsed"]);
        let p = c.find("llm-doc-embeddings").expect("project");
        assert_eq!(p.description, "Parse and load text files into a Postgres vector DB.");
        assert_eq!(p.highlights, vec!["Indexes a directory.".to_string()]);

        let changed = c.apply_update("llm-doc-embeddings", &update, true).expect("update");
        assert_eq!(changed, vec!["description"]);
        assert_eq!(c.find("llm-doc-embeddings").expect("project").description, "Scanned description");
    }

    #[test]
    fn update_unknown_slug_fails() {
        let mut c = catalog();
        let err = c
            .apply_update("nope", &ProjectUpdate::default(), true)
            .expect_err("should fail");
        assert!(matches!(err, FolioError::ProjectNotFound(ref s) if s == "nope"));
    }

    #[test]
    fn save_omits_empty_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("projects.json");
        catalog().save(&path).expect("save");

        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.ends_with("]\n"));
        assert!(!raw.contains("\"liveUrl\""));
        assert!(raw.contains("\"githubUrl\""));
        assert_eq!(ProjectCatalog::load(&path).expect("reload"), catalog());
    }
}
