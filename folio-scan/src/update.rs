//! Refresh one catalog project from its repository.

use std::path::Path;

use folio_core::config::ProjectsConfig;
use folio_core::{FolioError, ProjectCatalog};
use tracing::{info, warn};

use crate::error::Result;
use crate::repo::RepoScanner;
use crate::types::ScanReport;

/// What to update and from where.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    /// Repository URL to clone.
    pub repo: String,
    /// Branch to clone instead of the default.
    pub branch: Option<String>,
    /// Catalog slug of the project to update.
    pub slug: String,
    /// Overwrite the description with the README's.
    pub update_description: bool,
    /// Copy the detected screenshot into the site's assets.
    pub copy_screenshot: bool,
}

/// Outcome of [`update_project_from_repo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Updated project.
    pub slug: String,
    /// Names of the fields that were written.
    pub changed: Vec<&'static str>,
    /// Public URL of the copied screenshot, if one was copied.
    pub screenshot_url: Option<String>,
}

/// Copy the report's screenshot out of `clone_dir` to
/// `<dest_dir>/<slug><ext>` and return its public URL.
///
/// Returns `Ok(None)` if the report has no screenshot.
///
/// # Errors
/// I/O failure creating `dest_dir` or copying the file.
pub fn copy_screenshot(
    report: &ScanReport,
    clone_dir: &Path,
    dest_dir: &Path,
    url_prefix: &str,
    slug: &str,
) -> Result<Option<String>> {
    let Some(rel) = report.screenshot_path_in_repo.as_deref() else {
        return Ok(None);
    };
    let src = clone_dir.join(rel);
    let ext = src
        .extension()
        .map_or_else(|| ".png".to_string(), |e| format!(".{}", e.to_string_lossy().to_lowercase()));
    let file_name = format!("{slug}{ext}");

    std::fs::create_dir_all(dest_dir)?;
    std::fs::copy(&src, dest_dir.join(&file_name))?;
    info!(from = %src.display(), to = %dest_dir.join(&file_name).display(), "Screenshot copied");
    Ok(Some(format!("{url_prefix}{file_name}")))
}

/// Scan `request.repo` and write the results into the catalog project
/// `request.slug`.
///
/// The slug is checked before anything is cloned. The clone is always
/// discarded afterwards.
///
/// # Errors
/// [`FolioError::ProjectNotFound`] for an unknown slug, any scan error, or
/// catalog I/O failure.
pub async fn update_project_from_repo(
    scanner: &RepoScanner,
    projects: &ProjectsConfig,
    request: &UpdateRequest,
) -> Result<UpdateSummary> {
    let mut catalog = ProjectCatalog::load(&projects.path)?;
    if catalog.find(&request.slug).is_none() {
        return Err(FolioError::ProjectNotFound(request.slug.clone()).into());
    }

    let report = scanner
        .scan_remote(&request.repo, request.branch.as_deref(), true)
        .await?;
    let outcome = apply_report(&mut catalog, projects, request, &report);
    match report.temp_clone_path.as_deref() {
        Some(clone_dir) => scanner.discard_clone(clone_dir).await,
        None => warn!(repo = %request.repo, "Scan did not report its clone path"),
    }
    let summary = outcome?;

    catalog.save(&projects.path)?;
    info!(slug = %summary.slug, changed = ?summary.changed, path = %projects.path.display(), "Catalog saved");
    Ok(summary)
}

fn apply_report(
    catalog: &mut ProjectCatalog,
    projects: &ProjectsConfig,
    request: &UpdateRequest,
    report: &ScanReport,
) -> Result<UpdateSummary> {
    let screenshot_url = match (request.copy_screenshot, report.temp_clone_path.as_deref()) {
        (true, Some(clone_dir)) => copy_screenshot(
            report,
            clone_dir,
            &projects.screenshot_dir,
            &projects.screenshot_url_prefix,
            &request.slug,
        )?,
        _ => None,
    };

    let update = report.to_project_update(screenshot_url.clone());
    let changed = catalog.apply_update(&request.slug, &update, request.update_description)?;
    Ok(UpdateSummary {
        slug: request.slug.clone(),
        changed,
        screenshot_url,
    })
}
