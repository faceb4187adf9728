//! Clone-and-scan pipeline.
//!
//! ```text
//! git clone --depth 1 ──► README / package.json / package-lock.json
//!                     └─► file walk (skips .git) ──► extensions, screenshot, file names
//!                                                 └─► tech detection ──► ScanReport
//! ```
//!
//! Cloning runs `git` as a subprocess on the tokio runtime; the file walk and
//! heuristics are synchronous and run on the blocking pool.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use folio_core::config::ScanConfig;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::{Result, ScanError};
use crate::manifest::{parse_package_deps, read_capped};
use crate::readme::{
    bulletize, choose_live_url, extract_description, extract_first_section, extract_links, extract_section,
    first_bullet_block, sanitize_url, HIGHLIGHT_HEADINGS, LEARNED_HEADINGS,
};
use crate::tech::{detect_tech, TechSignals};
use crate::types::{RepoSignals, ScanReport};

/// README file names, in lookup order.
const README_CANDIDATES: &[&str] = &["README.md", "Readme.md", "readme.md"];

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".webp"];
const SCREENSHOT_HINTS: &[&str] = &["screenshot", "screen", "demo"];

/// Scans git repositories and local checkouts.
#[derive(Debug, Clone)]
pub struct RepoScanner {
    config: ScanConfig,
}

impl RepoScanner {
    /// Create a scanner with the given limits.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scanner limits.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Shallow-clone `url` into a fresh temp directory and scan it.
    ///
    /// The clone is deleted afterwards unless `keep_clone` is set, in which
    /// case its location is reported in [`ScanReport::temp_clone_path`].
    ///
    /// # Errors
    /// [`ScanError::GitUnavailable`] / [`ScanError::GitFailed`] if the clone
    /// fails, [`ScanError::Io`] if the temp directory can't be created.
    pub async fn scan_remote(&self, url: &str, branch: Option<&str>, keep_clone: bool) -> Result<ScanReport> {
        let root = std::env::temp_dir().join(format!("{}{}", self.config.temp_prefix, Uuid::new_v4().simple()));
        tokio::fs::create_dir_all(&root).await?;
        let repo_dir = root.join("repo");

        info!(url, branch, dest = %repo_dir.display(), "Cloning repository");
        if let Err(e) = self.clone_repo(url, branch, &repo_dir).await {
            remove_dir_logged(&root).await;
            return Err(e);
        }

        match self.scan_dir(&repo_dir, url).await {
            Ok(mut report) if keep_clone => {
                report.temp_clone_path = Some(repo_dir);
                Ok(report)
            }
            other => {
                remove_dir_logged(&root).await;
                other
            }
        }
    }

    /// Run `git clone --depth 1 [--branch <branch>] <url> <dest>`.
    ///
    /// # Errors
    /// [`ScanError::GitUnavailable`] if git can't be started,
    /// [`ScanError::GitFailed`] if it exits unsuccessfully.
    pub async fn clone_repo(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.config.git_program);
        cmd.args(["clone", "--depth", "1"]);
        if let Some(branch) = branch {
            cmd.args(["--branch", branch]);
        }
        cmd.arg("--")
            .arg(url)
            .arg(dest)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = cmd.output().await.map_err(|e| ScanError::GitUnavailable {
            program: self.config.git_program.clone(),
            reason: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(ScanError::GitFailed {
                url: url.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!(url, dest = %dest.display(), "Clone finished");
        Ok(())
    }

    /// Scan an existing checkout at `dir`, reporting it as `github_url`.
    ///
    /// # Errors
    /// [`ScanError::NotADirectory`] if `dir` isn't a directory, or
    /// [`ScanError::Task`] if the blocking scan task dies.
    pub async fn scan_dir(&self, dir: &Path, github_url: &str) -> Result<ScanReport> {
        let dir = dir.to_path_buf();
        let url = github_url.to_string();
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || scan_checkout(&dir, &url, &config)).await?
    }

    /// Delete a clone kept by [`Self::scan_remote`], including its temp root.
    pub async fn discard_clone(&self, repo_dir: &Path) {
        let root = repo_dir
            .parent()
            .filter(|p| {
                p.file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with(&self.config.temp_prefix))
            })
            .unwrap_or(repo_dir);
        remove_dir_logged(root).await;
    }
}

async fn remove_dir_logged(path: &Path) {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed temp clone"),
        Err(e) => warn!(path = %path.display(), error = %e, "Could not remove temp clone"),
    }
}

// ---------------------------------------------------------------------------
// Synchronous scan
// ---------------------------------------------------------------------------

/// Scan the checkout at `dir` on the current thread.
///
/// Unreadable or malformed content never fails the scan; it only leaves
/// fields empty.
///
/// # Errors
/// [`ScanError::NotADirectory`] if `dir` isn't a directory.
pub fn scan_checkout(dir: &Path, github_url: &str, config: &ScanConfig) -> Result<ScanReport> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.display().to_string()));
    }

    let readme = README_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
        .and_then(|p| read_optional(&p, config.max_readme_bytes));
    let readme = readme.as_deref();

    let package_json = dir.join("package.json");
    let deps = if package_json.is_file() {
        parse_package_deps(&read_optional(&package_json, config.max_readme_bytes).unwrap_or_default())
    } else {
        Vec::new()
    };
    let lock = read_optional(&dir.join("package-lock.json"), config.max_lock_bytes).unwrap_or_default();

    let files = walk_files(dir, config.max_files);
    let file_names: Vec<String> = files
        .iter()
        .filter_map(|f| f.file_name())
        .map(|n| n.to_string_lossy().to_lowercase())
        .collect();

    let links = readme.map(extract_links).unwrap_or_default();
    let live_url = choose_live_url(&links).and_then(sanitize_url);

    let what_i_learned = bulletize(extract_section(readme, LEARNED_HEADINGS).as_deref(), config.max_items);
    let mut highlights = bulletize(
        extract_first_section(readme, HIGHLIGHT_HEADINGS).as_deref(),
        config.max_items,
    );
    if highlights.is_empty() {
        highlights = first_bullet_block(readme, config.max_items);
    }

    let readme_lower = readme.unwrap_or_default().to_lowercase();
    let lock_lower = lock.to_lowercase();
    let tech_used = detect_tech(
        &TechSignals {
            deps: &deps,
            file_names: &file_names,
            readme_lower: &readme_lower,
            lock_lower: &lock_lower,
        },
        config.max_tech,
    );

    let report = ScanReport {
        github_url: github_url.to_string(),
        description: extract_description(readme),
        live_url,
        screenshot_path_in_repo: find_screenshot(&files),
        tech_used,
        what_i_learned,
        highlights,
        repo_signals: RepoSignals {
            top_extensions: top_extensions(&files, config.top_extensions),
            dependency_count: deps.len(),
            has_readme: readme.is_some(),
        },
        temp_clone_path: None,
    };

    info!(
        repo = github_url,
        files = files.len(),
        deps = deps.len(),
        has_readme = report.repo_signals.has_readme,
        tech = report.tech_used.len(),
        highlights = report.highlights.len(),
        "Repository scanned"
    );
    Ok(report)
}

fn read_optional(path: &Path, max_bytes: usize) -> Option<String> {
    match read_capped(path, max_bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unreadable file");
            None
        }
    }
}

/// Paths of all non-directory entries under `root`, relative to it, in
/// file-name order. `.git` is skipped.
fn walk_files(root: &Path, max_files: usize) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != ".git")
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|e| !e.file_type().is_dir())
        .take(max_files)
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}

/// The `n` most frequent extensions; ties keep first-seen order.
fn top_extensions(files: &[PathBuf], n: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for ext in files.iter().filter_map(|f| f.extension()) {
        let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
        match counts.iter_mut().find(|(e, _)| *e == ext) {
            Some((_, count)) => *count += 1,
            None => counts.push((ext, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(n).map(|(ext, _)| ext).collect()
}

/// First image whose relative path mentions a screenshot hint.
fn find_screenshot(files: &[PathBuf]) -> Option<String> {
    files.iter().find_map(|f| {
        let path = f.to_string_lossy();
        let lower = path.to_lowercase();
        let is_image = IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
        (is_image && SCREENSHOT_HINTS.iter().any(|hint| lower.contains(hint))).then(|| path.into_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, "x").expect("write");
    }

    #[test]
    fn walk_skips_git_and_respects_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), ".git/HEAD");
        touch(dir.path(), "a.ts");
        touch(dir.path(), "src/b.ts");
        touch(dir.path(), "src/c.rs");

        let files = walk_files(dir.path(), 100);
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| !f.starts_with(".git")));
        assert_eq!(walk_files(dir.path(), 2).len(), 2);
    }

    #[test]
    fn extensions_ranked_by_count() {
        let files: Vec<PathBuf> = ["a.TS", "b.ts", "c.md", "d.rs", "e.rs", "f.rs", ".gitignore", "Makefile"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(top_extensions(&files, 8), vec![".rs", ".ts", ".md"]);
        assert_eq!(top_extensions(&files, 1), vec![".rs"]);
    }

    #[test]
    fn screenshot_matches_hint_and_image_type() {
        let files: Vec<PathBuf> = ["docs/logo.png", "docs/Demo.gif", "assets/Screenshot-1.PNG", "screens/b.webp"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(find_screenshot(&files).as_deref(), Some("assets/Screenshot-1.PNG"));
        assert_eq!(find_screenshot(&files[..2]), None);
    }

    #[test]
    fn scan_checkout_rejects_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "file.txt");
        let err = scan_checkout(&dir.path().join("file.txt"), "u", &ScanConfig::default()).expect_err("should fail");
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }
}
