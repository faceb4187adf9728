//! Scanner tests against fixture checkouts built in temp directories.

use std::fs;
use std::path::Path;

use folio_core::config::{ProjectsConfig, ScanConfig};
use folio_core::{FolioError, ProjectCatalog};
use folio_scan::{scan_checkout, update_project_from_repo, RepoScanner, ScanError, UpdateRequest};

const URL: &str = "https://github.com/example/cube";

const README: &str = "\
# Cube Portfolio

[![Build](https://img.shields.io/badge/build-passing-green.svg)](https://github.com/example/cube/actions)

An interactive portfolio with a draggable 3D cube
built on [three.js](https://threejs.org).

Live demo: https://cube-demo.vercel.app).

## Features

- Drag to spin the cube
- Inertia after release

## What I learned

- Quaternion math
- Damping that is frame-rate independent
";

const PACKAGE_JSON: &str = r#"{
  "name": "cube",
  "dependencies": { "react": "^18.3.0", "three": "^0.164.0", "@react-three/fiber": "^8.16.0" },
  "devDependencies": { "vite": "^5.2.0", "typescript": "^5.4.0", "eslint": "^8.57.0" }
}"#;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, contents).expect("write");
}

fn full_fixture(root: &Path) {
    write(root, ".git/config", "[core]");
    write(root, "README.md", README);
    write(root, "package.json", PACKAGE_JSON);
    write(root, "Dockerfile", "FROM node:20");
    write(root, "public/demo-screenshot.png", "png");
    write(root, "public/logo.png", "png");
    write(root, "src/cube.ts", "export {}");
    write(root, "src/main.ts", "export {}");
    write(root, "src/style.css", "body {}");
}

// ---------------------------------------------------------------------------
// Local checkouts
// ---------------------------------------------------------------------------

#[test]
fn full_fixture_suggests_every_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    full_fixture(dir.path());

    let report = scan_checkout(dir.path(), URL, &ScanConfig::default()).expect("scan");

    assert_eq!(report.github_url, URL);
    assert_eq!(
        report.description.as_deref(),
        Some("An interactive portfolio with a draggable 3D cube built on three.js.")
    );
    assert_eq!(report.live_url.as_deref(), Some("https://cube-demo.vercel.app"));
    assert_eq!(report.screenshot_path_in_repo.as_deref(), Some("public/demo-screenshot.png"));
    assert_eq!(report.highlights, vec!["Drag to spin the cube", "Inertia after release"]);
    assert_eq!(
        report.what_i_learned,
        vec!["Quaternion math", "Damping that is frame-rate independent"]
    );
    assert_eq!(
        report.tech_used,
        vec!["React", "Vite", "react-three-fiber", "three.js", "TypeScript", "Docker", "eslint"]
    );
    assert_eq!(report.repo_signals.top_extensions, vec![".png", ".ts", ".md", ".json", ".css"]);
    assert_eq!(report.repo_signals.dependency_count, 6);
    assert!(report.repo_signals.has_readme);
    assert_eq!(report.temp_clone_path, None);
}

#[test]
fn repo_without_readme_yields_empty_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "src/index.js", "console.log(1)");

    let report = scan_checkout(dir.path(), URL, &ScanConfig::default()).expect("scan");

    assert_eq!(report.description, None);
    assert_eq!(report.live_url, None);
    assert_eq!(report.screenshot_path_in_repo, None);
    assert!(report.highlights.is_empty());
    assert!(report.what_i_learned.is_empty());
    assert!(report.tech_used.is_empty());
    assert!(!report.repo_signals.has_readme);
    assert_eq!(report.repo_signals.top_extensions, vec![".js"]);

    let json = serde_json::to_value(&report).expect("json");
    assert!(json["description"].is_null());
    assert_eq!(json["highlights"], serde_json::json!([]));
}

#[test]
fn malformed_package_json_counts_no_dependencies() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "README.md", "# x\n\nA small tool that does things.\n");
    write(dir.path(), "package.json", "{ \"dependencies\": ");

    let report = scan_checkout(dir.path(), URL, &ScanConfig::default()).expect("scan");
    assert_eq!(report.repo_signals.dependency_count, 0);
    assert!(report.tech_used.is_empty());
    assert_eq!(report.description.as_deref(), Some("A small tool that does things."));
}

fn assert_no_readme_fields(root: &Path) {
    let report = scan_checkout(root, URL, &ScanConfig::default()).expect("scan");
    assert!(report.repo_signals.has_readme);
    assert_eq!(report.description, None);
    assert!(report.highlights.is_empty(), "highlights: {:?}", report.highlights);
    assert!(report.what_i_learned.is_empty(), "learned: {:?}", report.what_i_learned);
}

#[test]
fn binary_readme_yields_empty_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("README.md"),
        b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\xff\xd8\xff\xe0\x00\x10JFIF\n\xfe\xfe\xc3\x28 broken\n",
    )
    .expect("write");

    assert_no_readme_fields(dir.path());
}

#[test]
fn unclosed_code_fence_yields_empty_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "README.md",
        "# Tool\n\n## Usage\n\n```sh\nnpm install\nnpm run dev\n\n## What I learned\n\nNothing yet.\n",
    );

    assert_no_readme_fields(dir.path());
}

#[test]
fn headings_and_badges_only_yield_empty_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "README.md",
        "# Cube\n\n[![CI](https://img.shields.io/badge/ci-passing.svg)](https://ci.example)\n\
         ![screenshot](docs/shot.png)\n\n## Features\n\n## Usage\n\n## What I learned\n",
    );

    assert_no_readme_fields(dir.path());
}

#[test]
fn highlights_fall_back_to_first_bullet_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "README.md",
        "# Tool\n\nDoes one job well.\n\n- Fast startup\n- Single binary\n\nMore prose.\n",
    );

    let report = scan_checkout(dir.path(), URL, &ScanConfig::default()).expect("scan");
    assert_eq!(report.highlights, vec!["Fast startup", "Single binary"]);
}

#[test]
fn file_limit_caps_the_walk() {
    let dir = tempfile::tempdir().expect("tempdir");
    full_fixture(dir.path());
    let config = ScanConfig {
        max_files: 2,
        ..ScanConfig::default()
    };

    let report = scan_checkout(dir.path(), URL, &config).expect("scan");
    // Dockerfile and README.md only.
    assert_eq!(report.repo_signals.top_extensions, vec![".md"]);
    assert_eq!(report.screenshot_path_in_repo, None);
    assert!(report.tech_used.iter().any(|t| t == "Docker"));
    assert_eq!(report.repo_signals.dependency_count, 6);
}

#[tokio::test]
async fn scan_dir_runs_on_blocking_pool() {
    let dir = tempfile::tempdir().expect("tempdir");
    full_fixture(dir.path());

    let scanner = RepoScanner::new(ScanConfig::default());
    let report = scanner.scan_dir(dir.path(), URL).await.expect("scan");
    assert!(report.repo_signals.has_readme);

    let err = scanner
        .scan_dir(&dir.path().join("missing"), URL)
        .await
        .expect_err("should fail");
    assert!(matches!(err, ScanError::NotADirectory(_)));
}

// ---------------------------------------------------------------------------
// Clone + catalog update
// ---------------------------------------------------------------------------

fn missing_git() -> RepoScanner {
    RepoScanner::new(ScanConfig {
        git_program: "folio-test-no-such-git".into(),
        ..ScanConfig::default()
    })
}

fn site(root: &Path) -> ProjectsConfig {
    let path = root.join("src/data/projects.json");
    write(
        root,
        "src/data/projects.json",
        r#"[{ "slug": "cube", "name": "Cube", "description": "Old text.", "githubUrl": "https://github.com/example/cube" }]"#,
    );
    ProjectsConfig {
        path,
        screenshot_dir: root.join("public/project-screenshots"),
        screenshot_url_prefix: "project-screenshots/".into(),
    }
}

#[tokio::test]
async fn missing_git_is_reported() {
    let err = missing_git()
        .scan_remote(URL, None, false)
        .await
        .expect_err("should fail");
    assert!(matches!(err, ScanError::GitUnavailable { ref program, .. } if program == "folio-test-no-such-git"));
}

#[tokio::test]
async fn unknown_slug_fails_before_cloning() {
    let dir = tempfile::tempdir().expect("tempdir");
    let projects = site(dir.path());
    let request = UpdateRequest {
        repo: URL.into(),
        slug: "nope".into(),
        ..UpdateRequest::default()
    };

    // A clone attempt would surface as GitUnavailable instead.
    let err = update_project_from_repo(&missing_git(), &projects, &request)
        .await
        .expect_err("should fail");
    assert!(matches!(err, ScanError::Core(FolioError::ProjectNotFound(ref s)) if s == "nope"));
}

#[tokio::test]
async fn failed_clone_leaves_catalog_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let projects = site(dir.path());
    let before = fs::read_to_string(&projects.path).expect("read");
    let request = UpdateRequest {
        repo: URL.into(),
        slug: "cube".into(),
        update_description: true,
        ..UpdateRequest::default()
    };

    let err = update_project_from_repo(&missing_git(), &projects, &request)
        .await
        .expect_err("should fail");
    assert!(matches!(err, ScanError::GitUnavailable { .. }));
    assert_eq!(fs::read_to_string(&projects.path).expect("read"), before);
}

/// A stand-in `git` that copies a fixture into the clone destination.
#[cfg(unix)]
fn fake_git(bin_dir: &Path, fixture: &Path) -> String {
    use std::os::unix::fs::PermissionsExt;

    let script = bin_dir.join("fake-git");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\nfor dest; do :; done\nmkdir -p \"$dest\"\ncp -R \"{}/.\" \"$dest\"\n",
            fixture.display()
        ),
    )
    .expect("write script");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");
    script.display().to_string()
}

#[cfg(unix)]
#[tokio::test]
async fn update_writes_scan_into_catalog() {
    let work = tempfile::tempdir().expect("tempdir");
    let fixture = work.path().join("fixture");
    full_fixture(&fixture);
    let projects = site(&work.path().join("site"));

    let scanner = RepoScanner::new(ScanConfig {
        git_program: fake_git(work.path(), &fixture),
        ..ScanConfig::default()
    });
    let request = UpdateRequest {
        repo: URL.into(),
        branch: Some("main".into()),
        slug: "cube".into(),
        update_description: true,
        copy_screenshot: true,
    };

    let summary = update_project_from_repo(&scanner, &projects, &request)
        .await
        .expect("update");
    assert_eq!(summary.slug, "cube");
    assert_eq!(summary.screenshot_url.as_deref(), Some("project-screenshots/cube.png"));
    for field in ["description", "liveUrl", "screenshotUrl", "techUsed", "highlights", "whatILearned"] {
        assert!(summary.changed.contains(&field), "missing {field}");
    }
    assert!(projects.screenshot_dir.join("cube.png").is_file());

    let catalog = ProjectCatalog::load(&projects.path).expect("reload");
    let cube = catalog.find("cube").expect("cube");
    assert_eq!(
        cube.description,
        "An interactive portfolio with a draggable 3D cube built on three.js."
    );
    assert_eq!(cube.live_url.as_deref(), Some("https://cube-demo.vercel.app"));
    assert_eq!(cube.screenshot_url.as_deref(), Some("project-screenshots/cube.png"));
    assert_eq!(cube.highlights.len(), 2);
}
