use anyhow::{bail, Context, Result};
use folio_core::project::{ProjectView, Section};
use folio_core::{FolioConfig, Project, ProjectCatalog};
use folio_scan::{update_project_from_repo, RepoScanner, UpdateRequest};

use crate::cli::{ProjectCommand, ProjectUpdateArgs};

pub async fn run(cmd: ProjectCommand, config: &FolioConfig) -> Result<()> {
    match cmd {
        ProjectCommand::Update(args) => update(args, config).await,
        ProjectCommand::Show { slug, json } => show(&slug, json, config),
    }
}

async fn update(args: ProjectUpdateArgs, config: &FolioConfig) -> Result<()> {
    let scanner = RepoScanner::new(config.scan.clone());
    let request = UpdateRequest {
        repo: args.repo,
        branch: args.branch,
        slug: args.slug,
        update_description: args.update_description,
        copy_screenshot: args.copy_screenshot,
    };

    let summary = update_project_from_repo(&scanner, &config.projects, &request)
        .await
        .with_context(|| format!("updating project {}", request.slug))?;

    if summary.changed.is_empty() {
        println!("{} is already up to date", summary.slug);
    } else {
        println!(
            "Updated {} in {}: {}",
            summary.slug,
            config.projects.path.display(),
            summary.changed.join(", ")
        );
    }
    if let Some(url) = summary.screenshot_url {
        println!("Screenshot: {url}");
    }
    Ok(())
}

fn show(slug: &str, json: bool, config: &FolioConfig) -> Result<()> {
    let catalog = ProjectCatalog::load(&config.projects.path)
        .with_context(|| format!("loading {}", config.projects.path.display()))?;
    let ProjectView::Found(project) = catalog.view(slug) else {
        bail!("project not found: {slug}");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(project)?);
    } else {
        print_project(project);
    }
    Ok(())
}

fn print_project(project: &Project) {
    println!("{}", project.name);
    if let Some(tags) = project.tag_line() {
        println!("{tags}");
    }
    if !project.description.is_empty() {
        println!("\n{}", project.description);
    }
    for (label, url) in [("GitHub", &project.github_url), ("Live", &project.live_url)] {
        if let Some(url) = url {
            println!("{label}: {url}");
        }
    }

    for section in project.sections() {
        match section {
            Section::List { title, items } => {
                println!("\n{title}");
                for item in items {
                    println!("  - {item}");
                }
            }
            Section::Chips { title, items } => println!("\n{title}: {}", items.join(", ")),
            Section::Image { title, url } => println!("\n{title}: {url}"),
        }
    }
}
