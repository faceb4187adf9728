use anyhow::{bail, Context, Result};
use folio_core::FolioConfig;
use folio_scan::{RepoScanner, ScanReport};

use crate::cli::ScanArgs;

pub async fn run(args: ScanArgs, config: &FolioConfig) -> Result<()> {
    let scanner = RepoScanner::new(config.scan.clone());

    let report = match (&args.local, &args.repo) {
        (Some(dir), repo) => {
            let url = repo.clone().unwrap_or_else(|| dir.display().to_string());
            scanner
                .scan_dir(dir, &url)
                .await
                .with_context(|| format!("scanning {}", dir.display()))?
        }
        (None, Some(repo)) => scanner
            .scan_remote(repo, args.branch.as_deref(), args.include_temp_path)
            .await
            .with_context(|| format!("scanning {repo}"))?,
        (None, None) => bail!("either --repo or --local is required"),
    };

    print_report(&report, args.json)
}

fn print_report(report: &ScanReport, json_only: bool) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    if json_only {
        println!("{json}");
        return Ok(());
    }

    println!("\nSuggested project fields:");
    println!("{json}");
    if let Some(path) = &report.temp_clone_path {
        println!("\nTemp clone is at: {}", path.display());
        println!("Remove it when done.");
    }
    Ok(())
}
