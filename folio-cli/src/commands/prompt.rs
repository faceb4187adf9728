use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use folio_core::prompt_log::{format_timestamp, shorten, single_line, AppendOutcome, NewPrompt, PromptEntry};
use folio_core::{FolioConfig, PromptLogStore};

use crate::cli::{PromptAppendArgs, PromptCommand};

/// Width of the prompt column in `prompt list`.
const LIST_PROMPT_CHARS: usize = 80;

pub fn run(cmd: PromptCommand, config: &FolioConfig) -> Result<()> {
    let store = PromptLogStore::open(&config.prompt_log.path);
    match cmd {
        PromptCommand::Append(args) => append(&store, args),
        PromptCommand::List { query, json } => list(&store, query.as_deref(), json),
        PromptCommand::Show { id, json } => show(&store, &id, json),
    }
}

fn read_prompt(args: &PromptAppendArgs) -> Result<String> {
    if let Some(path) = &args.prompt_file {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    match args.prompt.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading prompt from stdin")?;
            Ok(buf)
        }
        Some(text) => Ok(text.to_string()),
        None => bail!("missing --prompt or --prompt-file"),
    }
}

fn append(store: &PromptLogStore, args: PromptAppendArgs) -> Result<()> {
    let mut new = NewPrompt::new(read_prompt(&args)?);
    if let Some(summary) = args.summary.filter(|s| !s.trim().is_empty()) {
        new = new.with_summary(summary);
    }
    if let Some(files) = &args.files {
        new = new.with_files_csv(files);
    }

    match store
        .append(new, Utc::now())
        .with_context(|| format!("appending to {}", store.path().display()))?
    {
        AppendOutcome::Appended(entry) => println!(
            "Appended {} to {} at {}",
            entry.id,
            store.path().display(),
            entry.at.as_deref().unwrap_or_default()
        ),
        AppendOutcome::Duplicate => println!("Latest entry already matches prompt; skipping append."),
    }
    Ok(())
}

fn list(store: &PromptLogStore, query: Option<&str>, json: bool) -> Result<()> {
    let log = store.load()?;
    let entries: Vec<PromptEntry> = match query {
        Some(q) => log.search(q),
        None => log.entries().into_owned(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No prompts match.");
    }
    for entry in &entries {
        println!(
            "{:<10} {:<23} {}",
            entry.id,
            format_timestamp(entry.at.as_deref()),
            shorten(&single_line(&entry.prompt), LIST_PROMPT_CHARS)
        );
    }
    Ok(())
}

fn show(store: &PromptLogStore, id: &str, json: bool) -> Result<()> {
    let log = store.load()?;
    let Some(entry) = log.find(id) else {
        bail!("no prompt with id {id}");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }
    println!("{}  {}", entry.id, format_timestamp(entry.at.as_deref()));
    if let Some(summary) = &entry.summary {
        println!("Summary: {summary}");
    }
    if let Some(files) = entry.files.as_ref().filter(|f| !f.is_empty()) {
        println!("Files: {}", files.join(", "));
    }
    println!("\n{}", entry.prompt);
    Ok(())
}
