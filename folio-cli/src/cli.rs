//! Command-line surface of the `folio` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Portfolio site engine and tooling")]
pub struct Cli {
    /// TOML config file (defaults and FOLIO_* variables apply without one)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clone a repository and suggest project fields
    Scan(ScanArgs),
    /// Append to or read the agent prompt log
    #[command(subcommand)]
    Prompt(PromptCommand),
    /// Update or show catalog projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Run the hero cube headless
    #[command(subcommand)]
    Hero(HeroCommand),
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Repository URL
    #[arg(long, required_unless_present = "local")]
    pub repo: Option<String>,
    /// Branch to clone
    #[arg(long)]
    pub branch: Option<String>,
    /// Print only the JSON report
    #[arg(long)]
    pub json: bool,
    /// Keep the clone and report where it is
    #[arg(long)]
    pub include_temp_path: bool,
    /// Scan an existing checkout instead of cloning
    #[arg(long, conflicts_with_all = ["branch", "include_temp_path"])]
    pub local: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum PromptCommand {
    /// Append a prompt to the latest session
    Append(PromptAppendArgs),
    /// List prompts of the latest session
    List {
        /// Case-insensitive filter over prompt, summary and files
        #[arg(short, long)]
        query: Option<String>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one prompt in full
    Show {
        /// Entry id, e.g. p004
        id: String,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct PromptAppendArgs {
    /// Prompt text, or `-` to read stdin
    #[arg(long, required_unless_present = "prompt_file", conflicts_with = "prompt_file")]
    pub prompt: Option<String>,
    /// Read the prompt from a file
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,
    /// One-line summary
    #[arg(long)]
    pub summary: Option<String>,
    /// Comma-separated files touched
    #[arg(long)]
    pub files: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Rescan a project's repository and write the results into the catalog
    Update(ProjectUpdateArgs),
    /// Show a catalog project
    Show {
        /// Project slug
        slug: String,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct ProjectUpdateArgs {
    /// Repository URL
    #[arg(long)]
    pub repo: String,
    /// Catalog slug
    #[arg(long)]
    pub slug: String,
    /// Branch to clone
    #[arg(long)]
    pub branch: Option<String>,
    /// Replace the description with the README's
    #[arg(long)]
    pub update_description: bool,
    /// Copy the repository screenshot into the site's assets
    #[arg(long)]
    pub copy_screenshot: bool,
}

#[derive(Debug, Subcommand)]
pub enum HeroCommand {
    /// Drag the cube, release it, and print frames until it settles
    Simulate(HeroSimulateArgs),
}

#[derive(Debug, Args)]
pub struct HeroSimulateArgs {
    /// Horizontal drag distance in pixels
    #[arg(long, default_value_t = 200.0, allow_hyphen_values = true)]
    pub dx: f32,
    /// Vertical drag distance in pixels
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub dy: f32,
    /// Drag duration in milliseconds
    #[arg(long, default_value_t = 250)]
    pub drag_ms: u32,
    /// Frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,
    /// Stop after this many seconds even if still spinning
    #[arg(long, default_value_t = 10.0)]
    pub max_seconds: f32,
    /// Print every frame as a JSON line
    #[arg(long)]
    pub json: bool,
}
