//! # folio-core
//!
//! Engine behind the portfolio site. The crate owns the state that the pages
//! render, independent of any browser or GPU:
//!
//! - **Hero**: the draggable cube on the homepage. Pointer-driven rotation,
//!   inertial spin-down, and per-frame selection of the face whose label is
//!   shown.
//! - **Prompt log**: the append-only JSON record of agent prompts that the
//!   "Generated with Agent Prompts" page reads.
//! - **Projects**: the catalog of project records behind the project pages.
//!
//! ## Frame Contract
//!
//! [`hero::HeroScene::frame`] is a pure numeric step run once per rendered
//! frame. It never allocates after construction and has no failure modes:
//! degenerate input (zero `dt`, NaN pointers, zero-length vectors) falls back
//! to "no change" rather than an error.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod hero;
pub mod project;
pub mod prompt_log;
pub mod types;

pub use config::FolioConfig;
pub use error::FolioError;
pub use hero::{HeroFrame, HeroScene};
pub use project::{Project, ProjectCatalog, ProjectUpdate};
pub use prompt_log::{PromptEntry, PromptLog, PromptLogStore};
pub use types::*;
